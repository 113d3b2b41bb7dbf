pub const CARD_SELECTOR: &str = ".card";
pub const CARD_ANIMATION_CLASS: &str = "animate-fade-in";

pub const VALIDATION_FORM_SELECTOR: &str = ".needs-validation";
pub const VALIDATED_CLASS: &str = "was-validated";

pub const TOOLTIP_SELECTOR: &str = r#"[data-bs-toggle="tooltip"]"#;

pub const COUNTDOWN_SELECTOR: &str = ".event-countdown";
pub const COUNTDOWN_DATE_ATTR: &str = "data-event-date";

pub const PASSWORD_TOGGLE_SELECTOR: &str = ".toggle-password";
pub const PASSWORD_TARGET_ATTR: &str = "data-target";
pub const PASSWORD_ICON_SELECTOR: &str = "i";
pub const PASSWORD_ICON_CLASSES: [&str; 2] = ["bi-eye", "bi-eye-slash"];

/// What to do with a submit event on a `.needs-validation` form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmitDecision {
    /// Prevent the default submit and stop propagation.
    pub block: bool,
    /// Add [`VALIDATED_CLASS`] so invalid fields highlight.
    pub mark_validated: bool,
}

impl SubmitDecision {
    pub fn for_validity(valid: bool) -> Self {
        Self {
            block: !valid,
            mark_validated: true,
        }
    }
}

/// The next `type` attribute for a password field whose toggle was clicked.
pub fn toggled_input_type(current: Option<&str>) -> &'static str {
    match current {
        Some(kind) if kind.eq_ignore_ascii_case("password") => "text",
        _ => "password",
    }
}

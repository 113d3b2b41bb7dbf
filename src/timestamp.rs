use std::fmt::{self, Write};
use std::rc::Rc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

pub const JUST_NOW: &str = "Just now";

const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Turns a parsed instant into display text. `None` falls back to [`JUST_NOW`].
pub trait TimestampStyle {
    fn render(&self, instant: DateTime<FixedOffset>) -> Option<String>;
}

/// A chrono strftime pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternStyle {
    pattern: String,
}

impl PatternStyle {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }
}

impl TimestampStyle for PatternStyle {
    fn render(&self, instant: DateTime<FixedOffset>) -> Option<String> {
        let mut out = String::new();
        // chrono reports bad patterns through fmt::Error rather than at parse time
        write!(out, "{}", instant.format(&self.pattern)).ok()?;
        Some(out)
    }
}

/// Formats notification timestamps in the viewer's local offset.
#[derive(Clone)]
pub struct TimestampFormatter {
    style: Rc<dyn TimestampStyle>,
    offset: FixedOffset,
}

impl fmt::Debug for TimestampFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimestampFormatter")
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl TimestampFormatter {
    pub fn new(pattern: impl Into<String>, offset: FixedOffset) -> Self {
        Self::with_style(PatternStyle::new(pattern), offset)
    }

    pub fn with_style(style: impl TimestampStyle + 'static, offset: FixedOffset) -> Self {
        Self {
            style: Rc::new(style),
            offset,
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Never fails: anything missing or unreadable renders as [`JUST_NOW`].
    pub fn format(&self, raw: Option<&Value>) -> String {
        raw.and_then(|value| parse_timestamp(value, &self.offset))
            .and_then(|instant| self.style.render(instant.with_timezone(&self.offset)))
            .unwrap_or_else(|| JUST_NOW.to_string())
    }
}

/// Accepts the shapes the server has been seen to emit: RFC 3339, ISO local
/// date-time (interpreted at `offset`), date-only (UTC midnight), epoch
/// milliseconds (integer or float), and the
/// `[y, m, d, h, min, s, nanos]` array form.
pub fn parse_timestamp(raw: &Value, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    match raw {
        Value::String(text) => parse_local_datetime(text, offset),
        Value::Number(number) => {
            let millis = number.as_i64().or_else(|| {
                number
                    .as_f64()
                    .filter(|value| value.is_finite())
                    .map(|value| value.trunc() as i64)
            })?;
            DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.with_timezone(offset))
        }
        Value::Array(parts) => parse_parts(parts, offset),
        _ => None,
    }
}

pub fn parse_local_datetime(text: &str, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }
    if let Some(naive) = LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return offset.from_local_datetime(&naive).single();
    }
    // a bare date is a UTC midnight, the way browsers read `2030-01-01`
    let midnight = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight).with_timezone(offset))
}

fn parse_parts(parts: &[Value], offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    let field = |idx: usize| -> Option<i64> {
        match parts.get(idx) {
            Some(value) => value.as_i64(),
            None => Some(0),
        }
    };
    if parts.len() < 3 {
        return None;
    }
    let year = i32::try_from(field(0)?).ok()?;
    let month = u32::try_from(field(1)?).ok()?;
    let day = u32::try_from(field(2)?).ok()?;
    let hour = u32::try_from(field(3)?).ok()?;
    let minute = u32::try_from(field(4)?).ok()?;
    let second = u32::try_from(field(5)?).ok()?;
    let nanos = u32::try_from(field(6)?).ok()?;
    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_nano_opt(hour, minute, second, nanos)?;
    offset.from_local_datetime(&naive).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn utc_formatter() -> TimestampFormatter {
        TimestampFormatter::new("%Y-%m-%d %H:%M", FixedOffset::east_opt(0).unwrap())
    }

    #[test]
    fn formats_local_iso_string() {
        let fmt = utc_formatter();
        assert_eq!(
            fmt.format(Some(&json!("2024-05-01T18:30:15.123"))),
            "2024-05-01 18:30"
        );
    }

    #[test]
    fn converts_rfc3339_into_viewer_offset() {
        let fmt = TimestampFormatter::new("%H:%M", FixedOffset::east_opt(2 * 3600).unwrap());
        assert_eq!(fmt.format(Some(&json!("2024-05-01T10:00:00Z"))), "12:00");
    }

    #[test]
    fn accepts_array_and_epoch_forms() {
        let fmt = utc_formatter();
        assert_eq!(fmt.format(Some(&json!([2024, 5, 1, 9, 5]))), "2024-05-01 09:05");
        assert_eq!(fmt.format(Some(&json!(0))), "1970-01-01 00:00");
    }

    #[test]
    fn twelve_hour_pattern() {
        let fmt = TimestampFormatter::new("%-m/%-d/%Y %I:%M %p", FixedOffset::east_opt(0).unwrap());
        assert_eq!(fmt.format(Some(&json!("2024-05-01T18:30"))), "5/1/2024 06:30 PM");
    }

    struct DayMonth;

    impl TimestampStyle for DayMonth {
        fn render(&self, instant: DateTime<FixedOffset>) -> Option<String> {
            Some(instant.format("%-d.%-m.%Y %H:%M").to_string())
        }
    }

    struct Refuses;

    impl TimestampStyle for Refuses {
        fn render(&self, _instant: DateTime<FixedOffset>) -> Option<String> {
            None
        }
    }

    #[test]
    fn custom_style_receives_local_instant() {
        let fmt = TimestampFormatter::with_style(DayMonth, FixedOffset::east_opt(2 * 3600).unwrap());
        assert_eq!(fmt.format(Some(&json!("2024-05-01T16:30:00Z"))), "1.5.2024 18:30");
        assert_eq!(fmt.format(Some(&json!("nonsense"))), JUST_NOW);
    }

    #[test]
    fn style_without_output_is_just_now() {
        let fmt = TimestampFormatter::with_style(Refuses, FixedOffset::east_opt(0).unwrap());
        assert_eq!(fmt.format(Some(&json!("2024-05-01T18:30"))), JUST_NOW);
    }

    #[test]
    fn float_epoch_millis() {
        let fmt = utc_formatter();
        assert_eq!(fmt.format(Some(&json!(1_714_588_200_000.0_f64))), "2024-05-01 18:30");
        assert_eq!(fmt.format(Some(&json!(1_714_588_200_000.75_f64))), "2024-05-01 18:30");
    }

    #[test]
    fn garbage_falls_back_to_just_now() {
        let fmt = utc_formatter();
        for raw in [
            json!("not a date"),
            json!(""),
            json!(null),
            json!({"when": "soon"}),
            json!([2024, 13, 40]),
            json!(["x"]),
        ] {
            assert_eq!(fmt.format(Some(&raw)), JUST_NOW, "input {raw}");
        }
        assert_eq!(fmt.format(None), JUST_NOW);
    }

    #[test]
    fn broken_pattern_never_panics() {
        let fmt = TimestampFormatter::new("%Q", FixedOffset::east_opt(0).unwrap());
        assert_eq!(fmt.format(Some(&json!("2024-05-01T18:30"))), JUST_NOW);
    }

    #[test]
    fn date_only_is_utc_midnight() {
        for hours in [-5, 0, 2, 9] {
            let offset = FixedOffset::east_opt(hours * 3600).unwrap();
            let parsed = parse_local_datetime("2024-05-01", &offset).unwrap();
            assert_eq!(parsed.timestamp(), 1_714_521_600, "offset {hours}h");
            assert_eq!(parsed.offset(), &offset);
        }
    }

    #[test]
    fn local_date_time_still_uses_viewer_offset() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let parsed = parse_local_datetime("2024-05-01T02:00", &offset).unwrap();
        assert_eq!(parsed.timestamp(), 1_714_521_600);
    }
}

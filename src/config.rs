use std::time::Duration;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::error::{PortalError, PortalResult};

/// Name of the `<meta>` tag whose `content` carries the JSON config.
pub const CONFIG_META_NAME: &str = "portal-config";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PortalConfig {
    pub api_base: String,
    pub admin_marker: String,
    pub admin_poll_secs: u64,
    pub notification_poll_secs: u64,
    pub countdown_tick_millis: u64,
    pub fade_millis: u64,
    /// strftime pattern for notification times. Unset means the browser's
    /// locale date and time.
    pub timestamp_format: Option<String>,
    pub countdown_started_message: String,
    pub empty_message: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            admin_marker: r#"[sec\:authorize="hasRole('ADMIN')"]"#.into(),
            admin_poll_secs: 5 * 60,
            notification_poll_secs: 30,
            countdown_tick_millis: 1000,
            fade_millis: 300,
            timestamp_format: None,
            countdown_started_message: "Event has started!".into(),
            empty_message: "No new notifications".into(),
        }
    }
}

impl PortalConfig {
    /// Parse a JSON object, filling every missing field with its default.
    pub fn from_json(raw: &str) -> PortalResult<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: PortalConfig =
            serde_json::from_str(raw).map_err(|err| PortalError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PortalResult<()> {
        let periods = [
            ("adminPollSecs", self.admin_poll_secs),
            ("notificationPollSecs", self.notification_poll_secs),
            ("countdownTickMillis", self.countdown_tick_millis),
        ];
        for (name, value) in periods {
            if value == 0 {
                return Err(PortalError::Config(format!("{name} must be greater than zero")));
            }
        }
        if let Some(pattern) = &self.timestamp_format {
            if StrftimeItems::new(pattern).any(|item| item == Item::Error) {
                return Err(PortalError::Config(format!("invalid timestampFormat: {pattern}")));
            }
        }
        Ok(())
    }

    pub fn admin_poll_interval(&self) -> Duration {
        Duration::from_secs(self.admin_poll_secs)
    }

    pub fn notification_poll_interval(&self) -> Duration {
        Duration::from_secs(self.notification_poll_secs)
    }

    pub fn countdown_tick(&self) -> Duration {
        Duration::from_millis(self.countdown_tick_millis)
    }

    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_behaviour() {
        let config = PortalConfig::default();
        assert_eq!(config.admin_poll_interval(), Duration::from_secs(300));
        assert_eq!(config.notification_poll_interval(), Duration::from_secs(30));
        assert_eq!(config.countdown_tick(), Duration::from_secs(1));
        assert_eq!(config.fade_duration(), Duration::from_millis(300));
        assert_eq!(config.timestamp_format, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = PortalConfig::from_json(r#"{"apiBase":"/app","fadeMillis":0}"#).unwrap();
        assert_eq!(config.api_base, "/app");
        assert_eq!(config.fade_millis, 0);
        assert_eq!(config.notification_poll_secs, 30);
    }

    #[test]
    fn blank_json_is_default() {
        assert_eq!(PortalConfig::from_json("  ").unwrap(), PortalConfig::default());
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let err = PortalConfig::from_json(r#"{"notificationPollSecs":0}"#).unwrap_err();
        assert!(matches!(err, PortalError::Config(msg) if msg.contains("notificationPollSecs")));
    }

    #[test]
    fn rejects_bad_timestamp_pattern() {
        let result = PortalConfig::from_json(r#"{"timestampFormat":"%Q"}"#);
        assert!(matches!(result, Err(PortalError::Config(_))));
    }

    #[test]
    fn explicit_timestamp_pattern_overrides_locale() {
        let config = PortalConfig::from_json(r#"{"timestampFormat":"%d.%m.%Y %H:%M"}"#).unwrap();
        assert_eq!(config.timestamp_format.as_deref(), Some("%d.%m.%Y %H:%M"));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            PortalConfig::from_json("{not json"),
            Err(PortalError::Config(_))
        ));
    }
}

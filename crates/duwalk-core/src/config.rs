//! Usage-check interval configuration.

use std::time::Duration;

use serde::de::{self, DeserializeSeed};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;

/// Validation inputs supplied by the hosting system.
///
/// `minimum` is the shortest interval a config may request. When
/// `env_override` is set, the interval was already taken from the
/// environment and any value decoded from a config document is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalPolicy {
    /// Shortest allowed interval.
    pub minimum: Duration,
    /// The interval is sourced from the environment.
    pub env_override: bool,
}

impl IntervalPolicy {
    /// Default minimum interval between usage scans.
    pub const DEFAULT_MINIMUM: Duration = Duration::from_secs(2 * 60);

    /// Create a policy with the given minimum and no environment override.
    pub fn new(minimum: Duration) -> Self {
        Self {
            minimum,
            env_override: false,
        }
    }

    /// Set whether the environment overrides decoded values.
    pub fn with_env_override(mut self, env_override: bool) -> Self {
        self.env_override = env_override;
        self
    }
}

impl Default for IntervalPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MINIMUM)
    }
}

/// Parse a human duration string and check it against the policy minimum.
///
/// Malformed text yields [`ConfigError::InvalidDuration`] with the parser's
/// message; a well-formed value shorter than the minimum yields
/// [`ConfigError::BelowMinimum`]. Values are never clamped.
pub fn parse_interval(text: &str, policy: &IntervalPolicy) -> Result<Duration, ConfigError> {
    let interval = humantime::parse_duration(text).map_err(|e| ConfigError::InvalidDuration {
        message: e.to_string(),
    })?;

    if interval < policy.minimum {
        return Err(ConfigError::BelowMinimum {
            interval,
            minimum: policy.minimum,
        });
    }

    Ok(interval)
}

/// Wire form: `{"interval": "<duration>"}`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawUsageConfig {
    #[serde(default)]
    interval: String,
}

/// Configurable parameters of the periodic usage check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageConfig {
    /// Period between successive disk-usage scans.
    pub interval: Duration,
}

impl UsageConfig {
    /// Default period between usage scans.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(12 * 60 * 60);

    /// Create a config with the given interval. No validation is applied.
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Render the canonical duration string, e.g. `1h 30m`.
    pub fn interval_string(&self) -> String {
        humantime::format_duration(self.interval).to_string()
    }

    /// Encode to the JSON wire form.
    pub fn encode(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a fresh config, starting from the defaults.
    pub fn decode(data: &str, policy: &IntervalPolicy) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.decode_into(data, policy)?;
        Ok(config)
    }

    /// Decode `data` into this config.
    ///
    /// The JSON document must be well formed in every case. When the policy
    /// has an environment override the interval text is not even parsed and
    /// `self` is left as it was.
    pub fn decode_into(&mut self, data: &str, policy: &IntervalPolicy) -> Result<(), ConfigError> {
        let raw: RawUsageConfig = serde_json::from_str(data)?;
        self.apply_raw(raw, policy)
    }

    /// Seed for deserializing a config nested in a larger document.
    ///
    /// The seed starts from `self` and applies `policy` exactly like
    /// [`UsageConfig::decode_into`].
    pub fn seed(self, policy: &IntervalPolicy) -> UsageConfigSeed<'_> {
        UsageConfigSeed {
            current: self,
            policy,
        }
    }

    fn apply_raw(
        &mut self,
        raw: RawUsageConfig,
        policy: &IntervalPolicy,
    ) -> Result<(), ConfigError> {
        if policy.env_override {
            tracing::debug!(
                interval = %raw.interval,
                "usage interval set via environment, ignoring configured value"
            );
            return Ok(());
        }

        self.interval = parse_interval(&raw.interval, policy)?;
        Ok(())
    }

    /// Apply an interval read from the environment.
    ///
    /// An unset or empty value leaves both the config and policy untouched.
    /// Otherwise the value is validated like a decoded one, stored, and the
    /// returned policy has `env_override` set so later decodes keep it.
    pub fn apply_env(
        &mut self,
        value: Option<&str>,
        policy: IntervalPolicy,
    ) -> Result<IntervalPolicy, ConfigError> {
        match value.map(str::trim) {
            Some(text) if !text.is_empty() => {
                self.interval = parse_interval(text, &policy)?;
                Ok(policy.with_env_override(true))
            }
            _ => Ok(policy),
        }
    }
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

impl Serialize for UsageConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawUsageConfig {
            interval: self.interval_string(),
        }
        .serialize(serializer)
    }
}

/// [`DeserializeSeed`] returned by [`UsageConfig::seed`].
#[derive(Debug, Clone, Copy)]
pub struct UsageConfigSeed<'a> {
    current: UsageConfig,
    policy: &'a IntervalPolicy,
}

impl<'de> DeserializeSeed<'de> for UsageConfigSeed<'_> {
    type Value = UsageConfig;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<UsageConfig, D::Error> {
        let raw = RawUsageConfig::deserialize(deserializer)?;
        let mut config = self.current;
        config
            .apply_raw(raw, self.policy)
            .map_err(de::Error::custom)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    fn hour_policy() -> IntervalPolicy {
        IntervalPolicy::new(HOUR)
    }

    #[test]
    fn test_parse_below_minimum() {
        let err = parse_interval("30m", &hour_policy()).unwrap_err();
        assert!(err.is_below_minimum());
        let message = err.to_string();
        assert!(message.contains("30m"));
        assert!(message.contains("1h"));
    }

    #[test]
    fn test_parse_accepts_minimum_and_above() {
        assert_eq!(parse_interval("2h", &hour_policy()).unwrap(), 2 * HOUR);
        assert_eq!(parse_interval("1h", &hour_policy()).unwrap(), HOUR);
        assert_eq!(
            parse_interval("1h30m", &hour_policy()).unwrap(),
            HOUR + Duration::from_secs(30 * 60)
        );
    }

    #[test]
    fn test_parse_malformed() {
        let err = parse_interval("not-a-duration", &hour_policy()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDuration { .. }));
    }

    #[test]
    fn test_encode_shape() {
        let config = UsageConfig::new(HOUR + Duration::from_secs(30 * 60));
        let value: serde_json::Value = serde_json::from_str(&config.encode().unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({ "interval": "1h 30m" }));
    }

    #[test]
    fn test_round_trip() {
        let policy = IntervalPolicy::new(Duration::from_secs(60));
        let config = UsageConfig::new(Duration::from_secs(45 * 60));
        let decoded = UsageConfig::decode(&config.encode().unwrap(), &policy).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_env_override_keeps_existing_interval() {
        let policy = hour_policy().with_env_override(true);
        let mut config = UsageConfig::new(3 * HOUR);

        for text in ["5h", "garbage", "1m"] {
            let json = format!(r#"{{"interval":"{text}"}}"#);
            config.decode_into(&json, &policy).unwrap();
            assert_eq!(config.interval, 3 * HOUR);
        }
    }

    #[test]
    fn test_malformed_json_is_an_error_even_with_override() {
        let policy = hour_policy().with_env_override(true);
        let mut config = UsageConfig::default();
        let err = config.decode_into("{not json", &policy).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_decode_error_leaves_config_untouched() {
        let mut config = UsageConfig::new(3 * HOUR);
        let json = r#"{"interval":"10m"}"#;
        assert!(config.decode_into(json, &hour_policy()).is_err());
        assert_eq!(config.interval, 3 * HOUR);
    }

    #[test]
    fn test_missing_interval_field() {
        let err = UsageConfig::decode("{}", &hour_policy()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDuration { .. }));
    }

    #[test]
    fn test_apply_env() {
        let mut config = UsageConfig::default();

        let policy = config.apply_env(None, hour_policy()).unwrap();
        assert!(!policy.env_override);
        assert_eq!(config, UsageConfig::default());

        let policy = config.apply_env(Some(""), policy).unwrap();
        assert!(!policy.env_override);

        let policy = config.apply_env(Some("4h"), policy).unwrap();
        assert!(policy.env_override);
        assert_eq!(config.interval, 4 * HOUR);

        config.decode_into(r#"{"interval":"2h"}"#, &policy).unwrap();
        assert_eq!(config.interval, 4 * HOUR);
    }

    #[test]
    fn test_seed_applies_policy() {
        let policy = hour_policy();
        let value = serde_json::json!({ "interval": "3h" });
        let seed = UsageConfig::default().seed(&policy);
        let config = seed.deserialize(&value).unwrap();
        assert_eq!(config.interval, 3 * HOUR);

        let short = serde_json::json!({ "interval": "10m" });
        let seed = UsageConfig::default().seed(&policy);
        let err = seed.deserialize(&short).unwrap_err();
        assert!(err.to_string().contains("minimum required value is 1h"));

        let policy = hour_policy().with_env_override(true);
        let seed = UsageConfig::new(5 * HOUR).seed(&policy);
        assert_eq!(seed.deserialize(&short).unwrap().interval, 5 * HOUR);
    }

    #[test]
    fn test_apply_env_validates() {
        let mut config = UsageConfig::default();
        let err = config.apply_env(Some("5m"), hour_policy()).unwrap_err();
        assert!(err.is_below_minimum());
        assert_eq!(config, UsageConfig::default());
    }
}

use serde::{Deserialize, Serialize};

/// Feature flags controlling which optional integrations are active.
///
/// Loaded from `config.toml` at server startup and exposed to clients
/// via a server function. Every field defaults to `false` so that a
/// missing or incomplete config file disables all optional features.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FeatureFlags {
    /// Store submission files in S3 instead of the local upload directory.
    #[serde(default)]
    pub s3: bool,
    #[serde(default)]
    pub telemetry: bool,
    /// Allow `POST /api/auth/register` without a staff session.
    #[serde(default)]
    pub self_registration: bool,
}

/// Top-level config file structure matching `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeatureFlags,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_empty_toml_defaults_all_false() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.features, FeatureFlags::default());
    }

    #[test]
    fn deserialize_partial_toml_defaults_missing_fields() {
        let config: AppConfig = toml::from_str(
            r#"
            [features]
            telemetry = true
            "#,
        )
        .unwrap();
        assert!(config.features.telemetry);
        assert!(!config.features.s3);
        assert!(!config.features.self_registration);
    }

    #[test]
    fn deserialize_full_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [features]
            s3 = true
            telemetry = true
            self_registration = true
            "#,
        )
        .unwrap();
        assert_eq!(
            config.features,
            FeatureFlags {
                s3: true,
                telemetry: true,
                self_registration: true,
            }
        );
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config: AppConfig = toml::from_str(
            r#"
            [features]
            sms_alerts = true
            "#,
        )
        .unwrap();
        assert_eq!(config.features, FeatureFlags::default());
    }
}

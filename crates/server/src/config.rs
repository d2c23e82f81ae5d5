use shared_types::{AppConfig, FeatureFlags};
use std::sync::OnceLock;

static FLAGS: OnceLock<FeatureFlags> = OnceLock::new();

/// Path to the config file, relative to the project root.
const CONFIG_PATH: &str = "config.toml";

/// Parse the `[features]` table of a config file body.
/// Invalid TOML turns every flag off.
pub fn parse_feature_flags(contents: &str) -> FeatureFlags {
    match toml::from_str::<AppConfig>(contents) {
        Ok(config) => config.features,
        Err(e) => {
            eprintln!("[config] Failed to parse {CONFIG_PATH}: {e}, all flags off");
            FeatureFlags::default()
        }
    }
}

/// Read `config.toml` once and keep the flags for the process lifetime.
/// Later calls are no-ops. A missing file turns every flag off.
pub fn load_feature_flags() {
    FLAGS.get_or_init(|| match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => {
            let flags = parse_feature_flags(&contents);
            eprintln!("[config] Feature flags: {flags:?}");
            flags
        }
        Err(e) => {
            eprintln!("[config] {CONFIG_PATH} not found ({e}), all flags off");
            FeatureFlags::default()
        }
    });
}

/// The loaded flags, or all-off when `load_feature_flags()` has not run.
pub fn feature_flags() -> &'static FeatureFlags {
    static DEFAULT: FeatureFlags = FeatureFlags {
        s3: false,
        telemetry: false,
        self_registration: false,
    };
    FLAGS.get().unwrap_or(&DEFAULT)
}

/// Largest accepted submission file. Body limits and file validation
/// both derive from this value.
pub fn max_upload_bytes() -> usize {
    parse_upload_limit(std::env::var("MAX_UPLOAD_BYTES").ok().as_deref())
}

fn parse_upload_limit(raw: Option<&str>) -> usize {
    raw.and_then(|v| v.trim().parse().ok())
        .filter(|n| *n > 0)
        .unwrap_or(shared_types::MAX_SUBMISSION_BYTES as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse_from_features_table() {
        let flags = parse_feature_flags("[features]\ns3 = true\nself_registration = true\n");
        assert!(flags.s3);
        assert!(flags.self_registration);
        assert!(!flags.telemetry);
    }

    #[test]
    fn upload_limit_falls_back_to_the_default() {
        let default = shared_types::MAX_SUBMISSION_BYTES as usize;
        assert_eq!(parse_upload_limit(None), default);
        assert_eq!(parse_upload_limit(Some("lots")), default);
        assert_eq!(parse_upload_limit(Some("0")), default);
        assert_eq!(parse_upload_limit(Some("52428800")), 52_428_800);
    }

    #[test]
    fn broken_file_turns_everything_off() {
        assert_eq!(parse_feature_flags("[features\ns3 = "), FeatureFlags::default());
    }

    #[test]
    fn unloaded_flags_are_all_off() {
        // FLAGS is never initialised by unit tests.
        assert_eq!(feature_flags(), &FeatureFlags::default());
    }
}

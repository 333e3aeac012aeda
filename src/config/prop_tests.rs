use super::*;
use crate::test_utils::arb_messy_string;
use proptest::prelude::*;

fn arb_log_format() -> impl Strategy<Value = LogFormat> {
    prop_oneof![Just(LogFormat::Human), Just(LogFormat::Json)]
}

/// Generates an arbitrary Config
fn arb_config() -> impl Strategy<Value = Config> {
    (
        arb_messy_string(),
        arb_messy_string(),
        any::<u16>(),
        prop::option::of(arb_messy_string().prop_map(PathBuf::from)),
        arb_log_format(),
        prop::option::of(arb_messy_string()),
    )
        .prop_map(|(database_url, host, port, log_dir, log_format, server_url)| Config {
            database_url,
            host,
            port,
            log_dir,
            log_format,
            server_url,
        })
}

/// Generates an arbitrary ConfigUpdate
fn arb_config_update() -> impl Strategy<Value = ConfigUpdate> {
    (
        prop::option::of(arb_messy_string()),
        prop::option::of(arb_messy_string()),
        prop::option::of(any::<u16>()),
        prop::option::of(arb_messy_string().prop_map(PathBuf::from)),
        prop::option::of(arb_log_format()),
        prop::option::of(arb_messy_string()),
    )
        .prop_map(|(database_url, host, port, log_dir, log_format, server_url)| ConfigUpdate {
            database_url,
            host,
            port,
            log_dir,
            log_format,
            server_url,
        })
}

proptest! {
    /// Applying an empty update changes nothing
    #[test]
    fn prop_empty_update_is_identity(config in arb_config()) {
        prop_assert_eq!(config.clone().apply_update(ConfigUpdate::default()), config);
    }

    /// Every field present in an update wins; absent fields keep the old value
    #[test]
    fn prop_update_fields_take_precedence(config in arb_config(), update in arb_config_update()) {
        let merged = config.clone().apply_update(update.clone());

        prop_assert_eq!(&merged.database_url, update.database_url.as_ref().unwrap_or(&config.database_url));
        prop_assert_eq!(&merged.host, update.host.as_ref().unwrap_or(&config.host));
        prop_assert_eq!(merged.port, update.port.unwrap_or(config.port));
        prop_assert_eq!(&merged.log_dir, &update.log_dir.clone().or(config.log_dir.clone()));
        prop_assert_eq!(merged.log_format, update.log_format.unwrap_or(config.log_format));
        prop_assert_eq!(&merged.server_url, &update.server_url.clone().or(config.server_url.clone()));
    }

    /// Applying the same update twice is the same as applying it once
    #[test]
    fn prop_update_is_idempotent(config in arb_config(), update in arb_config_update()) {
        let once = config.clone().apply_update(update.clone());
        let twice = once.clone().apply_update(update);
        prop_assert_eq!(once, twice);
    }

    /// A config file written from an update parses back to the same update
    #[test]
    fn prop_toml_file_roundtrip(update in arb_config_update()) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, toml::to_string(&update).unwrap()).unwrap();

        prop_assert_eq!(config_from_file(Some(path)).unwrap(), update);
    }
}

use crate::error::ConfigError;
use crate::settings::Config;
use std::path::{Path, PathBuf};

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    BusinessRules, DatabaseSettings, MailSettings, PeriodSettings, ReferenceSettings,
    ReportSettings,
};

/// Prefix of the environment variables that override file settings,
/// e.g. `STOREPERF__PERIOD__MONTH=10`.
pub const ENV_PREFIX: &str = "STOREPERF";

/// Values given on the command line. They win over the file and the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub output_dir: Option<PathBuf>,
    pub disable_mail: bool,
}

/// Loads and validates the application configuration.
///
/// Layers, lowest priority first: the TOML file at `path`, `STOREPERF__*`
/// environment variables, then the command-line `overrides`.
pub fn load_config(path: &Path, overrides: &ConfigOverrides) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path.to_path_buf()).required(true))
        .add_source(environment());

    build(builder, overrides)
}

/// The `STOREPERF__SECTION__KEY` layer. List settings take comma-separated values.
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("business_rules.excluded_categories")
        .with_list_parse_key("business_rules.sale_types")
        .with_list_parse_key("mail.recipients")
        .try_parsing(true)
}

fn build(
    mut builder: config::ConfigBuilder<config::builder::DefaultState>,
    overrides: &ConfigOverrides,
) -> Result<Config, ConfigError> {
    if let Some(month) = overrides.month {
        builder = builder.set_override("period.month", i64::from(month))?;
    }
    if let Some(year) = overrides.year {
        builder = builder.set_override("period.year", i64::from(year))?;
    }
    if let Some(dir) = &overrides.output_dir {
        builder = builder.set_override("report.output_dir", dir.to_string_lossy().to_string())?;
    }
    if overrides.disable_mail {
        builder = builder.set_override("mail.enabled", false)?;
    }

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.build()?.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(period = ?config.period, "Configuration loaded.");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{CoreError, SortKey};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    const MINIMAL: &str = r#"
        [report]
        name = "Store Performance"
        file_name = "Store_Report"

        [period]
        month = 9
        year = 2024

        [business_rules]
        vat_rate = 19
        excluded_categories = ["SERVICES", "EMBALLAGE"]
        margin_fallback = 0.3
    "#;

    fn parse(toml: &str, overrides: &ConfigOverrides) -> Result<Config, ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml));
        build(builder, overrides)
    }

    #[test]
    fn fills_defaults_for_optional_sections() {
        let config = parse(MINIMAL, &ConfigOverrides::default()).unwrap();

        assert_eq!(config.business_rules.vat_rate, dec!(19));
        assert_eq!(config.business_rules.margin_fallback, dec!(0.3));
        assert_eq!(config.business_rules.sale_types, vec!["Vente", "Avoir"]);
        assert_eq!(config.report.top_n_stores, 30);
        assert_eq!(config.report.sort_by, SortKey::Revenue);
        assert_eq!(config.report.output_dir, PathBuf::from("outputs"));
        assert_eq!(config.database.max_retries, 10);
        assert_eq!(config.database.retry_interval, Duration::from_secs(10));
        assert!(config.mail.enabled);
        assert!(config.reference.area_path.is_none());
    }

    #[test]
    fn reads_every_section() {
        let toml = format!(
            "{MINIMAL}\n{}",
            r#"
            [database]
            max_retries = 3
            retry_interval = "2s"
            max_connections = 2
            acquire_timeout = "1s"

            [reference]
            area_path = "data/area.csv"

            [mail]
            enabled = true
            recipients = ["ops@example.com"]
            "#
        );
        let config = parse(&toml, &ConfigOverrides::default()).unwrap();

        assert_eq!(config.database.retry_interval, Duration::from_secs(2));
        assert_eq!(config.reference.area_path, Some(PathBuf::from("data/area.csv")));
        assert_eq!(config.mail.recipients, vec!["ops@example.com"]);
    }

    #[test]
    fn environment_overrides_the_file() {
        let vars: config::Map<String, String> = [
            ("STOREPERF__PERIOD__MONTH", "10"),
            ("STOREPERF__BUSINESS_RULES__EXCLUDED_CATEGORIES", "SERVICES,GIFT CARDS"),
            ("STOREPERF__BUSINESS_RULES__SALE_TYPES", "Vente"),
            ("STOREPERF__MAIL__RECIPIENTS", "ops@example.com,cfo@example.com"),
            ("OTHERAPP__PERIOD__MONTH", "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let builder = config::Config::builder()
            .add_source(config::File::from_str(MINIMAL, config::FileFormat::Toml))
            .add_source(environment().source(Some(vars)));

        let config = build(builder, &ConfigOverrides::default()).unwrap();

        assert_eq!(config.period.month, 10);
        assert_eq!(config.period.year, 2024);
        assert_eq!(
            config.business_rules.excluded_categories,
            vec!["SERVICES", "GIFT CARDS"]
        );
        assert_eq!(config.business_rules.sale_types, vec!["Vente"]);
        assert_eq!(
            config.mail.recipients,
            vec!["ops@example.com", "cfo@example.com"]
        );
    }

    #[test]
    fn command_line_overrides_win() {
        let overrides = ConfigOverrides {
            month: Some(12),
            year: Some(2023),
            output_dir: Some(PathBuf::from("/tmp/reports")),
            disable_mail: true,
        };
        let config = parse(MINIMAL, &overrides).unwrap();

        assert_eq!(config.period.month, 12);
        assert_eq!(config.period.year, 2023);
        assert_eq!(config.report.output_dir, PathBuf::from("/tmp/reports"));
        assert!(!config.mail.enabled);
    }

    #[test]
    fn rejects_invalid_business_rules() {
        let bad_margin = MINIMAL.replace("margin_fallback = 0.3", "margin_fallback = 1.5");
        assert!(matches!(
            parse(&bad_margin, &ConfigOverrides::default()),
            Err(ConfigError::ValidationError(_))
        ));

        let bad_vat = MINIMAL.replace("vat_rate = 19", "vat_rate = -5");
        assert!(parse(&bad_vat, &ConfigOverrides::default()).is_err());

        let bad_label = MINIMAL.replace("\"SERVICES\"", "\" SERVICES\"");
        assert!(matches!(
            parse(&bad_label, &ConfigOverrides::default()),
            Err(ConfigError::InvalidValue(CoreError::InvalidInput(field, _)))
                if field == "business_rules.excluded_categories"
        ));
    }

    #[test]
    fn rejects_invalid_period() {
        let overrides = ConfigOverrides {
            month: Some(13),
            ..Default::default()
        };
        assert!(matches!(
            parse(MINIMAL, &overrides),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn rejects_malformed_recipients() {
        let toml = format!("{MINIMAL}\n[mail]\nenabled = true\nrecipients = [\"not-an-address\"]\n");
        assert!(parse(&toml, &ConfigOverrides::default()).is_err());
    }

    #[test]
    fn missing_required_section_is_a_load_error() {
        let toml = MINIMAL.replace("[period]\n        month = 9\n        year = 2024", "");
        assert!(matches!(
            parse(&toml, &ConfigOverrides::default()),
            Err(ConfigError::LoadError(_))
        ));
    }

    #[test]
    fn loads_from_a_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, MINIMAL).unwrap();

        let config = load_config(&path, &ConfigOverrides::default()).unwrap();
        assert_eq!(config.report.file_name, "Store_Report");
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(&dir.path().join("absent.toml"), &ConfigOverrides::default());
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}

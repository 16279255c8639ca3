use crate::error::ConfigError;
use core_types::{check_label, ReportPeriod, SortKey};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the report job.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub report: ReportSettings,
    pub period: PeriodSettings,
    pub business_rules: BusinessRules,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub reference: ReferenceSettings,
    #[serde(default)]
    pub mail: MailSettings,
}

/// What the produced artifacts are called and where they go.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    /// Human-readable report name, used in the document header and mail subject.
    pub name: String,
    /// Base name of the artifacts, without extension.
    pub file_name: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// How many stores the summary document lists.
    #[serde(default = "default_top_n")]
    pub top_n_stores: usize,
    #[serde(default)]
    pub sort_by: SortKey,
}

/// The calendar month being reported.
#[derive(Debug, Clone, Deserialize)]
pub struct PeriodSettings {
    pub month: u32,
    pub year: i32,
}

impl PeriodSettings {
    pub fn report_period(&self) -> Result<ReportPeriod, ConfigError> {
        Ok(ReportPeriod::new(self.month, self.year)?)
    }
}

/// Contains the business parameters of the KPI computation.
#[derive(Debug, Clone, Deserialize)]
pub struct BusinessRules {
    /// VAT percentage included in till totals (19 means 19%).
    pub vat_rate: Decimal,
    /// Product families left out of the report entirely.
    #[serde(default)]
    pub excluded_categories: Vec<String>,
    /// Margin assumed for a store whose purchase cost is unknown.
    /// 0.3 means the cost is taken as 70% of revenue.
    pub margin_fallback: Decimal,
    /// Sale type codes counted as sales or returns.
    #[serde(default = "default_sale_types")]
    pub sale_types: Vec<String>,
}

/// Connection pool and startup retry policy for the point-of-sale database.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub max_retries: u32,
    #[serde(with = "humantime_serde")]
    pub retry_interval: Duration,
    pub max_connections: u32,
    #[serde(with = "humantime_serde")]
    pub acquire_timeout: Duration,
}

/// Optional reference CSV files. A missing path means the column stays at zero.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferenceSettings {
    pub area_path: Option<PathBuf>,
    pub benchmark_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailSettings {
    pub enabled: bool,
    pub recipients: Vec<String>,
}

// --- Default Implementations ---
// Everything outside [report], [period] and [business_rules] may be omitted.

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_top_n() -> usize {
    30
}

fn default_sale_types() -> Vec<String> {
    vec!["Vente".to_string(), "Avoir".to_string()]
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            max_retries: 10,
            retry_interval: Duration::from_secs(10),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            recipients: Vec::new(),
        }
    }
}

impl Config {
    /// Rejects settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::ValidationError(msg));

        if self.report.name.trim().is_empty() {
            return invalid("report.name must not be empty".to_string());
        }
        if self.report.file_name.trim().is_empty()
            || self.report.file_name.contains(['/', '\\'])
        {
            return invalid(format!(
                "report.file_name '{}' must be a plain, non-empty file name",
                self.report.file_name
            ));
        }
        if self.report.top_n_stores == 0 {
            return invalid("report.top_n_stores must be at least 1".to_string());
        }

        self.period.report_period()?;
        if !(2000..=2100).contains(&self.period.year) {
            return invalid(format!("period.year {} is out of range", self.period.year));
        }

        let rules = &self.business_rules;
        if rules.vat_rate.is_sign_negative() {
            return invalid(format!("business_rules.vat_rate {} is negative", rules.vat_rate));
        }
        if rules.margin_fallback < Decimal::ZERO || rules.margin_fallback > Decimal::ONE {
            return invalid(format!(
                "business_rules.margin_fallback {} must be between 0 and 1",
                rules.margin_fallback
            ));
        }
        if rules.sale_types.is_empty() {
            return invalid("business_rules.sale_types must not be empty".to_string());
        }
        for label in &rules.sale_types {
            check_label("business_rules.sale_types", label)?;
        }
        for label in &rules.excluded_categories {
            check_label("business_rules.excluded_categories", label)?;
        }

        if self.database.max_retries == 0 {
            return invalid("database.max_retries must be at least 1".to_string());
        }
        if self.database.max_connections == 0 {
            return invalid("database.max_connections must be at least 1".to_string());
        }

        for recipient in &self.mail.recipients {
            let trimmed = recipient.trim();
            let well_formed = trimmed
                .split_once('@')
                .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
            if !well_formed {
                return invalid(format!("mail recipient '{recipient}' is not an email address"));
            }
        }

        Ok(())
    }
}

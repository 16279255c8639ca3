use analytics::{AnalyticsEngine, EngineOutput, KpiPolicy, StoreReport};
use configuration::settings::Config;
use core_types::{ReferenceField, ReportPeriod, SalesQuery};
use database::{DbRepository, PoolSettings, RetryPolicy, TransactionSource};
use mailer::{Mailer, ReportMail, SmtpSettings};
use reporter::{DocumentHeader, RenderOutcome, RenderRequest};
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

/// The fatal stages of a run. A failure in any of them aborts the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Connect,
    Extract,
    Enrich,
    Kpi,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Config => "config",
            Stage::Connect => "connect",
            Stage::Extract => "extract",
            Stage::Enrich => "enrich",
            Stage::Kpi => "kpi",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
#[error("stage '{stage}' failed: {source}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: anyhow::Error,
}

impl StageError {
    pub fn new(stage: Stage, source: impl Into<anyhow::Error>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}

/// Extension to tag a fallible step with the stage it belongs to.
trait AtStage<T> {
    fn at(self, stage: Stage) -> Result<T, StageError>;
}

impl<T, E: Into<anyhow::Error>> AtStage<T> for Result<T, E> {
    fn at(self, stage: Stage) -> Result<T, StageError> {
        self.map_err(|e| StageError::new(stage, e))
    }
}

/// What a finished run leaves behind.
#[derive(Debug)]
pub struct RunResult {
    pub period: ReportPeriod,
    pub report: StoreReport,
    pub artifacts: RenderOutcome,
}

/// Runs the whole monthly job against the configured database.
pub async fn run(config: &Config) -> Result<RunResult, StageError> {
    let policy = RetryPolicy {
        max_attempts: config.database.max_retries,
        interval: config.database.retry_interval,
    };
    let pool_settings = PoolSettings {
        max_connections: config.database.max_connections,
        acquire_timeout: config.database.acquire_timeout,
    };

    let started = Instant::now();
    let pool = database::connect(&policy, &pool_settings).await.at(Stage::Connect)?;
    tracing::info!(elapsed = ?started.elapsed(), "Stage 'connect' complete.");

    let repository = DbRepository::new(pool);
    let result = run_with_source(config, &repository).await;
    repository.close().await;

    let result = result?;
    deliver(config, &result).await;
    Ok(result)
}

/// Extract, enrich, compute and render, reading sales from `source`.
pub async fn run_with_source<S>(config: &Config, source: &S) -> Result<RunResult, StageError>
where
    S: TransactionSource + ?Sized,
{
    let rules = &config.business_rules;
    let period = config.period.report_period().at(Stage::Config)?;

    // --- Extract ---
    let started = Instant::now();
    let query = SalesQuery::for_period(&period, &rules.sale_types, &rules.excluded_categories)
        .at(Stage::Extract)?;
    let records = database::extract(source, &query, rules.vat_rate)
        .await
        .at(Stage::Extract)?;
    let unpriced = records.iter().filter(|r| r.purchase_cost.is_none()).count();
    tracing::info!(
        %period,
        lines = records.len(),
        elapsed = ?started.elapsed(),
        "Stage 'extract' complete."
    );
    if unpriced > 0 {
        tracing::warn!(
            unpriced,
            lines = records.len(),
            "Some sale lines have no catalog purchase price."
        );
    }

    // --- Enrich and KPI ---
    let started = Instant::now();
    let area = reference::load_or_default(config.reference.area_path.as_deref(), ReferenceField::Area)
        .at(Stage::Enrich)?;
    let benchmark = reference::load_or_default(
        config.reference.benchmark_path.as_deref(),
        ReferenceField::Benchmark,
    )
    .at(Stage::Enrich)?;

    let engine = AnalyticsEngine::new(KpiPolicy::new(rules.margin_fallback).at(Stage::Kpi)?);
    let EngineOutput {
        stores,
        area: area_join,
        benchmark: benchmark_join,
    } = engine.run(&records, &area, &benchmark).at(Stage::Enrich)?;

    for (field, stats) in [
        (ReferenceField::Area, area_join),
        (ReferenceField::Benchmark, benchmark_join),
    ] {
        tracing::info!(
            dataset = %field,
            matched = stats.matched,
            defaulted = stats.defaulted,
            "Reference data joined."
        );
    }
    tracing::info!(
        stores = stores.len(),
        elapsed = ?started.elapsed(),
        "Stage 'enrich' complete."
    );

    let fallbacks = stores.iter().filter(|s| s.cost_fallback_applied).count();
    if fallbacks > 0 {
        tracing::warn!(
            stores = fallbacks,
            margin_fallback = %rules.margin_fallback,
            "Purchase cost unknown; fallback margin applied."
        );
    }
    let report = StoreReport::new(stores, config.report.sort_by);
    let totals = report.totals();
    tracing::info!(
        stores = report.len(),
        revenue = %totals.revenue,
        profit = %totals.profit,
        "Stage 'kpi' complete."
    );

    // --- Render ---
    let request = RenderRequest {
        output_dir: &config.report.output_dir,
        file_name: &config.report.file_name,
        header: DocumentHeader {
            report_name: config.report.name.clone(),
            period_label: period.to_string(),
        },
        top_n: config.report.top_n_stores,
    };
    let artifacts = reporter::render_artifacts(&request, &report);

    Ok(RunResult {
        period,
        report,
        artifacts,
    })
}

/// Mails the produced artifacts. Never fails the run: problems are logged.
async fn deliver(config: &Config, result: &RunResult) {
    let Some(mail) = report_mail(config, result) else {
        return;
    };

    let sent = match SmtpSettings::from_env().and_then(|settings| Mailer::new(&settings)) {
        Ok(mailer) => mailer.send(&mail).await,
        Err(e) => Err(e),
    };
    if let Err(e) = sent {
        tracing::error!(error = %e, "Report mail could not be delivered.");
    }
}

/// The mail to send for `result`, or `None` when delivery is skipped.
fn report_mail(config: &Config, result: &RunResult) -> Option<ReportMail> {
    if !config.mail.enabled {
        tracing::info!("Mail delivery disabled.");
        return None;
    }
    if config.mail.recipients.is_empty() {
        tracing::info!("No recipients configured; skipping delivery.");
        return None;
    }
    let attachments: Vec<PathBuf> = result.artifacts.produced();
    if attachments.is_empty() {
        tracing::warn!("No artifact was produced; nothing to deliver.");
        return None;
    }

    Some(ReportMail::for_report(
        &config.report.name,
        &result.period.to_string(),
        &config.mail.recipients,
        attachments,
    ))
}

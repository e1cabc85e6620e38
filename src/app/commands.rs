use crate::adapters::{load_order, TracingNotifier};
use crate::app::report::{render_report, ReportFormat};
use crate::config::toml_config::TomlConfig;
use crate::core::calculator::compute_rg5329;
use crate::core::trigger::TriggerOutcome;
use crate::domain::model::Rg5329Status;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::path::Path;

/// Loads a snapshot and renders its preview. Writes to `output` when given.
pub fn run_compute(order_path: &Path, format: ReportFormat, output: Option<&Path>) -> Result<String> {
    let order = load_order(order_path)?;
    let result = compute_rg5329(&order);
    tracing::info!(
        "RG5329 preview for {}: {} (total {})",
        order.display_name(),
        result.status,
        result.total_tax.round_dp(2)
    );

    let report = render_report(&order, &result, format)?;
    if let Some(path) = output {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, &report)?;
        tracing::info!("📁 Report saved to: {}", path.display());
    }
    Ok(report)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyPlan {
    WouldSkip(Rg5329Status),
    WouldCall { order_id: u64 },
    WouldFallBack,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyReport {
    DryRun(ApplyPlan),
    Done(TriggerOutcome),
}

pub async fn run_apply(order_path: &Path, config: &TomlConfig, dry_run: bool) -> Result<ApplyReport> {
    config.validate()?;
    let order = load_order(order_path)?;

    if dry_run {
        let result = compute_rg5329(&order);
        let plan = match (result.applicable, order.id) {
            (false, _) => ApplyPlan::WouldSkip(result.status),
            (true, Some(order_id)) => ApplyPlan::WouldCall { order_id },
            (true, None) => ApplyPlan::WouldFallBack,
        };
        tracing::info!("🔍 DRY RUN: {:?}", plan);
        return Ok(ApplyReport::DryRun(plan));
    }

    // One snapshot, so nothing to debounce.
    let mut engine = config.build_trigger(TracingNotifier)?;
    let outcome = engine.evaluate(&order).await;
    Ok(ApplyReport::Done(outcome))
}

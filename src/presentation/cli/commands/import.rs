use std::path::Path;

use anyhow::Context;
use colored::Colorize;

use crate::domain::entities::dataset::Dataset;
use crate::domain::value_objects::tenant::TenantId;
use crate::infrastructure::persistence::sqlite_store::{ImportSummary, SqliteStore};

/// Loads a JSON dataset file into the store for `tenant`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, the tenant is
/// invalid, or the import transaction fails.
pub fn run_import(store: &SqliteStore, file: &Path, tenant: &str) -> anyhow::Result<ImportSummary> {
    let tenant = TenantId::parse(tenant)?;
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read dataset: {}", file.display()))?;
    let dataset: Dataset = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse dataset: {}", file.display()))?;

    if dataset.is_empty() {
        tracing::warn!("Dataset {} contains no records", file.display());
    }

    let summary = store.import_dataset(&tenant, &dataset)?;
    tracing::info!(
        %tenant,
        sales = summary.sales,
        products = summary.products,
        orders = summary.orders,
        "Dataset imported"
    );
    println!(
        "{} {} sales, {} products, {} orders, {} external factors into '{}'",
        "✅ Imported".green().bold(),
        summary.sales,
        summary.products,
        summary.orders,
        summary.external_factors,
        tenant
    );
    Ok(summary)
}

//! The scrape-reconcile-transform-load pipeline.

pub mod reconcile;
pub mod transform;

pub use self::reconcile::{equalize_type_ids, ObservedTypes};
pub use self::transform::{transform_to_rows, DbRows, TypeCatalog};

use anyhow::{Context, Result};
use tracing::info;

use crate::db::Database;
use crate::scrape::pull_drugs;
use crate::TARGET_ETL;

/// Run the full import pipeline for a batch of drug ids.
///
/// Phases run strictly in order: the catalogs must be complete before rows
/// are transformed, and category and drug rows must exist before their
/// children are written. The first error aborts the run and nothing
/// partial is salvaged; each phase announces itself so a failed run shows
/// where it died.
pub async fn run_import(
    db: &Database,
    client: &reqwest::Client,
    drug_ids: &[String],
) -> Result<()> {
    info!(target: TARGET_ETL, "Scraping {} drug pages", drug_ids.len());
    let records = pull_drugs(client, drug_ids).await?;

    info!(target: TARGET_ETL, "Equalizing type ids");
    equalize_type_ids(db, &records)
        .await
        .context("Type reconciliation failed")?;

    info!(target: TARGET_ETL, "Transforming records to relation rows");
    let catalog = db
        .type_catalog()
        .await
        .context("Failed to read back the type catalog")?;
    let rows = transform_to_rows(&records, &catalog)?;

    info!(target: TARGET_ETL, "Inserting rows");
    db.write_rows(&rows).await.context("Bulk insert failed")?;

    info!(
        target: TARGET_ETL,
        "Import complete: {} drugs, {} identifiers, {} targets",
        rows.drugs.len(),
        rows.identifiers.len(),
        rows.targets.len()
    );
    Ok(())
}

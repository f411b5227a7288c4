//! Sequential page fetching for a batch of drug ids.

use anyhow::{Context, Result};
use scraper::Html;
use tracing::{debug, info};

use super::client::fetch_drug_page;
use super::extract::extract_drug;
use super::types::DrugRecord;
use crate::TARGET_WEB_REQUEST;

/// Pull one metadata record per drug id, strictly in input order.
///
/// One fetch at a time, no retries: the first failed fetch or extraction
/// aborts the whole batch, so a run either covers every id up to the
/// failure or nothing gets loaded downstream.
pub async fn pull_drugs(
    client: &reqwest::Client,
    drug_ids: &[String],
) -> Result<Vec<DrugRecord>> {
    let mut records = Vec::with_capacity(drug_ids.len());

    for (index, drug_id) in drug_ids.iter().enumerate() {
        info!(
            target: TARGET_WEB_REQUEST,
            "Scraping {} ({}/{})",
            drug_id,
            index + 1,
            drug_ids.len()
        );

        let body = fetch_drug_page(client, drug_id).await?;
        let document = Html::parse_document(&body);
        let record = extract_drug(&document, drug_id)
            .with_context(|| format!("Failed to extract record for {}", drug_id))?;

        debug!(
            target: TARGET_WEB_REQUEST,
            "Extracted {}: {} identifiers, {} targets",
            drug_id,
            record.identifiers.len(),
            record.targets.len()
        );
        records.push(record);
    }

    Ok(records)
}

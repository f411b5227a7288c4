//! Bulk insertion of transformed rows.

use sqlx::{Postgres, QueryBuilder};
use tracing::info;

use super::core::Database;
use crate::etl::transform::DbRows;
use crate::TARGET_DB;

/// Names of the tables `write_rows` will touch for this row set, in write
/// order. Relations with no rows are left out entirely.
pub fn insert_plan(rows: &DbRows) -> Vec<&'static str> {
    let mut plan = Vec::new();
    if !rows.drugs.is_empty() {
        plan.push("drugs");
    }
    if !rows.targets.is_empty() {
        plan.push("drug_targets");
    }
    if !rows.identifiers.is_empty() {
        plan.push("drug_identifiers");
    }
    plan
}

impl Database {
    /// Bulk-insert all transformed rows, parents before children.
    ///
    /// Category rows already exist from reconciliation; drugs go in before
    /// the tables that reference them. One multi-row statement per
    /// non-empty relation.
    pub async fn write_rows(&self, rows: &DbRows) -> Result<(), sqlx::Error> {
        let mut conn = self.pool().acquire().await?;

        if !rows.drugs.is_empty() {
            let mut builder =
                QueryBuilder::<Postgres>::new("INSERT INTO drugs (drugbank_id, name, smiles) ");
            builder.push_values(&rows.drugs, |mut row, drug| {
                row.push_bind(&drug.drugbank_id)
                    .push_bind(&drug.name)
                    .push_bind(&drug.smiles);
            });
            builder.build().execute(&mut *conn).await?;
            info!(target: TARGET_DB, "Inserted {} drug rows", rows.drugs.len());
        }

        if !rows.targets.is_empty() {
            let mut builder = QueryBuilder::<Postgres>::new(
                "INSERT INTO drug_targets (drugbank_id, gene_name, action_type_id) ",
            );
            builder.push_values(&rows.targets, |mut row, target| {
                row.push_bind(&target.drugbank_id)
                    .push_bind(&target.gene_name)
                    .push_bind(target.action_type_id);
            });
            builder.build().execute(&mut *conn).await?;
            info!(target: TARGET_DB, "Inserted {} target rows", rows.targets.len());
        }

        if !rows.identifiers.is_empty() {
            let mut builder = QueryBuilder::<Postgres>::new(
                "INSERT INTO drug_identifiers \
                 (drugbank_id, alt_identifier_value, alt_identifier_type_id, alt_identifier_url) ",
            );
            builder.push_values(&rows.identifiers, |mut row, identifier| {
                row.push_bind(&identifier.drugbank_id)
                    .push_bind(&identifier.value)
                    .push_bind(identifier.identifier_type_id)
                    .push_bind(identifier.url.as_deref());
            });
            builder.build().execute(&mut *conn).await?;
            info!(
                target: TARGET_DB,
                "Inserted {} identifier rows",
                rows.identifiers.len()
            );
        }

        Ok(())
    }
}

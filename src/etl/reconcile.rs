//! Reconciliation of observed category names against the persisted catalog.

use std::collections::BTreeSet;

use anyhow::Result;
use tracing::info;

use crate::db::Database;
use crate::scrape::DrugRecord;
use crate::TARGET_ETL;

/// The distinct category names observed across one scraped batch.
///
/// Action types keep `None` as a member in its own right: a target listed
/// without an action still references a catalog row, the sentinel row whose
/// name column is SQL NULL.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ObservedTypes {
    pub identifier_types: BTreeSet<String>,
    pub action_types: BTreeSet<Option<String>>,
}

impl ObservedTypes {
    /// Union the category names used anywhere in the batch.
    pub fn collect(records: &[DrugRecord]) -> Self {
        let mut observed = ObservedTypes::default();
        for record in records {
            for identifier in &record.identifiers {
                observed
                    .identifier_types
                    .insert(identifier.type_name.clone());
            }
            for target in &record.targets {
                observed.action_types.insert(target.action_type.clone());
            }
        }
        observed
    }

    /// Drop every name already present in the persisted catalog, leaving
    /// only the names that still need registering.
    pub fn subtract_existing(
        &self,
        existing_identifiers: &BTreeSet<String>,
        existing_actions: &BTreeSet<Option<String>>,
    ) -> ObservedTypes {
        ObservedTypes {
            identifier_types: self
                .identifier_types
                .difference(existing_identifiers)
                .cloned()
                .collect(),
            action_types: self
                .action_types
                .difference(existing_actions)
                .cloned()
                .collect(),
        }
    }
}

/// Register every category name the batch uses that the catalog lacks.
///
/// Child tables reference the catalogs by FK, so this must run to
/// completion before rows are transformed or written. Idempotent: the diff
/// of an already-registered batch is empty and nothing is inserted.
pub async fn equalize_type_ids(db: &Database, records: &[DrugRecord]) -> Result<()> {
    let observed = ObservedTypes::collect(records);

    let existing_identifiers = db.existing_identifier_types().await?;
    let existing_actions = db.existing_action_types().await?;
    let new = observed.subtract_existing(&existing_identifiers, &existing_actions);

    info!(
        target: TARGET_ETL,
        "Registering {} new identifier types and {} new action types",
        new.identifier_types.len(),
        new.action_types.len()
    );
    db.insert_identifier_types(&new.identifier_types).await?;
    db.insert_action_types(&new.action_types).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::{AltIdentifier, TargetAction};

    fn record(identifiers: Vec<&str>, actions: Vec<Option<&str>>) -> DrugRecord {
        DrugRecord {
            drugbank_id: "DB00001".into(),
            name: "TestDrug".into(),
            smiles: "CCO".into(),
            identifiers: identifiers
                .into_iter()
                .map(|name| AltIdentifier {
                    type_name: name.into(),
                    value: "x".into(),
                    url: None,
                })
                .collect(),
            targets: actions
                .into_iter()
                .map(|action| TargetAction {
                    gene_name: "GENE1".into(),
                    action_type: action.map(str::to_string),
                })
                .collect(),
        }
    }

    #[test]
    fn test_collect_unions_across_the_batch() {
        let batch = vec![
            record(vec!["PubChem", "KEGG"], vec![Some("inhibitor")]),
            record(vec!["PubChem"], vec![Some("agonist"), None]),
        ];
        let observed = ObservedTypes::collect(&batch);
        assert_eq!(
            observed.identifier_types,
            BTreeSet::from(["PubChem".to_string(), "KEGG".to_string()])
        );
        assert_eq!(
            observed.action_types,
            BTreeSet::from([
                Some("inhibitor".to_string()),
                Some("agonist".to_string()),
                None
            ])
        );
    }

    #[test]
    fn test_subtract_existing_leaves_only_new_names() {
        let batch = vec![record(vec!["PubChem", "KEGG"], vec![])];
        let observed = ObservedTypes::collect(&batch);

        let existing = BTreeSet::from(["PubChem".to_string()]);
        let new = observed.subtract_existing(&existing, &BTreeSet::new());
        assert_eq!(new.identifier_types, BTreeSet::from(["KEGG".to_string()]));
    }

    #[test]
    fn test_reconciliation_is_idempotent() {
        let batch = vec![record(vec!["KEGG"], vec![None])];
        let observed = ObservedTypes::collect(&batch);

        // First run starts from an empty catalog and registers everything.
        let first = observed.subtract_existing(&BTreeSet::new(), &BTreeSet::new());
        assert_eq!(first.identifier_types.len(), 1);
        assert_eq!(first.action_types.len(), 1);

        // Second run sees the registered names and has nothing left to add.
        let second = observed.subtract_existing(&first.identifier_types, &first.action_types);
        assert!(second.identifier_types.is_empty());
        assert!(second.action_types.is_empty());
    }

    #[test]
    fn test_null_action_is_distinct_from_named_actions() {
        let batch = vec![record(vec![], vec![None, Some("inhibitor")])];
        let observed = ObservedTypes::collect(&batch);

        let existing = BTreeSet::from([Some("inhibitor".to_string())]);
        let new = observed.subtract_existing(&BTreeSet::new(), &existing);
        assert_eq!(new.action_types, BTreeSet::from([None]));
    }
}

//! Conversion of scraped records into flat relation rows.

use std::collections::BTreeMap;

use anyhow::{anyhow, Result};

use crate::scrape::DrugRecord;

/// Name-to-key maps for both catalogs, read back after reconciliation.
#[derive(Debug, Default, Clone)]
pub struct TypeCatalog {
    pub identifier_types: BTreeMap<String, i32>,
    pub action_types: BTreeMap<Option<String>, i32>,
}

/// One row of the `drugs` relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrugRow {
    pub drugbank_id: String,
    pub name: String,
    pub smiles: String,
}

/// One row of the `drug_identifiers` relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierRow {
    pub drugbank_id: String,
    pub value: String,
    pub identifier_type_id: i32,
    pub url: Option<String>,
}

/// One row of the `drug_targets` relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRow {
    pub drugbank_id: String,
    pub gene_name: String,
    pub action_type_id: i32,
}

/// Row sets for one bulk load, one `Vec` per relation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DbRows {
    pub drugs: Vec<DrugRow>,
    pub identifiers: Vec<IdentifierRow>,
    pub targets: Vec<TargetRow>,
}

/// Map every record onto flat relation rows using the reconciled catalog.
///
/// Every type name must resolve through the catalog. A miss means
/// reconciliation did not run against this batch, or ran against stale
/// data; that is an invariant violation and fails the whole run rather
/// than defaulting a key.
pub fn transform_to_rows(records: &[DrugRecord], catalog: &TypeCatalog) -> Result<DbRows> {
    let mut rows = DbRows::default();

    for record in records {
        rows.drugs.push(DrugRow {
            drugbank_id: record.drugbank_id.clone(),
            name: record.name.clone(),
            smiles: record.smiles.clone(),
        });

        for identifier in &record.identifiers {
            let identifier_type_id = *catalog
                .identifier_types
                .get(&identifier.type_name)
                .ok_or_else(|| {
                    anyhow!(
                        "Identifier type {:?} on {} is not in the catalog; reconciliation incomplete",
                        identifier.type_name,
                        record.drugbank_id
                    )
                })?;
            rows.identifiers.push(IdentifierRow {
                drugbank_id: record.drugbank_id.clone(),
                value: identifier.value.clone(),
                identifier_type_id,
                url: identifier.url.clone(),
            });
        }

        for target in &record.targets {
            let action_type_id =
                *catalog.action_types.get(&target.action_type).ok_or_else(|| {
                    anyhow!(
                        "Action type {:?} on {} is not in the catalog; reconciliation incomplete",
                        target.action_type,
                        record.drugbank_id
                    )
                })?;
            rows.targets.push(TargetRow {
                drugbank_id: record.drugbank_id.clone(),
                gene_name: target.gene_name.clone(),
                action_type_id,
            });
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::{AltIdentifier, TargetAction};

    fn test_record() -> DrugRecord {
        DrugRecord {
            drugbank_id: "DB00001".into(),
            name: "TestDrug".into(),
            smiles: "CCO".into(),
            identifiers: vec![AltIdentifier {
                type_name: "KEGG".into(),
                value: "K001".into(),
                url: Some("http://x".into()),
            }],
            targets: vec![TargetAction {
                gene_name: "GENE1".into(),
                action_type: Some("inhibitor".into()),
            }],
        }
    }

    fn full_catalog() -> TypeCatalog {
        TypeCatalog {
            identifier_types: BTreeMap::from([("KEGG".to_string(), 7)]),
            action_types: BTreeMap::from([(Some("inhibitor".to_string()), 3), (None, 4)]),
        }
    }

    #[test]
    fn test_transform_produces_one_row_per_relation_entry() {
        let rows = transform_to_rows(&[test_record()], &full_catalog()).unwrap();
        assert_eq!(
            rows.drugs,
            vec![DrugRow {
                drugbank_id: "DB00001".into(),
                name: "TestDrug".into(),
                smiles: "CCO".into(),
            }]
        );
        assert_eq!(
            rows.identifiers,
            vec![IdentifierRow {
                drugbank_id: "DB00001".into(),
                value: "K001".into(),
                identifier_type_id: 7,
                url: Some("http://x".into()),
            }]
        );
        assert_eq!(
            rows.targets,
            vec![TargetRow {
                drugbank_id: "DB00001".into(),
                gene_name: "GENE1".into(),
                action_type_id: 3,
            }]
        );
    }

    #[test]
    fn test_null_action_resolves_through_the_sentinel_key() {
        let mut record = test_record();
        record.targets = vec![TargetAction {
            gene_name: "GENE1".into(),
            action_type: None,
        }];
        let rows = transform_to_rows(&[record], &full_catalog()).unwrap();
        assert_eq!(rows.targets[0].action_type_id, 4);
    }

    #[test]
    fn test_identifier_type_miss_fails_loudly() {
        let mut catalog = full_catalog();
        catalog.identifier_types.clear();
        let err = transform_to_rows(&[test_record()], &catalog).unwrap_err();
        assert!(err.to_string().contains("KEGG"));
    }

    #[test]
    fn test_action_type_miss_fails_loudly() {
        let mut catalog = full_catalog();
        catalog.action_types.remove(&Some("inhibitor".to_string()));
        let err = transform_to_rows(&[test_record()], &catalog).unwrap_err();
        assert!(err.to_string().contains("inhibitor"));
    }

    #[test]
    fn test_empty_batch_transforms_to_empty_rows() {
        let rows = transform_to_rows(&[], &TypeCatalog::default()).unwrap();
        assert_eq!(rows, DbRows::default());
    }
}

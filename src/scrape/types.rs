//! Type definitions for the scrape module.

use tokio::time::Duration;

/// One cross-reference to an external chemical database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AltIdentifier {
    /// Display name of the referencing database, e.g. "PubChem Compound".
    pub type_name: String,
    /// The identifier value in that database.
    pub value: String,
    /// Link target of the reference, when the page carries one.
    pub url: Option<String>,
}

/// One (gene, action) association for a drug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetAction {
    pub gene_name: String,
    /// How the drug acts on the gene. Pages list targets without an action;
    /// those come through as `None`.
    pub action_type: Option<String>,
}

/// Everything extracted from a single drug page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrugRecord {
    pub drugbank_id: String,
    pub name: String,
    pub smiles: String,
    pub identifiers: Vec<AltIdentifier>,
    pub targets: Vec<TargetAction>,
}

// Constants
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

//! HTML extraction for one drug page.
//!
//! The page layout is a definition list of labeled fields plus a targets
//! section; everything here reads from fixed anchor ids and their sibling
//! content, so the extraction is testable offline against synthetic
//! documents.

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::decode::decode_cfemail;
use super::types::{AltIdentifier, DrugRecord, TargetAction};

static NAME_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("#name").unwrap());
static SMILES_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("#smiles").unwrap());
static EXTERNAL_LINKS_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#external-links").unwrap());
static TARGETS_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("#targets").unwrap());
static GENE_NAME_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("#gene-name").unwrap());
static ACTIONS_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("#actions").unwrap());
static DL_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("dl").unwrap());
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

// Target sections carry element ids like "BE0000048".
static TARGET_SECTION_ID: Lazy<Regex> = Lazy::new(|| Regex::new("^BE[0-9]{7}$").unwrap());

/// Extract one drug's metadata record from its parsed page.
///
/// Name, SMILES, and the external-links list are required page features;
/// their absence fails the record. A page without a targets section yields
/// a record with an empty target list.
pub fn extract_drug(document: &Html, drugbank_id: &str) -> Result<DrugRecord> {
    let name = extract_name(document)
        .with_context(|| format!("Failed to extract name for {}", drugbank_id))?;
    let smiles = extract_smiles(document)
        .with_context(|| format!("Failed to extract SMILES for {}", drugbank_id))?;
    let identifiers = extract_identifiers(document)
        .with_context(|| format!("Failed to extract external links for {}", drugbank_id))?;
    let targets = extract_targets(document)
        .with_context(|| format!("Failed to extract targets for {}", drugbank_id))?;

    Ok(DrugRecord {
        drugbank_id: drugbank_id.to_string(),
        name,
        smiles,
        identifiers,
        targets,
    })
}

/// First element sibling after `element`, skipping interleaved text nodes.
fn next_sibling_element(element: ElementRef) -> Option<ElementRef> {
    element.next_siblings().find_map(ElementRef::wrap)
}

/// All text under `element`, whitespace-trimmed.
fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn extract_name(document: &Html) -> Result<String> {
    let anchor = document
        .select(&NAME_SELECTOR)
        .next()
        .ok_or_else(|| anyhow!("Page has no name anchor"))?;
    let value = next_sibling_element(anchor)
        .ok_or_else(|| anyhow!("Name anchor has no value element"))?;
    Ok(text_of(value))
}

/// Locate the element whose children are the SMILES fragments.
///
/// Cloudflare splits the value into plain text and obfuscated fragments,
/// usually inside a single wrapper element; pages that inline the fragments
/// directly under the value element also occur.
fn fragment_container(value: ElementRef) -> ElementRef {
    let mut elements = value.children().filter_map(ElementRef::wrap);
    let first = elements.next();
    let second = elements.next();
    let has_loose_text = value
        .children()
        .filter_map(|node| node.value().as_text())
        .any(|text| !text.trim().is_empty());
    match (first, second) {
        (Some(inner), None)
            if !has_loose_text && inner.value().attr("data-cfemail").is_none() =>
        {
            inner
        }
        _ => value,
    }
}

fn extract_smiles(document: &Html) -> Result<String> {
    let anchor = document
        .select(&SMILES_SELECTOR)
        .next()
        .ok_or_else(|| anyhow!("Page has no smiles anchor"))?;
    let value = next_sibling_element(anchor)
        .ok_or_else(|| anyhow!("Smiles anchor has no value element"))?;
    let container = fragment_container(value);

    // Reassemble the fragments in document order, decoding the obfuscated
    // ones in place.
    let mut smiles = String::new();
    for node in container.children() {
        if let Some(element) = ElementRef::wrap(node) {
            if let Some(payload) = element.value().attr("data-cfemail") {
                smiles.push_str(&decode_cfemail(payload)?);
            } else {
                smiles.push_str(&element.text().collect::<String>());
            }
        } else if let Some(text) = node.value().as_text() {
            smiles.push_str(text);
        }
    }
    Ok(smiles.trim().to_string())
}

fn extract_identifiers(document: &Html) -> Result<Vec<AltIdentifier>> {
    let header = document
        .select(&EXTERNAL_LINKS_SELECTOR)
        .next()
        .ok_or_else(|| anyhow!("Page has no external-links anchor"))?;
    let value = next_sibling_element(header)
        .ok_or_else(|| anyhow!("External-links anchor has no content element"))?;
    let list = value
        .select(&DL_SELECTOR)
        .next()
        .ok_or_else(|| anyhow!("External-links content has no definition list"))?;

    // The list alternates label and value elements; consume them in pairs.
    // A dangling element without a partner at the end is ignored.
    let mut identifiers = Vec::new();
    let mut children = list.children().filter_map(ElementRef::wrap);
    while let Some(label) = children.next() {
        let Some(value_element) = children.next() else {
            break;
        };
        let type_name = text_of(label);
        let link = value_element
            .select(&LINK_SELECTOR)
            .next()
            .ok_or_else(|| anyhow!("External link entry {:?} has no hyperlink", type_name))?;
        identifiers.push(AltIdentifier {
            type_name,
            value: text_of(link),
            url: link.value().attr("href").map(str::to_string),
        });
    }
    Ok(identifiers)
}

fn extract_targets(document: &Html) -> Result<Vec<TargetAction>> {
    // Biologics often have no targets section at all; the record is still
    // emitted, with nothing to load into drug_targets.
    let Some(section) = document.select(&TARGETS_SELECTOR).next() else {
        return Ok(Vec::new());
    };

    let mut targets = Vec::new();
    for node in section.descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        let Some(id) = element.value().attr("id") else {
            continue;
        };
        if TARGET_SECTION_ID.is_match(id) {
            collect_target_actions(element, &mut targets)
                .with_context(|| format!("Malformed target section {}", id))?;
        }
    }
    Ok(targets)
}

/// Append the (gene, action) pairs of one target section.
///
/// A section without a gene name is skipped outright. A section listing no
/// actions contributes a single pair with no action type; one listing
/// several contributes one pair per action, all sharing the gene name.
fn collect_target_actions(section: ElementRef, out: &mut Vec<TargetAction>) -> Result<()> {
    let Some(anchor) = section.select(&GENE_NAME_SELECTOR).next() else {
        return Ok(());
    };
    let gene_name = next_sibling_element(anchor)
        .map(text_of)
        .ok_or_else(|| anyhow!("Gene name anchor has no value element"))?;

    let actions = section
        .select(&ACTIONS_SELECTOR)
        .next()
        .and_then(next_sibling_element);

    let mut listed = false;
    if let Some(list) = actions {
        for action in list.children().filter_map(ElementRef::wrap) {
            listed = true;
            out.push(TargetAction {
                gene_name: gene_name.clone(),
                action_type: Some(text_of(action)),
            });
        }
    }
    if !listed {
        out.push(TargetAction {
            gene_name,
            action_type: None,
        });
    }
    Ok(())
}

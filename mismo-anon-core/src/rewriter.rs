// mismo-anon-core/src/rewriter.rs
//! Walks a [`Document`] and overwrites PII attribute values in place.
//!
//! The walk visits every element once, depth first. For each element all
//! attributes are classified before any value changes, so context rules that
//! look at sibling attributes always see the values that were parsed. Only
//! attribute values are written; names, order and tree shape stay as they are.

use std::collections::BTreeMap;

use log::debug;
use rand::Rng;
use serde::Serialize;

use crate::category::PiiCategory;
use crate::document::{Document, Element, Node};
use crate::generator::SyntheticValueGenerator;
use crate::rules::RuleTable;

/// Count of replacements for one attribute name under one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteSummaryItem {
    pub category: PiiCategory,
    pub attribute: String,
    pub occurrences: usize,
}

/// What a rewrite replaced. Holds counts only, never values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteSummary {
    pub items: Vec<RewriteSummaryItem>,
}

impl RewriteSummary {
    pub fn total(&self) -> usize {
        self.items.iter().map(|i| i.occurrences).sum()
    }

    pub fn occurrences(&self, category: PiiCategory) -> usize {
        self.items
            .iter()
            .filter(|i| i.category == category)
            .map(|i| i.occurrences)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Replaces every classified attribute value in `document`.
pub fn rewrite_document<R: Rng + ?Sized>(
    document: &mut Document,
    rules: &RuleTable,
    generator: &mut SyntheticValueGenerator<'_, R>,
) -> RewriteSummary {
    let mut counts: BTreeMap<(PiiCategory, String), usize> = BTreeMap::new();
    let mut ancestors: Vec<String> = Vec::new();

    rewrite_element(&mut document.root, rules, generator, &mut ancestors, &mut counts);

    let items: Vec<RewriteSummaryItem> = counts
        .into_iter()
        .map(|((category, attribute), occurrences)| RewriteSummaryItem {
            category,
            attribute,
            occurrences,
        })
        .collect();
    debug!(
        "Rewrite complete: {} replacement(s) across {} attribute kind(s).",
        items.iter().map(|i| i.occurrences).sum::<usize>(),
        items.len()
    );
    RewriteSummary { items }
}

fn rewrite_element<R: Rng + ?Sized>(
    element: &mut Element,
    rules: &RuleTable,
    generator: &mut SyntheticValueGenerator<'_, R>,
    ancestors: &mut Vec<String>,
    counts: &mut BTreeMap<(PiiCategory, String), usize>,
) {
    ancestors.push(element.name.clone());

    let matches: Vec<(usize, PiiCategory)> = {
        let chain: Vec<&str> = ancestors.iter().map(String::as_str).collect();
        let siblings: Vec<(&str, &str)> = element
            .attributes
            .iter()
            .map(|a| (a.name.as_str(), a.raw_value()))
            .collect();
        element
            .attributes
            .iter()
            .enumerate()
            .filter_map(|(index, attr)| {
                rules
                    .classify_attribute(&attr.name, &chain, &siblings)
                    .category()
                    .map(|category| (index, category))
            })
            .collect()
    };

    for (index, category) in matches {
        let replacement = generator.generate(category);
        let attr = &mut element.attributes[index];
        debug!("Replacing {} on <{}> as {}", attr.name, element.name, category);
        attr.set_value(&replacement);
        *counts.entry((category, attr.name.clone())).or_default() += 1;
    }

    for child in element.children.iter_mut() {
        if let Node::Element(child) = child {
            rewrite_element(child, rules, generator, ancestors, counts);
        }
    }

    ancestors.pop();
}

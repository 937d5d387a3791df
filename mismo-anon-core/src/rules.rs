//! rules.rs - The ordered classification rule table.
//!
//! A rule pairs an attribute name with optional context (an ancestor element
//! that must enclose the attribute, or a sibling attribute that must carry one
//! of a set of values) and names the PII category it yields. Rules are scanned
//! in order and the first match wins, so scoped rules for a polymorphic name
//! such as `_Name` must precede any unscoped rule for the same name.
//!
//! Classification is pure: the same name and context always yield the same
//! outcome.
//!
//! License: MIT OR APACHE 2.0

use crate::category::PiiCategory;

/// Outcome of classifying one attribute occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Pii(PiiCategory),
    NotPii,
}

impl Classification {
    pub fn category(&self) -> Option<PiiCategory> {
        match self {
            Classification::Pii(category) => Some(*category),
            Classification::NotPii => None,
        }
    }

    pub fn is_pii(&self) -> bool {
        matches!(self, Classification::Pii(_))
    }
}

/// Requires a sibling attribute on the same element to hold one of `values`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiblingGuard {
    pub attribute: &'static str,
    pub values: &'static [&'static str],
}

/// A single entry of the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationRule {
    /// Exact attribute name this rule applies to.
    pub attribute: &'static str,
    /// Local tag name that must appear somewhere in the ancestor chain.
    pub ancestor: Option<&'static str>,
    pub sibling: Option<SiblingGuard>,
    pub category: PiiCategory,
}

impl ClassificationRule {
    pub const fn any(attribute: &'static str, category: PiiCategory) -> Self {
        Self {
            attribute,
            ancestor: None,
            sibling: None,
            category,
        }
    }

    pub const fn within(
        attribute: &'static str,
        ancestor: &'static str,
        category: PiiCategory,
    ) -> Self {
        Self {
            attribute,
            ancestor: Some(ancestor),
            sibling: None,
            category,
        }
    }

    pub const fn guarded(
        attribute: &'static str,
        sibling_attribute: &'static str,
        values: &'static [&'static str],
        category: PiiCategory,
    ) -> Self {
        Self {
            attribute,
            ancestor: None,
            sibling: Some(SiblingGuard {
                attribute: sibling_attribute,
                values,
            }),
            category,
        }
    }

    /// Whether this rule carries any context constraint.
    pub fn is_scoped(&self) -> bool {
        self.ancestor.is_some() || self.sibling.is_some()
    }

    fn matches(&self, attribute: &str, ancestors: &[&str], siblings: &[(&str, &str)]) -> bool {
        if self.attribute != attribute {
            return false;
        }
        if let Some(required) = self.ancestor {
            if !ancestors.iter().any(|tag| local_name(tag) == required) {
                return false;
            }
        }
        if let Some(guard) = &self.sibling {
            let satisfied = siblings
                .iter()
                .any(|(name, value)| {
                    *name == guard.attribute && guard.values.iter().any(|allowed| allowed == value)
                });
            if !satisfied {
                return false;
            }
        }
        true
    }
}

/// Strips a namespace prefix (`ns:TAG` -> `TAG`).
pub fn local_name(qualified: &str) -> &str {
    qualified.rsplit_once(':').map_or(qualified, |(_, local)| local)
}

/// The MISMO rule table, most specific rules first.
pub static MISMO_RULES: [ClassificationRule; 19] = [
    // `_Name` is only PII inside a creditor or requesting-party block.
    ClassificationRule::within("_Name", "_CREDITOR", PiiCategory::CreditorName),
    ClassificationRule::within("_Name", "REQUESTING_PARTY", PiiCategory::CompanyName),
    ClassificationRule::guarded("_Value", "_Type", &["Phone", "Fax"], PiiCategory::PhoneOrFaxValue),
    ClassificationRule::guarded("_Value", "_Type", &["Email"], PiiCategory::EmailAddress),
    ClassificationRule::any("_FirstName", PiiCategory::FirstName),
    ClassificationRule::any("_MiddleName", PiiCategory::MiddleName),
    ClassificationRule::any("_LastName", PiiCategory::LastName),
    ClassificationRule::any("_UnparsedName", PiiCategory::UnparsedFullName),
    ClassificationRule::any("_SSN", PiiCategory::SSN),
    ClassificationRule::any("_BirthDate", PiiCategory::BirthDate),
    ClassificationRule::any("_AgeYears", PiiCategory::AgeYears),
    ClassificationRule::any("_StreetAddress", PiiCategory::StreetAddress),
    ClassificationRule::any("_City", PiiCategory::City),
    ClassificationRule::any("_State", PiiCategory::State),
    ClassificationRule::any("_PostalCode", PiiCategory::PostalCode),
    ClassificationRule::any("_AccountIdentifier", PiiCategory::AccountIdentifier),
    ClassificationRule::any("InternalAccountIdentifier", PiiCategory::InternalAccountIdentifier),
    ClassificationRule::any("LenderCaseIdentifier", PiiCategory::LenderCaseIdentifier),
    ClassificationRule::any("_RequestedByName", PiiCategory::RequestedByName),
];

/// An ordered, immutable view over a static rule list.
#[derive(Debug, Clone, Copy)]
pub struct RuleTable {
    rules: &'static [ClassificationRule],
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::mismo()
    }
}

impl RuleTable {
    pub const fn mismo() -> Self {
        Self { rules: &MISMO_RULES }
    }

    pub const fn new(rules: &'static [ClassificationRule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'static [ClassificationRule] {
        self.rules
    }

    /// Classifies an attribute using only its name and ancestor chain.
    ///
    /// Rules with a sibling guard never match through this entry point.
    pub fn classify(&self, attribute: &str, ancestors: &[&str]) -> Classification {
        self.classify_attribute(attribute, ancestors, &[])
    }

    /// Classifies an attribute given its ancestor chain (root first, including
    /// the owning element) and the `(name, raw value)` pairs of the owning
    /// element's attributes.
    pub fn classify_attribute(
        &self,
        attribute: &str,
        ancestors: &[&str],
        siblings: &[(&str, &str)],
    ) -> Classification {
        self.rules
            .iter()
            .find(|rule| rule.matches(attribute, ancestors, siblings))
            .map_or(Classification::NotPii, |rule| Classification::Pii(rule.category))
    }
}

/// Classifies against the MISMO table.
pub fn classify(attribute: &str, ancestors: &[&str]) -> Classification {
    RuleTable::mismo().classify(attribute, ancestors)
}

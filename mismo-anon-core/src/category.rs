// mismo-anon-core/src/category.rs
//! The fixed set of PII categories recognised in MISMO documents.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A kind of personally identifiable value. Each category owns exactly one
/// generation policy in [`crate::generator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PiiCategory {
    FirstName,
    MiddleName,
    LastName,
    UnparsedFullName,
    SSN,
    BirthDate,
    AgeYears,
    StreetAddress,
    City,
    State,
    PostalCode,
    PhoneOrFaxValue,
    EmailAddress,
    CreditorName,
    CompanyName,
    AccountIdentifier,
    InternalAccountIdentifier,
    LenderCaseIdentifier,
    RequestedByName,
}

impl PiiCategory {
    pub const ALL: [PiiCategory; 19] = [
        PiiCategory::FirstName,
        PiiCategory::MiddleName,
        PiiCategory::LastName,
        PiiCategory::UnparsedFullName,
        PiiCategory::SSN,
        PiiCategory::BirthDate,
        PiiCategory::AgeYears,
        PiiCategory::StreetAddress,
        PiiCategory::City,
        PiiCategory::State,
        PiiCategory::PostalCode,
        PiiCategory::PhoneOrFaxValue,
        PiiCategory::EmailAddress,
        PiiCategory::CreditorName,
        PiiCategory::CompanyName,
        PiiCategory::AccountIdentifier,
        PiiCategory::InternalAccountIdentifier,
        PiiCategory::LenderCaseIdentifier,
        PiiCategory::RequestedByName,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PiiCategory::FirstName => "FirstName",
            PiiCategory::MiddleName => "MiddleName",
            PiiCategory::LastName => "LastName",
            PiiCategory::UnparsedFullName => "UnparsedFullName",
            PiiCategory::SSN => "SSN",
            PiiCategory::BirthDate => "BirthDate",
            PiiCategory::AgeYears => "AgeYears",
            PiiCategory::StreetAddress => "StreetAddress",
            PiiCategory::City => "City",
            PiiCategory::State => "State",
            PiiCategory::PostalCode => "PostalCode",
            PiiCategory::PhoneOrFaxValue => "PhoneOrFaxValue",
            PiiCategory::EmailAddress => "EmailAddress",
            PiiCategory::CreditorName => "CreditorName",
            PiiCategory::CompanyName => "CompanyName",
            PiiCategory::AccountIdentifier => "AccountIdentifier",
            PiiCategory::InternalAccountIdentifier => "InternalAccountIdentifier",
            PiiCategory::LenderCaseIdentifier => "LenderCaseIdentifier",
            PiiCategory::RequestedByName => "RequestedByName",
        }
    }

    /// True for categories whose synthetic value never varies.
    pub fn is_constant(&self) -> bool {
        matches!(self, PiiCategory::City | PiiCategory::State | PiiCategory::PostalCode)
    }
}

impl fmt::Display for PiiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// mismo-anon-core/src/generator.rs
//! Synthetic value generation, one policy per [`PiiCategory`].
//!
//! The generator never fails and keeps no memory between calls: every
//! occurrence gets an independent draw. Randomness comes from the caller's
//! RNG, so concurrent pipelines never share a source and a seeded RNG yields a
//! reproducible run.
//!
//! License: MIT OR APACHE 2.0

use chrono::{Days, Local, Months, NaiveDate};
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::category::PiiCategory;
use crate::config::GeneratorPolicy;

const FALLBACK_PERSON_NAME: &str = "Anonymous";
const FALLBACK_ORGANIZATION: &str = "ANONYMOUS ORGANIZATION";

/// Length of a generated social security number.
pub const SSN_DIGITS: usize = 9;

/// Produces replacement values for PII categories.
pub struct SyntheticValueGenerator<'a, R: Rng + ?Sized> {
    policy: &'a GeneratorPolicy,
    rng: &'a mut R,
    today: NaiveDate,
}

impl<'a, R: Rng + ?Sized> SyntheticValueGenerator<'a, R> {
    /// Creates a generator anchored at the local calendar date.
    pub fn new(policy: &'a GeneratorPolicy, rng: &'a mut R) -> Self {
        Self::with_today(policy, rng, Local::now().date_naive())
    }

    /// Creates a generator whose birth dates are computed relative to `today`.
    pub fn with_today(policy: &'a GeneratorPolicy, rng: &'a mut R, today: NaiveDate) -> Self {
        Self { policy, rng, today }
    }

    pub fn generate(&mut self, category: PiiCategory) -> String {
        let p = self.policy;
        match category {
            PiiCategory::FirstName => self.pick(&p.first_names, FALLBACK_PERSON_NAME),
            PiiCategory::LastName => self.pick(&p.last_names, FALLBACK_PERSON_NAME),
            PiiCategory::MiddleName => char::from(self.rng.random_range(b'A'..=b'Z')).to_string(),
            PiiCategory::UnparsedFullName => {
                let first = self.pick(&p.first_names, FALLBACK_PERSON_NAME);
                let last = self.pick(&p.last_names, FALLBACK_PERSON_NAME);
                format!("{} {}", first, last)
            }
            PiiCategory::SSN => self.digits(SSN_DIGITS),
            PiiCategory::BirthDate => self.birth_date().format("%Y-%m-%d").to_string(),
            PiiCategory::AgeYears => self.age().to_string(),
            PiiCategory::StreetAddress => {
                let number = self.rng.random_range(1..=p.house_number_max.max(1));
                format!("{} {}", number, p.street_name)
            }
            PiiCategory::City => p.city.clone(),
            PiiCategory::State => p.state.clone(),
            PiiCategory::PostalCode => p.postal_code.clone(),
            PiiCategory::PhoneOrFaxValue => {
                let exchange = self.digits(3);
                let line = self.digits(4);
                format!("{}-{}-{}", p.phone_prefix, exchange, line)
            }
            PiiCategory::EmailAddress => format!("{}@{}", self.user_name(), p.email_domain),
            PiiCategory::CreditorName => self.pick(&p.creditor_names, FALLBACK_ORGANIZATION),
            PiiCategory::CompanyName => self.pick(&p.company_names, FALLBACK_ORGANIZATION),
            PiiCategory::AccountIdentifier => format!("ACC{}", self.digits(p.account_digits)),
            PiiCategory::InternalAccountIdentifier => {
                format!("INT{}", self.digits(p.internal_account_digits))
            }
            PiiCategory::LenderCaseIdentifier => self.digits(p.lender_case_digits),
            PiiCategory::RequestedByName => self.user_name(),
        }
    }

    fn pick(&mut self, list: &[String], fallback: &str) -> String {
        list.choose(&mut *self.rng)
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    }

    /// `count` uniformly random decimal digits; leading zeros allowed.
    fn digits(&mut self, count: usize) -> String {
        (0..count)
            .map(|_| char::from(b'0' + self.rng.random_range(0..10u8)))
            .collect()
    }

    fn user_name(&mut self) -> String {
        format!("user{}", self.rng.random_range(1..=self.policy.user_number_max.max(1)))
    }

    fn age(&mut self) -> u32 {
        let (lo, hi) = self.age_bounds();
        self.rng.random_range(lo..=hi)
    }

    fn age_bounds(&self) -> (u32, u32) {
        let lo = self.policy.min_age_years;
        (lo, self.policy.max_age_years.max(lo))
    }

    /// A date whose age as of `today` is uniformly drawn from the age range,
    /// with the day of the year drawn uniformly as well.
    fn birth_date(&mut self) -> NaiveDate {
        let years = self.age();
        let today = self.today;
        let latest = today
            .checked_sub_months(Months::new(years * 12))
            .unwrap_or(today);
        let earliest_exclusive = today
            .checked_sub_months(Months::new((years + 1) * 12))
            .unwrap_or(latest);
        let span = (latest - earliest_exclusive).num_days().max(1) as u64;
        let offset = self.rng.random_range(0..span);
        latest.checked_sub_days(Days::new(offset)).unwrap_or(latest)
    }
}

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    error::{PayQrError, PayQrResult},
    expiry::{parse_date, today},
    types::{Field, PaymentFields, ScanResult},
};

// Field constraint
//------------------------------------------------------------------------------

pub type Predicate = Arc<dyn Fn(Option<&str>) -> bool + Send + Sync>;

/// Predicate over a single, possibly absent, field value.
#[derive(Clone)]
pub enum FieldConstraint {
    /// Present and contains a non-whitespace character.
    NonBlank,
    /// Parses as a finite base-10 floating point number.
    Numeric,
    /// A `M/d/yyyy` date that is not before today.
    NotBlankAndNotPastDate,
    Custom(Predicate),
}

impl FieldConstraint {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(Option<&str>) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    pub fn validate(&self, value: Option<&str>) -> bool {
        self.validate_on(value, today())
    }

    /// Validates with `today` as the reference date for date constraints.
    pub fn validate_on(&self, value: Option<&str>, today: NaiveDate) -> bool {
        match self {
            Self::NonBlank => value.is_some_and(|v| !v.trim().is_empty()),
            Self::Numeric => value.and_then(|v| v.parse::<f64>().ok()).is_some_and(f64::is_finite),
            Self::NotBlankAndNotPastDate => {
                value.and_then(parse_date).is_some_and(|date| date >= today)
            }
            Self::Custom(f) => f(value),
        }
    }
}

impl Debug for FieldConstraint {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::NonBlank => f.write_str("NonBlank"),
            Self::Numeric => f.write_str("Numeric"),
            Self::NotBlankAndNotPastDate => f.write_str("NotBlankAndNotPastDate"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

// Constraint set
//------------------------------------------------------------------------------

/// One constraint per payment field. The same set is meant to be used when generating a
/// code and after scanning one.
#[derive(Debug, Clone)]
pub struct ConstraintSet {
    pub identifier: FieldConstraint,
    pub amount: FieldConstraint,
    pub expiry: FieldConstraint,
}

impl Default for ConstraintSet {
    fn default() -> Self {
        Self {
            identifier: FieldConstraint::NonBlank,
            amount: FieldConstraint::Numeric,
            expiry: FieldConstraint::NonBlank,
        }
    }
}

impl ConstraintSet {
    pub fn new(identifier: FieldConstraint, amount: FieldConstraint, expiry: FieldConstraint) -> Self {
        Self { identifier, amount, expiry }
    }

    /// Default set with expired dates rejected.
    pub fn strict() -> Self {
        Self { expiry: FieldConstraint::NotBlankAndNotPastDate, ..Self::default() }
    }

    pub fn get(&self, field: Field) -> &FieldConstraint {
        match field {
            Field::Identifier => &self.identifier,
            Field::Amount => &self.amount,
            Field::Expiry => &self.expiry,
        }
    }

    pub fn validate(&self, result: &ScanResult) -> PayQrResult<()> {
        self.validate_on(result, today())
    }

    // Checks identifier, amount, expiry in that order and stops at the first failure
    pub fn validate_on(&self, result: &ScanResult, today: NaiveDate) -> PayQrResult<()> {
        self.check(|f| result.get(f), today)
    }

    pub fn validate_fields(&self, fields: &PaymentFields) -> PayQrResult<()> {
        self.validate_fields_on(fields, today())
    }

    pub fn validate_fields_on(&self, fields: &PaymentFields, today: NaiveDate) -> PayQrResult<()> {
        self.check(|f| Some(fields.get(f)), today)
    }

    fn check<'a>(&self, value: impl Fn(Field) -> Option<&'a str>, today: NaiveDate) -> PayQrResult<()> {
        match Field::ALL.into_iter().find(|&f| !self.get(f).validate_on(value(f), today)) {
            Some(f) => Err(PayQrError::InvalidField(f)),
            None => Ok(()),
        }
    }
}

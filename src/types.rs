use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::expiry::ExpiryWindow;

// Field
//------------------------------------------------------------------------------

/// A payment field. The lowercase name doubles as the query key in the payload and as the
/// field name reported by [`crate::PayQrError::InvalidField`].
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Identifier,
    Amount,
    Expiry,
}

impl Field {
    /// Fields in validation and encoding order.
    pub const ALL: [Field; 3] = [Field::Identifier, Field::Amount, Field::Expiry];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Amount => "amount",
            Self::Expiry => "expiry",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// Payment fields
//------------------------------------------------------------------------------

/// Values to be encoded in a payment QR. Amount and expiry are kept as strings, their
/// shape is checked by [`crate::ConstraintSet`] rather than parsed here.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
pub struct PaymentFields {
    pub identifier: String,
    pub amount: String,
    pub expiry: String,
}

impl PaymentFields {
    pub fn new(
        identifier: impl Into<String>,
        amount: impl Into<String>,
        expiry: impl Into<String>,
    ) -> Self {
        Self { identifier: identifier.into(), amount: amount.into(), expiry: expiry.into() }
    }

    /// Builds fields whose expiry is `window` after `start`, formatted as `M/d/yyyy`.
    /// Returns `None` if the resulting date is out of range.
    pub fn expiring_in(
        identifier: impl Into<String>,
        amount: impl Into<String>,
        window: ExpiryWindow,
        start: NaiveDate,
    ) -> Option<Self> {
        let expiry = window.format_from(start)?;
        Some(Self::new(identifier, amount, expiry))
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Identifier => &self.identifier,
            Field::Amount => &self.amount,
            Field::Expiry => &self.expiry,
        }
    }
}

// Scan result
//------------------------------------------------------------------------------

/// Triple decoded from a scanned payload. A structurally valid payload may still leave a
/// field empty or absent; rejecting it is left to [`crate::ConstraintSet::validate`].
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
pub struct ScanResult {
    pub identifier: Option<String>,
    pub amount: Option<String>,
    pub expiry: Option<String>,
}

impl ScanResult {
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Identifier => self.identifier.as_deref(),
            Field::Amount => self.amount.as_deref(),
            Field::Expiry => self.expiry.as_deref(),
        }
    }

    /// Converts into [`PaymentFields`] when all three values are present.
    pub fn into_fields(self) -> Option<PaymentFields> {
        Some(PaymentFields { identifier: self.identifier?, amount: self.amount?, expiry: self.expiry? })
    }
}

impl From<PaymentFields> for ScanResult {
    fn from(f: PaymentFields) -> Self {
        Self { identifier: Some(f.identifier), amount: Some(f.amount), expiry: Some(f.expiry) }
    }
}

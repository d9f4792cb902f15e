//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// Vehicle identification number: a 9-digit integer, immutable once assigned.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Vin(u32);

impl Vin {
    pub const MIN: u32 = 100_000_000;
    pub const MAX: u32 = 999_999_999;

    pub fn new(value: u32) -> DomainResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(DomainError::invalid_id(format!(
                "Vin: {value} is not a 9-digit number"
            )));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for Vin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Vin {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|e| DomainError::invalid_id(format!("Vin: {e}")))?;
        Self::new(value)
    }
}

impl TryFrom<u32> for Vin {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Vin> for u32 {
    fn from(value: Vin) -> Self {
        value.0
    }
}

// Deserialization goes through `Vin::new` so the 9-digit range holds for wire input too.
impl<'de> Deserialize<'de> for Vin {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u32::deserialize(deserializer)?;
        Vin::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Sequential identifier assigned by a contract ledger on append (starts at 1).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(u64);

impl ContractId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl core::fmt::Display for ContractId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Correlation identifier for one inventory transaction (tracing only).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Uses UUIDv7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vin_accepts_nine_digit_bounds() {
        assert_eq!(Vin::new(100_000_000).unwrap().get(), 100_000_000);
        assert_eq!(Vin::new(999_999_999).unwrap().get(), 999_999_999);
    }

    #[test]
    fn vin_rejects_values_outside_nine_digits() {
        assert!(matches!(Vin::new(99_999_999), Err(DomainError::InvalidId(_))));
        assert!(matches!(Vin::new(1_000_000_000), Err(DomainError::InvalidId(_))));
    }

    #[test]
    fn vin_parses_from_trimmed_text() {
        let vin: Vin = " 123456789 ".parse().unwrap();
        assert_eq!(vin.get(), 123_456_789);
        assert!("12345".parse::<Vin>().is_err());
        assert!("abc".parse::<Vin>().is_err());
    }

    #[test]
    fn vin_deserialization_enforces_range() {
        let ok: Vin = serde_json::from_str("123456789").unwrap();
        assert_eq!(ok.get(), 123_456_789);
        assert!(serde_json::from_str::<Vin>("42").is_err());
    }

    #[test]
    fn contract_ids_are_sequential() {
        let first = ContractId::new(1);
        assert_eq!(first.next(), ContractId::new(2));
    }
}

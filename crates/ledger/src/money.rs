use serde::{Deserialize, Serialize};

use tinyledger_core::{DomainError, DomainResult, ValueObject};

/// Non-negative amount in the smallest currency unit (e.g. cents).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub fn new(amount: i64) -> DomainResult<Self> {
        if amount < 0 {
            return Err(DomainError::amount_must_be_positive(amount));
        }
        Ok(Self(amount))
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub fn amount(self) -> i64 {
        self.0
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add(self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(|| DomainError::amount_overflow(self.0, other.0))
    }

    pub fn subtract(self, other: Money) -> DomainResult<Money> {
        if self.is_less_than(other) {
            return Err(DomainError::could_not_subtract_greater(self.0, other.0));
        }
        Ok(Money(self.0 - other.0))
    }

    pub fn is_less_than(self, other: Money) -> bool {
        self.0 < other.0
    }
}

impl ValueObject for Money {}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

// Deserialization goes through `new` so a negative amount can never be decoded.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let amount = i64::deserialize(deserializer)?;
        Money::new(amount).map_err(serde::de::Error::custom)
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// An amount in whole CFA francs. XOF has no subunit, so no cents field.
///
/// The currency is fixed across the platform; conversion never happens
/// client-side.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn new(francs: i64) -> Self {
        Money(francs)
    }

    pub const fn francs(&self) -> i64 {
        self.0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Display estimate of the discount the server applies for authenticated
    /// clients (observed: 10%). The server remains authoritative; this is
    /// only used for the order summary.
    pub const fn with_client_discount(&self) -> Money {
        Money(self.0 - self.0 / 10)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} CFA", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_discount_estimate() {
        assert_eq!(Money::new(15000).with_client_discount(), Money::new(13500));
        assert_eq!(Money::new(0).with_client_discount(), Money::ZERO);
    }

    #[test]
    fn test_positivity() {
        assert!(Money::new(1).is_positive());
        assert!(!Money::ZERO.is_positive());
        assert!(!Money::new(-500).is_positive());
    }
}

//! Accepted coins.
//!
//! A deposit is always exactly one coin. Amounts are integers in the smallest
//! coin unit, the same unit used for product costs and user deposits.

use crate::EngineError;

/// A single coin the machine accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Coin {
    Five,
    Ten,
    Twenty,
    Fifty,
    Hundred,
}

impl Coin {
    /// Every accepted coin, smallest first.
    pub const ACCEPTED: [Coin; 5] = [
        Coin::Five,
        Coin::Ten,
        Coin::Twenty,
        Coin::Fifty,
        Coin::Hundred,
    ];

    /// Value in the smallest coin unit.
    #[must_use]
    pub const fn value(self) -> i64 {
        match self {
            Coin::Five => 5,
            Coin::Ten => 10,
            Coin::Twenty => 20,
            Coin::Fifty => 50,
            Coin::Hundred => 100,
        }
    }
}

impl TryFrom<i64> for Coin {
    type Error = EngineError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Coin::ACCEPTED
            .into_iter()
            .find(|coin| coin.value() == value)
            .ok_or_else(|| EngineError::InvalidInput(format!("invalid coin type inserted: {value}")))
    }
}

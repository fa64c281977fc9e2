//! Booking providers and the prices synthesized for them

use std::fmt;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places every price is rounded to
const PRICE_SCALE: u32 = 2;

/// A nightly price, always rounded to two decimal places
///
/// Rounding is half away from zero, so `1296.225` becomes `1296.23`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Round an exact decimal amount to a price
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self(amount.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Convert a float amount, returning `None` for NaN or infinities
    #[must_use]
    pub fn from_f64(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        Decimal::from_f64(amount).map(Self::new)
    }

    /// The rounded decimal amount
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Lossy float view, used for spreadsheet cells
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// Whether the price is strictly greater than zero
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Price scaled by `factor` and re-rounded, `None` on overflow
    #[must_use]
    pub fn scaled(self, factor: Decimal) -> Option<Self> {
        self.0.checked_mul(factor).map(Self::new)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Booking site a synthetic price is quoted for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProviderName {
    BookingCom,
    Agoda,
    MakeMyTrip,
    Trivago,
}

impl ProviderName {
    /// Every provider, in comparison-table column order
    pub const ALL: [Self; 4] = [Self::BookingCom, Self::Agoda, Self::MakeMyTrip, Self::Trivago];

    /// Fixed markup applied to the base nightly rate
    #[must_use]
    pub fn multiplier(self) -> Decimal {
        match self {
            Self::BookingCom => Decimal::ONE,
            Self::Agoda => Decimal::new(105, 2),
            Self::MakeMyTrip => Decimal::new(98, 2),
            Self::Trivago => Decimal::new(102, 2),
        }
    }

    /// Human-readable provider name
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::BookingCom => "Booking.com",
            Self::Agoda => "Agoda",
            Self::MakeMyTrip => "MakeMyTrip",
            Self::Trivago => "Trivago",
        }
    }

    /// Price quoted by this provider for a given base rate
    ///
    /// `None` when the markup overflows the decimal range.
    #[must_use]
    pub fn quote(self, base: Price) -> Option<Price> {
        base.scaled(self.multiplier())
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

//! Price and preparation-time calculators.
//!
//! Both are pure functions of an already validated [`OrderSpec`]; nothing here
//! can fail.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Mul};

use crate::validation::OrderSpec;

pub const FLAVOR_PRICE: Price = Price::from_cents(50);
pub const PREMIUM_MILK_PRICE: Price = Price::from_cents(65);
pub const EXTRA_SHOT_PRICE: Price = Price::from_cents(75);

pub const BASE_PREP_MINUTES: u32 = 3;
pub const ICED_PREP_MINUTES: u32 = 1;
pub const MULTI_FLAVOR_PREP_MINUTES: u32 = 1;
pub const MIN_PREP_MINUTES: u32 = 2;

/// A USD amount held in whole cents. Serialized as decimal dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Price(u32);

impl Price {
    pub const ZERO: Price = Price(0);

    pub const fn from_cents(cents: u32) -> Self {
        Self(cents)
    }

    pub fn cents(self) -> u32 {
        self.0
    }

    pub fn dollars(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price(self.0 + rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Price;

    fn mul(self, rhs: u32) -> Price {
        Price(self.0 * rhs)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.dollars())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cents = (f64::deserialize(deserializer)? * 100.0).round();
        if !cents.is_finite() || cents < 0.0 || cents > f64::from(u32::MAX) {
            return Err(serde::de::Error::custom(format!(
                "price {} is outside 0.00..={}",
                cents / 100.0,
                Price(u32::MAX)
            )));
        }
        Ok(Price(cents as u32))
    }
}

/// Base price for the size plus flavor, premium milk and extra shot surcharges.
pub fn calculate_price(spec: &OrderSpec) -> Price {
    let milk = if spec.milk.is_premium() {
        PREMIUM_MILK_PRICE
    } else {
        Price::ZERO
    };

    spec.size.base_price()
        + FLAVOR_PRICE * spec.flavors.len() as u32
        + milk
        + EXTRA_SHOT_PRICE * u32::from(spec.extra_shot)
}

/// Estimated minutes to prepare, rounded down, never below [`MIN_PREP_MINUTES`].
///
/// Each extra shot adds half a minute, so the sum is kept in half-minutes
/// until the final division.
pub fn calculate_prep_time(spec: &OrderSpec) -> u32 {
    let mut half_minutes = 2 * BASE_PREP_MINUTES;

    half_minutes += 2 * spec.coffee_type.prep_delta();
    half_minutes += u32::from(spec.extra_shot);
    if spec.flavors.len() > 1 {
        half_minutes += 2 * MULTI_FLAVOR_PREP_MINUTES;
    }

    (half_minutes / 2).max(MIN_PREP_MINUTES)
}

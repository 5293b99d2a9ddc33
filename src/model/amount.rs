//! Exact decimal amount types.
//!
//! All quantities and monetary values in the engine are base-10 [`Decimal`]s behind
//! newtypes. Binary floating point is never used; multi-lot basis accumulation would
//! otherwise drift.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A quantity of an asset, denominated in units of that asset.
#[derive(Copy, Clone, Debug, Default, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct AssetAmount(Decimal);

/// A fiat-denominated value (price, cost basis, proceeds, gain).
///
/// `Display` and `Serialize` render the value rounded to two fraction digits,
/// midpoint away from zero, matching conventional tax-form formatting. The inner
/// value keeps full precision for arithmetic.
#[derive(Copy, Clone, Debug, Default, Deserialize, Eq, Ord, PartialEq, PartialOrd)]
pub struct FiatAmount(Decimal);

macro_rules! impl_math_ops {
    ($name:ident) => {
        impl ::std::ops::Add for $name {
            type Output = Self;

            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl ::std::ops::AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl ::std::ops::Neg for $name {
            type Output = Self;

            fn neg(self) -> Self::Output {
                Self(-self.0)
            }
        }

        impl ::std::ops::Sub for $name {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl ::std::iter::Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::default(), |acc, x| acc + x)
            }
        }

        impl From<::rust_decimal::Decimal> for $name {
            fn from(value: ::rust_decimal::Decimal) -> Self {
                Self(value)
            }
        }
    };
}

impl_math_ops!(AssetAmount);
impl_math_ops!(FiatAmount);

impl AssetAmount {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl FiatAmount {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Fiat value of `quantity` units at this per-unit price.
    pub fn times(self, quantity: AssetAmount) -> Self {
        Self(self.0 * quantity.0)
    }

    /// Quantity-proportional share of this value: `self * part / whole`.
    ///
    /// `whole` must be non-zero; callers only prorate across a lot with
    /// positive quantity.
    pub fn prorate(self, part: AssetAmount, whole: AssetAmount) -> Self {
        Self(self.0 * part.0 / whole.0)
    }

    fn to_fixed(self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl fmt::Display for AssetAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl fmt::Display for FiatAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Rounding happens first so the precision specifier only pads.
        write!(f, "{:.2}", self.to_fixed())
    }
}

impl Serialize for FiatAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for AssetAmount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s).map(Self)
    }
}

impl FromStr for FiatAmount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn fiat_renders_two_fraction_digits() {
        assert_eq!(FiatAmount::from(dec!(12000)).to_string(), "12000.00");
        assert_eq!(FiatAmount::from(dec!(0.005)).to_string(), "0.01");
        assert_eq!(FiatAmount::from(dec!(-0.005)).to_string(), "-0.01");
        assert_eq!(FiatAmount::from(dec!(1999.999)).to_string(), "2000.00");
    }

    #[test]
    fn asset_display_normalizes_trailing_zeros() {
        assert_eq!(AssetAmount::from(dec!(0.5000)).to_string(), "0.5");
        assert_eq!(AssetAmount::from(dec!(2)).to_string(), "2");
    }

    #[test]
    fn prorate_is_exact_for_decimal_ratios() {
        let basis = FiatAmount::from(dec!(11000));
        let part = basis.prorate(AssetAmount::from(dec!(0.25)), AssetAmount::from(dec!(1)));
        assert_eq!(part, FiatAmount::from(dec!(2750)));
    }

    #[test]
    fn fiat_serializes_as_fixed_string() {
        let json = serde_json::to_string(&FiatAmount::from(dec!(2000))).unwrap();
        assert_eq!(json, r#""2000.00""#);
    }
}

//! [`Area`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;

use crate::define_kind;

/// Non-negative surface area measured in some [`AreaUnit`].
///
/// No conversion between [`AreaUnit`]s is ever performed: `1 ha` and
/// `10000 m²` are different [`Area`]s.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Area {
    /// Amount of this [`Area`].
    amount: Decimal,

    /// [`AreaUnit`] of the amount.
    unit: AreaUnit,
}

impl Area {
    /// Creates a new [`Area`] if the provided `amount` is non-negative.
    #[must_use]
    pub fn new(amount: Decimal, unit: AreaUnit) -> Option<Self> {
        (!amount.is_sign_negative() || amount.is_zero())
            .then_some(Self { amount, unit })
    }

    /// Returns the amount of this [`Area`].
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the [`AreaUnit`] of this [`Area`].
    #[must_use]
    pub fn unit(&self) -> AreaUnit {
        self.unit
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, unit } = self;
        write!(f, "{} {unit}", amount.normalize())
    }
}

impl FromStr for Area {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (amount, unit) = AreaUnit::ALL
            .iter()
            .find_map(|u| s.strip_suffix(u.value()).map(|a| (a, *u)))
            .ok_or("invalid unit")?;
        let amount =
            Decimal::from_str(amount.trim()).map_err(|_| "invalid amount")?;

        Self::new(amount, unit).ok_or("negative amount")
    }
}

define_kind! {
    #[doc = "Unit of measure of an [`Area`]."]
    enum AreaUnit {
        #[doc = "Square meters."]
        #[value = "m²"]
        SquareMeters,

        #[doc = "Hectares."]
        #[value = "ha"]
        Hectares,

        #[doc = "Square feet."]
        #[value = "ft²"]
        SquareFeet,
    }
}

impl Default for AreaUnit {
    fn default() -> Self {
        Self::SquareMeters
    }
}

impl AreaUnit {
    /// Returns the human-readable label of this [`AreaUnit`].
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SquareMeters => "Square meters (m²)",
            Self::Hectares => "Hectares (ha)",
            Self::SquareFeet => "Square feet (ft²)",
        }
    }
}

use std::{fmt, str::FromStr};

use bigdecimal::BigDecimal;
use time::{OffsetDateTime, Weekday};

use crate::error::PricingError;

/// Category of a price plan. Each category carries a fixed multiplier that is
/// applied on top of the plan's unit rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PricePlanType {
    Standard,
    Eco,
    Premium,
}

impl PricePlanType {
    pub const ALL: [PricePlanType; 3] = [Self::Standard, Self::Eco, Self::Premium];

    /// Cost multiplier for the plan type: Standard 1, Eco 0.5, Premium 2.
    pub fn multiplier(self) -> BigDecimal {
        match self {
            Self::Standard => BigDecimal::from(1),
            Self::Eco => BigDecimal::from(1) / BigDecimal::from(2),
            Self::Premium => BigDecimal::from(2),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Eco => "Eco",
            Self::Premium => "Premium",
        }
    }
}

impl fmt::Display for PricePlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PricePlanType {
    type Err = PricingError;

    /// Accepts `Standard`, `Eco` and `Premium` in any case, plus the legacy
    /// `STANDARD_PRICE_PLAN` style tags.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        let tag = tag
            .strip_suffix("_PRICE_PLAN")
            .or_else(|| tag.strip_suffix("_price_plan"))
            .unwrap_or(tag);

        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| {
                PricingError::InvalidPlanConfiguration(format!("unknown plan type '{s}'"))
            })
    }
}

/// Scales a plan's unit rate on one day of the week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeakTimeMultiplier {
    pub day: Weekday,
    pub multiplier: BigDecimal,
}

impl PeakTimeMultiplier {
    pub fn new(day: Weekday, multiplier: BigDecimal) -> Self {
        Self { day, multiplier }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PricePlan {
    pub plan_name: String,
    pub energy_supplier: String,
    pub unit_rate: BigDecimal,
    pub plan_type: PricePlanType,
}

impl PricePlan {
    pub fn new(
        plan_name: impl Into<String>,
        energy_supplier: impl Into<String>,
        unit_rate: BigDecimal,
        plan_type: PricePlanType,
    ) -> Self {
        Self {
            plan_name: plan_name.into(),
            energy_supplier: energy_supplier.into(),
            unit_rate,
            plan_type,
        }
    }

    /// Price per kWh after the plan type multiplier has been applied.
    pub fn effective_unit_rate(&self) -> BigDecimal {
        &self.unit_rate * self.plan_type.multiplier()
    }

    /// Unit rate in force at `at`: scaled by the first multiplier whose day
    /// is `at`'s weekday, or the plain unit rate when none matches. The plan
    /// type multiplier is not involved.
    pub fn price_at(&self, at: OffsetDateTime, peaks: &[PeakTimeMultiplier]) -> BigDecimal {
        let day = at.weekday();
        peaks
            .iter()
            .find(|peak| peak.day == day)
            .map(|peak| &self.unit_rate * &peak.multiplier)
            .unwrap_or_else(|| self.unit_rate.clone())
    }
}

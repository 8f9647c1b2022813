use std::collections::HashSet;

use bigdecimal::BigDecimal;

use crate::{domain::PricePlan, error::PricingError};

/// The fixed set of price plans offered, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct PlanCatalog {
    plans: Vec<PricePlan>,
}

impl PlanCatalog {
    /// Build a catalog, rejecting duplicate plan names and non-positive unit rates.
    pub fn new(plans: Vec<PricePlan>) -> Result<Self, PricingError> {
        let mut seen = HashSet::with_capacity(plans.len());
        for plan in &plans {
            if !seen.insert(plan.plan_name.as_str()) {
                return Err(PricingError::InvalidPlanConfiguration(format!(
                    "duplicate plan name '{}'",
                    plan.plan_name
                )));
            }
            if plan.unit_rate <= BigDecimal::from(0) {
                return Err(PricingError::InvalidPlanConfiguration(format!(
                    "plan '{}' must have a positive unit rate, got {}",
                    plan.plan_name, plan.unit_rate
                )));
            }
        }

        Ok(Self { plans })
    }

    pub fn list(&self) -> &[PricePlan] {
        &self.plans
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

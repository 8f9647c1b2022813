use std::sync::Arc;

use bigdecimal::BigDecimal;

use crate::{
    error::PricingError,
    estimator::estimate_cost,
    store::{AccountLookup, PlanCatalog, ReadingStore},
};

/// Estimated cost of a meter's usage on one plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanCost {
    pub plan_name: String,
    pub cost: BigDecimal,
}

/// Costs of one meter's usage on every catalog plan, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanComparison {
    /// Plan the meter's account is subscribed to, if any.
    pub price_plan_id: Option<String>,
    pub costs: Vec<PlanCost>,
}

/// Prices a meter's recorded usage against every plan in the catalog.
pub struct PricePlanComparator<S> {
    readings: Arc<S>,
    catalog: PlanCatalog,
    accounts: AccountLookup,
}

impl<S: ReadingStore> PricePlanComparator<S> {
    pub fn new(readings: Arc<S>, catalog: PlanCatalog, accounts: AccountLookup) -> Self {
        Self {
            readings,
            catalog,
            accounts,
        }
    }

    /// Estimate the cost of the meter's readings under every plan.
    ///
    /// A meter that is unknown, or whose reading collection is empty, yields
    /// [`PricingError::NoConsumption`].
    pub fn compare_all(&self, meter_id: &str) -> Result<PlanComparison, PricingError> {
        let readings = self
            .readings
            .get(meter_id)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| PricingError::NoConsumption {
                meter_id: meter_id.to_string(),
            })?;

        let costs = self
            .catalog
            .list()
            .iter()
            .map(|plan| {
                estimate_cost(&readings, plan).map(|cost| PlanCost {
                    plan_name: plan.plan_name.clone(),
                    cost,
                })
            })
            .collect::<Result<Vec<_>, PricingError>>()?;

        tracing::debug!(
            meter_id,
            readings = readings.len(),
            plans = costs.len(),
            "compared price plans"
        );

        Ok(PlanComparison {
            price_plan_id: self.accounts.plan_for(meter_id).map(str::to_string),
            costs,
        })
    }

    /// Plans ordered cheapest first, truncated to `limit` entries when given.
    ///
    /// Plans with equal cost keep their catalog order. `Some(0)` yields an
    /// empty list.
    pub fn recommend_cheapest(
        &self,
        meter_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<PlanCost>, PricingError> {
        let mut costs = self.compare_all(meter_id)?.costs;

        // stable: ties stay in catalog order
        costs.sort_by(|a, b| a.cost.cmp(&b.cost));

        if let Some(limit) = limit {
            costs.truncate(limit);
        }
        Ok(costs)
    }
}

#[cfg(feature = "serde")]
mod serialize {
    use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};

    use super::{PlanComparison, PlanCost};

    struct CostsByPlan<'a>(&'a [PlanCost]);

    impl Serialize for CostsByPlan<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_map(self.0.iter().map(|c| (&c.plan_name, &c.cost)))
        }
    }

    /// `{"pricePlanId": ..., "pricePlanComparisons": {plan: cost, ...}}`
    impl Serialize for PlanComparison {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut s = serializer.serialize_struct("PlanComparison", 2)?;
            s.serialize_field("pricePlanId", &self.price_plan_id)?;
            s.serialize_field("pricePlanComparisons", &CostsByPlan(&self.costs))?;
            s.end()
        }
    }

    /// A single-entry object `{plan: cost}`.
    impl Serialize for PlanCost {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry(&self.plan_name, &self.cost)?;
            map.end()
        }
    }
}

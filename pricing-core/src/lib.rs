pub mod comparator;
pub mod domain;
pub mod error;
pub mod estimator;
pub mod store;

pub use comparator::{PlanComparison, PlanCost, PricePlanComparator};
pub use error::PricingError;
pub use estimator::estimate_cost;

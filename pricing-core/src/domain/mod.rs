pub mod electricity_reading;
pub mod price_plan;

pub use electricity_reading::ElectricityReading;
pub use price_plan::{PeakTimeMultiplier, PricePlan, PricePlanType};

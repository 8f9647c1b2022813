#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// No readings are recorded for the meter, or the meter is unknown.
    #[error("no consumption recorded for meter '{meter_id}'")]
    NoConsumption { meter_id: String },
    #[error("invalid price plan configuration: {0}")]
    InvalidPlanConfiguration(String),
    /// The estimator was handed an empty reading collection.
    #[error("cannot estimate cost from an empty reading collection")]
    EmptyReadings,
    /// The reading window could not be expressed as a decimal number of hours.
    #[error("invalid elapsed time: {0}")]
    InvalidElapsedTime(String),
}

use bigdecimal::BigDecimal;
use pricing_core::domain::ElectricityReading;
use time::{macros::datetime, OffsetDateTime};

use crate::metrics_server::READINGS_REJECTED_TOTAL;

const MIN_TS: OffsetDateTime = datetime!(2000-01-01 00:00:00 UTC);
const MAX_TS: OffsetDateTime = datetime!(2100-01-01 00:00:00 UTC);

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("smart meter id must not be empty")]
    MissingMeterId,
    #[error("at least one electricity reading is required")]
    NoReadings,
    #[error("reading {index} must be non-negative")]
    NegativeReading { index: usize },
    #[error("reading {index} timestamp out of allowed range")]
    TimestampOutOfRange { index: usize },
}

/// Pure validation of a single reading.
///
/// Rules:
/// - kW must be non-negative.
/// - time must be within a broad sanity window [2000-01-01, 2100-01-01).
pub fn validate_reading(index: usize, reading: &ElectricityReading) -> Result<(), ValidationError> {
    if reading.reading < BigDecimal::from(0) {
        return Err(ValidationError::NegativeReading { index });
    }
    if reading.time < MIN_TS || reading.time >= MAX_TS {
        return Err(ValidationError::TimestampOutOfRange { index });
    }
    Ok(())
}

/// Validate a store request: a non-empty meter id and a non-empty list of
/// valid readings.
pub fn validate_store_request(
    meter_id: &str,
    readings: &[ElectricityReading],
) -> Result<(), ValidationError> {
    let res = check_store_request(meter_id, readings);
    if let Err(e) = &res {
        metrics::counter!(READINGS_REJECTED_TOTAL).increment(1);
        tracing::debug!(meter_id, error = %e, "rejected store request");
    }
    res
}

fn check_store_request(
    meter_id: &str,
    readings: &[ElectricityReading],
) -> Result<(), ValidationError> {
    if meter_id.trim().is_empty() {
        return Err(ValidationError::MissingMeterId);
    }
    if readings.is_empty() {
        return Err(ValidationError::NoReadings);
    }
    readings
        .iter()
        .enumerate()
        .try_for_each(|(index, reading)| validate_reading(index, reading))
}

use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use time::OffsetDateTime;

use crate::{
    domain::{ElectricityReading, PricePlan},
    error::PricingError,
};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Estimate what a meter's recorded usage would have cost on `plan`.
///
/// The average reading (kW) is assumed to have been drawn constantly between
/// the earliest and the latest reading, so the estimated consumption is
/// `average kW * elapsed hours`. The cost is that consumption priced at the
/// plan's unit rate scaled by its plan type multiplier.
///
/// Readings need not be sorted. An empty slice is rejected with
/// [`PricingError::EmptyReadings`].
pub fn estimate_cost(
    readings: &[ElectricityReading],
    plan: &PricePlan,
) -> Result<BigDecimal, PricingError> {
    let consumption = estimated_consumption(readings)?;
    Ok(consumption * plan.effective_unit_rate())
}

/// Estimated energy (kWh) consumed over the reading window.
pub fn estimated_consumption(readings: &[ElectricityReading]) -> Result<BigDecimal, PricingError> {
    let average = average_reading(readings)?;
    let (earliest, latest) = time_window(readings).ok_or(PricingError::EmptyReadings)?;
    Ok(average * elapsed_hours(earliest, latest)?)
}

/// Arithmetic mean of the readings, rounded half-up to the scale of their sum.
pub fn average_reading(readings: &[ElectricityReading]) -> Result<BigDecimal, PricingError> {
    if readings.is_empty() {
        return Err(PricingError::EmptyReadings);
    }

    let sum: BigDecimal = readings.iter().map(|r| &r.reading).sum();
    let (_, scale) = sum.as_bigint_and_exponent();
    let count = BigDecimal::from(readings.len() as u64);

    Ok((sum / count).with_scale_round(scale, RoundingMode::HalfUp))
}

/// Earliest and latest reading time, found in a single pass.
fn time_window(readings: &[ElectricityReading]) -> Option<(OffsetDateTime, OffsetDateTime)> {
    let first = readings.first()?.time;
    Some(readings.iter().fold((first, first), |(earliest, latest), r| {
        (earliest.min(r.time), latest.max(r.time))
    }))
}

/// Whole seconds of the window divided by 3600 in double precision, taken
/// over as the shortest decimal that round-trips the `f64`. A 20 minute
/// window is `0.3333333333333333` hours, never a longer expansion.
///
/// Sub-second parts of the window are ignored.
fn elapsed_hours(
    earliest: OffsetDateTime,
    latest: OffsetDateTime,
) -> Result<BigDecimal, PricingError> {
    let seconds = (latest - earliest).whole_seconds();
    let hours = seconds as f64 / SECONDS_PER_HOUR;
    BigDecimal::from_str(&hours.to_string())
        .map_err(|e| PricingError::InvalidElapsedTime(format!("{hours} hours: {e}")))
}

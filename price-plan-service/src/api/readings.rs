use std::str::FromStr;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use bigdecimal::BigDecimal;
use pricing_core::{domain::ElectricityReading, store::ReadingStore};
use serde::Deserialize;
use time::OffsetDateTime;

use super::{error::ApiError, AppState};
use crate::{metrics_server::READINGS_STORED_TOTAL, validation::validate_store_request};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingMeterReadings {
    pub smart_meter_id: Option<String>,
    pub electricity_readings: Option<Vec<IncomingReading>>,
}

#[derive(Debug, Deserialize)]
pub struct IncomingReading {
    pub time: IncomingTime,
    pub reading: IncomingDecimal,
}

/// Either RFC 3339 text or seconds since the Unix epoch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IncomingTime {
    EpochSeconds(i64),
    Rfc3339(String),
}

/// A decimal sent as a JSON number or as a string. Numbers are converted
/// through their shortest textual form so `0.1` stays `0.1`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IncomingDecimal {
    Number(serde_json::Number),
    Text(String),
}

impl TryFrom<IncomingTime> for OffsetDateTime {
    type Error = ApiError;

    fn try_from(t: IncomingTime) -> Result<Self, Self::Error> {
        match t {
            IncomingTime::EpochSeconds(secs) => OffsetDateTime::from_unix_timestamp(secs)
                .map_err(|e| ApiError::InvalidReadingTime(e.to_string())),
            IncomingTime::Rfc3339(s) => {
                OffsetDateTime::parse(&s, &time::format_description::well_known::Rfc3339)
                    .map_err(|e| ApiError::InvalidReadingTime(format!("'{s}': {e}")))
            }
        }
    }
}

impl TryFrom<IncomingDecimal> for BigDecimal {
    type Error = ApiError;

    fn try_from(d: IncomingDecimal) -> Result<Self, Self::Error> {
        let text = match d {
            IncomingDecimal::Number(n) => n.to_string(),
            IncomingDecimal::Text(s) => s,
        };
        BigDecimal::from_str(text.trim()).map_err(|_| ApiError::InvalidReadingValue(text))
    }
}

impl TryFrom<IncomingReading> for ElectricityReading {
    type Error = ApiError;

    fn try_from(i: IncomingReading) -> Result<Self, Self::Error> {
        Ok(ElectricityReading {
            time: i.time.try_into()?,
            reading: i.reading.try_into()?,
        })
    }
}

/// `POST /readings/store`
pub async fn store_readings(
    State(state): State<AppState>,
    Json(payload): Json<IncomingMeterReadings>,
) -> Result<StatusCode, ApiError> {
    let meter_id = payload.smart_meter_id.unwrap_or_default();
    let readings = payload
        .electricity_readings
        .unwrap_or_default()
        .into_iter()
        .map(ElectricityReading::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    validate_store_request(&meter_id, &readings)?;

    metrics::counter!(READINGS_STORED_TOTAL).increment(readings.len() as u64);
    tracing::info!(meter_id = %meter_id, count = readings.len(), "stored readings");
    state.readings.put(&meter_id, readings);

    Ok(StatusCode::OK)
}

/// `GET /readings/read/:smart_meter_id`
pub async fn read_readings(
    State(state): State<AppState>,
    Path(smart_meter_id): Path<String>,
) -> Result<Json<Vec<ElectricityReading>>, ApiError> {
    state
        .readings
        .get(&smart_meter_id)
        .map(|readings| Json(readings.to_vec()))
        .ok_or(ApiError::UnknownMeter(smart_meter_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_and_text_readings() {
        let json = r#"{
            "smartMeterId": "m-1",
            "electricityReadings": [
                {"time": "2024-01-01T00:00:00Z", "reading": 0.1},
                {"time": 1704074400, "reading": "15.25"}
            ]
        }"#;
        let payload: IncomingMeterReadings = serde_json::from_str(json).unwrap();

        let readings: Vec<ElectricityReading> = payload
            .electricity_readings
            .unwrap()
            .into_iter()
            .map(|r| r.try_into().unwrap())
            .collect();

        assert_eq!(readings[0].reading, BigDecimal::from_str("0.1").unwrap());
        assert_eq!(readings[1].reading, BigDecimal::from_str("15.25").unwrap());
        assert_eq!(readings[1].time, time::macros::datetime!(2024-01-01 02:00:00 UTC));
    }

    #[test]
    fn rejects_unparsable_reading_value() {
        let d = IncomingDecimal::Text("lots".to_string());
        assert!(matches!(BigDecimal::try_from(d), Err(ApiError::InvalidReadingValue(_))));
    }

    #[test]
    fn rejects_unparsable_time() {
        let t = IncomingTime::Rfc3339("noon".to_string());
        assert!(matches!(OffsetDateTime::try_from(t), Err(ApiError::InvalidReadingTime(_))));
    }
}

use bigdecimal::BigDecimal;
use time::OffsetDateTime;

/// One instantaneous power measurement, in kW, taken by a smart meter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ElectricityReading {
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub time: OffsetDateTime,
    pub reading: BigDecimal,
}

impl ElectricityReading {
    pub fn new(time: OffsetDateTime, reading: BigDecimal) -> Self {
        Self { time, reading }
    }
}

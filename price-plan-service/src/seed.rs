use std::{collections::BTreeMap, fs::File, io::Read, path::Path, str::FromStr};

use bigdecimal::BigDecimal;
use csv::StringRecord;
use pricing_core::{domain::ElectricityReading, store::ReadingStore};
use rand::Rng;
use time::{Duration, OffsetDateTime};

use crate::{config::SeedConfig, validation::validate_reading};

const READING_INTERVAL_SECS: i64 = 10;

#[derive(thiserror::Error, Debug)]
pub enum SeedError {
    #[error("failed to open readings CSV: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read readings CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid readings CSV record on line {line}: {message}")]
    InvalidRecord { line: u64, message: String },
}

/// `count` random readings spaced ten seconds apart, the newest taken at `now`.
/// Values are uniform in [0, 1) kW with four decimal places.
pub fn generate_readings<R: Rng>(
    rng: &mut R,
    count: usize,
    now: OffsetDateTime,
) -> Vec<ElectricityReading> {
    (0..count)
        .map(|i| {
            let time = now - Duration::seconds(i as i64 * READING_INTERVAL_SECS);
            let ten_thousandths = rng.gen_range(0..10_000u32);
            let reading = BigDecimal::from(ten_thousandths) / BigDecimal::from(10_000u32);
            ElectricityReading::new(time, reading)
        })
        .collect()
}

/// Parse a readings CSV with header columns `meter_id`, `time` (RFC 3339) and
/// `reading` (kW), grouping the readings per meter in file order.
pub fn read_readings_csv<R: Read>(
    reader: R,
) -> Result<BTreeMap<String, Vec<ElectricityReading>>, SeedError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut by_meter: BTreeMap<String, Vec<ElectricityReading>> = BTreeMap::new();
    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let (meter_id, reading) = record_to_reading(index, &record, &headers)
            .map_err(|message| SeedError::InvalidRecord { line, message })?;
        by_meter.entry(meter_id).or_default().push(reading);
    }

    Ok(by_meter)
}

fn column<'r>(
    record: &'r StringRecord,
    headers: &StringRecord,
    name: &str,
) -> Result<&'r str, String> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .and_then(|idx| record.get(idx))
        .map(str::trim)
        .ok_or_else(|| format!("missing column '{name}'"))
}

fn record_to_reading(
    index: usize,
    record: &StringRecord,
    headers: &StringRecord,
) -> Result<(String, ElectricityReading), String> {
    let get = |name: &str| column(record, headers, name);

    let meter_id = get("meter_id")?;
    if meter_id.is_empty() {
        return Err("empty meter_id".to_string());
    }

    let time_str = get("time")?;
    let time = OffsetDateTime::parse(time_str, &time::format_description::well_known::Rfc3339)
        .map_err(|e| format!("invalid time '{time_str}': {e}"))?;

    let reading_str = get("reading")?;
    let reading = BigDecimal::from_str(reading_str)
        .map_err(|e| format!("invalid reading '{reading_str}': {e}"))?;

    let reading = ElectricityReading::new(time, reading);
    validate_reading(index, &reading).map_err(|e| e.to_string())?;

    Ok((meter_id.to_string(), reading))
}

/// Populate the store from the seed configuration. Returns the number of
/// meters seeded.
pub fn seed_store<S: ReadingStore + ?Sized>(
    store: &S,
    cfg: &SeedConfig,
) -> Result<usize, SeedError> {
    let now = OffsetDateTime::now_utc();
    let mut rng = rand::thread_rng();

    for meter_id in &cfg.meters {
        store.put(meter_id, generate_readings(&mut rng, cfg.readings_per_meter, now));
    }
    let mut seeded = cfg.meters.len();

    if let Some(path) = &cfg.readings_csv {
        seeded += import_csv(store, path)?;
    }

    tracing::info!(meters = seeded, "seeded electricity readings");
    Ok(seeded)
}

fn import_csv<S: ReadingStore + ?Sized>(store: &S, path: &Path) -> Result<usize, SeedError> {
    let by_meter = read_readings_csv(File::open(path)?)?;
    let meters = by_meter.len();
    for (meter_id, readings) in by_meter {
        tracing::debug!(
            meter_id = %meter_id,
            count = readings.len(),
            path = %path.display(),
            "imported readings"
        );
        store.put(&meter_id, readings);
    }
    Ok(meters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricing_core::store::InMemoryReadingStore;
    use rand::{rngs::StdRng, SeedableRng};
    use time::macros::datetime;

    #[test]
    fn generates_readings_ten_seconds_apart() {
        let now = datetime!(2024-06-01 12:00:00 UTC);
        let readings = generate_readings(&mut StdRng::seed_from_u64(7), 5, now);

        assert_eq!(readings.len(), 5);
        assert_eq!(readings[0].time, now);
        assert_eq!(readings[4].time, now - Duration::seconds(40));
        assert!(readings
            .iter()
            .all(|r| r.reading >= BigDecimal::from(0) && r.reading < BigDecimal::from(1)));
    }

    #[test]
    fn reads_csv_grouped_by_meter() {
        let csv = "meter_id,time,reading\n\
                   m-1,2024-01-01T00:00:00Z,15.0\n\
                   m-2,2024-01-01T00:00:00Z,1\n\
                   m-1,2024-01-01T02:00:00Z,5.0\n";

        let by_meter = read_readings_csv(csv.as_bytes()).unwrap();

        assert_eq!(by_meter.len(), 2);
        assert_eq!(by_meter["m-1"].len(), 2);
        assert_eq!(by_meter["m-1"][1].reading, BigDecimal::from(5));
        assert_eq!(by_meter["m-2"][0].time, datetime!(2024-01-01 00:00:00 UTC));
    }

    #[test]
    fn rejects_bad_csv_record() {
        let csv = "meter_id,time,reading\nm-1,yesterday,1\n";
        let err = read_readings_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, SeedError::InvalidRecord { line: 2, .. }));
    }

    #[test]
    fn rejects_negative_csv_reading() {
        let csv = "meter_id,time,reading\nm-1,2024-01-01T00:00:00Z,-3\n";
        assert!(matches!(
            read_readings_csv(csv.as_bytes()),
            Err(SeedError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn seeds_configured_meters() {
        let store = InMemoryReadingStore::new();
        let cfg = SeedConfig {
            meters: vec!["smart-meter-0".to_string(), "smart-meter-1".to_string()],
            readings_per_meter: 3,
            readings_csv: None,
        };

        assert_eq!(seed_store(&store, &cfg).unwrap(), 2);
        assert_eq!(store.get("smart-meter-1").unwrap().len(), 3);
    }
}

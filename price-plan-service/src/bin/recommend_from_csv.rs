use anyhow::{bail, Context, Result};
use price_plan_service::{config::AppConfig, observability, seed::read_readings_csv};
use pricing_core::{
    store::{InMemoryReadingStore, ReadingStore},
    PricePlanComparator,
};
use std::{env, fs::File, sync::Arc};

/// Rank the configured price plans for every meter in a readings CSV.
///
/// Usage:
///   recommend_from_csv <readings_csv> [limit]
fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        bail!("usage: recommend_from_csv <readings_csv> [limit]");
    }
    let file_path = &args[1];
    let limit = args
        .get(2)
        .map(|l| l.parse::<usize>().with_context(|| format!("invalid limit '{l}'")))
        .transpose()?;

    // Load configuration (PRICE_PLAN_CONFIG can point to another catalog).
    let cfg = AppConfig::load()?;
    let catalog = cfg.catalog().context("invalid price plan configuration")?;

    let file = File::open(file_path).with_context(|| format!("failed to open '{file_path}'"))?;
    let by_meter = read_readings_csv(file)?;
    let store = Arc::new(InMemoryReadingStore::new());
    for (meter_id, readings) in &by_meter {
        store.put(meter_id, readings.clone());
    }

    let comparator = PricePlanComparator::new(store, catalog, cfg.account_lookup());
    for meter_id in by_meter.keys() {
        let ranked = comparator.recommend_cheapest(meter_id, limit)?;
        println!("{meter_id}");
        for (rank, plan) in ranked.iter().enumerate() {
            println!("  {}. {:<24} {:.2}", rank + 1, plan.plan_name, plan.cost);
        }
    }

    Ok(())
}

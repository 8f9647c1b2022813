use std::{collections::HashMap, fs, path::PathBuf, str::FromStr};

use anyhow::Context;
use bigdecimal::BigDecimal;
use pricing_core::{
    domain::{PricePlan, PricePlanType},
    store::{AccountLookup, PlanCatalog},
    PricingError,
};
use serde::Deserialize;

pub const CONFIG_PATH_ENV: &str = "PRICE_PLAN_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "price-plan-config.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub http_bind_addr: String,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

/// One `[[price_plans]]` entry. The unit rate is a decimal string so no
/// precision is lost to floating point while parsing.
#[derive(Debug, Clone, Deserialize)]
pub struct PricePlanConfig {
    pub plan_name: String,
    pub energy_supplier: String,
    pub unit_rate: String,
    pub plan_type: String,
}

impl PricePlanConfig {
    pub fn to_price_plan(&self) -> Result<PricePlan, PricingError> {
        let unit_rate = BigDecimal::from_str(self.unit_rate.trim()).map_err(|e| {
            PricingError::InvalidPlanConfiguration(format!(
                "plan '{}' has invalid unit_rate '{}': {e}",
                self.plan_name, self.unit_rate
            ))
        })?;
        let plan_type: PricePlanType = self.plan_type.parse()?;

        Ok(PricePlan::new(&self.plan_name, &self.energy_supplier, unit_rate, plan_type))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// Meters that get randomly generated readings at startup.
    #[serde(default)]
    pub meters: Vec<String>,
    #[serde(default = "default_readings_per_meter")]
    pub readings_per_meter: usize,
    /// CSV file (`meter_id,time,reading`) imported at startup.
    pub readings_csv: Option<PathBuf>,
}

fn default_readings_per_meter() -> usize {
    20
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub metrics: Option<MetricsConfig>,
    pub price_plans: Vec<PricePlanConfig>,
    /// Smart meter id -> subscribed price plan id.
    #[serde(default)]
    pub accounts: HashMap<String, String>,
    pub seed: Option<SeedConfig>,
}

impl AppConfig {
    /// Load the TOML config named by `PRICE_PLAN_CONFIG`, falling back to
    /// `price-plan-config.toml`. When neither is present the built-in
    /// defaults are used.
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let (path, explicit) = match env::var(CONFIG_PATH_ENV) {
            Ok(path) => (path, true),
            Err(_) => (DEFAULT_CONFIG_PATH.to_string(), false),
        };

        if !explicit && !std::path::Path::new(&path).exists() {
            tracing::info!(path = %path, "config file not found, using built-in defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file '{path}'"))?;
        Self::from_toml(&contents).with_context(|| format!("invalid config file '{path}'"))
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        Ok(cfg)
    }

    /// Build the plan catalog, failing on unknown plan types, unparsable or
    /// non-positive rates and duplicate plan names.
    pub fn catalog(&self) -> Result<PlanCatalog, PricingError> {
        let plans = self
            .price_plans
            .iter()
            .map(PricePlanConfig::to_price_plan)
            .collect::<Result<Vec<_>, _>>()?;
        PlanCatalog::new(plans)
    }

    pub fn account_lookup(&self) -> AccountLookup {
        AccountLookup::new(self.accounts.clone())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let plan = |name: &str, supplier: &str, rate: &str, plan_type: PricePlanType| {
            PricePlanConfig {
                plan_name: name.to_string(),
                energy_supplier: supplier.to_string(),
                unit_rate: rate.to_string(),
                plan_type: plan_type.to_string(),
            }
        };

        let accounts = [
            ("smart-meter-0", "price-plan-0"),
            ("smart-meter-1", "price-plan-1"),
            ("smart-meter-2", "price-plan-0"),
            ("smart-meter-3", "price-plan-2"),
            ("smart-meter-4", "price-plan-1"),
        ];

        Self {
            server: ServerConfig {
                http_bind_addr: "0.0.0.0:8080".to_string(),
                max_body_bytes: default_max_body_bytes(),
            },
            metrics: None,
            price_plans: vec![
                plan("price-plan-0", "Dr Evil's Dark Energy", "10", PricePlanType::Standard),
                plan("price-plan-1", "The Green Eco", "2", PricePlanType::Eco),
                plan("price-plan-2", "Power for Everyone", "1", PricePlanType::Premium),
            ],
            accounts: accounts
                .iter()
                .map(|(meter, plan)| (meter.to_string(), plan.to_string()))
                .collect(),
            seed: Some(SeedConfig {
                meters: accounts.iter().map(|(meter, _)| meter.to_string()).collect(),
                readings_per_meter: default_readings_per_meter(),
                readings_csv: None,
            }),
        }
    }
}

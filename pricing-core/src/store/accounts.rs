use std::collections::HashMap;

/// Maps a smart meter to the price plan its account is subscribed to.
#[derive(Debug, Clone, Default)]
pub struct AccountLookup {
    plans_by_meter: HashMap<String, String>,
}

impl AccountLookup {
    pub fn new(plans_by_meter: HashMap<String, String>) -> Self {
        Self { plans_by_meter }
    }

    /// Subscribed plan id, `None` when the meter has no account.
    pub fn plan_for(&self, meter_id: &str) -> Option<&str> {
        self.plans_by_meter.get(meter_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.plans_by_meter.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans_by_meter.is_empty()
    }
}

impl FromIterator<(String, String)> for AccountLookup {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_subscribed_plan() {
        let accounts: AccountLookup = [("smart-meter-0".to_string(), "price-plan-0".to_string())]
            .into_iter()
            .collect();

        assert_eq!(accounts.plan_for("smart-meter-0"), Some("price-plan-0"));
        assert_eq!(accounts.plan_for("smart-meter-9"), None);
    }
}

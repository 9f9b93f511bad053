use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Result, UsageError};

/// Rate applied to model ids missing from the table, per million tokens.
pub const DEFAULT_RATE_PER_MILLION: f64 = 1.00;

/// Price per million tokens, keyed by model id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingTable {
    #[serde(default = "default_rate")]
    pub default_rate: f64,
    #[serde(default)]
    pub rates: BTreeMap<String, f64>,
}

fn default_rate() -> f64 {
    DEFAULT_RATE_PER_MILLION
}

impl Default for PricingTable {
    fn default() -> Self {
        let rates = [
            ("openai/gpt-4o", 2.50),
            ("openai/gpt-4o-mini", 0.15),
            ("anthropic/claude-3.5-sonnet", 3.00),
        ]
        .into_iter()
        .map(|(m, r)| (m.to_string(), r))
        .collect();

        Self { default_rate: DEFAULT_RATE_PER_MILLION, rates }
    }
}

impl PricingTable {
    pub fn empty(default_rate: f64) -> Result<Self> {
        check_rate("<default>", default_rate)?;
        Ok(Self { default_rate, rates: BTreeMap::new() })
    }

    pub fn with_rate(mut self, model: impl Into<String>, rate: f64) -> Result<Self> {
        let model = model.into();
        check_rate(&model, rate)?;
        self.rates.insert(model, rate);
        Ok(self)
    }

    /// `{"default_rate": 1.0, "rates": {"openai/gpt-4o": 2.5}}`; both keys optional.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let table: PricingTable = serde_json::from_slice(&bytes)?;
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<()> {
        check_rate("<default>", self.default_rate)?;
        for (model, rate) in &self.rates {
            check_rate(model, *rate)?;
        }
        Ok(())
    }

    pub fn is_priced(&self, model: &str) -> bool {
        self.rates.contains_key(model)
    }

    /// Unknown ids fall back to `default_rate`, never zero.
    pub fn rate_for(&self, model: &str) -> f64 {
        self.rates.get(model).copied().unwrap_or(self.default_rate)
    }

    pub fn models(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(m, r)| (m.as_str(), *r))
    }
}

fn check_rate(model: &str, rate: f64) -> Result<()> {
    if rate.is_finite() && rate >= 0.0 {
        Ok(())
    } else {
        Err(UsageError::InvalidRate { model: model.to_string(), rate })
    }
}

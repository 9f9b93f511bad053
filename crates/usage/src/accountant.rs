use serde::Serialize;

use crate::PricingTable;

/// Fixed allowance for the simulated response, in tokens.
pub const RESPONSE_TOKEN_FLOOR: u64 = 10;

/// Rough token estimate: one token per four characters, plus the response floor.
///
/// Not a tokenizer. Keep the formula as is: cost reports are compared across runs.
/// Length counts Unicode scalar values, not bytes.
pub fn estimate_tokens(text: &str) -> u64 {
    text.chars().count() as u64 / 4 + RESPONSE_TOKEN_FLOOR
}

pub fn cost_for_tokens(tokens: u64, rate_per_million: f64) -> f64 {
    (tokens as f64 / 1_000_000.0) * rate_per_million
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CallResult {
    pub text: String,
    pub tokens: u64,
    pub call_count: u64,
    pub total_tokens: u64,
}

/// Running call/token counters for one model during one simulated session.
#[derive(Clone, Debug)]
pub struct UsageAccountant {
    model: String,
    rate: f64,
    call_count: u64,
    total_tokens: u64,
}

impl UsageAccountant {
    pub fn new(model: impl Into<String>, pricing: &PricingTable) -> Self {
        let model = model.into();
        let rate = pricing.rate_for(&model);
        if !pricing.is_priced(&model) {
            tracing::debug!(%model, rate, "no price listed, using default rate");
        }
        Self { model, rate, call_count: 0, total_tokens: 0 }
    }

    pub fn record_call(&mut self, prompt: &str) -> CallResult {
        let tokens = estimate_tokens(prompt);
        self.call_count = self.call_count.saturating_add(1);
        self.total_tokens = self.total_tokens.saturating_add(tokens);

        tracing::debug!(
            model = %self.model,
            tokens,
            call_count = self.call_count,
            total_tokens = self.total_tokens,
            "teacher call"
        );

        CallResult {
            text: format!("[Simulated response from {}]", self.model),
            tokens,
            call_count: self.call_count,
            total_tokens: self.total_tokens,
        }
    }

    /// Unrounded; round at display time.
    pub fn cost(&self) -> f64 {
        cost_for_tokens(self.total_tokens, self.rate)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn call_count(&self) -> u64 {
        self.call_count
    }

    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }
}

use serde::Serialize;

use crate::cost_for_tokens;

/// A planned run, sized ahead of time for budgeting.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CostScenario {
    pub name: String,
    pub prompts: u64,
    pub steps_per_prompt: u64,
    pub avg_tokens_per_step: u64,
}

impl CostScenario {
    pub fn new(name: impl Into<String>, prompts: u64, steps_per_prompt: u64, avg_tokens_per_step: u64) -> Self {
        Self { name: name.into(), prompts, steps_per_prompt, avg_tokens_per_step }
    }

    pub fn total_tokens(&self) -> u64 {
        self.prompts
            .saturating_mul(self.steps_per_prompt)
            .saturating_mul(self.avg_tokens_per_step)
    }

    pub fn projected_cost(&self, rate_per_million: f64) -> f64 {
        cost_for_tokens(self.total_tokens(), rate_per_million)
    }
}

pub fn default_scenarios() -> Vec<CostScenario> {
    vec![
        CostScenario::new("Test run (5 prompts)", 5, 20, 500),
        CostScenario::new("Full run (119 prompts)", 119, 200, 500),
    ]
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectionRow {
    pub scenario: String,
    pub model: String,
    pub total_tokens: u64,
    pub cost: f64,
}

/// One row per (scenario, model), scenarios outermost.
pub fn projection_table(scenarios: &[CostScenario], models: &[(&str, f64)]) -> Vec<ProjectionRow> {
    scenarios
        .iter()
        .flat_map(|s| {
            models.iter().map(move |(model, rate)| ProjectionRow {
                scenario: s.name.clone(),
                model: model.to_string(),
                total_tokens: s.total_tokens(),
                cost: s.projected_cost(*rate),
            })
        })
        .collect()
}

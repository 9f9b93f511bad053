//! Stand-in training loop. Exercises the accountant and the loss report
//! format; it is not a training algorithm.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{PricingTable, UsageAccountant, UsageError};

pub const INITIAL_LOSS: f64 = 5.0;
pub const LOSS_DECAY: f64 = 0.94;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeacherSource {
    Cloud,
    Local,
}

impl FromStr for TeacherSource {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cloud" => Ok(TeacherSource::Cloud),
            "local" => Ok(TeacherSource::Local),
            _ => Err(UsageError::UnknownTeacherSource(s.to_string())),
        }
    }
}

impl fmt::Display for TeacherSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TeacherSource::Cloud => "cloud",
            TeacherSource::Local => "local",
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulatorConfig {
    pub teacher_source: TeacherSource,
    pub teacher_model: String,
    pub student_model: String,
    pub lambda: f64,
    pub max_steps: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            teacher_source: TeacherSource::Cloud,
            teacher_model: "openai/gpt-4o-mini".to_string(),
            student_model: "Qwen/Qwen3-7B".to_string(),
            lambda: 0.4,
            max_steps: 20,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepMetrics {
    pub step: u64,
    pub loss: f64,      // rounded to 3 decimals
    pub tokens: u64,    // cumulative
    pub cost: f64,      // cumulative
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub steps: u64,
    pub initial_loss: f64,
    pub final_loss: f64,
    pub improvement_pct: f64,
    pub total_tokens: u64,
    pub total_cost: f64,
}

pub struct TrainingSimulator {
    config: SimulatorConfig,
    step: u64,
    loss: f64,
    teacher: Option<UsageAccountant>,
}

impl TrainingSimulator {
    pub fn new(config: SimulatorConfig, pricing: &PricingTable) -> Self {
        let teacher = match config.teacher_source {
            TeacherSource::Cloud => Some(UsageAccountant::new(config.teacher_model.clone(), pricing)),
            TeacherSource::Local => None,
        };
        Self { config, step: 0, loss: INITIAL_LOSS, teacher }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    /// Unrounded current loss.
    pub fn loss(&self) -> f64 {
        self.loss
    }

    pub fn teacher(&self) -> Option<&UsageAccountant> {
        self.teacher.as_ref()
    }

    pub fn train_step(&mut self, prompt: &str) -> StepMetrics {
        self.step += 1;

        if let Some(teacher) = self.teacher.as_mut() {
            teacher.record_call(prompt);
        }

        self.loss *= LOSS_DECAY;

        StepMetrics {
            step: self.step,
            loss: round3(self.loss),
            tokens: self.teacher.as_ref().map_or(0, UsageAccountant::total_tokens),
            cost: self.teacher.as_ref().map_or(0.0, UsageAccountant::cost),
        }
    }

    /// Run `max_steps` steps on the same prompt.
    pub fn run(&mut self, prompt: &str) -> SimulationSummary {
        let mut first: Option<StepMetrics> = None;
        let mut last: Option<StepMetrics> = None;

        for _ in 0..self.config.max_steps {
            let m = self.train_step(prompt);
            if m.step == 1 || m.step % 5 == 0 {
                tracing::info!(step = m.step, loss = m.loss, tokens = m.tokens, "train step");
            }
            if first.is_none() {
                first = Some(m.clone());
            }
            last = Some(m);
        }

        let initial_loss = first.as_ref().map_or(round3(self.loss), |m| m.loss);
        let final_loss = last.as_ref().map_or(initial_loss, |m| m.loss);
        let improvement_pct = if initial_loss > 0.0 {
            (initial_loss - final_loss) / initial_loss * 100.0
        } else {
            0.0
        };

        SimulationSummary {
            steps: self.config.max_steps,
            initial_loss,
            final_loss,
            improvement_pct,
            total_tokens: self.teacher.as_ref().map_or(0, UsageAccountant::total_tokens),
            total_cost: self.teacher.as_ref().map_or(0.0, UsageAccountant::cost),
        }
    }
}

/// Rounds the exact stored value, ties to even.
fn round3(x: f64) -> f64 {
    format!("{x:.3}").parse().unwrap_or(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloud() -> SimulatorConfig {
        SimulatorConfig::default()
    }

    #[test]
    fn test_loss_decays_geometrically() {
        let mut sim = TrainingSimulator::new(cloud(), &PricingTable::default());
        let m1 = sim.train_step("p");
        assert_eq!(m1.step, 1);
        assert_eq!(m1.loss, 4.7);
        let m2 = sim.train_step("p");
        assert_eq!(m2.loss, 4.418);
        assert!((sim.loss() - INITIAL_LOSS * LOSS_DECAY * LOSS_DECAY).abs() < 1e-12);
    }

    #[test]
    fn test_cloud_step_drives_accountant() {
        let mut sim = TrainingSimulator::new(cloud(), &PricingTable::default());
        // 22 chars -> 5 + 10
        let m = sim.train_step("Test investment prompt");
        assert_eq!(m.tokens, 15);
        assert_eq!(m.cost, 15.0 / 1e6 * 0.15);
        let m = sim.train_step("Test investment prompt");
        assert_eq!(m.tokens, 30);
        assert_eq!(sim.teacher().unwrap().call_count(), 2);
    }

    #[test]
    fn test_local_teacher_reports_zero() {
        let cfg = SimulatorConfig { teacher_source: TeacherSource::Local, ..cloud() };
        let mut sim = TrainingSimulator::new(cfg, &PricingTable::default());
        let m = sim.train_step("anything");
        assert_eq!(m.tokens, 0);
        assert_eq!(m.cost, 0.0);
        assert!(sim.teacher().is_none());
    }

    #[test]
    fn test_run_summary() {
        let mut sim = TrainingSimulator::new(cloud(), &PricingTable::default());
        let s = sim.run("Test investment prompt");
        assert_eq!(s.steps, 20);
        assert_eq!(s.initial_loss, 4.7);
        assert_eq!(s.final_loss, round3(INITIAL_LOSS * LOSS_DECAY.powi(20)));
        assert!(s.improvement_pct > 60.0 && s.improvement_pct < 75.0);
        assert_eq!(s.total_tokens, 300);
        assert_eq!(sim.step(), 20);
    }

    #[test]
    fn test_round3_ties_to_even() {
        // exact binary ties
        assert_eq!(round3(0.0625), 0.062);
        assert_eq!(round3(0.1875), 0.188);
        // 2.6755 is stored just below the tie
        assert_eq!(round3(2.6755), 2.675);
        assert_eq!(round3(4.699999999999999), 4.7);
    }

    #[test]
    fn test_teacher_source_parse() {
        assert_eq!("Cloud".parse::<TeacherSource>().unwrap(), TeacherSource::Cloud);
        assert_eq!(" local ".parse::<TeacherSource>().unwrap(), TeacherSource::Local);
        assert!("remote".parse::<TeacherSource>().is_err());
    }
}

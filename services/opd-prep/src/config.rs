use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use usage::{SimulatorConfig, TeacherSource};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub train_split: f64,
    pub max_samples: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub pricing_file: Option<PathBuf>,

    pub teacher_source: TeacherSource,
    pub teacher_model: String,
    pub student_model: String,
    pub lambda: f64,
    pub max_steps: u64,
    pub prompt: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let dataset_path = var("OPD_DATASET_PATH")
            .map(PathBuf::from)
            .context("Missing required env var: OPD_DATASET_PATH")?;

        let train_split = parse_or(&var, "OPD_TRAIN_SPLIT", 0.9)?;
        let max_samples = var("OPD_MAX_SAMPLES")
            .map(|v| v.parse::<usize>().with_context(|| format!("OPD_MAX_SAMPLES is not a count: {v}")))
            .transpose()?;
        let output_dir = var("OPD_OUTPUT_DIR").map(PathBuf::from);
        let pricing_file = var("OPD_PRICING_FILE").map(PathBuf::from);

        let teacher_source = match var("OPD_TEACHER_SOURCE") {
            Some(v) => v.parse::<TeacherSource>()?,
            None => TeacherSource::Cloud,
        };
        let defaults = SimulatorConfig::default();
        let teacher_model = var("OPD_TEACHER_MODEL").unwrap_or(defaults.teacher_model);
        let student_model = var("OPD_STUDENT_MODEL").unwrap_or(defaults.student_model);
        let lambda = parse_or(&var, "OPD_LAMBDA", defaults.lambda)?;
        let max_steps = parse_or(&var, "OPD_MAX_STEPS", defaults.max_steps)?;
        let prompt = var("OPD_PROMPT").unwrap_or_else(|| "Test investment prompt".to_string());

        // fail fast on nonsense before touching the dataset
        if !(train_split > 0.0 && train_split <= 1.0) {
            bail!("OPD_TRAIN_SPLIT must be in (0, 1], got {train_split}");
        }
        if !(0.0..=1.0).contains(&lambda) {
            bail!("OPD_LAMBDA must be in [0, 1], got {lambda}");
        }
        if teacher_model.trim().is_empty() {
            bail!("OPD_TEACHER_MODEL must not be empty");
        }

        Ok(Self {
            dataset_path,
            train_split,
            max_samples,
            output_dir,
            pricing_file,
            teacher_source,
            teacher_model,
            student_model,
            lambda,
            max_steps,
            prompt,
        })
    }

    pub fn simulator(&self) -> SimulatorConfig {
        SimulatorConfig {
            teacher_source: self.teacher_source,
            teacher_model: self.teacher_model.clone(),
            student_model: self.student_model.clone(),
            lambda: self.lambda,
            max_steps: self.max_steps,
        }
    }
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(v) => v.parse::<T>().with_context(|| format!("Invalid value for {key}: {v}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cfg(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let env: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = cfg(&[("OPD_DATASET_PATH", "data/prompts.jsonl")]).unwrap();
        assert_eq!(c.train_split, 0.9);
        assert_eq!(c.max_samples, None);
        assert_eq!(c.teacher_source, TeacherSource::Cloud);
        assert_eq!(c.teacher_model, "openai/gpt-4o-mini");
        assert_eq!(c.max_steps, 20);
    }

    #[test]
    fn test_dataset_path_required() {
        assert!(cfg(&[]).is_err());
    }

    #[test]
    fn test_bad_values_fail_fast() {
        assert!(cfg(&[("OPD_DATASET_PATH", "x"), ("OPD_TRAIN_SPLIT", "0")]).is_err());
        assert!(cfg(&[("OPD_DATASET_PATH", "x"), ("OPD_MAX_SAMPLES", "-3")]).is_err());
        assert!(cfg(&[("OPD_DATASET_PATH", "x"), ("OPD_TEACHER_SOURCE", "edge")]).is_err());
        assert!(cfg(&[("OPD_DATASET_PATH", "x"), ("OPD_LAMBDA", "1.5")]).is_err());
    }

    #[test]
    fn test_overrides() {
        let c = cfg(&[
            ("OPD_DATASET_PATH", "x"),
            ("OPD_MAX_SAMPLES", "5"),
            ("OPD_TEACHER_SOURCE", "local"),
            ("OPD_MAX_STEPS", "3"),
        ])
        .unwrap();
        assert_eq!(c.max_samples, Some(5));
        assert_eq!(c.simulator().teacher_source, TeacherSource::Local);
        assert_eq!(c.simulator().max_steps, 3);
    }
}

mod config;
mod export;

use anyhow::{Context, Result};
use dataset::{count_by_severity, ChatRecord, OpdDataLoader, Severity};
use tracing::info;
use usage::{default_scenarios, projection_table, PricingTable, TeacherSource, TrainingSimulator};

use crate::config::AppConfig;
use crate::export::{write_split, SplitManifest};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env()?;

    let pricing = match &cfg.pricing_file {
        Some(path) => PricingTable::from_json_file(path)
            .with_context(|| format!("Failed to load pricing from '{}'", path.display()))?,
        None => PricingTable::default(),
    };

    // --- Dataset ---
    let loader = OpdDataLoader::new(&cfg.dataset_path)?;

    let report = loader.get_statistics()?;
    println!("Dataset statistics:");
    println!("   total_samples: {}", report.stats.total_samples);
    println!("   total_messages: {}", report.stats.total_messages);
    println!("   avg_messages_per_sample: {}", report.stats.avg_messages_per_sample);
    println!("   samples_with_system_message: {}", report.stats.samples_with_system_message);
    println!("   dataset_path: {}", report.dataset_path);
    println!("   dataset_hash: {}", report.dataset_hash_hex);

    let split = loader.create_dataset::<Vec<ChatRecord>>(cfg.train_split, cfg.max_samples)?;
    let errors = count_by_severity(&split.diagnostics, Severity::Error);
    let warnings = count_by_severity(&split.diagnostics, Severity::Warning);
    println!(
        "\nSplit: {} train, {} test ({} skipped: {errors} errors, {warnings} warnings)",
        split.train.len(),
        split.test.as_ref().map_or(0, Vec::len),
        split.diagnostics.len(),
    );

    if let Some(sample) = split.train.first() {
        println!("\nSample from training set:");
        for (i, msg) in sample.messages.iter().enumerate() {
            println!("   Message {} [{}]: {}", i + 1, msg.role, preview(&msg.content, 100));
        }
    }

    if let Some(dir) = &cfg.output_dir {
        let manifest = SplitManifest::new(&cfg.dataset_path, &split, cfg.train_split, cfg.max_samples);
        write_split(dir, &split, &manifest)?;
        info!(id = %manifest.id, "split exported to {}", dir.display());
    }

    // --- Simulated training ---
    let sim_cfg = cfg.simulator();
    println!(
        "\nTraining with {} ({}) -> {}",
        sim_cfg.teacher_model, sim_cfg.teacher_source, sim_cfg.student_model
    );
    println!("Lambda: {}, Max steps: {}", sim_cfg.lambda, sim_cfg.max_steps);

    let mut sim = TrainingSimulator::new(sim_cfg, &pricing);
    let summary = sim.run(&cfg.prompt);
    println!(
        "   Loss: {:.3} -> {:.3} ({:.1}% improvement)",
        summary.initial_loss, summary.final_loss, summary.improvement_pct
    );
    if cfg.teacher_source == TeacherSource::Cloud {
        println!("   Total tokens: {}", summary.total_tokens);
        println!("   Total cost: ${:.4}", summary.total_cost);
    }

    // --- Cost projection ---
    let models: Vec<(&str, f64)> = pricing.models().collect();
    println!("\n{:<30} {:<30} {:<10}", "Scenario", "Model", "Cost");
    println!("{}", "-".repeat(70));
    for row in projection_table(&default_scenarios(), &models) {
        println!("{:<30} {:<30} ${:>8.2}", row.scenario, row.model, row.cost);
    }

    Ok(())
}

fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

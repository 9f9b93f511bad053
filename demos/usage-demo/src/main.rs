//! Usage Demo: what a distillation run costs
//!
//! Shows:
//! 1. Three simulated calls against each priced cloud teacher
//! 2. Fallback pricing for an unlisted model
//! 3. A short simulated training run with loss and spend

use usage::{PricingTable, SimulatorConfig, TeacherSource, TrainingSimulator, UsageAccountant};

fn main() {
    println!("╔════════════════════════════════════════════════╗");
    println!("║  OPD - Teacher API Usage Demo                  ║");
    println!("║  Token and cost accounting (simulated)         ║");
    println!("╚════════════════════════════════════════════════╝\n");

    let pricing = PricingTable::default();
    let prompt = "Test prompt ".repeat(10);

    // 1. Priced models
    println!("💳 Step 1: Three calls per cloud teacher");
    println!("   ─────────────────────────────────────");

    for (model, rate) in pricing.models() {
        let mut api = UsageAccountant::new(model, &pricing);
        for _ in 0..3 {
            api.record_call(&prompt);
        }
        println!("   {model} (${rate:.2}/1M)");
        println!(
            "      Calls: {}, Tokens: {}, Cost: ${:.6}",
            api.call_count(),
            api.total_tokens(),
            api.cost()
        );
    }
    println!();

    // 2. Unlisted model
    println!("❓ Step 2: Unlisted model falls back to the default rate");
    println!("   ─────────────────────────────────────────────────────");

    let mut api = UsageAccountant::new("acme/unlisted-teacher", &pricing);
    let call = api.record_call(&prompt);
    println!("   Response: {}", call.text);
    println!("   Rate: ${:.2}/1M, Cost: ${:.6}\n", api.rate(), api.cost());

    // 3. Training loop
    println!("📉 Step 3: Simulated training run");
    println!("   ──────────────────────────────");

    let config = SimulatorConfig {
        teacher_source: TeacherSource::Cloud,
        max_steps: 10,
        ..SimulatorConfig::default()
    };
    let mut sim = TrainingSimulator::new(config, &pricing);
    for _ in 0..10 {
        let m = sim.train_step("Test investment prompt");
        println!("   Step {:3}: Loss = {:.3}, Tokens = {}, Cost = ${:.6}", m.step, m.loss, m.tokens, m.cost);
    }

    println!("\n✓ Demo complete");
}

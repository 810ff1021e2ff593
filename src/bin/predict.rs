// One-shot prediction against the persisted artifact bundle.
//
// Usage: cargo run --bin predict -- 45.0
// Artifact path comes from ARTIFACT_PATH (default artifacts/moisture_bundle.json).

use anyhow::{Context, Result};
use moisture_monitor::{MoistureMonitor, MoistureState};

fn main() -> Result<()> {
    let value: f64 = std::env::args()
        .nth(1)
        .context("usage: predict <moisture-percent>")?
        .parse()
        .context("moisture reading must be a number")?;

    let artifact_path = std::env::var("ARTIFACT_PATH")
        .unwrap_or_else(|_| "artifacts/moisture_bundle.json".to_string());

    let monitor = MoistureMonitor::load(&artifact_path)
        .with_context(|| format!("failed to initialize monitor from {}", artifact_path))?;

    let report = monitor.predict(value)?;

    println!("Soil moisture: {:.1}%", report.raw_percent);
    println!("  Normalized: {:.4}", report.normalized);
    println!("  Raw class position: {}", report.raw_position);
    println!("  State: {}", report.state.display_label());
    println!("  Severity: {}", report.recommendation.severity.as_str());
    println!("  Recommendation: {}", report.recommendation.advice);

    if let Some(probs) = report.probabilities {
        println!("  Probabilities:");
        for (state, p) in MoistureState::ALL.iter().zip(probs.iter()) {
            println!("    {:<10} {:>5.1}%", state.display_label(), p * 100.0);
        }
    }

    Ok(())
}

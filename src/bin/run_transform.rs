use log::info;
use serde::Serialize;
use std::env;
use std::path::Path;
use vision_catalog::config::load_config;
use vision_catalog::diagnostics::TimingBreakdown;
use vision_catalog::image::codec::{decode, save_image, write_json_file};
use vision_catalog::{Operation, TransformRegistry};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path)).map_err(|e| e.to_string())?;

    let input = std::fs::read(&config.input)
        .map_err(|e| format!("failed to read {}: {e}", config.input.display()))?;
    let registry = TransformRegistry::with_config(config.registry);
    info!(
        "running {:?} on {} ({} bytes)",
        config.operation,
        config.input.display(),
        input.len()
    );
    let (bytes, report) = registry
        .execute_with_report(&config.operation, &input)
        .map_err(|e| e.to_string())?;

    // Re-encode through the extension-chosen container.
    let output = decode(&bytes).map_err(|e| e.to_string())?;
    save_image(&output, &config.output.image).map_err(|e| e.to_string())?;
    println!(
        "Saved {} output ({}x{}) to {}",
        report.operation,
        report.width,
        report.height,
        config.output.image.display()
    );

    if let Some(path) = &config.output.report_json {
        let summary = TransformSummary {
            input: config.input.display().to_string(),
            output: config.output.image.display().to_string(),
            operation: report.operation,
            width: report.width,
            height: report.height,
            output_bytes: bytes.len(),
            timing: report.timing,
        };
        write_json_file(path, &summary).map_err(|e| e.to_string())?;
        println!("Saved execution summary to {}", path.display());
    }

    Ok(())
}

fn usage() -> String {
    "Usage: run_transform <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransformSummary {
    input: String,
    output: String,
    operation: Operation,
    width: usize,
    height: usize,
    output_bytes: usize,
    timing: TimingBreakdown,
}

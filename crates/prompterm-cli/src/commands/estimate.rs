use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use prompterm_core::{
    playback::Speed,
    script::{DurationEstimate, TextAnalysis},
    AppConfig, Script,
};

#[derive(Debug, Serialize)]
struct EstimateReport<'a> {
    script: &'a Path,
    speed: Speed,
    characters: usize,
    pixels_per_second: f64,
    estimate: DurationEstimate,
    analysis: TextAnalysis,
}

pub async fn run(config: &AppConfig, path: &Path, speed: Option<i64>, json: bool) -> Result<()> {
    let script = Script::load(path)
        .await
        .with_context(|| format!("failed to load script {}", path.display()))?;
    let speed = speed.map_or(config.prompter.speed, Speed::new);

    let report = EstimateReport {
        script: path,
        speed,
        characters: script.char_count(),
        pixels_per_second: speed.pixels_per_second(),
        estimate: script.estimate(speed),
        analysis: script.analysis(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", path.display());
    println!("  Words:      {}", report.estimate.words);
    println!("  Characters: {}", report.characters);
    println!(
        "  Speed:      {} ({} wpm, {:.1} px/s)",
        report.speed, report.estimate.wpm, report.pixels_per_second
    );
    println!("  Duration:   {}", report.estimate.formatted);
    if let Some(recommendation) = report.analysis.recommendation {
        println!("\n  Performance Notice: {}", recommendation);
    }

    Ok(())
}

mod options;

use anyhow::{Context, Error as AnyError};
use clap::Parser;
use csv::Writer;
use gpx_poster::{prepare_from_path, CleaningConfig, PosterData, RaceDistance};
use log::{info, warn};
use options::{Cli, Command};
use rayon::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn main() -> Result<(), AnyError> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.tuning.to_config()?;

    match cli.cmd {
        Command::Stats {
            file,
            duration,
            distance,
            json,
        } => run_stats(&file, duration.as_deref(), distance.as_deref(), json, &config),
        Command::Display { file, output } => run_display(&file, output.as_deref(), &config),
        Command::Batch {
            dir,
            output,
            duration,
        } => run_batch(&dir, &output, duration.as_deref(), &config),
    }
}

fn run_stats(
    file: &Path,
    duration: Option<&str>,
    distance_label: Option<&str>,
    json: bool,
    config: &CleaningConfig,
) -> Result<(), AnyError> {
    let data = prepare_from_path(file, duration, config)
        .with_context(|| format!("failed to prepare {}", file.display()))?;

    if json {
        let stdout = io::stdout();
        serde_json::to_writer_pretty(stdout.lock(), &data)?;
        println!();
        return Ok(());
    }

    print_summary(file, &data, distance_label.map(RaceDistance::parse));
    Ok(())
}

fn print_summary(file: &Path, data: &PosterData, label: Option<RaceDistance>) {
    let stats = &data.stats;
    let counts = &stats.point_counts;

    println!("\n🏃 {}", file.display());
    println!("=========================");
    if let Some(label) = label {
        match label.kilometers() {
            Some(nominal) => println!("🏷️  Label: {label} (nominal {nominal} km)"),
            None => println!("🏷️  Label: {label}"),
        }
    }
    println!("📏 Distance: {:.2} km", stats.total_distance_km);
    println!(
        "📍 Points: {} raw, {} kept, {} rejected, {} for display",
        counts.raw, counts.cleaned, counts.rejected, counts.display
    );
    if data.cleaned.is_degenerate() {
        println!("⚠️  Every point after the first was rejected by the speed filter");
    }

    match stats.elevation {
        Some(e) => {
            println!("⛰️  Elevation: {:.0}m – {:.0}m", e.min_elevation, e.max_elevation);
            println!("   ↗ {}m ascent, ↘ {}m descent", e.total_ascent_m, e.total_descent_m);
        }
        None => println!("⛰️  Elevation: not recorded"),
    }

    println!("⏱️  Pace: {} /km", stats.pace.display());
    if let Some(speed) = stats.average_speed_kmh {
        println!("🚀 Average speed: {speed:.1} km/h");
    }
}

fn run_display(file: &Path, output: Option<&Path>, config: &CleaningConfig) -> Result<(), AnyError> {
    let data = prepare_from_path(file, None, config)
        .with_context(|| format!("failed to prepare {}", file.display()))?;

    match output {
        Some(path) => {
            let out = BufWriter::new(File::create(path)?);
            data.display.write_csv(out)?;
            println!("📁 {} display points saved to: {}", data.display.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            data.display.write_csv(stdout.lock())?;
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct BatchRow {
    filename: String,
    status: String,
    raw_points: usize,
    cleaned_points: usize,
    rejected_points: usize,
    display_points: usize,
    distance_km: f64,
    min_elevation_m: Option<f64>,
    max_elevation_m: Option<f64>,
    total_ascent_m: Option<u32>,
    total_descent_m: Option<u32>,
    pace_min_per_km: String,
    average_speed_kmh: Option<f64>,
}

impl BatchRow {
    fn from_data(filename: String, data: &PosterData) -> Self {
        let stats = &data.stats;
        Self {
            filename,
            status: if data.cleaned.is_degenerate() {
                "degenerate".to_string()
            } else {
                "ok".to_string()
            },
            raw_points: stats.point_counts.raw,
            cleaned_points: stats.point_counts.cleaned,
            rejected_points: stats.point_counts.rejected,
            display_points: stats.point_counts.display,
            distance_km: (stats.total_distance_km * 1000.0).round() / 1000.0,
            min_elevation_m: stats.min_elevation(),
            max_elevation_m: stats.max_elevation(),
            total_ascent_m: stats.total_ascent_m(),
            total_descent_m: stats.total_descent_m(),
            pace_min_per_km: stats.pace.display(),
            average_speed_kmh: stats.average_speed_kmh,
        }
    }

    fn from_error(filename: String, error: &dyn std::fmt::Display) -> Self {
        Self {
            filename,
            status: format!("error: {error}"),
            raw_points: 0,
            cleaned_points: 0,
            rejected_points: 0,
            display_points: 0,
            distance_km: 0.0,
            min_elevation_m: None,
            max_elevation_m: None,
            total_ascent_m: None,
            total_descent_m: None,
            pace_min_per_km: gpx_poster::stats::PACE_PLACEHOLDER.to_string(),
            average_speed_kmh: None,
        }
    }
}

fn collect_gpx_files(dir: &Path) -> Result<Vec<PathBuf>, AnyError> {
    let mut gpx_files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if entry.file_type().is_file() {
            if let Some(extension) = entry.path().extension() {
                if extension.to_string_lossy().to_lowercase() == "gpx" {
                    gpx_files.push(entry.path().to_path_buf());
                }
            }
        }
    }
    gpx_files.sort();
    Ok(gpx_files)
}

fn run_batch(
    dir: &Path,
    output: &Path,
    duration: Option<&str>,
    config: &CleaningConfig,
) -> Result<(), AnyError> {
    let gpx_files = collect_gpx_files(dir)?;
    println!("🔍 Found {} GPX files to process", gpx_files.len());
    info!("using parallel processing on {} cores", num_cpus::get());

    // Each file is independent; rows keep the sorted file order.
    let rows: Vec<BatchRow> = gpx_files
        .par_iter()
        .map(|path| {
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());

            match prepare_from_path(path, duration, config) {
                Ok(data) => BatchRow::from_data(filename, &data),
                Err(e) => {
                    warn!("{}: {e}", path.display());
                    BatchRow::from_error(filename, &e)
                }
            }
        })
        .collect();

    let mut wtr = Writer::from_path(output)?;
    for row in &rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    let failed = rows.iter().filter(|r| r.status.starts_with("error")).count();
    println!("\n✅ Processed {} out of {} GPX files", rows.len() - failed, rows.len());
    if failed > 0 {
        println!("❌ {failed} file(s) could not be used, see the status column");
    }
    println!("📁 Results saved to: {}", output.display());
    io::stdout().flush()?;

    Ok(())
}

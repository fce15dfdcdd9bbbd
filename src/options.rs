use clap::{Args, Parser, Subcommand, ValueEnum};
use gpx_poster::{CleaningConfig, ComparisonBasis, ElevationRounding, PosterError};
use std::path::PathBuf;

/// Clean a GPS track and compute the figures for a route poster.
#[derive(Parser, Debug, Clone)]
#[command(name = "gpx-poster", version)]
pub struct Cli {
    #[command(flatten)]
    pub tuning: Tuning,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Print distance, elevation and pace for one track.
    Stats {
        file: PathBuf,

        /// Finishing time as HH:MM:SS.
        #[arg(short, long)]
        duration: Option<String>,

        /// Distance label for the poster, e.g. "42,195 km".
        #[arg(long)]
        distance: Option<String>,

        /// Print the renderer payload as JSON instead.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Write the down-sampled route coordinates as CSV.
    Display {
        file: PathBuf,

        /// Output file; stdout if omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Process every .gpx file under a directory, one CSV row per file.
    Batch {
        dir: PathBuf,

        #[arg(short, long, default_value = "poster_summary.csv")]
        output: PathBuf,

        /// Finishing time applied to every file.
        #[arg(short, long)]
        duration: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Basis {
    Raw,
    Accepted,
}

#[derive(Args, Debug, Clone)]
pub struct Tuning {
    /// JSON file with cleaning settings; flags below override it.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Speed cap in m/s.
    #[arg(long, global = true)]
    pub max_speed: Option<f64>,

    /// Minimum time step in seconds.
    #[arg(long, global = true)]
    pub min_dt: Option<f64>,

    /// Maximum number of display points.
    #[arg(long, global = true)]
    pub max_points: Option<usize>,

    /// Point a candidate is compared against.
    #[arg(long, value_enum, global = true)]
    pub basis: Option<Basis>,

    /// Round ascent/descent instead of truncating.
    #[arg(long, default_value_t = false, global = true)]
    pub round_elevation: bool,

    /// Clean pieces separated by pauses longer than this (seconds) in parallel.
    #[arg(long, global = true)]
    pub gap_split: Option<f64>,
}

impl Tuning {
    pub fn to_config(&self) -> Result<CleaningConfig, PosterError> {
        let mut config = match &self.config {
            Some(path) => CleaningConfig::from_json_path(path)?,
            None => CleaningConfig::default(),
        };

        if let Some(v) = self.max_speed {
            config.max_speed_m_s = v;
        }
        if let Some(v) = self.min_dt {
            config.min_dt_s = v;
        }
        if let Some(v) = self.max_points {
            config.max_display_points = v;
        }
        if let Some(basis) = self.basis {
            config.comparison_basis = match basis {
                Basis::Raw => ComparisonBasis::RawPredecessor,
                Basis::Accepted => ComparisonBasis::LastAccepted,
            };
        }
        if self.round_elevation {
            config.elevation_rounding = ElevationRounding::Round;
        }
        if self.gap_split.is_some() {
            config.gap_split_s = self.gap_split;
        }

        config.validate()?;
        Ok(config)
    }
}

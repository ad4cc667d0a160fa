//! Split EDA CLI
//!
//! Command-line interface for segmenting EDA recordings:
//! - List the acquisition chunks of a recording
//! - List discovered experiment runs
//! - Compute labeled intervals for plotting
//! - Generate a config file

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use split_eda::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

#[derive(Parser)]
#[command(name = "split-eda")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Segment EDA recordings and align them to experiment runs")]
#[command(long_about = "Split EDA breaks long electrodermal activity recordings into acquisition runs\nand frames them by tagged experiment conditions such as (HMD, slope, 2).")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the large-gap threshold in standard deviations
    #[arg(long, global = true)]
    pub gap_sigma: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the gap-free chunks of a raw recording
    Segment {
        /// Raw recording CSV (timestamp_micros,value)
        raw: PathBuf,
    },

    /// List experiment runs discovered below a directory
    Tags {
        /// Post-processing directory holding one run file per trial
        runs: PathBuf,
        /// Only show runs matching this pattern, e.g. "HMD,f*,*"
        #[arg(short, long)]
        pattern: Option<String>,
    },

    /// Compute labeled intervals and shaded regions for a plot
    Bounds {
        /// Raw recording CSV (timestamp_micros,value)
        raw: PathBuf,
        /// Post-processing directory holding one run file per trial
        runs: PathBuf,
        /// Narrow to runs matching this pattern before labeling
        #[arg(short, long)]
        within: Option<String>,
        /// Labeled group in LABEL=PATTERN form, e.g. "Slope=*,s*,*"
        #[arg(short, long = "group", required = true)]
        groups: Vec<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct ChunkRow {
    index: usize,
    start: i64,
    end: i64,
    #[serde(flatten)]
    summary: ChunkSummary,
}

#[derive(Serialize)]
struct RunRow<'a> {
    tag: &'a Tag,
    bounds: TimeBounds,
}

#[derive(Serialize)]
struct BoundsReport {
    window: TimeBounds,
    intervals: Vec<LabeledInterval>,
    shaded: Vec<TimeBounds>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Config problems surface on stderr before the configured subscriber exists
    let config = tracing::subscriber::with_default(bootstrap_subscriber(std::io::stderr), || {
        load_config(&cli)
    })?;

    init_logging(&config.logging)?;
    tracing::debug!(
        gap_sigma = config.segmentation.gap_sigma,
        run_file = %config.discovery.run_file_name,
        tag_depth = config.discovery.tag_depth,
        "Configuration ready"
    );

    match cli.command {
        Commands::Segment { raw } => {
            let samples = read_raw(&raw, &config)?;
            let segmenter = GapSegmenter::from_config(&config.segmentation)?;
            let stats = segmenter.gap_stats(&samples)?;
            let view = SegmentView::process(
                samples,
                TagIndex::new(config.discovery.tag_depth),
                &segmenter,
                &SummaryAnalyzer,
            )?;

            let rows: Vec<ChunkRow> = view
                .chunk_results()
                .enumerate()
                .map(|(index, (chunk, summary))| ChunkRow {
                    index,
                    start: chunk.bounds().start(),
                    end: chunk.bounds().end(),
                    summary: *summary,
                })
                .collect();

            match cli.format {
                OutputFormat::Json => print_json(&rows)?,
                OutputFormat::Table => {
                    println!(
                        "Gap threshold: {:.0} us (mean {:.1} us + {} x std dev {:.1} us)",
                        stats.threshold,
                        stats.mean,
                        segmenter.sigma(),
                        stats.std_dev
                    );
                    println!(
                        "{:>5}  {:<26} {:<26} {:>9} {:>10} {:>10}",
                        "chunk", "start", "end", "samples", "rate_hz", "mean"
                    );
                    for row in &rows {
                        println!(
                            "{:>5}  {:<26} {:<26} {:>9} {:>10.3} {:>10.4}",
                            row.index,
                            format_micros(row.start),
                            format_micros(row.end),
                            row.summary.samples,
                            row.summary.sampling_rate_hz,
                            row.summary.mean
                        );
                    }
                }
            }
        }

        Commands::Tags { runs, pattern } => {
            let mut index = discover_runs(&runs, &config.discovery)?;
            if let Some(pattern) = pattern {
                let pattern: Pattern = pattern.parse()?;
                index = index.filter(&pattern)?;
            }

            let rows: Vec<RunRow> = index
                .entry_bounds()?
                .into_iter()
                .map(|(tag, bounds)| RunRow { tag, bounds })
                .collect();

            match cli.format {
                OutputFormat::Json => print_json(&rows)?,
                OutputFormat::Table => {
                    for row in &rows {
                        println!(
                            "{:<32} {:<26} {:<26} {:>8.1}s",
                            row.tag.to_string(),
                            format_micros(row.bounds.start()),
                            format_micros(row.bounds.end()),
                            row.bounds.duration_secs()
                        );
                    }
                    println!("{} runs", rows.len());
                }
            }
        }

        Commands::Bounds {
            raw,
            runs,
            within,
            groups,
        } => {
            let groups = groups
                .iter()
                .map(|g| parse_group(g))
                .collect::<anyhow::Result<Vec<_>>>()?;

            let samples = read_raw(&raw, &config)?;
            let index = discover_runs(&runs, &config.discovery)?;
            let mut view = SegmentView::process(
                samples,
                index,
                &GapSegmenter::from_config(&config.segmentation)?,
                &SummaryAnalyzer,
            )?;
            if let Some(within) = within {
                view = view.narrow(&within.parse()?)?;
            }

            let window = view.raw_bounds()?;
            let intervals = label_groups(&view, groups)?;
            let report = BoundsReport {
                window,
                shaded: shaded_regions(window, &intervals),
                intervals,
            };

            match cli.format {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Table => print_bounds_report(&report),
            }
        }

        Commands::Config { output } => {
            let content = config::generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default(),
    };
    if let Some(sigma) = cli.gap_sigma {
        config.segmentation.gap_sigma = sigma;
    }
    Ok(config)
}

/// Warnings-only stderr subscriber used while the config is being loaded
fn bootstrap_subscriber<W>(writer: W) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .without_time()
        .finish()
}

fn init_logging(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("split_eda={}", logging.level)));

    let layer = match (&logging.file, logging.format.as_str()) {
        (Some(file), format) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .with_context(|| format!("opening log file {}", file))?;
            let writer = std::sync::Mutex::new(file);
            if format == "json" {
                tracing_subscriber::fmt::layer().json().with_writer(writer).boxed()
            } else {
                tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer).boxed()
            }
        }
        (None, "json") => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
        (None, _) => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry().with(layer).with(filter).init();
    Ok(())
}

fn read_raw(path: &Path, config: &Config) -> anyhow::Result<Vec<Sample>> {
    let result = RawCsvReader::new()
        .with_header(config.discovery.has_header)
        .read(path)
        .with_context(|| format!("reading recording {}", path.display()))?;

    for error in &result.errors {
        tracing::warn!("{}: {}", path.display(), error);
    }
    if result.samples.len() < 2 {
        bail!(
            "{} holds {} readable samples, need at least 2",
            path.display(),
            result.samples.len()
        );
    }

    Ok(result.samples)
}

/// Parse "LABEL=PATTERN"
fn parse_group(raw: &str) -> anyhow::Result<(String, Pattern)> {
    let (label, pattern) = raw
        .split_once('=')
        .with_context(|| format!("group {:?} is not in LABEL=PATTERN form", raw))?;
    let pattern = pattern
        .parse::<Pattern>()
        .with_context(|| format!("invalid pattern in group {:?}", raw))?;
    Ok((label.trim().to_string(), pattern))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_bounds_report(report: &BoundsReport) {
    let origin = report.window.start();
    println!(
        "Window: {} .. {} ({:.1}s)",
        format_micros(report.window.start()),
        format_micros(report.window.end()),
        report.window.duration_secs()
    );

    println!("\nLabeled intervals:");
    for interval in &report.intervals {
        println!(
            "  {:<16} {:>10.1}s .. {:>10.1}s  ({} .. {})",
            interval.label,
            offset_secs(interval.bounds.start(), origin),
            offset_secs(interval.bounds.end(), origin),
            format_micros(interval.bounds.start()),
            format_micros(interval.bounds.end())
        );
    }

    println!("\nShaded regions:");
    for region in &report.shaded {
        println!(
            "  {:>10.1}s .. {:>10.1}s",
            offset_secs(region.start(), origin),
            offset_secs(region.end(), origin)
        );
    }
}

fn format_micros(micros: i64) -> String {
    DateTime::<Utc>::from_timestamp_micros(micros)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| micros.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_broken_config_warning_reaches_bootstrap_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("split-eda.toml");
        std::fs::write(&path, "[segmentation\ngap_sigma = ").unwrap();

        let captured = Captured::default();
        let writer = captured.clone();
        let config = tracing::subscriber::with_default(
            bootstrap_subscriber(move || writer.clone()),
            || Config::load_first(&[path.as_path()]),
        );

        assert_eq!(config.segmentation.gap_sigma, DEFAULT_GAP_SIGMA);
        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Failed to load config"), "got: {output}");
    }

    #[test]
    fn test_cli_gap_sigma_overrides_config() {
        let cli = Cli::parse_from(["split-eda", "--gap-sigma", "1.5", "config"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.segmentation.gap_sigma, 1.5);

        let cli = Cli::parse_from(["split-eda", "--gap-sigma", "NaN", "config"]);
        let config = load_config(&cli).unwrap();
        assert!(GapSegmenter::from_config(&config.segmentation).is_err());
    }
}

//! CAP CLI
//!
//! ```bash
//! cap classify sequence.json                 # JSON result on stdout
//! cap classify sequence.json --format summary
//! cap circular sequence.json
//! cap describe rotated_90_ccw_swapped
//! cap config --write                         # save defaults to ~/.config/cap/engine.yaml
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=cap_engine=debug` to trace decisions.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cap_config::EngineConfig;
use cap_core::{normalize_sequence, RawSequence, Sequence};
use cap_engine::{
    derive_components_from_pattern, describe_pattern, extract_rotation_direction, CapDetector, TransformationLabel,
};

#[derive(Parser)]
#[command(name = "cap")]
#[command(about = "Classify circular beat sequences by their cyclic pattern")]
#[command(version)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a sequence file
    Classify {
        /// Sequence JSON file
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Engine config (YAML or JSON); defaults to ~/.config/cap/engine.yaml
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Check whether a sequence returns to its start
    Circular {
        /// Sequence JSON file
        file: PathBuf,
    },

    /// Explain a transformation label
    Describe {
        /// Label such as `mirrored_swapped`
        label: String,
    },

    /// Show the effective engine config
    Config {
        /// Engine config to read instead of the default location
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Save it to the default location
        #[arg(long)]
        write: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Summary,
}

/// Used when `RUST_LOG` is unset; `cap` is this binary's own target
const DEFAULT_LOG_FILTER: &str = "cap_engine=info,cap=info";

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    match cli.command {
        Commands::Classify { file, format, config } => cmd_classify(&file, format, config.as_deref()),
        Commands::Circular { file } => cmd_circular(&file),
        Commands::Describe { label } => cmd_describe(&label),
        Commands::Config { config, write } => cmd_config(config.as_deref(), write),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::load_or_default().context("loading default config")?,
    };
    Ok(config)
}

fn read_sequence(path: &Path) -> Result<Sequence> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let raw = RawSequence::from_json(&content).with_context(|| format!("parsing {}", path.display()))?;
    let sequence = normalize_sequence(&raw).with_context(|| format!("normalizing {}", path.display()))?;
    tracing::debug!(beats = sequence.len(), file = %path.display(), "loaded sequence");
    Ok(sequence)
}

fn cmd_classify(file: &Path, format: OutputFormat, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let sequence = read_sequence(file)?;
    let detector = CapDetector::new(config);
    tracing::debug!(config = ?detector.config(), beats = sequence.len(), "classifying");
    let result = detector.detect(&sequence);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Summary => println!("{}", result.summary()),
    }
    Ok(())
}

fn cmd_circular(file: &Path) -> Result<()> {
    let sequence = read_sequence(file)?;
    let circular = cap_engine::is_circular(&sequence);
    println!("{}", circular);
    if !circular {
        tracing::info!(file = %file.display(), "sequence does not return to its start");
    }
    Ok(())
}

fn cmd_describe(label: &str) -> Result<()> {
    let components: Vec<&str> = derive_components_from_pattern(label).iter().map(|c| c.as_str()).collect();

    println!("Label:       {}", label);
    println!("Description: {}", describe_pattern(label));
    println!(
        "Components:  {}",
        if components.is_empty() { "(none)".to_string() } else { components.join(", ") }
    );
    if let Some(direction) = extract_rotation_direction(label) {
        println!("Direction:   {}", direction);
    }
    match label.parse::<TransformationLabel>() {
        Ok(parsed) => println!("Vocabulary:  yes (base {})", parsed.base()),
        Err(e) => println!("Vocabulary:  no ({})", e),
    }
    Ok(())
}

fn cmd_config(config: Option<&Path>, write: bool) -> Result<()> {
    let config = load_config(config)?;
    print!("{}", serde_yaml::to_string(&config)?);

    if write {
        let path = EngineConfig::default_path();
        config
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "saved engine config");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_covers_own_target() {
        let target = module_path!().split("::").next().unwrap_or_default();
        assert_eq!(target, "cap");
        assert!(DEFAULT_LOG_FILTER.split(',').any(|d| d == format!("{target}=info")));
        assert!(DEFAULT_LOG_FILTER.split(',').any(|d| d == "cap_engine=info"));
    }
}

mod loader;

use clap::Parser;
use refmatch::{
    EngineConfig, RecognitionEngine, RefMatchError, ReferenceIndex, SharedIndex, TracingSink,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

/// Environment override for the default threshold.
const THRESHOLD_ENV: &str = "DEFAULT_SIMILARITY_THRESHOLD";

#[derive(Parser, Debug)]
#[command(author, version, about = "Reference image matcher (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct EngineConfigJson {
    default_threshold: f32,
    max_dimension: usize,
    max_features: usize,
    fast_threshold: u8,
    pyramid_levels: usize,
    scale_factor: f32,
    parallel: bool,
}

impl Default for EngineConfigJson {
    fn default() -> Self {
        let cfg = EngineConfig::default();
        Self {
            default_threshold: cfg.default_threshold,
            max_dimension: cfg.max_dimension,
            max_features: cfg.max_features,
            fast_threshold: cfg.fast_threshold,
            pyramid_levels: cfg.pyramid_levels,
            scale_factor: cfg.scale_factor,
            parallel: cfg.parallel,
        }
    }
}

impl From<EngineConfigJson> for EngineConfig {
    fn from(value: EngineConfigJson) -> Self {
        Self {
            default_threshold: value.default_threshold,
            max_dimension: value.max_dimension,
            max_features: value.max_features,
            fast_threshold: value.fast_threshold,
            pyramid_levels: value.pyramid_levels,
            scale_factor: value.scale_factor,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    references_dir: Option<String>,
    queries: Vec<String>,
    threshold: Option<f32>,
    output_path: Option<String>,
    engine: EngineConfigJson,
}

#[derive(Debug, Serialize)]
struct QueryRecord {
    path: String,
    is_match: bool,
    similarity_score: f32,
    processing_ms: f64,
    error_message: Option<String>,
}

#[derive(Debug, Serialize)]
struct Output {
    references: usize,
    generation: u64,
    threshold: Option<f32>,
    results: Vec<QueryRecord>,
}

/// Applies the environment threshold override, clamped into `[0, 1]`.
///
/// Unparsable values leave the configured default untouched.
fn apply_env_threshold(cfg: &mut EngineConfig, raw: Option<String>) {
    let Some(raw) = raw else {
        return;
    };
    match raw.trim().parse::<f32>() {
        Ok(value) if !value.is_nan() => cfg.default_threshold = value.clamp(0.0, 1.0),
        _ => tracing::warn!(value = %raw, "ignoring unparsable {THRESHOLD_ENV}"),
    }
}

fn load_index(
    engine: &RecognitionEngine,
    dir: Option<&str>,
) -> Result<ReferenceIndex, Box<dyn std::error::Error>> {
    let Some(dir) = dir else {
        tracing::warn!("references_dir not set; running with no references");
        return Ok(ReferenceIndex::default());
    };
    let images = loader::load_reference_dir(Path::new(dir))?;
    tracing::info!(count = images.len(), dir, "loaded reference images");
    Ok(engine.build_index(images)?)
}

fn recognize_path(
    engine: &RecognitionEngine,
    shared: &SharedIndex,
    path: &str,
    threshold: Option<f32>,
) -> QueryRecord {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            return QueryRecord {
                path: path.to_string(),
                is_match: false,
                similarity_score: 0.0,
                processing_ms: 0.0,
                error_message: Some(format!("read failed: {err}")),
            }
        }
    };
    match engine.recognize_shared(&bytes, shared, threshold) {
        Ok(result) => QueryRecord {
            path: path.to_string(),
            is_match: result.is_match,
            similarity_score: result.similarity_score,
            processing_ms: result.processing_time.as_secs_f64() * 1000.0,
            error_message: result.error_message,
        },
        Err(err @ RefMatchError::InvalidThreshold { .. }) => QueryRecord {
            path: path.to_string(),
            is_match: false,
            similarity_score: 0.0,
            processing_ms: 0.0,
            error_message: Some(format!("invalid argument: {err}")),
        },
        Err(err) => QueryRecord {
            path: path.to_string(),
            is_match: false,
            similarity_score: 0.0,
            processing_ms: 0.0,
            error_message: Some(err.to_string()),
        },
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("refmatch=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.queries.is_empty() {
        return Err("queries must list at least one image path".into());
    }

    let mut engine_cfg = EngineConfig::from(config.engine);
    apply_env_threshold(&mut engine_cfg, std::env::var(THRESHOLD_ENV).ok());
    let engine = RecognitionEngine::new(engine_cfg)?.with_sink(Arc::new(TracingSink));

    let shared = SharedIndex::new(load_index(&engine, config.references_dir.as_deref())?);
    let snapshot = shared.snapshot();

    let results = config
        .queries
        .iter()
        .map(|path| recognize_path(&engine, &shared, path, config.threshold))
        .collect();
    let output = Output {
        references: snapshot.len(),
        generation: snapshot.generation(),
        threshold: config.threshold,
        results,
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}

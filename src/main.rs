// src/main.rs

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cluster_lib::candidate_generation::input::{load_activity_file, InputOptions};
use cluster_lib::candidate_generation::pairs::PairOrder;
use cluster_lib::pipeline::{run_pipeline, PipelineOptions, PipelineOutput};
use cluster_lib::utils::clustering_config::ClusteringConfig;
use cluster_lib::utils::env::load_env;
use cluster_lib::utils::get_memory_usage;
use cluster_lib::utils::progress_config::ProgressConfig;
use log::info;
use serde_json::json;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Delimited activity log with a header row
    input: PathBuf,

    /// Link count at which two clusters merge
    #[arg(long)]
    merge_threshold: Option<u64>,

    /// Minimum shared records for a pair to be clustered
    #[arg(long)]
    min_shared_records: Option<usize>,

    /// Addresses need more than this many records
    #[arg(long)]
    min_address_records: Option<usize>,

    /// Records need more than this many addresses
    #[arg(long)]
    min_record_addresses: Option<usize>,

    /// Smallest cluster to report
    #[arg(long)]
    min_cluster_size: Option<usize>,

    /// Pair order: address or shared-desc
    #[arg(long)]
    pair_order: Option<PairOrder>,

    #[arg(long, default_value = "IP")]
    address_column: String,

    #[arg(long, default_value = "Record")]
    record_column: String,

    #[arg(long, default_value_t = ',')]
    delimiter: char,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Check partition and link invariants after clustering
    #[arg(long)]
    verify: bool,
}

impl Args {
    fn apply_overrides(&self, config: &mut ClusteringConfig) {
        if let Some(v) = self.merge_threshold {
            config.merge_threshold = v;
        }
        if let Some(v) = self.min_shared_records {
            config.min_shared_records = v;
        }
        if let Some(v) = self.min_address_records {
            config.min_address_records = v;
        }
        if let Some(v) = self.min_record_addresses {
            config.min_record_addresses = v;
        }
        if let Some(v) = self.min_cluster_size {
            config.min_cluster_size = v;
        }
        if let Some(v) = self.pair_order {
            config.pair_order = v;
        }
    }
}

fn write_report(output: &PipelineOutput, format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for cluster in &output.clusters {
                writeln!(out, "\n\n{}", cluster)?;
            }
        }
        OutputFormat::Json => {
            let body = json!({
                "stats": output.stats,
                "clusters": output.clusters,
            });
            serde_json::to_writer_pretty(&mut *out, &body)
                .context("Failed to serialize cluster report")?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    info!("Starting address co-occurrence clustering");
    load_env();

    let args = Args::parse();
    let mut config = ClusteringConfig::from_env();
    args.apply_overrides(&mut config);
    config.log_config();

    let progress_config = ProgressConfig::from_env();
    info!(
        "Progress tracking: enabled={}, detailed={}",
        progress_config.enabled, progress_config.detailed
    );
    let multi_progress = progress_config.create_multi_progress();
    let stage_progress = if progress_config.should_show_detailed() {
        multi_progress.as_ref()
    } else {
        None
    };

    let start = Instant::now();
    info!("Creating sets...");
    let input_options = InputOptions {
        address_column: args.address_column.clone(),
        record_column: args.record_column.clone(),
        delimiter: args.delimiter,
    };
    let (index, input_stats) = load_activity_file(&args.input, &input_options)?;
    if progress_config.should_show_memory() {
        info!("Memory after indexing: {} MB", get_memory_usage());
    }

    let output = run_pipeline(
        &index,
        input_stats,
        &config,
        PipelineOptions { verify: args.verify },
        stage_progress,
    )
    .context("Clustering pipeline failed")?;
    if progress_config.should_show_memory() {
        info!("Memory after clustering: {} MB", get_memory_usage());
    }

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_report(&output, args.format, &mut BufWriter::new(file))?;
            info!("Wrote report to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            write_report(&output, args.format, &mut stdout.lock())?;
        }
    }

    info!(
        "Run {} finished: {} clusters reported in {:.2?}",
        output.stats.run_id,
        output.stats.reported_clusters,
        start.elapsed()
    );
    Ok(())
}

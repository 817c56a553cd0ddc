use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use block_packer_core::config::{LayoutStrategy, PackerConfig};
use block_packer_core::{BlockInput, Layout, pack_layout, to_json_hash, to_json_tree};
use clap::{ArgAction, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Items read from JSON keep any `payload` value as-is.
type Item = BlockInput<serde_json::Value>;

#[derive(Parser, Debug)]
#[command(
    name = "block-packer",
    about = "Lay out weighted item trees as nested rectangles",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack an item tree and write the layout as JSON
    Pack(PackArgs),
    /// Pack an item tree and print layout statistics only
    Stats(PackArgs),
    /// Simple timing bench (packs repeatedly with every strategy)
    Bench(BenchArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Input JSON file (array of items), or `-` for stdin
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output file (defaults to stdout)
    #[arg(short, long, help_heading = "Input/Output")]
    out: Option<PathBuf>,
    /// YAML config file path (overrides canvas/layout options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,

    // Layout
    /// Canvas width
    #[arg(long, default_value_t = 1024.0, help_heading = "Layout")]
    width: f64,
    /// Canvas height
    #[arg(long, default_value_t = 768.0, help_heading = "Layout")]
    height: f64,
    /// Strategy: slice | squarify
    #[arg(long, default_value = "slice", help_heading = "Layout")]
    strategy: String,
    /// Weight parents by the sum of their sub-tree instead of their own total
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    sum_subtree_totals: bool,

    // Export
    /// Output format: json-tree | json (alias) | json-hash
    #[arg(long, default_value = "json-tree", help_heading = "Export")]
    format: String,
    /// Export layout stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Input JSON file (array of items), or `-` for stdin
    input: PathBuf,
    /// Canvas width
    #[arg(long, default_value_t = 1024.0)]
    width: f64,
    /// Canvas height
    #[arg(long, default_value_t = 768.0)]
    height: f64,
    /// Packs per strategy
    #[arg(long, default_value_t = 100)]
    iterations: u32,
}

/// Canvas plus packer options, as merged from flags and the YAML file.
#[derive(Debug, Clone, Serialize)]
struct RunConfig {
    width: f64,
    height: f64,
    #[serde(flatten)]
    packer: PackerConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args),
        Commands::Stats(args) => run_stats(args),
        Commands::Bench(b) => run_bench(b),
    }
}

fn run_pack(args: &PackArgs) -> anyhow::Result<()> {
    let run = resolve_config(args)?;
    if args.print_config {
        match args.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&run)?),
            _ => println!("{}", serde_json::to_string_pretty(&run)?),
        }
        return Ok(());
    }

    let layout = load_and_pack(&args.input, &run)?;
    log_stats(&layout);

    let value = match args.format.as_str() {
        "json-tree" | "json" => to_json_tree(&layout)?,
        "json-hash" => to_json_hash(&layout)?,
        other => anyhow::bail!("unknown output format: {}", other),
    };
    let json = serde_json::to_string_pretty(&value)?;
    match &args.out {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
            info!(?path, blocks = layout.blocks.len(), "layout written");
        }
        None => println!("{}", json),
    }

    if let Some(stats_path) = &args.export_stats {
        let stats = layout.stats();
        fs::write(stats_path, serde_json::to_string_pretty(&stats)?)
            .with_context(|| format!("write {}", stats_path.display()))?;
    }
    Ok(())
}

fn run_stats(args: &PackArgs) -> anyhow::Result<()> {
    let run = resolve_config(args)?;
    let layout = load_and_pack(&args.input, &run)?;
    let stats = layout.stats();
    println!("{}", stats.summary());
    for block in &layout.blocks {
        let b = &block.bounds;
        println!(
            "  {:<24} total={:<12} {:.2}x{:.2} at ({:.2}, {:.2})",
            block.name, block.total, b.width, b.height, b.x, b.y
        );
    }
    Ok(())
}

fn run_bench(b: &BenchArgs) -> anyhow::Result<()> {
    let items = load_items(&b.input)?;
    let iterations = b.iterations.max(1);
    for strategy in [LayoutStrategy::SliceAndDice, LayoutStrategy::Squarify] {
        let cfg = PackerConfig::builder().strategy(strategy).build();
        let start = Instant::now();
        let mut last = None;
        for _ in 0..iterations {
            last = Some(pack_layout(b.width, b.height, &items, &cfg)?);
        }
        let elapsed = start.elapsed();
        let blocks = last.map(|l| l.stats().num_blocks).unwrap_or(0);
        println!(
            "{:<16} blocks={:<8} total={:<10} per_pack={}",
            strategy.to_string(),
            blocks,
            fmt_dur(elapsed),
            fmt_dur(elapsed / iterations)
        );
    }
    Ok(())
}

fn resolve_config(args: &PackArgs) -> anyhow::Result<RunConfig> {
    let strategy: LayoutStrategy = args
        .strategy
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown strategy: {}", args.strategy))?;
    let run = RunConfig {
        width: args.width,
        height: args.height,
        packer: PackerConfig::builder()
            .strategy(strategy)
            .sum_subtree_totals(args.sum_subtree_totals)
            .build(),
    };

    // Config file sets options en bloc, on top of the flags.
    match &args.config {
        Some(path) => {
            let file = fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            let y: YamlConfig = serde_yaml::from_str(&file)
                .with_context(|| format!("parse config {}", path.display()))?;
            y.apply(run)
        }
        None => Ok(run),
    }
}

fn load_and_pack(input: &Path, run: &RunConfig) -> anyhow::Result<Layout<serde_json::Value>> {
    let items = load_items(input)?;
    info!(count = items.len(), "loaded top-level items");
    debug!(?run, "packing");
    pack_layout(run.width, run.height, &items, &run.packer)
        .with_context(|| format!("pack {}", input.display()))
}

fn load_items(input: &Path) -> anyhow::Result<Vec<Item>> {
    let text = if input == Path::new("-") {
        let mut s = String::new();
        std::io::stdin()
            .read_to_string(&mut s)
            .context("read items from stdin")?;
        s
    } else {
        fs::read_to_string(input).with_context(|| format!("read {}", input.display()))?
    };
    serde_json::from_str(&text).with_context(|| format!("parse items from {}", input.display()))
}

fn log_stats(layout: &Layout<serde_json::Value>) {
    let stats = layout.stats();
    info!(
        blocks = stats.num_blocks,
        leaves = stats.num_leaves,
        pending_breakdowns = stats.pending_breakdowns,
        depth = stats.max_depth,
        coverage = format!("{:.2}%", stats.coverage * 100.0),
        "stats"
    );
}

fn fmt_dur(d: Duration) -> String {
    let us = d.as_micros();
    if us >= 1_000_000 {
        format!("{:.2}s", d.as_secs_f64())
    } else if us >= 1_000 {
        format!("{:.2}ms", us as f64 / 1000.0)
    } else {
        format!("{}us", us)
    }
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    width: Option<f64>,
    height: Option<f64>,
    strategy: Option<String>,
    sum_subtree_totals: Option<bool>,
}

impl YamlConfig {
    fn apply(self, mut run: RunConfig) -> anyhow::Result<RunConfig> {
        if let Some(v) = self.width {
            run.width = v;
        }
        if let Some(v) = self.height {
            run.height = v;
        }
        if let Some(s) = self.strategy {
            run.packer.strategy = s
                .parse()
                .map_err(|_| anyhow::anyhow!("unknown strategy in config: {}", s))?;
        }
        if let Some(v) = self.sum_subtree_totals {
            run.packer.sum_subtree_totals = v;
        }
        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> PackArgs {
        PackArgs::parse_from(["pack", "items.json", "--width", "10", "--height", "6"])
    }

    #[test]
    fn flags_build_config() {
        let mut a = args();
        a.strategy = "squarify".into();
        a.sum_subtree_totals = true;
        let run = resolve_config(&a).expect("config");
        assert_eq!(run.width, 10.0);
        assert_eq!(run.height, 6.0);
        assert_eq!(run.packer.strategy, LayoutStrategy::Squarify);
        assert!(run.packer.sum_subtree_totals);
    }

    #[test]
    fn unknown_strategy_is_an_error() {
        let mut a = args();
        a.strategy = "spiral".into();
        assert!(resolve_config(&a).is_err());
    }

    #[test]
    fn yaml_overrides_flags() {
        let y: YamlConfig =
            serde_yaml::from_str("strategy: squarify\nwidth: 300\n").expect("yaml");
        let run = y.apply(resolve_config(&args()).expect("config")).expect("apply");
        assert_eq!(run.width, 300.0);
        assert_eq!(run.height, 6.0);
        assert_eq!(run.packer.strategy, LayoutStrategy::Squarify);
        assert!(!run.packer.sum_subtree_totals);
    }

    #[test]
    fn merged_config_serializes_flat() {
        let run = resolve_config(&args()).expect("config");
        let value = serde_json::to_value(&run).expect("json");
        assert_eq!(value["width"], 10.0);
        assert_eq!(value["strategy"], "slice_and_dice");
        assert_eq!(value["sum_subtree_totals"], false);
    }
}

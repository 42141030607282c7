use anyhow::{bail, Context, Result};
use clap::Parser;
use smart_inventory::alerts::{self, Severity};
use smart_inventory::config::Config;
use smart_inventory::util::report;
use smart_inventory::{collect_drives, AttributeCatalog, DriveCollection, FailurePolicy, SnapshotProvider};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "smartinv", about = "Drive inventory and SMART attribute report", version)]
struct Cli {
    /// JSON snapshot of provider rows (drives, letters, SMART buffers)
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Attribute catalog (TOML) to use instead of the bundled table
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Print the drive collection as JSON instead of the text report
    #[arg(long, conflicts_with = "check")]
    json: bool,

    /// One-shot health check: exit 0=OK, 1=WARNING, 2=CRITICAL (nagios/cron compatible)
    #[arg(long)]
    check: bool,

    /// Stop at the first drive whose readings cannot be fetched
    #[arg(long)]
    strict: bool,

    /// Log decoder diagnostics to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Print config file path and current values, then exit
    #[arg(long)]
    config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = Config::load();
    if cli.config {
        return run_print_config(&cfg);
    }

    let drives = collect(&cli, &cfg)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&drives)?);
        return Ok(());
    }
    if cli.check {
        return run_check(&drives, &cfg);
    }

    let active = alerts::evaluate(&drives, &cfg.alerts);
    print!("{}", report::generate(&drives, &active));
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn collect(cli: &Cli, cfg: &Config) -> Result<DriveCollection> {
    let catalog = match cli.catalog.as_ref().or(cfg.general.catalog_path.as_ref()) {
        Some(path) => AttributeCatalog::from_file(path),
        None       => AttributeCatalog::bundled(),
    }
    .context("loading attribute catalog")?;

    let snapshot = match cli.snapshot.as_ref().or(cfg.general.snapshot_path.as_ref()) {
        Some(p) => p,
        None    => bail!("no drive source: pass --snapshot or set general.snapshot_path"),
    };
    let provider = SnapshotProvider::from_file(snapshot)
        .with_context(|| format!("reading snapshot {}", snapshot.display()))?;

    let policy = if cli.strict || cfg.general.strict {
        FailurePolicy::Strict
    } else {
        FailurePolicy::Isolate
    };
    let drives = collect_drives(&provider, &catalog, policy)?;
    Ok(drives)
}

fn run_check(drives: &DriveCollection, cfg: &Config) -> Result<()> {
    let active = alerts::evaluate(drives, &cfg.alerts);
    let has_crit = active.iter().any(|a| a.severity == Severity::Critical);
    let has_warn = active.iter().any(|a| a.severity == Severity::Warning);

    if !has_crit && !has_warn {
        println!("OK — {} drive(s), no alerts", drives.len());
        std::process::exit(0);
    }

    for a in active.iter().filter(|a| a.severity >= Severity::Warning) {
        println!("[{}] {}{}", a.severity.label(), a.prefix(), a.message);
    }

    std::process::exit(if has_crit { 2 } else { 1 });
}

fn run_print_config(cfg: &Config) -> Result<()> {
    let path = Config::config_path()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    let show = |p: &Option<PathBuf>| {
        p.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "(not set)".to_string())
    };

    println!("Config: {}", path);
    println!();
    println!("[general]");
    println!("  catalog_path  = {}", show(&cfg.general.catalog_path));
    println!("  snapshot_path = {}", show(&cfg.general.snapshot_path));
    println!("  strict        = {}", cfg.general.strict);
    println!();
    println!("[alerts]");
    println!("  threshold_margin      = {}", cfg.alerts.threshold_margin);
    println!("  report_unknown_status = {}", cfg.alerts.report_unknown_status);
    Ok(())
}

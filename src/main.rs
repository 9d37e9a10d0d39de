//! Command-line MBO → MBP replay tool.
//!
//! Reads an MBO event CSV, reconstructs the book, and writes the MBP(10)
//! snapshot rows to an output CSV.
//!
//! Usage:
//!     mbp_reconstruct <mbo_input.csv> [options]
//!
//! Options:
//!     -o, --output <FILE>     Output CSV path (default: mbp_output.csv)
//!         --depth <N>         Snapshot depth per side (default: 10)
//!         --skip-invalid      Skip malformed input records instead of failing
//!         --warnings <FILE>   Export recorded warnings as JSON lines
//!     -v, --verbose           Debug-level logging
//!     -h, --help              Show this help

use std::env;
use std::process;
use std::time::Instant;

use mbp_reconstructor::{
    write_mbp_csv, BookEngine, CsvLoader, EngineConfig, Result, DEPTH_LEVELS,
};

struct Args {
    input: String,
    output: String,
    depth: usize,
    skip_invalid: bool,
    warnings_path: Option<String>,
    verbose: bool,
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} <mbo_input.csv> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <FILE>     Output CSV path (default: mbp_output.csv)");
    eprintln!("      --depth <N>         Snapshot depth per side (default: {DEPTH_LEVELS})");
    eprintln!("      --skip-invalid      Skip malformed input records instead of failing");
    eprintln!("      --warnings <FILE>   Export recorded warnings as JSON lines");
    eprintln!("  -v, --verbose           Debug-level logging");
    eprintln!("  -h, --help              Show this help");
}

fn parse_args() -> std::result::Result<Args, String> {
    let mut argv = env::args();
    let program = argv.next().unwrap_or_else(|| "mbp_reconstruct".into());

    let mut input = None;
    let mut output = "mbp_output.csv".to_string();
    let mut depth = DEPTH_LEVELS;
    let mut skip_invalid = false;
    let mut warnings_path = None;
    let mut verbose = false;

    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage(&program);
                process::exit(0);
            }
            "-o" | "--output" => {
                output = argv.next().ok_or("--output requires a value")?;
            }
            "--depth" => {
                let raw = argv.next().ok_or("--depth requires a value")?;
                depth = raw
                    .parse()
                    .map_err(|_| format!("invalid depth: {raw:?}"))?;
            }
            "--skip-invalid" => skip_invalid = true,
            "--warnings" => {
                warnings_path = Some(argv.next().ok_or("--warnings requires a value")?);
            }
            "-v" | "--verbose" => verbose = true,
            other if other.starts_with('-') => {
                return Err(format!("unknown option: {other}"));
            }
            other => {
                if input.replace(other.to_string()).is_some() {
                    return Err("multiple input files given".into());
                }
            }
        }
    }

    let input = input.ok_or_else(|| {
        print_usage(&program);
        "missing input file".to_string()
    })?;

    Ok(Args {
        input,
        output,
        depth,
        skip_invalid,
        warnings_path,
        verbose,
    })
}

fn run(args: &Args) -> Result<()> {
    let start = Instant::now();

    let loader = CsvLoader::new(&args.input)?.skip_invalid(args.skip_invalid);
    let mut engine = BookEngine::with_config(EngineConfig::new(args.depth));

    let mut iter = loader.iter_events()?;
    for event in iter.by_ref() {
        engine.process_event(&event?)?;
    }
    let loaded = iter.stats().clone();

    write_mbp_csv(&args.output, engine.rows())?;

    if let Some(path) = &args.warnings_path {
        engine.warnings().export_to_file(path)?;
        log::info!("Warnings exported to {path}");
    }

    let stats = engine.stats();
    let elapsed = start.elapsed();
    println!(
        "Processed {} events in {:.3}s ({:.0} events/s)",
        stats.events_processed,
        elapsed.as_secs_f64(),
        stats.events_processed as f64 / elapsed.as_secs_f64().max(1e-9),
    );
    println!(
        "Snapshots: {} ({} rows) -> {}",
        stats.snapshots_emitted, stats.rows_emitted, args.output
    );
    println!(
        "Book at end of replay: {} orders, {} bid levels, {} ask levels",
        stats.active_orders, stats.bid_levels, stats.ask_levels
    );
    if loaded.records_skipped > 0 {
        println!("Input records skipped: {}", loaded.records_skipped);
    }
    if !engine.warnings().is_empty() {
        let summary = engine.warnings().summary();
        println!("Warnings: {}", summary.total);
        for (category, count) in &summary.by_category {
            println!("  {category}: {count}");
        }
    }

    Ok(())
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("Error: {msg}");
            process::exit(2);
        }
    };

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

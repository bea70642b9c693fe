//! otodb CLI — UTAU voicebank to singing-database conversion.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use otodb_core::config::ConvertConfig;
use otodb_core::lists::write_lists;
use otodb_core::place::place_files;

// ─── Top-level CLI ───────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "otodb",
    about = "Convert UTAU voicebank timing into singing-synthesis training data",
    version,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert an oto.ini into scores, labels, and copied audio
    Convert(ConvertArgs),
    /// Mirror converted files into per-model training folders
    Place(PlaceArgs),
    /// Write train/eval/dev split lists
    Lists(ListsArgs),
}

// ─── Shared arguments (embedded in each subcommand) ──────────────

#[derive(Parser, Debug)]
struct SharedArgs {
    /// Database directory
    #[arg(long, default_value = "./otodb-output")]
    out_dir: PathBuf,

    /// Show verbose output
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

// ─── Convert ─────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Convert one voicebank pitch folder into training data")]
struct ConvertArgs {
    /// oto.ini file, or the voicebank pitch folder containing one
    oto_ini: PathBuf,

    #[command(flatten)]
    shared: SharedArgs,

    /// Alias-to-phoneme table file
    #[arg(long)]
    table: PathBuf,

    /// Recording tempo in BPM
    #[arg(long)]
    tempo: f64,

    /// Recording pitch like "C4" (default: inferred from the folder name)
    #[arg(long)]
    pitch: Option<String>,

    /// Recording alternates up and down a semitone note to note
    #[arg(long, default_value_t = false)]
    alternating: bool,
}

// ─── Place ───────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Copy converted files into acoustic/duration/timelag folders")]
struct PlaceArgs {
    #[command(flatten)]
    shared: SharedArgs,
}

// ─── Lists ───────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Write utt/eval/dev/train_no_dev list files")]
struct ListsArgs {
    #[command(flatten)]
    shared: SharedArgs,

    /// Modular sampling interval for eval/dev membership (must be > 5)
    #[arg(long, default_value_t = 13)]
    interval: usize,
}

// ─── Main ────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    // Init logging
    let log_level = match &cli.command {
        Command::Convert(a) if a.shared.verbose => "debug",
        Command::Place(a) if a.shared.verbose => "debug",
        Command::Lists(a) if a.shared.verbose => "debug",
        _ => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Command::Convert(args) => run_convert(args),
        Command::Place(args) => run_place(args),
        Command::Lists(args) => run_lists(args),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

// ─── Convert runner ──────────────────────────────────────────────

fn run_convert(args: ConvertArgs) -> Result<()> {
    let config = ConvertConfig {
        otoini_path: args.oto_ini,
        table_path: args.table,
        out_dir: args.shared.out_dir,
        tempo: args.tempo,
        pitch: args.pitch,
        alternating_pitch: args.alternating,
    };
    let resolved = config.validate()?;
    let summary = otodb_core::pipeline::run(&resolved)?;

    println!(
        "Converted {}/{} recordings ({} reconciled)",
        summary.converted, summary.recordings, summary.reconciled
    );
    if summary.degenerate_notes > 0 {
        println!(
            "{} note(s) quantized to zero length; check the recording tempo",
            summary.degenerate_notes
        );
    }
    for failure in &summary.failures {
        println!("  {} failed ({}): {}", failure.recording, failure.stage, failure.reason);
    }
    println!("Output: {}", resolved.out_dir.display());

    Ok(())
}

// ─── Place runner ────────────────────────────────────────────────

fn run_place(args: PlaceArgs) -> Result<()> {
    place_files(&args.shared.out_dir)?;
    println!("Placed model folders under {}", args.shared.out_dir.display());
    Ok(())
}

// ─── Lists runner ────────────────────────────────────────────────

fn run_lists(args: ListsArgs) -> Result<()> {
    let lists = write_lists(&args.shared.out_dir, args.interval)?;
    println!(
        "Wrote lists: {} utt, {} eval, {} dev, {} train_no_dev",
        lists.utt.len(),
        lists.eval.len(),
        lists.dev.len(),
        lists.train_no_dev.len()
    );
    Ok(())
}

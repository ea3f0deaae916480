// Mon Oct 19 2026 - Alex

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sigscan::{
    config::Config,
    pattern::{FileReport, PatternScanner, Signature},
    utils::{self, logging},
};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Find byte signatures in binary files", long_about = None)]
struct Args {
    /// Files to scan
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Pattern text, e.g. "48 8B ? ^ 0B&0F"
    #[arg(short, long, conflicts_with = "signature")]
    pattern: Option<String>,

    /// Name of a signature from the config file
    #[arg(short, long)]
    signature: Option<String>,

    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    stride: Option<usize>,

    /// Report every match instead of the first one per file
    #[arg(short, long)]
    all: bool,

    #[arg(long)]
    json: bool,

    #[arg(long)]
    no_mmap: bool,

    #[arg(long)]
    no_progress: bool,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", "[!]".red(), e);
            std::process::exit(2);
        }
    }
}

fn run(args: Args) -> Result<bool> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    logging::init_logger(logging::level_from_verbosity(config.level_filter(), args.verbose));

    if let Some(stride) = args.stride {
        config.stride = stride;
    }
    if args.all {
        config.find_all = true;
    }
    if args.no_mmap {
        config.use_mmap = false;
    }
    config.validate()?;

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build_global()
        .ok();

    let cache = config.pattern_cache();
    let signature = match (&args.pattern, &args.signature) {
        (Some(text), _) => Signature::with_cache("pattern", text, &cache).context("invalid pattern")?,
        (None, Some(name)) => config.signature_with(name, &cache)?,
        (None, None) => bail!("either --pattern or --signature is required"),
    };

    log::info!("scanning {} for {}", utils::pluralize(args.files.len(), "file", "files"), signature);

    let scanner = PatternScanner::new()
        .with_stride(config.stride()?)
        .use_parallel(config.parallel)
        .use_mmap(config.use_mmap)
        .find_all(config.find_all);

    let start_time = Instant::now();
    let reports = {
        let _timer = utils::scoped_timer("scan");
        let progress = (!args.json && !args.no_progress && args.files.len() > 1)
            .then(|| file_progress(args.files.len()));

        let reports = scanner.scan_files_with(signature.pattern(), &args.files, |_| {
            if let Some(pb) = &progress {
                pb.inc(1);
            }
        });

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }
        reports
    };

    let found = reports.iter().any(|r| !r.hits.is_empty());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_reports(&signature, &reports);
        let hits: usize = reports.iter().map(|r| r.hits.len()).sum();
        println!(
            "{} {} in {}",
            "[+]".green(),
            utils::pluralize(hits, "match", "matches"),
            utils::format_duration(start_time.elapsed())
        );
    }

    Ok(found)
}

fn file_progress(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files") {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

fn print_reports(signature: &Signature, reports: &[FileReport]) {
    println!("{} {}", "[*]".blue(), signature.to_string().cyan());

    for report in reports {
        let name = report.path.display().to_string();

        if let Some(error) = &report.error {
            println!("  {} {}: {}", "[!]".red(), name, error);
            continue;
        }

        if report.hits.is_empty() {
            println!(
                "  {} {} ({}): not found",
                "[-]".yellow(),
                name,
                utils::format_bytes(report.size as u64)
            );
            continue;
        }

        for hit in &report.hits {
            println!("  {} {}: 0x{:x}", "[+]".green(), name.cyan(), hit.offset);
        }
    }
}

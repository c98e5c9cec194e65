mod logic;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use logic::reports::{
    TesterReport, generate_console_report, generate_json_report, generate_markdown_report,
};
use logic::{failed_records, inspect_schedule, parse_instant, resolve_seeds, run_playability_analysis};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TestMode {
    /// Scripted playthrough of every mini-game
    Playability,
    /// Unlock set and countdown at a given instant
    Schedule,
    /// Run both
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "quest-tester", version)]
#[command(about = "Headless QA for the Valentine quest - mini-game playability and unlock schedule")]
struct Args {
    /// What to check
    #[arg(long, value_enum, default_value_t = TestMode::Both)]
    mode: TestMode,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1,2,3")]
    seeds: String,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Instant to evaluate the schedule at (RFC 3339); defaults to now
    #[arg(long)]
    at: Option<String>,

    /// Evaluate the schedule with the developer override on
    #[arg(long)]
    all_unlocked: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.report == ReportFormat::Console {
        announce_banner();
    }

    let start_time = Instant::now();
    let report = build_report(&args)?;
    write_report(&args, &report, start_time)?;

    if let Some(records) = &report.playability {
        let failed: Vec<_> = failed_records(records).collect();
        if !failed.is_empty() {
            for record in &failed {
                eprintln!(
                    "❌ {} seed {} completed {} time(s)",
                    record.kind.slug().red(),
                    record.seed,
                    record.completions
                );
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

fn announce_banner() {
    println!("{}", "💖 Valentine Quest Tester".bright_magenta().bold());
    println!("{}", "=========================".magenta());
}

fn build_report(args: &Args) -> Result<TesterReport> {
    let mut report = TesterReport::default();

    if matches!(args.mode, TestMode::Playability | TestMode::Both) {
        let seeds = resolve_seeds(&args.seeds)?;
        if args.verbose {
            eprintln!("🎮 Playing {} seed(s) per mini-game", seeds.len());
        }
        report.playability = Some(run_playability_analysis(&seeds));
    }

    if matches!(args.mode, TestMode::Schedule | TestMode::Both) {
        let at = match &args.at {
            Some(raw) => parse_instant(raw)?,
            None => Utc::now(),
        };
        if args.verbose {
            eprintln!("📅 Evaluating schedule at {}", at.to_rfc3339());
        }
        report.schedule = Some(inspect_schedule(at, args.all_unlocked)?);
    }

    Ok(report)
}

fn write_report(args: &Args, report: &TesterReport, start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report {
        ReportFormat::Json => generate_json_report(output_target.writer(), report)?,
        ReportFormat::Markdown => generate_markdown_report(output_target.writer(), report)?,
        ReportFormat::Console => {
            generate_console_report(output_target.writer(), report, start_time.elapsed())?;
        }
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            mode: TestMode::Schedule,
            seeds: "1".to_string(),
            report: ReportFormat::Json,
            at: Some("2026-02-07T00:00:00+05:30".to_string()),
            all_unlocked: false,
            output: None,
            verbose: false,
        }
    }

    #[test]
    fn schedule_mode_skips_playability() {
        let report = build_report(&base_args()).unwrap();
        assert!(report.playability.is_none());
        assert_eq!(report.schedule.unwrap().unlocked_count(), 1);
    }

    #[test]
    fn bad_seeds_fail_playability_mode() {
        let args = Args {
            mode: TestMode::Playability,
            seeds: "x".to_string(),
            ..base_args()
        };
        assert!(build_report(&args).is_err());
    }

    #[test]
    fn args_parse_from_cli() {
        let args = Args::parse_from([
            "quest-tester",
            "--mode",
            "schedule",
            "--report",
            "markdown",
            "--all-unlocked",
        ]);
        assert_eq!(args.mode, TestMode::Schedule);
        assert_eq!(args.report, ReportFormat::Markdown);
        assert!(args.all_unlocked);
    }
}

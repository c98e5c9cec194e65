use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use super::{PlayabilityRecord, ScheduleReport};

/// Everything one tester run produced.
#[derive(Debug, Default, Serialize)]
pub struct TesterReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playability: Option<Vec<PlayabilityRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ScheduleReport>,
}

pub fn generate_console_report(
    out: &mut dyn Write,
    report: &TesterReport,
    total_duration: Duration,
) -> Result<()> {
    if let Some(records) = &report.playability {
        writeln!(out)?;
        writeln!(out, "{}", "📊 Playability Summary".bright_cyan().bold())?;
        writeln!(out, "{}", "======================".cyan())?;
        let passed = records.iter().filter(|r| r.passed).count();
        writeln!(out, "Total runs: {}", records.len())?;
        writeln!(out, "Passed: {}", passed.to_string().green())?;
        writeln!(out, "Failed: {}", (records.len() - passed).to_string().red())?;
        writeln!(out)?;
        for record in records {
            let status = if record.passed {
                "✅ PASS".green()
            } else {
                "❌ FAIL".red()
            };
            writeln!(
                out,
                "{} {} seed {} - {} completion(s), {} ticks, {:.1}s simulated",
                status,
                record.kind.title().bold(),
                record.seed,
                record.completions,
                record.ticks,
                Duration::from_millis(record.simulated_ms).as_secs_f32()
            )?;
        }
    }

    if let Some(schedule) = &report.schedule {
        writeln!(out)?;
        writeln!(out, "{}", "📅 Unlock Schedule".bright_yellow().bold())?;
        writeln!(out, "{}", "==================".yellow())?;
        writeln!(out, "At: {}", schedule.at.to_rfc3339())?;
        if schedule.override_all {
            writeln!(out, "{}", "Override: all levels unlocked".magenta())?;
        }
        for level in &schedule.levels {
            let mark = if level.unlocked { "🔓" } else { "🔒" };
            write!(out, "{mark} {} {}", level.id, level.name)?;
            if let Some(message) = &level.locked_message {
                write!(out, " ({message})")?;
            }
            writeln!(out)?;
        }
        if let Some(countdown) = schedule.countdown {
            writeln!(out, "⏳ Finale in {}", countdown.clock_text().bold())?;
        }
    }

    writeln!(out)?;
    writeln!(out, "🏁 Total time: {total_duration:?}")?;
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, report: &TesterReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, report: &TesterReport) -> Result<()> {
    writeln!(out, "# Valentine Quest QA Results\n")?;

    if let Some(records) = &report.playability {
        let passed = records.iter().filter(|r| r.passed).count();
        writeln!(out, "## Playability\n")?;
        writeln!(out, "- **Runs**: {}", records.len())?;
        writeln!(out, "- **Passed**: {passed}")?;
        writeln!(out, "- **Failed**: {}\n", records.len() - passed)?;
        writeln!(out, "| | Mini-game | Seed | Completions | Ticks | Simulated ms |")?;
        writeln!(out, "|---|---|---|---|---|---|")?;
        for record in records {
            let status = if record.passed { "✅" } else { "❌" };
            writeln!(
                out,
                "| {status} | {} | {} | {} | {} | {} |",
                record.kind.title(),
                record.seed,
                record.completions,
                record.ticks,
                record.simulated_ms
            )?;
        }
        writeln!(out)?;
    }

    if let Some(schedule) = &report.schedule {
        writeln!(out, "## Schedule at {}\n", schedule.at.to_rfc3339())?;
        for level in &schedule.levels {
            let mark = if level.unlocked { "x" } else { " " };
            writeln!(out, "- [{mark}] {} {}", level.id, level.name)?;
        }
        if let Some(countdown) = schedule.countdown {
            writeln!(out, "\nFinale countdown: `{}`", countdown.clock_text())?;
        }
    }

    if report.playability.is_none() && report.schedule.is_none() {
        writeln!(out, "_Nothing executed._")?;
    }
    Ok(())
}

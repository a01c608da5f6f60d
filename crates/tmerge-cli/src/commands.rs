use anyhow::Context;
use colored::Colorize;
use tmerge_driver::{detect, MergeConfig, MergeReport, MergeSession};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => MergeConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => MergeConfig::default(),
    };
    match cli.command {
        Command::Merge(args) => cmd_merge(args, config, &cli.format),
        Command::Detect(args) => cmd_detect(args, &cli.format),
    }
}

fn cmd_merge(args: MergeArgs, config: MergeConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let mut session = MergeSession::new(config);
    session.add_inputs(&args.inputs)?;
    let report = session.run(&args.output)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(&report),
    }

    let failed = report.failures().count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} report buckets failed to merge", report.buckets.len());
    }
    Ok(())
}

fn print_report(report: &MergeReport) {
    if report.buckets.is_empty() {
        println!("No report files to merge.");
    }
    for bucket in &report.buckets {
        let label = format!("{:<10}", bucket.format);
        match (&bucket.output, &bucket.error) {
            (Some(path), _) => println!(
                "{} {} {} file(s) -> {}",
                "✓".green().bold(),
                label.cyan(),
                bucket.inputs.len(),
                path.display().to_string().bold()
            ),
            (None, Some(error)) => println!("{} {} {}", "✗".red().bold(), label.cyan(), error.red()),
            (None, None) => {}
        }
    }
    for path in &report.skipped {
        println!("  {} {}", "skipped:".dimmed(), path.display());
    }
}

fn cmd_detect(args: DetectArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let found = detect(&args.inputs)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&found)?),
        OutputFormat::Text => {
            for detection in &found {
                let label = match detection.format {
                    Some(f) => format!("{f:<10}").green(),
                    None => format!("{:<10}", "ignored").dimmed(),
                };
                println!("{label} {}", detection.path.display());
            }
        }
    }
    Ok(())
}

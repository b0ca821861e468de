use clap::{Parser, ValueEnum};
use spdlog::prelude::*;
use spdlog::{Level, LevelFilter};
use std::path::PathBuf;

use uptime_state::{
    AnalysisOptions, InterruptionMethod, LogReaderOptions, Period, analyze_samples,
    meridiem_means, read_log, render_table,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::Error,
            LogLevel::Warn => Level::Warn,
            LogLevel::Info => Level::Info,
            LogLevel::Debug => Level::Debug,
            LogLevel::Trace => Level::Trace,
        }
    }
}

/// Summarizes internet interruptions recorded in a probe log.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Probe log, a CSV (optionally gzip compressed) with one row per successful probe.
    #[arg(long)]
    file: PathBuf,

    /// Period lengths to summarize over.
    #[arg(long, value_delimiter = ',', default_value = "12h,24h")]
    period: Vec<Period>,

    /// Name of the timestamp column.
    #[arg(long, default_value = "datetime")]
    column: String,

    /// Interruption counting: `proxy` (historical) or `run-boundary`.
    #[arg(long, default_value = "proxy")]
    interruptions: InterruptionMethod,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    spdlog::default_logger().set_level_filter(LevelFilter::MoreSevereEqual(args.log_level.into()));

    info!("[System] Analyzing {:?}...", args.file);

    let log = LogReaderOptions {
        column: args.column.clone(),
        ..Default::default()
    };
    let samples = read_log(&args.file, &log).inspect_err(|e| error!("[System] {}", e))?;

    for period in &args.period {
        let options = AnalysisOptions {
            period: *period,
            interruption_method: args.interruptions,
            log: log.clone(),
        };
        let analysis = analyze_samples(&samples, &options).inspect_err(|e| error!("[System] {}", e))?;

        println!("\n== Interruptions per {} ==", period);
        print!("{}", render_table(&analysis.summaries));

        for mean in meridiem_means(&analysis.summaries) {
            println!(
                "Expected per {}: {:.1} minutes without internet, {:.2} interruptions",
                mean.am_pm, mean.time_without_internet, mean.number_interruptions
            );
        }

        println!("{}", analysis.report);
        if analysis.outages.count > 0 {
            println!(
                "Outages: {} (median {} min, p90 {} min, longest {} min)",
                analysis.outages.count, analysis.outages.p50, analysis.outages.p90, analysis.outages.max
            );
        }
    }

    info!("[System] Done!");
    Ok(())
}

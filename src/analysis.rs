use crate::error::Result;
use crate::grid::build_indicator_series;
use crate::measure::{OutageMeasurer, OutageStats};
use crate::models::{AnnotatedSeries, IndicatorSeries, RawSample};
use crate::report::Report;
use crate::source::{LogReaderOptions, read_log};
use crate::summary::{InterruptionMethod, Period, PeriodSummary, summarize_with};
use crate::transitions::annotate_transitions;
use spdlog::info;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub period: Period,
    pub interruption_method: InterruptionMethod,
    pub log: LogReaderOptions,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            period: Period::TwelveHours,
            interruption_method: InterruptionMethod::default(),
            log: LogReaderOptions::default(),
        }
    }
}

/// Output of every pipeline stage for one period length.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub period: Period,
    pub indicators: IndicatorSeries,
    pub annotated: AnnotatedSeries,
    pub summaries: Vec<PeriodSummary>,
    pub report: Report,
    pub outages: OutageStats,
}

/// Runs grid, transitions, summary and report over an in-memory sample set.
pub fn analyze_samples(samples: &[RawSample], options: &AnalysisOptions) -> Result<Analysis> {
    let indicators = build_indicator_series(samples)?;
    let annotated = annotate_transitions(&indicators)?;
    let summaries = summarize_with(&annotated, options.period, options.interruption_method)?;
    let report = Report::new(&annotated, &summaries);

    let mut measurer = OutageMeasurer::new()?;
    measurer.record_series(&annotated)?;
    info!("[Outages/{}]{}", options.period, measurer.format_stats());

    Ok(Analysis {
        period: options.period,
        indicators,
        annotated,
        summaries,
        report,
        outages: measurer.get_stats(),
    })
}

/// Reads the log at `path` and analyzes it.
pub fn analyze_file(path: impl AsRef<Path>, options: &AnalysisOptions) -> Result<Analysis> {
    let samples = read_log(path, &options.log)?;
    analyze_samples(&samples, options)
}

use crate::models::AnnotatedSeries;
use crate::summary::{Meridiem, PeriodSummary};
use std::fmt;
use std::fmt::Write as _;

/// Headline figures over the whole log.
#[derive(Debug, Clone)]
pub struct Report {
    /// Minutes between the first and last annotated minute.
    pub total_minutes: i64,
    /// Share of `total_minutes` spent offline in the summarized periods.
    pub downtime_percentage: f64,
    pub first_period: Option<String>,
    pub last_period: Option<String>,
}

impl Report {
    pub fn new(series: &AnnotatedSeries, summaries: &[PeriodSummary]) -> Self {
        let total_minutes = match (series.start(), series.end()) {
            (Some(start), Some(end)) => end - start,
            _ => 0,
        };
        let downtime: i64 = summaries.iter().map(|s| s.time_without_internet).sum();
        let downtime_percentage = if total_minutes > 0 {
            100.0 * downtime as f64 / total_minutes as f64
        } else {
            f64::NAN
        };

        Self {
            total_minutes,
            downtime_percentage,
            first_period: summaries.first().map(|s| s.label.clone()),
            last_period: summaries.last().map(|s| s.label.clone()),
        }
    }

    /// Whole days covered by the log.
    pub fn days(&self) -> i64 {
        self.total_minutes / (24 * 60)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = self.first_period.as_deref().unwrap_or("n/a");
        let last = self.last_period.as_deref().unwrap_or("n/a");
        write!(
            f,
            "Internet has been down {:.2}% of the time between {} and {} ({} days)",
            self.downtime_percentage,
            first,
            last,
            self.days()
        )
    }
}

/// Mean downtime and interruption count of the AM and PM halves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeridiemMean {
    pub am_pm: Meridiem,
    pub time_without_internet: f64,
    pub number_interruptions: f64,
}

/// Groups 12h summaries by AM/PM. Empty for summaries without a meridiem.
pub fn meridiem_means(summaries: &[PeriodSummary]) -> Vec<MeridiemMean> {
    [Meridiem::Am, Meridiem::Pm]
        .into_iter()
        .filter_map(|am_pm| {
            let group: Vec<&PeriodSummary> = summaries
                .iter()
                .filter(|s| s.am_pm == Some(am_pm))
                .collect();
            if group.is_empty() {
                return None;
            }
            let n = group.len() as f64;
            Some(MeridiemMean {
                am_pm,
                time_without_internet: group.iter().map(|s| s.time_without_internet as f64).sum::<f64>() / n,
                number_interruptions: group.iter().map(|s| s.number_interruptions as f64).sum::<f64>() / n,
            })
        })
        .collect()
}

/// Fixed-width table of the summaries. Undefined averages print as `-`.
pub fn render_table(summaries: &[PeriodSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<14} {:<10} {:>5} {:>13} {:>11} {:>9}",
        "period", "day", "am_pm", "interruptions", "minutes_off", "avg_off"
    );
    for s in summaries {
        let am_pm = s.am_pm.map(|m| m.to_string()).unwrap_or_else(|| "-".into());
        let avg = if s.has_average() {
            format!("{:.2}", s.avg_interruption_time)
        } else {
            "-".into()
        };
        let _ = writeln!(
            out,
            "{:<14} {:<10} {:>5} {:>13} {:>11} {:>9}",
            s.label, s.day_of_week, am_pm, s.number_interruptions, s.time_without_internet, avg
        );
    }
    out
}

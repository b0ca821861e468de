use crate::error::{Result, UptimeError};
use crate::models::AnnotatedSeries;
use hdrhistogram::Histogram;

/// Longest outage the histogram can hold: ten years of minutes.
const MAX_OUTAGE_MINUTES: u64 = 10 * 366 * 24 * 60;

/// Distribution of outage lengths, in minutes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutageStats {
    /// Number of outages.
    pub count: u64,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    /// Median outage length.
    pub p50: u64,
    pub p90: u64,
    pub p99: u64,
}

/// Records the length of every off-run of an annotated series in an HdrHistogram.
pub struct OutageMeasurer {
    histogram: Histogram<u64>,
}

impl OutageMeasurer {
    pub fn new() -> Result<Self> {
        // 3 significant figures keeps minute lengths exact up to 1000 minutes.
        let histogram = Histogram::<u64>::new_with_bounds(1, MAX_OUTAGE_MINUTES, 3)
            .map_err(|e| UptimeError::Histogram(e.to_string()))?;
        Ok(Self { histogram })
    }

    pub fn record(&mut self, minutes: u64) -> Result<()> {
        self.histogram
            .record(minutes.clamp(1, MAX_OUTAGE_MINUTES))
            .map_err(|e| UptimeError::Histogram(e.to_string()))
    }

    /// Records every maximal block of off minutes of the series.
    pub fn record_series(&mut self, series: &AnnotatedSeries) -> Result<()> {
        let mut current: Option<(u64, u64)> = None;
        for point in series.points() {
            current = match current {
                Some((run_id, len)) if run_id == point.run_id => Some((run_id, len + 1)),
                Some((_, len)) => {
                    self.record(len)?;
                    None
                }
                None => None,
            };
            if current.is_none() && !point.is_on() {
                current = Some((point.run_id, 1));
            }
        }
        if let Some((_, len)) = current {
            self.record(len)?;
        }
        Ok(())
    }

    pub fn get_stats(&self) -> OutageStats {
        let count = self.histogram.len();
        if count == 0 {
            return OutageStats::default();
        }

        OutageStats {
            count,
            min: self.histogram.min(),
            max: self.histogram.max(),
            mean: self.histogram.mean(),
            p50: self.histogram.value_at_quantile(0.5),
            p90: self.histogram.value_at_quantile(0.9),
            p99: self.histogram.value_at_quantile(0.99),
        }
    }

    pub fn format_stats(&self) -> String {
        let stats = self.get_stats();
        if stats.count == 0 {
            return "No outages recorded".into();
        }

        format!(
            "\tcount={},\tmin={},\tmax={},\tmean={},\tp50={},\tp90={},\tp99={}",
            stats.count,
            Self::format_minutes(stats.min as f64),
            Self::format_minutes(stats.max as f64),
            Self::format_minutes(stats.mean),
            Self::format_minutes(stats.p50 as f64),
            Self::format_minutes(stats.p90 as f64),
            Self::format_minutes(stats.p99 as f64),
        )
    }

    fn format_minutes(minutes: f64) -> String {
        if minutes < 60.0 {
            format!("{:.1}m", minutes)
        } else if minutes < 24.0 * 60.0 {
            format!("{:.1}h", minutes / 60.0)
        } else {
            format!("{:.2}d", minutes / (24.0 * 60.0))
        }
    }
}

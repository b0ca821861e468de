use crate::error::{Result, UptimeError};
use crate::models::{AnnotatedPoint, AnnotatedSeries, datetime_of};
use crate::pipe;
use crate::pipe::{delta, filter, windowed};
use crate::stage::Stage;
use chrono::{NaiveDateTime, Timelike};
use spdlog::debug;
use std::fmt;
use std::str::FromStr;

/// Length of the summary periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    TwelveHours,
    TwentyFourHours,
}

impl Period {
    /// Fixed length in minutes. Used as-is for downtime, even for a bucket that is
    /// only partially covered by the log.
    pub const fn minutes(self) -> i64 {
        match self {
            Period::TwelveHours => 12 * 60,
            Period::TwentyFourHours => 24 * 60,
        }
    }

    /// Only the 12h framing splits days into AM and PM.
    pub const fn has_meridiem(self) -> bool {
        matches!(self, Period::TwelveHours)
    }
}

impl FromStr for Period {
    type Err = UptimeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "12h" => Ok(Period::TwelveHours),
            "24h" | "1d" => Ok(Period::TwentyFourHours),
            other => Err(UptimeError::configuration(format!(
                "unsupported period '{}', expected 12h or 24h",
                other
            ))),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::TwelveHours => write!(f, "12h"),
            Period::TwentyFourHours => write!(f, "24h"),
        }
    }
}

/// How interruptions are counted inside a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InterruptionMethod {
    /// Diffs the indicator of every third minute of a run against the previous one
    /// and halves the number of flips. Runs shorter than 3 minutes are invisible to
    /// it. Matches historical reports.
    #[default]
    ThirdMinuteProxy,
    /// Counts every on to off transition.
    RunBoundary,
}

impl FromStr for InterruptionMethod {
    type Err = UptimeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "proxy" | "third-minute" => Ok(InterruptionMethod::ThirdMinuteProxy),
            "run-boundary" | "exact" => Ok(InterruptionMethod::RunBoundary),
            other => Err(UptimeError::configuration(format!(
                "unsupported interruption method '{}', expected proxy or run-boundary",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    pub fn of(datetime: &NaiveDateTime) -> Self {
        if datetime.hour() < 12 { Meridiem::Am } else { Meridiem::Pm }
    }
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Meridiem::Am => write!(f, "AM"),
            Meridiem::Pm => write!(f, "PM"),
        }
    }
}

/// Interruption statistics of one full period.
#[derive(Debug, Clone)]
pub struct PeriodSummary {
    pub start: NaiveDateTime,
    /// `YYYY-MM-DD`, followed by ` AM`/` PM` in the 12h framing.
    pub label: String,
    pub day_of_week: String,
    pub am_pm: Option<Meridiem>,
    pub number_interruptions: u64,
    /// Period length minus the minutes the probe succeeded.
    pub time_without_internet: i64,
    /// NaN when there was no interruption.
    pub avg_interruption_time: f64,
}

impl PeriodSummary {
    pub fn has_average(&self) -> bool {
        !self.avg_interruption_time.is_nan()
    }
}

impl PartialEq for PeriodSummary {
    fn eq(&self, other: &Self) -> bool {
        let same_avg = (self.avg_interruption_time.is_nan() && other.avg_interruption_time.is_nan())
            || self.avg_interruption_time == other.avg_interruption_time;
        same_avg
            && self.start == other.start
            && self.label == other.label
            && self.day_of_week == other.day_of_week
            && self.am_pm == other.am_pm
            && self.number_interruptions == other.number_interruptions
            && self.time_without_internet == other.time_without_internet
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct BucketTally {
    time_on: i64,
    events: u64,
}

/// Summarizes the series per period with the historical interruption proxy.
pub fn summarize(series: &AnnotatedSeries, period: Period) -> Result<Vec<PeriodSummary>> {
    summarize_with(series, period, InterruptionMethod::default())
}

/// Buckets the series into fixed periods anchored at midnight and summarizes each.
///
/// The first and last buckets are always dropped since the log rarely starts or ends
/// on a period boundary.
pub fn summarize_with(
    series: &AnnotatedSeries,
    period: Period,
    method: InterruptionMethod,
) -> Result<Vec<PeriodSummary>> {
    let (Some(start), Some(end)) = (series.start(), series.end()) else {
        return Ok(Vec::new());
    };

    let period_minutes = period.minutes();
    let first_bucket = windowed(start, period_minutes);
    let bucket_count = ((windowed(end, period_minutes) - first_bucket) / period_minutes + 1) as usize;
    let bucket_of = |minute: i64| ((windowed(minute, period_minutes) - first_bucket) / period_minutes) as usize;

    let mut tallies = vec![BucketTally::default(); bucket_count];

    // Flips between consecutive third minutes of runs, attributed to the later one.
    let mut flips = pipe![
        filter(|p: &AnnotatedPoint| p.position_in_run == 2),
        delta(
            |_: &AnnotatedPoint| (),
            |curr: &AnnotatedPoint, prev: Option<AnnotatedPoint>| {
                prev.filter(|p| p.indicator != curr.indicator).map(|_| *curr)
            }
        ),
    ];

    for point in series.points() {
        let slot = bucket_of(point.minute);
        tallies[slot].time_on += point.indicator as i64;
        match method {
            InterruptionMethod::ThirdMinuteProxy => {
                flips.process(point, &mut |flip: &AnnotatedPoint| {
                    tallies[bucket_of(flip.minute)].events += 1;
                });
            }
            InterruptionMethod::RunBoundary => {
                if point.changed != 0 && !point.is_on() {
                    tallies[slot].events += 1;
                }
            }
        }
    }

    let mut summaries = Vec::with_capacity(bucket_count.saturating_sub(2));
    for (index, tally) in tallies
        .iter()
        .enumerate()
        .skip(1)
        .take(bucket_count.saturating_sub(2))
    {
        let bucket_start = first_bucket + index as i64 * period_minutes;
        let start = datetime_of(bucket_start).ok_or_else(|| {
            UptimeError::input(format!("period start minute {} is out of range", bucket_start))
        })?;

        let number_interruptions = match method {
            InterruptionMethod::ThirdMinuteProxy => tally.events / 2,
            InterruptionMethod::RunBoundary => tally.events,
        };
        let time_without_internet = period_minutes - tally.time_on;
        let avg_interruption_time = if number_interruptions > 0 {
            time_without_internet as f64 / number_interruptions as f64
        } else {
            f64::NAN
        };

        let am_pm = period.has_meridiem().then(|| Meridiem::of(&start));
        let label = match am_pm {
            Some(m) => format!("{} {}", start.format("%Y-%m-%d"), m),
            None => start.format("%Y-%m-%d").to_string(),
        };

        summaries.push(PeriodSummary {
            start,
            label,
            day_of_week: start.format("%A").to_string(),
            am_pm,
            number_interruptions,
            time_without_internet,
            avg_interruption_time,
        });
    }

    debug!(
        "[Summary] {} buckets of {}, {} kept after dropping the edges",
        bucket_count,
        period,
        summaries.len()
    );

    Ok(summaries)
}

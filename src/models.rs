use bytemuck::{Pod, Zeroable};
use chrono::{DateTime, NaiveDateTime};

/// Minute index of a wall-clock timestamp: whole minutes since 1970-01-01 00:00.
#[inline(always)]
pub fn minute_of(datetime: &NaiveDateTime) -> i64 {
    datetime.and_utc().timestamp().div_euclid(60)
}

/// Inverse of [`minute_of`]. `None` when the minute is outside chrono's range.
pub fn datetime_of(minute: i64) -> Option<NaiveDateTime> {
    let secs = minute.checked_mul(60)?;
    DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
}

/// A minute at which the probe is known to have succeeded.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawSample {
    pub minute: i64,
}

impl RawSample {
    /// Truncates the timestamp to its minute.
    pub fn from_datetime(datetime: &NaiveDateTime) -> Self {
        Self {
            minute: minute_of(datetime),
        }
    }

    pub fn datetime(&self) -> Option<NaiveDateTime> {
        datetime_of(self.minute)
    }
}

/// One minute of the dense on/off grid.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable, PartialEq, Eq)]
pub struct IndicatorPoint {
    pub minute: i64,
    /// 1 when the probe succeeded during this minute, 0 otherwise.
    pub indicator: u8,
    pub _pad: [u8; 7],
}

impl IndicatorPoint {
    pub fn new(minute: i64, on: bool) -> Self {
        Self {
            minute,
            indicator: on as u8,
            ..Default::default()
        }
    }

    #[inline(always)]
    pub fn is_on(&self) -> bool {
        self.indicator != 0
    }
}

/// A grid minute annotated with its run information.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable, PartialEq, Eq)]
pub struct AnnotatedPoint {
    pub minute: i64,
    /// Number of state changes seen up to and including this minute.
    pub run_id: u64,
    /// Zero-based offset of this minute inside its run.
    pub position_in_run: u64,
    pub indicator: u8,
    /// 1 when the indicator differs from the previous minute.
    pub changed: u8,
    pub _pad: [u8; 6],
}

impl AnnotatedPoint {
    pub fn from_indicator(point: &IndicatorPoint, changed: bool) -> Self {
        Self {
            minute: point.minute,
            indicator: point.indicator,
            changed: changed as u8,
            ..Default::default()
        }
    }

    #[inline(always)]
    pub fn is_on(&self) -> bool {
        self.indicator != 0
    }
}

/// Dense, strictly one-minute spaced on/off series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorSeries {
    points: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub(crate) fn new(points: Vec<IndicatorPoint>) -> Self {
        Self { points }
    }

    /// Builds a series starting at `start_minute` from consecutive indicator values.
    /// Any non-zero value counts as on.
    pub fn from_indicators(start_minute: i64, indicators: &[u8]) -> Self {
        let points = indicators
            .iter()
            .zip(start_minute..)
            .map(|(&ind, minute)| IndicatorPoint::new(minute, ind != 0))
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[IndicatorPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> Option<i64> {
        self.points.first().map(|p| p.minute)
    }

    pub fn end(&self) -> Option<i64> {
        self.points.last().map(|p| p.minute)
    }

    pub fn indicators(&self) -> Vec<u8> {
        self.points.iter().map(|p| p.indicator).collect()
    }

    pub fn minutes_on(&self) -> usize {
        self.points.iter().filter(|p| p.is_on()).count()
    }
}

/// Indicator series without its first minute, annotated with run information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedSeries {
    points: Vec<AnnotatedPoint>,
}

impl AnnotatedSeries {
    pub(crate) fn new(points: Vec<AnnotatedPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[AnnotatedPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> Option<i64> {
        self.points.first().map(|p| p.minute)
    }

    pub fn end(&self) -> Option<i64> {
        self.points.last().map(|p| p.minute)
    }

    pub fn changed(&self) -> Vec<u8> {
        self.points.iter().map(|p| p.changed).collect()
    }

    pub fn run_ids(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.run_id).collect()
    }

    pub fn positions(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.position_in_run).collect()
    }
}

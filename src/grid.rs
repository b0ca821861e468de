use crate::error::{Result, UptimeError};
use crate::models::{IndicatorPoint, IndicatorSeries, RawSample, datetime_of};
use fxhash::FxHashSet;
use spdlog::{debug, warn};

/// Widest span, in minutes, a grid may cover: twenty years.
pub const MAX_GRID_MINUTES: i64 = 20 * 366 * 24 * 60;

/// Expands sparse success samples into a dense minute grid.
///
/// The grid covers every minute from the earliest to the latest sample inclusive.
/// A minute is on iff at least one sample falls into it; duplicates and ordering of
/// the input do not matter. Spans wider than [`MAX_GRID_MINUTES`] are rejected
/// before anything is allocated.
pub fn build_indicator_series<'a>(
    samples: impl IntoIterator<Item = &'a RawSample>,
) -> Result<IndicatorSeries> {
    let seen: FxHashSet<i64> = samples.into_iter().map(|s| s.minute).collect();

    let (Some(&start), Some(&end)) = (seen.iter().min(), seen.iter().max()) else {
        return Err(UptimeError::input("log contains no samples"));
    };

    let span = end.saturating_sub(start);
    if span > MAX_GRID_MINUTES {
        let show = |minute: i64| {
            datetime_of(minute).map_or_else(|| minute.to_string(), |dt| dt.to_string())
        };
        warn!("[Grid] Samples span {} minutes, from {} to {}", span, show(start), show(end));
        return Err(UptimeError::input(format!(
            "samples span {} minutes ({} to {}), more than the {} minute limit",
            span,
            show(start),
            show(end),
            MAX_GRID_MINUTES
        )));
    }

    let points: Vec<IndicatorPoint> = (start..=end)
        .map(|minute| IndicatorPoint::new(minute, seen.contains(&minute)))
        .collect();

    debug!(
        "[Grid] {} distinct sample minutes expanded to {} grid minutes",
        seen.len(),
        points.len()
    );

    Ok(IndicatorSeries::new(points))
}

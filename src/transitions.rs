use crate::error::{Result, UptimeError};
use crate::models::{AnnotatedPoint, AnnotatedSeries, IndicatorPoint, IndicatorSeries};
use crate::pipe::delta;
use crate::pipe;
use crate::stage::{OutputCollector, Stage, StageExt};
use spdlog::debug;

/// Assigns `run_id` and `position_in_run` to minutes that already carry `changed`.
///
/// `run_id` is the running sum of `changed`, so a run is a maximal block of
/// consecutive minutes with the same indicator. Positions restart at 0 whenever a
/// change is seen.
#[derive(Debug, Default)]
pub struct RunTracker {
    run_id: u64,
    position: u64,
    started: bool,
}

impl RunTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stage<AnnotatedPoint, AnnotatedPoint> for RunTracker {
    #[inline(always)]
    fn process<C>(&mut self, data: &AnnotatedPoint, collector: &mut C)
    where
        C: OutputCollector<AnnotatedPoint>,
    {
        if data.changed != 0 {
            self.run_id += 1;
            self.position = 0;
        } else if self.started {
            self.position += 1;
        }
        self.started = true;

        collector.push(&AnnotatedPoint {
            run_id: self.run_id,
            position_in_run: self.position,
            ..*data
        });
    }
}

/// Annotates every minute after the first with its state change, run id and
/// position within the run. The first minute is dropped since it has no
/// predecessor to compare against.
pub fn annotate_transitions(series: &IndicatorSeries) -> Result<AnnotatedSeries> {
    if series.len() < 2 {
        return Err(UptimeError::input(format!(
            "at least 2 grid minutes are needed to detect transitions, got {}",
            series.len()
        )));
    }

    let mut stage = pipe![
        delta(
            |_: &IndicatorPoint| (),
            |curr: &IndicatorPoint, prev: Option<IndicatorPoint>| {
                prev.map(|p| AnnotatedPoint::from_indicator(curr, p.indicator != curr.indicator))
            }
        ),
        RunTracker::new(),
    ];
    let points = stage.run_all(series.points());

    debug!(
        "[Transitions] {} minutes annotated, {} runs",
        points.len(),
        points.last().map_or(0, |p| p.run_id + 1)
    );

    Ok(AnnotatedSeries::new(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_tracker_resets_position_on_change() {
        let mut tracker = RunTracker::new();
        let input = [0u8, 0, 1, 0, 0]
            .iter()
            .zip(0i64..)
            .map(|(&changed, minute)| AnnotatedPoint {
                minute,
                changed,
                ..Default::default()
            })
            .collect::<Vec<_>>();

        let out = tracker.run_all(&input);

        let runs: Vec<u64> = out.iter().map(|p| p.run_id).collect();
        let positions: Vec<u64> = out.iter().map(|p| p.position_in_run).collect();
        assert_eq!(runs, vec![0, 0, 1, 1, 1]);
        assert_eq!(positions, vec![0, 1, 0, 1, 2]);
    }

    #[test]
    fn test_first_minute_dropped() {
        let series = IndicatorSeries::from_indicators(100, &[1, 0]);
        let annotated = annotate_transitions(&series).unwrap();

        assert_eq!(annotated.len(), 1);
        assert_eq!(annotated.start(), Some(101));
        assert_eq!(annotated.changed(), vec![1]);
        assert_eq!(annotated.run_ids(), vec![1]);
        assert_eq!(annotated.positions(), vec![0]);
    }

    #[test]
    fn test_single_minute_rejected() {
        let series = IndicatorSeries::from_indicators(0, &[1]);
        assert!(matches!(
            annotate_transitions(&series),
            Err(UptimeError::Input(_))
        ));
    }
}

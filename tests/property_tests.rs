use proptest::prelude::*;
use uptime_state::{
    IndicatorSeries, InterruptionMethod, Period, RawSample, annotate_transitions,
    build_indicator_series, summarize, summarize_with,
};

fn sample_minutes() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(26_000_000i64..26_005_000, 1..400)
}

fn indicators() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..=1, 2..600)
}

proptest! {
    #[test]
    fn grid_covers_every_minute_once(minutes in sample_minutes()) {
        let samples: Vec<RawSample> = minutes.iter().map(|&minute| RawSample { minute }).collect();
        let series = build_indicator_series(&samples).unwrap();

        let min = *minutes.iter().min().unwrap();
        let max = *minutes.iter().max().unwrap();
        prop_assert_eq!(series.len() as i64, max - min + 1);
        prop_assert_eq!(series.start(), Some(min));
        for pair in series.points().windows(2) {
            prop_assert_eq!(pair[1].minute - pair[0].minute, 1);
        }
        for point in series.points() {
            prop_assert_eq!(point.is_on(), minutes.contains(&point.minute));
        }
    }

    #[test]
    fn run_ids_step_exactly_at_changes(values in indicators()) {
        let series = IndicatorSeries::from_indicators(0, &values);
        let annotated = annotate_transitions(&series).unwrap();

        prop_assert_eq!(annotated.len(), values.len() - 1);
        let mut prev_run = 0u64;
        for (i, point) in annotated.points().iter().enumerate() {
            let changed = values[i + 1] != values[i];
            prop_assert_eq!(point.changed, changed as u8);
            prop_assert_eq!(point.run_id, prev_run + changed as u64);
            prev_run = point.run_id;
        }
    }

    #[test]
    fn positions_count_up_within_runs(values in indicators()) {
        let series = IndicatorSeries::from_indicators(0, &values);
        let annotated = annotate_transitions(&series).unwrap();

        let mut expected = 0u64;
        let mut run = None;
        for point in annotated.points() {
            if run != Some(point.run_id) {
                expected = 0;
                run = Some(point.run_id);
            }
            prop_assert_eq!(point.position_in_run, expected);
            expected += 1;
        }
    }

    #[test]
    fn summaries_are_pure_and_skip_edges(values in prop::collection::vec(0u8..=1, 2200..3000)) {
        let series = IndicatorSeries::from_indicators(100, &values);
        let annotated = annotate_transitions(&series).unwrap();

        let first = summarize(&annotated, Period::TwelveHours).unwrap();
        let second = summarize(&annotated, Period::TwelveHours).unwrap();
        prop_assert_eq!(&first, &second);

        // At least three 12h buckets are spanned, so something remains.
        prop_assert!(!first.is_empty());
        let start = annotated.start().unwrap();
        let end = annotated.end().unwrap();
        for row in &first {
            let bucket = uptime_state::models::minute_of(&row.start);
            prop_assert!(bucket > start);
            prop_assert!(bucket + Period::TwelveHours.minutes() <= end);
        }
    }

    #[test]
    fn average_never_divides_by_zero(values in prop::collection::vec(0u8..=1, 3000..3200)) {
        let series = IndicatorSeries::from_indicators(0, &values);
        let annotated = annotate_transitions(&series).unwrap();

        for method in [InterruptionMethod::ThirdMinuteProxy, InterruptionMethod::RunBoundary] {
            for row in summarize_with(&annotated, Period::TwelveHours, method).unwrap() {
                if row.number_interruptions == 0 {
                    prop_assert!(row.avg_interruption_time.is_nan());
                } else {
                    prop_assert_eq!(
                        row.avg_interruption_time,
                        row.time_without_internet as f64 / row.number_interruptions as f64
                    );
                }
            }
        }
    }
}

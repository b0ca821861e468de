use crate::stage::{OutputCollector, Stage};
use bytemuck::Pod;
use spdlog::info;
use std::marker::PhantomData;
use std::time::Instant;

/// A pass-through stage that logs how many records went through it.
pub struct Progress<T> {
    name: String,
    interval: usize,
    count: usize,
    start_instant: Instant,
    _phantom: PhantomData<T>,
}

impl<T: Pod> Progress<T> {
    pub fn new(name: impl Into<String>, interval: usize) -> Self {
        Self {
            name: name.into(),
            // An interval of 0 would log on every record.
            interval: interval.max(1),
            count: 0,
            start_instant: Instant::now(),
            _phantom: PhantomData,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl<T: Pod> Stage<T, T> for Progress<T> {
    #[inline(always)]
    fn process<C>(&mut self, data: &T, collector: &mut C)
    where
        C: OutputCollector<T>,
    {
        self.count += 1;
        if self.count.is_multiple_of(self.interval) {
            let elapsed = self.start_instant.elapsed();
            let rate = self.count as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
            info!(
                "[{}] Processed {} records, Avg: {} rec/s",
                self.name,
                format_count(self.count as f64),
                format_count(rate)
            );
        }
        collector.push(data);
    }
}

pub fn progress<T: Pod>(name: impl Into<String>, interval: usize) -> Progress<T> {
    Progress::new(name, interval)
}

fn format_count(val: f64) -> String {
    if val < 1000.0 {
        if val == val.floor() {
            format!("{:.0}", val)
        } else {
            format!("{:.2}", val)
        }
    } else if val < 1_000_000.0 {
        format!("{:.2}k", val / 1000.0)
    } else if val < 1_000_000_000.0 {
        format!("{:.2}m", val / 1_000_000.0)
    } else {
        format!("{:.2}b", val / 1_000_000_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_passes_everything_through() {
        let mut pipe = progress::<u32>("test", 2);
        let mut out = Vec::new();

        for x in 1..=5u32 {
            pipe.process(&x, &mut |v: &u32| out.push(*v));
        }

        assert_eq!(out, vec![1, 2, 3, 4, 5]);
        assert_eq!(pipe.count(), 5);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let mut pipe = progress::<u8>("zero", 0);
        pipe.process(&7u8, &mut |_: &u8| {});
        assert_eq!(pipe.count(), 1);
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(12.0), "12");
        assert_eq!(format_count(1500.0), "1.50k");
        assert_eq!(format_count(2_500_000.0), "2.50m");
    }
}

/// Aligns a minute index to the start of the fixed-length window containing it.
///
/// Windows are anchored at minute 0, so negative minutes round down as well.
#[inline(always)]
pub fn windowed(minute: i64, window_size: i64) -> i64 {
    if window_size <= 0 {
        return minute;
    }
    minute.div_euclid(window_size) * window_size
}

#[cfg(test)]
mod window_tests {
    use super::*;

    #[test]
    fn test_window_alignment() {
        let window = 720;

        assert_eq!(windowed(0, window), 0);
        assert_eq!(windowed(719, window), 0);
        assert_eq!(windowed(720, window), 720);
        assert_eq!(windowed(1_000, window), 720);
    }

    #[test]
    fn test_window_before_epoch() {
        assert_eq!(windowed(-1, 1440), -1440);
        assert_eq!(windowed(-1440, 1440), -1440);
    }

    #[test]
    fn test_zero_window_is_identity() {
        assert_eq!(windowed(123, 0), 123);
    }
}

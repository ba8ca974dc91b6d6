//! Wall-clock timing for determinant runs.
//!
//! Timed operations return their value and elapsed time together as a [`Timed`]
//! instead of bolting a duration onto whatever the operation returns.

use std::time::{Duration, Instant};

/// A value together with the wall-clock time it took to produce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timed<T> {
    pub value: T,
    pub elapsed_ms: f64,
}

impl<T> Timed<T> {
    /// Runs `f` and records how long it took.
    pub fn measure<F>(f: F) -> Self
    where
        F: FnOnce() -> T,
    {
        let start = Instant::now();
        let value = f();
        Self {
            value,
            elapsed_ms: duration_ms(start.elapsed()),
        }
    }
}

impl<T, E> Timed<Result<T, E>> {
    /// Moves the error out so `?` can be applied to a timed fallible call.
    pub fn transpose(self) -> Result<Timed<T>, E> {
        let elapsed_ms = self.elapsed_ms;
        self.value.map(|value| Timed { value, elapsed_ms })
    }
}

/// Milliseconds as a float, keeping sub-millisecond precision.
#[must_use]
pub fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_records_elapsed() {
        let timed = Timed::measure(|| {
            std::thread::sleep(Duration::from_millis(5));
            42
        });
        assert_eq!(timed.value, 42);
        assert!(timed.elapsed_ms >= 5.0);
    }

    #[test]
    fn test_transpose_keeps_time() {
        let ok: Timed<Result<i32, String>> = Timed {
            value: Ok(1),
            elapsed_ms: 2.5,
        };
        assert_eq!(ok.transpose().unwrap().elapsed_ms, 2.5);

        let err: Timed<Result<i32, String>> = Timed {
            value: Err("boom".into()),
            elapsed_ms: 1.0,
        };
        assert_eq!(err.transpose().unwrap_err(), "boom");
    }

    #[test]
    fn test_duration_ms() {
        assert_eq!(duration_ms(Duration::from_micros(1500)), 1.5);
    }
}

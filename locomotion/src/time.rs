use std::time::Duration;

/// Frame timing handed to the controller by the host loop
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Time {
    /// Time since the previous frame
    pub elapsed: Duration,
    /// Time since the session started
    pub total: Duration,
}

impl Time {
    pub fn new(total: Duration, elapsed: Duration) -> Time {
        Time { elapsed, total }
    }

    pub fn from_seconds(total: f32) -> Time {
        Time {
            elapsed: Duration::ZERO,
            total: Duration::from_secs_f32(total.max(0.0)),
        }
    }

    /// Advance by `step`, returning the new frame time
    pub fn advance(&self, step: Duration) -> Time {
        Time {
            elapsed: step,
            total: self.total + step,
        }
    }

    pub fn now_seconds(&self) -> f32 {
        self.total.as_secs_f32()
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_accumulates() {
        let step = Duration::from_millis(10);
        let time = Time::default().advance(step).advance(step);
        assert_eq!(time.total, Duration::from_millis(20));
        assert_eq!(time.elapsed, step);
        assert!((time.now_seconds() - 0.02).abs() < 1e-6);
    }
}

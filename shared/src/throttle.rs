/// Leading-edge rate limiter.
///
/// A call runs only when at least `delay` milliseconds have passed since the
/// last call that ran. Everything in between is dropped, never queued.
#[derive(Clone, Debug)]
pub struct Throttle {
    delay: f64,
    last_run: Option<f64>,
}

impl Throttle {
    pub fn new(delay: f64) -> Self {
        Self {
            delay,
            last_run: None,
        }
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }

    /// Returns true when a call at `now` may run, and records it as the last run.
    pub fn ready(&mut self, now: f64) -> bool {
        if let Some(last_run) = self.last_run {
            if now - last_run < self.delay {
                return false;
            }
        }
        self.last_run = Some(now);
        true
    }

    pub fn call<T>(&mut self, now: f64, callback: impl FnOnce() -> T) -> Option<T> {
        if self.ready(now) {
            Some(callback())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executed(delay: f64, calls: &[f64]) -> Vec<f64> {
        let mut throttle = Throttle::new(delay);
        calls
            .iter()
            .copied()
            .filter_map(|t| throttle.call(t, || t))
            .collect()
    }

    #[test]
    fn runs_leading_call_and_drops_the_rest_of_the_window() {
        assert_eq!(executed(10.0, &[0.0, 3.0, 7.0, 11.0, 12.0]), vec![0.0, 11.0]);
    }

    #[test]
    fn window_is_measured_from_last_executed_call() {
        // 9 is dropped, so 18 is only 8ms after the last run at 10.
        assert_eq!(
            executed(10.0, &[0.0, 9.0, 10.0, 18.0, 20.0]),
            vec![0.0, 10.0, 20.0]
        );
    }

    #[test]
    fn exact_delay_boundary_runs() {
        assert_eq!(executed(10.0, &[5.0, 15.0, 25.0]), vec![5.0, 15.0, 25.0]);
    }

    #[test]
    fn clock_going_backwards_is_dropped() {
        assert_eq!(executed(10.0, &[100.0, 50.0, 110.0]), vec![100.0, 110.0]);
    }

    #[test]
    fn zero_delay_never_drops() {
        assert_eq!(executed(0.0, &[1.0, 1.0, 1.0]), vec![1.0, 1.0, 1.0]);
    }
}

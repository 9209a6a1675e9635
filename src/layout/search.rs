/// How to split a bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Midpoint {
    #[default]
    Arithmetic,
    /// `sqrt(low * high)`: for multiplicative quantities such as ratios or
    /// scales. Both bounds must be positive.
    Geometric,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BisectConfig {
    pub max_attempts: usize,
    /// Relative error below which the search stops early.
    pub epsilon: f64,
    pub midpoint: Midpoint,
}

impl Default for BisectConfig {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            epsilon: 0.01,
            midpoint: Midpoint::Arithmetic,
        }
    }
}

/// Best candidate seen by [`bisect`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BisectResult {
    /// Input that produced the smallest error.
    pub value: f64,
    /// Objective at `value`.
    pub output: f64,
    /// `|1 - output / target|`.
    pub error: f64,
    pub attempts: usize,
    pub converged: bool,
}

/// Bounded bisection toward `eval(x) == target`.
///
/// `eval` is assumed non-decreasing in `x` over `[low, high]`, at least
/// locally. Both bounds are evaluated first, so a target reachable only at
/// an end of the bracket is still found. Each attempt then evaluates the
/// midpoint, keeps it if it beats the best so far, and moves whichever bound
/// keeps the target inside the bracket. The loop stops once the relative
/// error is under `epsilon` or after `max_attempts` midpoints; either way the
/// best candidate is returned. `attempts` counts midpoints only.
pub fn bisect<F>(mut low: f64, mut high: f64, target: f64, config: &BisectConfig, mut eval: F) -> BisectResult
where
    F: FnMut(f64) -> f64,
{
    if low > high {
        std::mem::swap(&mut low, &mut high);
    }

    let mut best = BisectResult {
        value: midpoint(low, high, config.midpoint),
        output: f64::NAN,
        error: f64::INFINITY,
        attempts: 0,
        converged: false,
    };

    let mut consider = |best: &mut BisectResult, value: f64| -> (f64, f64) {
        let output = eval(value);
        let error = relative_error(output, target);
        if error < best.error {
            best.value = value;
            best.output = output;
            best.error = error;
        }
        (output, error)
    };

    for bound in [low, high] {
        let (output, error) = consider(&mut best, bound);
        tracing::trace!(bound, output, error, "bisect bound");
    }
    if best.error < config.epsilon {
        best.converged = true;
        return best;
    }

    for attempt in 1..=config.max_attempts.max(1) {
        let mid = midpoint(low, high, config.midpoint);
        let (output, error) = consider(&mut best, mid);
        tracing::trace!(attempt, low, high, mid, output, error, "bisect step");
        best.attempts = attempt;

        if error < config.epsilon {
            best.converged = true;
            break;
        }

        if output < target {
            low = mid;
        } else {
            high = mid;
        }
    }

    best
}

fn midpoint(low: f64, high: f64, mode: Midpoint) -> f64 {
    match mode {
        Midpoint::Arithmetic => low + (high - low) / 2.0,
        Midpoint::Geometric => (low * high).sqrt(),
    }
}

/// `|1 - output / target|`, infinite when either side is unusable.
pub fn relative_error(output: f64, target: f64) -> f64 {
    if !output.is_finite() || !target.is_finite() || target == 0.0 {
        return f64::INFINITY;
    }
    (1.0 - output / target).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_on_linear_objective() {
        let result = bisect(0.0, 100.0, 42.0, &BisectConfig::default(), |x| x);
        assert!(result.converged);
        assert!(result.error < 0.01);
        assert!((result.value - 42.0).abs() < 0.42);
    }

    #[test]
    fn geometric_midpoint_halves_log_space() {
        let config = BisectConfig {
            midpoint: Midpoint::Geometric,
            epsilon: 1e-6,
            max_attempts: 60,
        };
        let result = bisect(0.01, 100.0, 3.0, &config, |x| x);
        assert!(result.converged);
        assert!((result.value - 3.0).abs() < 1e-5);
    }

    #[test]
    fn exhausted_budget_returns_best_seen() {
        let config = BisectConfig {
            max_attempts: 3,
            epsilon: 1e-12,
            midpoint: Midpoint::Arithmetic,
        };
        let result = bisect(0.0, 8.0, 5.1, &config, |x| x);
        // Midpoints visited: 4, 6, 5.
        assert!(!result.converged);
        assert_eq!(result.attempts, 3);
        assert_eq!(result.value, 5.0);
    }

    #[test]
    fn bracket_end_wins_without_midpoints() {
        let config = BisectConfig {
            max_attempts: 2,
            ..BisectConfig::default()
        };
        // Midpoints 5 and 7.5 both miss; the upper bound hits exactly.
        let result = bisect(0.0, 10.0, 10.0, &config, |x| x);
        assert!(result.converged);
        assert_eq!(result.attempts, 0);
        assert_eq!(result.value, 10.0);

        let result = bisect(1.0, 4.0, 1.0, &config, |x| x * x);
        assert!(result.converged);
        assert_eq!(result.value, 1.0);
    }

    #[test]
    fn step_objective_still_terminates() {
        let result = bisect(1.0, 9.0, 2.5, &BisectConfig::default(), |x| x.floor());
        assert!(!result.converged);
        assert_eq!(result.attempts, 20);
        assert!(result.output == 2.0 || result.output == 3.0);
    }

    #[test]
    fn reversed_bracket_is_normalized() {
        let result = bisect(10.0, 0.0, 2.0, &BisectConfig::default(), |x| x);
        assert!(result.converged);
    }

    #[test]
    fn unusable_target_never_converges() {
        let result = bisect(0.0, 1.0, 0.0, &BisectConfig::default(), |x| x);
        assert!(!result.converged);
        assert!(result.error.is_infinite());
    }
}

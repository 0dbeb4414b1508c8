// Critical current solver - Inverts the temperature/current regression curve

/// Permissible wiring temperature (℃).
pub const CRITICAL_TEMPERATURE: f64 = 70.0;

/// Regression `T(I) = A + B·I + C·I²` fitted from field measurements.
pub const REGRESSION_A: f64 = 39.452;
pub const REGRESSION_B: f64 = 0.025;
pub const REGRESSION_C: f64 = 0.014;

/// Substituted when the critical temperature is unreachable on the curve.
/// Not a physical quantity.
pub const FALLBACK_CRITICAL_CURRENT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalCurrentSolver {
    critical_temperature: f64,
}

impl Default for CriticalCurrentSolver {
    fn default() -> Self {
        Self::new(CRITICAL_TEMPERATURE)
    }
}

impl CriticalCurrentSolver {
    pub fn new(critical_temperature: f64) -> Self {
        Self {
            critical_temperature,
        }
    }

    pub fn critical_temperature(&self) -> f64 {
        self.critical_temperature
    }

    /// Current (A) at which the regression curve reaches the configured critical temperature.
    pub fn critical_current(&self) -> f64 {
        Self::solve(self.critical_temperature)
    }

    /// Solve `C·I² + B·I + (A − T) = 0` for the larger root.
    pub fn solve(critical_temperature: f64) -> f64 {
        let discriminant =
            REGRESSION_B * REGRESSION_B - 4.0 * REGRESSION_C * (REGRESSION_A - critical_temperature);

        if discriminant >= 0.0 {
            (-REGRESSION_B + discriminant.sqrt()) / (2.0 * REGRESSION_C)
        } else {
            tracing::debug!(
                critical_temperature,
                "critical temperature unreachable on regression curve, using fallback current"
            );
            FALLBACK_CRITICAL_CURRENT
        }
    }

    /// Temperature predicted by the regression for a given current.
    pub fn predicted_temperature(current: f64) -> f64 {
        REGRESSION_A + REGRESSION_B * current + REGRESSION_C * current * current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_satisfies_regression() {
        for t in [39.5, 45.0, 60.0, 70.0, 85.0, 120.0, 400.0] {
            let i = CriticalCurrentSolver::solve(t);
            let back = CriticalCurrentSolver::predicted_temperature(i);
            assert!((back - t).abs() < 1e-6, "T({}) = {}, expected {}", i, back, t);
        }
    }

    #[test]
    fn test_returns_larger_root() {
        let t = 70.0;
        let c = REGRESSION_A - t;
        let d = REGRESSION_B * REGRESSION_B - 4.0 * REGRESSION_C * c;
        let smaller = (-REGRESSION_B - d.sqrt()) / (2.0 * REGRESSION_C);

        let i = CriticalCurrentSolver::solve(t);
        assert!(i > smaller);
        assert!(i > 0.0);
        assert!((i - 45.8276).abs() < 1e-3, "got {}", i);
    }

    #[test]
    fn test_unreachable_temperature_falls_back() {
        // Minimum of the curve sits just below A, so anything far below is unreachable
        assert_eq!(CriticalCurrentSolver::solve(10.0), FALLBACK_CRITICAL_CURRENT);
        assert_eq!(
            CriticalCurrentSolver::new(-5.0).critical_current(),
            FALLBACK_CRITICAL_CURRENT
        );
    }

    #[test]
    fn test_default_uses_fixed_critical_temperature() {
        let solver = CriticalCurrentSolver::default();
        assert_eq!(solver.critical_temperature(), CRITICAL_TEMPERATURE);
        assert_eq!(solver.critical_current(), CriticalCurrentSolver::solve(70.0));
    }
}

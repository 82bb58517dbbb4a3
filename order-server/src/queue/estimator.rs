//! Wait estimator
//!
//! Produces a single estimated wait in whole seconds for one order, from
//! data the caller has already fetched. The computation itself is pure and
//! synchronous; the queue service feeds it the backlog count and the local
//! hour.

/// Estimator tuning. All knobs are env-overridable; see [`Config`].
///
/// [`Config`]: crate::core::Config
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    /// Parallel kitchen stations the load is divided across.
    pub concurrency: u32,
    /// Minimum published estimate, seconds.
    pub floor_seconds: i64,
    /// Maximum published estimate, seconds. Also caps the queue-relative
    /// display estimates so long backlogs cannot produce runaway values.
    pub ceiling_seconds: i64,
    /// Fallback per-item preparation time when the menu has no prep data.
    pub default_prep_seconds: i64,
    /// Multiplier applied during peak service windows.
    pub peak_factor: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            concurrency: 2,
            floor_seconds: 120,
            ceiling_seconds: 7200,
            default_prep_seconds: 300,
            peak_factor: 1.2,
        }
    }
}

impl EstimatorConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            concurrency: std::env::var("KITCHEN_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.concurrency),
            floor_seconds: std::env::var("WAIT_FLOOR_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.floor_seconds),
            ceiling_seconds: std::env::var("WAIT_CEILING_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.ceiling_seconds),
            default_prep_seconds: std::env::var("DEFAULT_PREP_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_prep_seconds),
            peak_factor: defaults.peak_factor,
        }
    }
}

/// Lunch and dinner rushes, local hours.
fn is_peak_hour(hour: u32) -> bool {
    (12..14).contains(&hour) || (19..22).contains(&hour)
}

/// Estimate the wait for one order.
///
/// * `base_prep_seconds`: sum of `quantity * avg_prep_seconds` over the
///   order's items.
/// * `ahead`: orders with a smaller id already committed to the kitchen
///   pipeline (VALIDATED/PREPARING/READY). Each adds 5% load, capped at a
///   200% surcharge.
/// * `local_hour`: hour of day, for the peak-window factor.
///
/// The result is always clamped into `[floor_seconds, ceiling_seconds]`.
pub fn estimate_wait_seconds(
    base_prep_seconds: i64,
    ahead: i64,
    local_hour: u32,
    config: &EstimatorConfig,
) -> i64 {
    let backlog_factor = 1.0 + (0.05 * ahead.max(0) as f64).min(2.0);
    let time_factor = if is_peak_hour(local_hour) {
        config.peak_factor
    } else {
        1.0
    };
    let concurrency = config.concurrency.max(1) as f64;

    let raw = (base_prep_seconds.max(0) as f64 * backlog_factor * time_factor / concurrency)
        .round() as i64;
    raw.clamp(config.floor_seconds, config.ceiling_seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EstimatorConfig {
        EstimatorConfig::default()
    }

    #[test]
    fn off_peak_no_backlog() {
        // 2 x 300s + 1 x 180s = 780s base, two stations
        assert_eq!(estimate_wait_seconds(780, 0, 10, &config()), 390);
    }

    #[test]
    fn backlog_factor_is_capped_at_three() {
        // 50 ahead -> 1 + min(2.5, 2.0) = 3.0
        assert_eq!(estimate_wait_seconds(780, 50, 10, &config()), 1170);
        // 40 ahead hits the cap exactly
        assert_eq!(estimate_wait_seconds(780, 40, 10, &config()), 1170);
    }

    #[test]
    fn peak_hours_apply_surcharge() {
        for hour in [12, 13, 19, 20, 21] {
            assert_eq!(estimate_wait_seconds(780, 0, hour, &config()), 468, "hour {hour}");
        }
        for hour in [11, 14, 18, 22, 23] {
            assert_eq!(estimate_wait_seconds(780, 0, hour, &config()), 390, "hour {hour}");
        }
    }

    #[test]
    fn floor_is_enforced() {
        assert_eq!(estimate_wait_seconds(60, 0, 10, &config()), 120);
        assert_eq!(estimate_wait_seconds(0, 0, 10, &config()), 120);
    }

    #[test]
    fn ceiling_is_enforced() {
        assert_eq!(estimate_wait_seconds(100_000, 50, 13, &config()), 7200);
    }

    #[test]
    fn concurrency_divides_the_load() {
        let mut cfg = config();
        cfg.concurrency = 4;
        assert_eq!(estimate_wait_seconds(780, 0, 10, &cfg), 195);
        // A zero concurrency misconfiguration degrades to one station
        cfg.concurrency = 0;
        assert_eq!(estimate_wait_seconds(780, 0, 10, &cfg), 780);
    }

    #[test]
    fn result_stays_in_band_for_arbitrary_inputs() {
        let cfg = config();
        for base in [0, 1, 59, 300, 10_000, 1_000_000] {
            for ahead in [0, 1, 7, 50, 500] {
                for hour in 0..24 {
                    let est = estimate_wait_seconds(base, ahead, hour, &cfg);
                    assert!((cfg.floor_seconds..=cfg.ceiling_seconds).contains(&est));
                }
            }
        }
    }
}

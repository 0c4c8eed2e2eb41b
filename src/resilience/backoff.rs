//! Exponential backoff with jitter

use std::time::Duration;

/// Delay to wait before retry number `attempt` (1-based)
///
/// The delay is `initial_delay * 2^(attempt - 1)`, capped at `max_delay`, then
/// moved by a random offset in `[-jitter * delay, +jitter * delay]`.
/// Attempt 0 counts as attempt 1 and `jitter` is clamped to `[0, 1]`.
///
/// ```
/// use std::time::Duration;
/// use corekit::resilience::exponential_backoff;
///
/// let delay = exponential_backoff(3, Duration::from_millis(100), Duration::from_secs(10), 0.0);
/// assert_eq!(delay, Duration::from_millis(400));
/// ```
pub fn exponential_backoff(
    attempt: u32,
    initial_delay: Duration,
    max_delay: Duration,
    jitter: f64,
) -> Duration {
    let exponent = attempt.max(1) - 1;
    let delay = 2u32
        .checked_pow(exponent)
        .and_then(|factor| initial_delay.checked_mul(factor))
        .map_or(max_delay, |delay| delay.min(max_delay));

    let jitter = if jitter.is_nan() {
        0.0
    } else {
        jitter.clamp(0.0, 1.0)
    };
    if jitter == 0.0 || delay.is_zero() {
        return delay;
    }

    let base = delay.as_secs_f64();
    let jitter_range = base * jitter;
    let jitter_offset = rand::random::<f64>() * jitter_range * 2.0 - jitter_range;
    Duration::try_from_secs_f64((base + jitter_offset).max(0.0)).unwrap_or(delay)
}

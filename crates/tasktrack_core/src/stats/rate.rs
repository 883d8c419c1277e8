//! Completion rate policy.

/// Maps `(completed, scheduled)` to a completion rate.
///
/// - `scheduled > 0`: `completed / scheduled`, unclamped; over-completion
///   yields a rate above `1.0`.
/// - nothing scheduled, nothing completed: `0.0`.
/// - nothing scheduled, something completed: `1.0`.
pub fn completion_rate(completed: u32, scheduled: u32) -> f64 {
    match (completed, scheduled) {
        (0, 0) => 0.0,
        (_, 0) => 1.0,
        (completed, scheduled) => f64::from(completed) / f64::from(scheduled),
    }
}

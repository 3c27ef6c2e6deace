/// Decides whether a fetched resource has reached the awaited condition.
///
/// `matches` must be pure: the same resource always gives the same answer.
pub trait StateComparator<R> {
    fn matches(&self, resource: &R) -> bool;

    /// Human-readable target, used in logs.
    fn describe(&self) -> String;
}

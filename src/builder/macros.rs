//! Macros for ergonomic reading snapshots.

/// Build a reading snapshot from `variable => value` pairs.
///
/// Values are converted to `f64`, so integer literals are accepted.
///
/// # Example
///
/// ```
/// use interval_automaton::readings;
///
/// let snapshot = readings! {
///     1 => 72,
///     2 => 97.5,
/// };
/// assert_eq!(snapshot.get(&1), Some(&72.0));
/// assert_eq!(snapshot.len(), 2);
/// ```
#[macro_export]
macro_rules! readings {
    ($($variable:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut snapshot =
            ::std::collections::HashMap::<$crate::core::VariableId, f64>::new();
        $(
            snapshot.insert($variable, $value as f64);
        )*
        snapshot
    }};
}

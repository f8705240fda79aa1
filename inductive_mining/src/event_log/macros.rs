/// Create a [`Trace`].
///
/// Activities are given as a comma-separated list of anything implementing
/// [`ToString`].
///
/// # Examples
///
/// ```rust
/// use inductive_mining::trace;
///
/// let trace_1 = trace!("register", "check", "decide");
/// let trace_2 = trace!(1, 2, 3);
/// let empty = trace!();
/// assert_eq!(trace_2, vec!["1", "2", "3"]);
/// assert!(empty.is_empty());
/// ```
///
/// [`Trace`]: crate::event_log::Trace
#[macro_export]
macro_rules! trace {
    ($($activity:expr),* $(,)?) => {{
        let trace: $crate::event_log::Trace = vec![$(::std::string::ToString::to_string(&$activity)),*];
        trace
    }};
}

/// Create an [`EventLog`].
///
/// The log is denoted by a comma-separated list of `[activities...] => frequency`
/// mappings. Repeated traces are aggregated.
///
/// # Examples
///
/// ```rust
/// use inductive_mining::event_log;
///
/// let log = event_log!(
///     ["a", "b", "c"] => 10,
///     ["a", "c", "b"] => 5,
///     [] => 1,
/// );
/// assert_eq!(log.len(), 3);
/// assert_eq!(log.total_frequency(), 16);
/// ```
///
/// [`EventLog`]: crate::event_log::EventLog
#[macro_export]
macro_rules! event_log {
    ($([$($activity:expr),* $(,)?] => $frequency:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut log = $crate::event_log::EventLog::new();
        $(
            log.add_trace($crate::trace!($($activity),*), $frequency);
        )*
        log
    }};
}

/// Create a [`Partition`] (a set of activities).
///
/// # Examples
///
/// ```rust
/// use inductive_mining::partition;
///
/// let p = partition!("a", "b");
/// assert!(p.contains("a"));
/// assert_eq!(partition!(1, 2).len(), 2);
/// ```
///
/// [`Partition`]: crate::event_log::Partition
#[macro_export]
macro_rules! partition {
    ($($activity:expr),* $(,)?) => {{
        let partition: $crate::event_log::Partition =
            [$(::std::string::ToString::to_string(&$activity)),*].into_iter().collect();
        partition
    }};
}

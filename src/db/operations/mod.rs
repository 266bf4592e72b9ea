pub mod catalog;
pub mod sessions;
pub mod words;

/// `?,?,...,?` for parameterized IN clauses. Only the placeholder token is
/// interpolated; values are always bound.
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(",")
}

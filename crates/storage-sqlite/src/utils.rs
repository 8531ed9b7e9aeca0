//! SQLite helpers.

/// Storage format for `DATE` columns.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Storage format for timestamp columns.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Chunk size for `IN (...)` parameter lists and batch inserts.
///
/// SQLite caps the number of bound parameters per statement (historically
/// 999). 500 stays safely under the cap with room for other parameters.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Splits a slice into chunks sized for SQLite parameter limits.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_chunks() {
        let items: Vec<i32> = vec![];
        assert!(chunk_for_sqlite(&items).next().is_none());
    }

    #[test]
    fn over_limit_input_is_split() {
        let items: Vec<i32> = (0..1200).collect();
        let chunks: Vec<_> = chunk_for_sqlite(&items).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), SQLITE_MAX_PARAMS_CHUNK);
        assert_eq!(chunks[2].len(), 200);
    }
}

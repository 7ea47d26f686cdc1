use crate::store::RecordStore;
use std::future::Future;

/// Base trait for all scope builders
pub trait ScopeBuilder<T> {
    /// Build the final query and execute it
    fn all<S>(self, store: &S) -> impl Future<Output = Result<Vec<T>, S::Error>> + Send
    where
        S: RecordStore + ?Sized;

    /// Get a single result (first match)
    fn first<S>(self, store: &S) -> impl Future<Output = Result<Option<T>, S::Error>> + Send
    where
        S: RecordStore + ?Sized;

    /// Count the number of results
    fn count<S>(self, store: &S) -> impl Future<Output = Result<i64, S::Error>> + Send
    where
        S: RecordStore + ?Sized;

    /// Check if any results exist
    fn exists<S>(self, store: &S) -> impl Future<Output = Result<bool, S::Error>> + Send
    where
        S: RecordStore + ?Sized;
}

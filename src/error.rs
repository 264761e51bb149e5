use thiserror::Error;

/// Failures surfaced by the archive store.
///
/// A single-row lookup that matches nothing is not a failure; those return
/// `Option::None`. An empty result set and a missing list table are kept
/// distinct: the latter is [`StoreError::SchemaMissing`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The resolved list table does not exist in the database.
    #[error("list table '{0}' does not exist")]
    SchemaMissing(String),

    /// The requested option combination is not implemented for this query.
    #[error("not implemented: {0}")]
    Unsupported(String),

    /// Any lower-level database failure, propagated unchanged.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

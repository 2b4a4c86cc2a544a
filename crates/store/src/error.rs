/// Errors returned by an [`ExitEventStore`].
///
/// [`ExitEventStore`]: crate::ExitEventStore
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// No exit event with the given id is stored.
    #[error("exit event {id} not found")]
    NotFound {
        /// The requested exit id.
        id: u64,
    },
    /// The storage backend failed.
    #[error("exit event store backend error: {0}")]
    Backend(#[source] Box<dyn core::error::Error + Send + Sync>),
    /// A stored record could not be encoded or decoded.
    #[error("exit event store codec error: {0}")]
    Codec(#[source] Box<dyn core::error::Error + Send + Sync>),
    /// A stored key or value has an unexpected layout.
    #[error("corrupt record in {column}")]
    Corrupt {
        /// The column holding the record.
        column: &'static str,
    },
}

impl StoreError {
    /// Wrap a storage backend error.
    pub fn backend<E>(error: E) -> Self
    where
        E: core::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(error))
    }

    /// Wrap a record codec error.
    pub fn codec<E>(error: E) -> Self
    where
        E: core::error::Error + Send + Sync + 'static,
    {
        Self::Codec(Box::new(error))
    }

    /// True if the error is a missing exit event.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

//! Storage contract and the built-in in-memory store for the issued access token.

pub mod memory;

pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::TokenRecord};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Holder of the single process-wide access token.
///
/// Exactly one record exists at a time. Writes replace the previous record unconditionally;
/// concurrent writers race and the last write wins.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Persists the record, replacing any previous one.
	fn save(&self, record: TokenRecord) -> StoreFuture<'_, ()>;

	/// Fetches the current record, if one was ever saved.
	fn fetch(&self) -> StoreFuture<'_, Option<TokenRecord>>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum StoreError {
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

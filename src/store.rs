//! Storage contract and built-in store implementations for the persisted token.
//!
//! The client keeps exactly one token at a time. Every successful authorization or refresh
//! replaces the stored value, and deauthorization deletes it.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::Token};

/// Future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract for the single persisted [`Token`].
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Persists `token`, replacing any previously stored value.
	fn save(&self, token: Token) -> StoreFuture<'_, ()>;

	/// Returns the stored token, if any.
	fn get(&self) -> StoreFuture<'_, Option<Token>>;

	/// Removes the stored token. Deleting an empty store is not an error.
	fn delete(&self) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

//! Thread-safe in-memory [`TokenStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::Token,
	store::{StoreFuture, TokenStore},
};

/// Thread-safe storage backend that keeps the token in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<Option<Token>>>);
impl MemoryStore {
	/// Creates a store pre-populated with `token`.
	pub fn with_token(token: Token) -> Self {
		Self(Arc::new(RwLock::new(Some(token))))
	}

	/// Returns the stored token without going through the async contract.
	pub fn snapshot(&self) -> Option<Token> {
		self.0.read().clone()
	}
}
impl TokenStore for MemoryStore {
	fn save(&self, token: Token) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			*slot.write() = Some(token);

			Ok(())
		})
	}

	fn get(&self) -> StoreFuture<'_, Option<Token>> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(slot.read().clone()) })
	}

	fn delete(&self) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			slot.write().take();

			Ok(())
		})
	}
}

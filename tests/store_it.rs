#![cfg(all(feature = "reqwest", feature = "test"))]

// std
use std::{env, fs, path::PathBuf, process};
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use stravakit::{
	_preludet::*,
	auth::Secret,
	executor::ReqwestTransportErrorMapper,
	flows::StravaClient,
	store::{FileStore, MemoryStore, TokenStore},
};

fn temp_path(label: &str) -> PathBuf {
	env::temp_dir().join(format!(
		"stravakit_store_it_{label}_{}_{}.json",
		process::id(),
		OffsetDateTime::now_utc().unix_timestamp_nanos(),
	))
}

fn file_backed_client(base: &str, store: Arc<FileStore>) -> ReqwestTestClient {
	let store: Arc<dyn TokenStore> = store;

	StravaClient::with_http_client(
		store,
		test_config(base),
		test_reqwest_http_client(),
		Arc::new(ReqwestTransportErrorMapper),
	)
}

#[tokio::test]
async fn memory_store_replaces_and_deletes() {
	let store = MemoryStore::default();

	assert!(store.get().await.expect("Reading an empty store should succeed.").is_none());

	store
		.save(token_expiring_in("access-1", "refresh-1", Duration::hours(1)))
		.await
		.expect("First save should succeed.");
	store
		.save(token_expiring_in("access-2", "refresh-2", Duration::hours(1)))
		.await
		.expect("Second save should succeed.");

	let stored = store
		.get()
		.await
		.expect("Reading the store should succeed.")
		.expect("Stored token should be present.");

	assert_eq!(stored.bearer(), Some("access-2"));

	store.delete().await.expect("Delete should succeed.");
	store.delete().await.expect("Deleting twice should succeed.");

	assert!(store.snapshot().is_none());
}

#[tokio::test]
async fn refreshed_token_survives_reopen_and_deauthorize_removes_file() {
	let server = MockServer::start_async().await;
	let path = temp_path("lifecycle");
	let store = Arc::new(FileStore::open(&path).expect("Opening the file store should succeed."));

	store
		.save(token_expiring_in("access-old", "refresh-old", Duration::minutes(-1)))
		.await
		.expect("Seeding the file store should succeed.");

	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200).json_body(json!({
				"token_type": "Bearer",
				"access_token": "access-persisted",
				"refresh_token": "refresh-persisted",
				"expires_at": (OffsetDateTime::now_utc() + Duration::hours(6)).unix_timestamp(),
			}));
		})
		.await;
	let revoke = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/deauthorize");
			then.status(200).json_body(json!({ "access_token": "access-persisted" }));
		})
		.await;
	let client = file_backed_client(&server.base_url(), store);

	client.get_valid_token().await.expect("Refresh against the file store should succeed.");

	refresh.assert_async().await;

	let reopened = FileStore::open(&path).expect("Reopening the file store should succeed.");
	let persisted = reopened
		.get()
		.await
		.expect("Reading the reopened store should succeed.")
		.expect("Refreshed token should be on disk.");

	assert_eq!(persisted.bearer(), Some("access-persisted"));
	assert_eq!(persisted.refresh_token.as_ref().map(Secret::expose), Some("refresh-persisted"));

	client.deauthorize().await.expect("Deauthorization should succeed.");

	revoke.assert_async().await;

	assert!(!path.exists());

	let _ = fs::remove_file(&path);
}

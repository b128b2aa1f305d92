// crates.io
use time::macros;
// self
use kis_quote_proxy::{
	auth::TokenRecord,
	store::{MemoryStore, TokenStore},
};

fn build_record(access: &str) -> TokenRecord {
	TokenRecord::new(access)
		.with_token_type("Bearer")
		.with_expires_in(86_400)
		.with_issued_at(macros::datetime!(2025-11-10 12:00 UTC))
}

#[tokio::test]
async fn empty_store_fetches_nothing() {
	let store = MemoryStore::default();

	assert!(store.fetch().await.expect("Fetching from an empty store should succeed.").is_none());
}

#[tokio::test]
async fn save_replaces_the_previous_record() {
	let store = MemoryStore::default();

	store.save(build_record("access-1")).await.expect("Saving the first record should succeed.");
	store.save(build_record("access-2")).await.expect("Saving the second record should succeed.");

	let fetched = store
		.fetch()
		.await
		.expect("Fetching the current record should succeed.")
		.expect("Stored record should remain present.");

	assert_eq!(fetched.access_token.expose(), "access-2");
	assert_eq!(fetched.issued_at, macros::datetime!(2025-11-10 12:00 UTC));
}

#[tokio::test]
async fn clones_share_one_slot() {
	let store = MemoryStore::default();
	let reader = store.clone();

	store.save(build_record("shared")).await.expect("Saving through one handle should succeed.");

	let fetched = reader
		.fetch()
		.await
		.expect("Fetching through a clone should succeed.")
		.expect("Clone should observe the saved record.");

	assert_eq!(fetched.access_token.expose(), "shared");
}

#[tokio::test]
async fn concurrent_writers_leave_exactly_one_record() {
	let store = MemoryStore::default();
	let writers = (0..16).map(|i| {
		let store = store.clone();

		tokio::spawn(async move { store.save(build_record(&format!("access-{i}"))).await })
	});

	for writer in writers.collect::<Vec<_>>() {
		writer
			.await
			.expect("Writer task should not panic.")
			.expect("Concurrent save should succeed.");
	}

	let fetched = store
		.fetch()
		.await
		.expect("Fetching after concurrent writes should succeed.")
		.expect("One record should win.");

	assert!(fetched.access_token.expose().starts_with("access-"));
}

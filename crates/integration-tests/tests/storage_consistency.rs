//! Storage-model tests: file-store persistence, storage failure surfacing,
//! and the documented lost-update race.
//!
//! The race test does not fix anything - it pins down the weak consistency
//! model inherited from the source system (two browser tabs writing the
//! whole users collection, last writer wins) so a future change to it is
//! deliberate rather than accidental.

use uwinfly_integration_tests::fixture_catalog;
use uwinfly_storefront::services::auth::AuthService;
use uwinfly_storefront::services::cart::CartService;
use uwinfly_storefront::store::{
    CredentialStore, JsonFileStore, MemoryStore, StorageBackend, StorageError,
};
use uwinfly_core::ProductId;

#[test]
fn file_store_persists_all_three_collections() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = fixture_catalog();

    {
        let backend = JsonFileStore::open(dir.path()).unwrap();
        let auth = AuthService::new(&backend);
        auth.register("Dina", "dina@x.com", "password1").unwrap();
        auth.login("dina@x.com", "password1").unwrap();
        CartService::new(&backend, &catalog)
            .add_item(ProductId::new(7), 1)
            .unwrap();
        uwinfly_storefront::services::checkout::CheckoutService::new(&backend, &catalog)
            .begin_checkout()
            .unwrap();
    }

    for file in [
        "uwinfly_users.json",
        "uwinfly_current_user.json",
        "uwinfly_orders.json",
    ] {
        assert!(dir.path().join(file).exists(), "{file} should exist");
    }
}

#[test]
fn unusable_data_dir_is_storage_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let blocking_file = dir.path().join("not-a-dir");
    std::fs::write(&blocking_file, "x").unwrap();

    // opening a store where the "directory" is a file fails cleanly
    assert!(matches!(
        JsonFileStore::open(&blocking_file),
        Err(StorageError::Unavailable(_))
    ));
}

#[test]
fn corrupt_users_collection_is_surfaced_not_swallowed() {
    let backend = MemoryStore::new();
    backend.write("uwinfly_users", "]]garbage[[").unwrap();

    let auth = AuthService::new(&backend);
    assert!(matches!(
        auth.register("Dina", "dina@x.com", "password1"),
        Err(uwinfly_storefront::services::auth::AuthError::Storage(
            StorageError::Corrupt(_)
        ))
    ));
}

/// Two "tabs" racing on the users collection: both read, both write, the
/// second write silently discards the first one's registration. This is
/// the documented last-writer-wins limitation.
#[test]
fn concurrent_whole_collection_writes_lose_updates() {
    let backend = MemoryStore::new();
    let tab_a = CredentialStore::new(&backend);
    let tab_b = CredentialStore::new(&backend);

    // seed one record
    AuthService::new(&backend)
        .register("Seed", "seed@x.com", "password1")
        .unwrap();

    // both tabs snapshot the collection
    let mut users_a = tab_a.list_users().unwrap();
    let mut users_b = tab_b.list_users().unwrap();

    // each appends its own user and writes the whole collection back
    let mut user_a = users_a.first().unwrap().clone();
    user_a.id = uwinfly_core::UserId::new("from-tab-a");
    user_a.name = "TabA".to_owned();
    user_a.email = uwinfly_core::Email::parse("tab-a@x.com").unwrap();
    users_a.push(user_a);
    tab_a.save_users(&users_a).unwrap();

    let mut user_b = users_b.first().unwrap().clone();
    user_b.id = uwinfly_core::UserId::new("from-tab-b");
    user_b.name = "TabB".to_owned();
    user_b.email = uwinfly_core::Email::parse("tab-b@x.com").unwrap();
    users_b.push(user_b);
    tab_b.save_users(&users_b).unwrap();

    // tab B won; tab A's append is gone
    let survivors: Vec<String> = tab_a
        .list_users()
        .unwrap()
        .into_iter()
        .map(|u| u.name)
        .collect();
    assert_eq!(survivors, vec!["Seed".to_owned(), "TabB".to_owned()]);
}

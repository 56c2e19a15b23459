//! PostgreSQL `EntryStore` tests.
//!
//! These need a live database and are ignored by default:
//! `DATABASE_URL=postgres://... cargo test -p api --test db_store -- --ignored`

use api_lib::adapters::DbAdapter;
use journal_core::{EntryStore, NewJournalEntry, PortError};
use sqlx::postgres::PgPoolOptions;

async fn store() -> DbAdapter {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("failed to connect to DATABASE_URL");
    let adapter = DbAdapter::new(pool);
    adapter.run_migrations().await.expect("migrations failed");
    adapter
}

fn entry(user_id: i32, mood: &str) -> NewJournalEntry {
    NewJournalEntry {
        user_id: Some(user_id),
        transcript: "db store test".to_string(),
        audio_url: None,
        mood: mood.to_string(),
        mood_emoji: "🙂".to_string(),
        summary: "A test entry".to_string(),
        ai_response: "Theek hai".to_string(),
        duration: Some(5),
    }
}

/// A user id no other test run is likely to share.
fn unique_user() -> i32 {
    (chrono::Utc::now().timestamp_subsec_nanos() % 1_000_000) as i32 + 1_000_000
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn create_get_delete_roundtrip() {
    let store = store().await;
    let user = unique_user();

    let created = store.create_entry(entry(user, "Calm")).await.unwrap();
    assert_eq!(created.user_id, Some(user));

    let fetched = store.get_entry_by_id(created.id).await.unwrap();
    assert_eq!(fetched.as_ref().map(|e| e.id), Some(created.id));
    assert_eq!(fetched.map(|e| e.mood), Some("Calm".to_string()));

    assert!(store.delete_entry(created.id).await.unwrap());
    assert!(!store.delete_entry(created.id).await.unwrap());
    assert!(store.get_entry_by_id(created.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn list_is_newest_first_per_owner() {
    let store = store().await;
    let user = unique_user();

    let first = store.create_entry(entry(user, "Happy")).await.unwrap();
    let second = store.create_entry(entry(user, "Sad")).await.unwrap();

    let listed: Vec<i32> = store
        .list_entries(Some(user))
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(listed, vec![second.id, first.id]);

    for id in listed {
        store.delete_entry(id).await.unwrap();
    }
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn blank_fields_violate_the_table_checks() {
    let store = store().await;

    let err = store
        .create_entry(entry(unique_user(), "  "))
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::InvalidEntry(_)), "got {:?}", err);
}

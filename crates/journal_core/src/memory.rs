//! crates/journal_core/src/memory.rs
//!
//! An in-process `EntryStore` for tests and local development. It honours the
//! same contract as the PostgreSQL adapter, including listing order.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{JournalEntry, NewJournalEntry};
use crate::ports::{EntryStore, PortError, PortResult};

struct Entries {
    rows: BTreeMap<i32, JournalEntry>,
    next_id: i32,
}

pub struct InMemoryEntryStore {
    entries: RwLock<Entries>,
}

impl InMemoryEntryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Entries {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryEntryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntryStore for InMemoryEntryStore {
    async fn create_entry(&self, entry: NewJournalEntry) -> PortResult<JournalEntry> {
        let mut entries = self.entries.write().await;

        let id = entries.next_id;
        entries.next_id = id
            .checked_add(1)
            .ok_or_else(|| PortError::Unexpected("entry id space exhausted".to_string()))?;

        let stored = JournalEntry {
            id,
            user_id: entry.user_id,
            transcript: entry.transcript,
            audio_url: entry.audio_url,
            mood: entry.mood,
            mood_emoji: entry.mood_emoji,
            summary: entry.summary,
            ai_response: entry.ai_response,
            created_at: Utc::now(),
            duration: entry.duration,
        };
        entries.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_entries(&self, owner_id: Option<i32>) -> PortResult<Vec<JournalEntry>> {
        let entries = self.entries.read().await;
        let mut listed: Vec<JournalEntry> = entries
            .rows
            .values()
            .filter(|e| owner_id.map_or(true, |owner| e.user_id == Some(owner)))
            .cloned()
            .collect();
        listed.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(listed)
    }

    async fn get_entry_by_id(&self, id: i32) -> PortResult<Option<JournalEntry>> {
        Ok(self.entries.read().await.rows.get(&id).cloned())
    }

    async fn delete_entry(&self, id: i32) -> PortResult<bool> {
        Ok(self.entries.write().await.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_entry(user_id: Option<i32>, mood: &str) -> NewJournalEntry {
        NewJournalEntry {
            user_id,
            transcript: format!("feeling {}", mood),
            audio_url: None,
            mood: mood.to_string(),
            mood_emoji: "🙂".to_string(),
            summary: "summary".to_string(),
            ai_response: "response".to_string(),
            duration: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_timestamp() {
        let store = InMemoryEntryStore::new();
        let before = Utc::now();

        let first = store.create_entry(new_entry(None, "Happy")).await.unwrap();
        let second = store.create_entry(new_entry(None, "Sad")).await.unwrap();

        assert_ne!(first.id, second.id);
        assert!(first.created_at >= before);
        assert_eq!(first.user_id, None);
        assert_eq!(first.audio_url, None);
        assert_eq!(first.duration, None);
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let store = InMemoryEntryStore::new();
        let older = store.create_entry(new_entry(None, "Happy")).await.unwrap();
        let newer = store.create_entry(new_entry(None, "Sad")).await.unwrap();

        let listed = store.list_entries(None).await.unwrap();

        let ids: Vec<i32> = listed.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }

    #[tokio::test]
    async fn list_filters_by_owner_and_keeps_order() {
        let store = InMemoryEntryStore::new();
        let a1 = store.create_entry(new_entry(Some(1), "Happy")).await.unwrap();
        store.create_entry(new_entry(Some(2), "Sad")).await.unwrap();
        store.create_entry(new_entry(None, "Calm")).await.unwrap();
        let a2 = store.create_entry(new_entry(Some(1), "Angry")).await.unwrap();

        let listed = store.list_entries(Some(1)).await.unwrap();

        let ids: Vec<i32> = listed.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![a2.id, a1.id]);
        assert!(store.list_entries(Some(99)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_reports_whether_an_entry_existed() {
        let store = InMemoryEntryStore::new();
        let created = store.create_entry(new_entry(None, "Happy")).await.unwrap();

        assert!(store.delete_entry(created.id).await.unwrap());
        assert_eq!(store.get_entry_by_id(created.id).await.unwrap(), None);
        assert!(!store.delete_entry(created.id).await.unwrap());
        assert!(!store.delete_entry(4242).await.unwrap());
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = InMemoryEntryStore::new();
        let first = store.create_entry(new_entry(None, "Happy")).await.unwrap();
        store.delete_entry(first.id).await.unwrap();

        let second = store.create_entry(new_entry(None, "Happy")).await.unwrap();

        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn concurrent_creates_get_unique_ids() {
        let store = Arc::new(InMemoryEntryStore::new());
        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.create_entry(new_entry(Some(i % 3), "Calm")).await.unwrap().id
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), 32);
        assert_eq!(store.list_entries(None).await.unwrap().len(), 32);
    }
}

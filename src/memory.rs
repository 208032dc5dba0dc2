//! In-process user and note stores. Used when no database is configured
//! and by the test suite.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    auth::{
        repo::UserStore,
        repo_types::{NewUser, User},
    },
    notes::{
        repo::NoteStore,
        repo_types::{NewNote, Note},
    },
};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    notes: RwLock<Vec<Note>>,
    calls: AtomicUsize,
}

impl MemoryStore {
    /// Number of store operations served so far.
    #[cfg(test)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        self.touch();
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        self.touch();
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: NewUser) -> anyhow::Result<Option<User>> {
        self.touch();
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Ok(None);
        }
        let user = User {
            id: Uuid::new_v4(),
            full_name: user.full_name,
            email: user.email,
            password_hash: user.password_hash.into_string(),
            created_on: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(Some(user))
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn create(&self, note: NewNote) -> anyhow::Result<Note> {
        self.touch();
        let note = Note {
            id: Uuid::new_v4(),
            title: note.title,
            content: note.content,
            tags: note.tags,
            is_pinned: false,
            user_id: note.user_id,
            created_on: OffsetDateTime::now_utc(),
        };
        self.notes.write().await.push(note.clone());
        Ok(note)
    }

    async fn find_owned(&self, user_id: Uuid, note_id: Uuid) -> anyhow::Result<Option<Note>> {
        self.touch();
        let notes = self.notes.read().await;
        Ok(notes
            .iter()
            .find(|n| n.id == note_id && n.user_id == user_id)
            .cloned())
    }

    async fn save(&self, note: &Note) -> anyhow::Result<bool> {
        self.touch();
        let mut notes = self.notes.write().await;
        match notes
            .iter_mut()
            .find(|n| n.id == note.id && n.user_id == note.user_id)
        {
            Some(slot) => {
                *slot = note.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_owned(&self, user_id: Uuid, note_id: Uuid) -> anyhow::Result<bool> {
        self.touch();
        let mut notes = self.notes.write().await;
        let before = notes.len();
        notes.retain(|n| !(n.id == note_id && n.user_id == user_id));
        Ok(notes.len() != before)
    }

    async fn list_by_owner(&self, user_id: Uuid) -> anyhow::Result<Vec<Note>> {
        self.touch();
        let notes = self.notes.read().await;
        Ok(notes.iter().filter(|n| n.user_id == user_id).cloned().collect())
    }

    async fn search_by_owner(&self, user_id: Uuid, query: &str) -> anyhow::Result<Vec<Note>> {
        self.touch();
        let needle = query.to_lowercase();
        let notes = self.notes.read().await;
        Ok(notes
            .iter()
            .filter(|n| n.user_id == user_id)
            .filter(|n| {
                n.title.to_lowercase().contains(&needle)
                    || n.content.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::HashedPassword;

    #[tokio::test]
    async fn create_user_rejects_taken_email() {
        let store = MemoryStore::default();
        let new = NewUser {
            full_name: "A".into(),
            email: "a@x.io".into(),
            password_hash: HashedPassword::hash("h").unwrap(),
        };
        assert!(UserStore::create(&store, new.clone()).await.unwrap().is_some());
        assert!(UserStore::create(&store, new).await.unwrap().is_none());
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn created_on_is_per_record() {
        let store = MemoryStore::default();
        let owner = Uuid::new_v4();
        let make = |t: &str| NewNote {
            user_id: owner,
            title: t.into(),
            content: "c".into(),
            tags: vec![],
        };
        let a = NoteStore::create(&store, make("a")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let b = NoteStore::create(&store, make("b")).await.unwrap();
        assert!(b.created_on > a.created_on);
    }
}

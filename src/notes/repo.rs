use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::notes::repo_types::{NewNote, Note};

/// Persistence for notes. Every lookup takes the owner id; there is no
/// way to reach a note without it.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn create(&self, note: NewNote) -> anyhow::Result<Note>;

    async fn find_owned(&self, user_id: Uuid, note_id: Uuid) -> anyhow::Result<Option<Note>>;

    /// Writes back a note previously read with `find_owned`. Returns
    /// `false` if the note vanished in between.
    async fn save(&self, note: &Note) -> anyhow::Result<bool>;

    /// Returns `false` if no such note belongs to `user_id`.
    async fn delete_owned(&self, user_id: Uuid, note_id: Uuid) -> anyhow::Result<bool>;

    /// All of the owner's notes in insertion order.
    async fn list_by_owner(&self, user_id: Uuid) -> anyhow::Result<Vec<Note>>;

    /// Owner's notes whose title or content contains `query`, ignoring case.
    async fn search_by_owner(&self, user_id: Uuid, query: &str) -> anyhow::Result<Vec<Note>>;
}

#[derive(Clone)]
pub struct PgNoteStore {
    db: PgPool,
}

impl PgNoteStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Escapes LIKE wildcards so the query matches literally.
pub(crate) fn like_pattern(query: &str) -> String {
    let mut out = String::with_capacity(query.len() + 2);
    out.push('%');
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn create(&self, note: NewNote) -> anyhow::Result<Note> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (id, user_id, title, content, tags)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, content, tags, is_pinned, user_id, created_on
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(note.user_id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(&note.tags)
        .fetch_one(&self.db)
        .await?;
        Ok(note)
    }

    async fn find_owned(&self, user_id: Uuid, note_id: Uuid) -> anyhow::Result<Option<Note>> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, content, tags, is_pinned, user_id, created_on
            FROM notes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(note_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(note)
    }

    async fn save(&self, note: &Note) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE notes
               SET title = $3, content = $4, tags = $5, is_pinned = $6
             WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(note.id)
        .bind(note.user_id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(&note.tags)
        .bind(note.is_pinned)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete_owned(&self, user_id: Uuid, note_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
            .bind(note_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_by_owner(&self, user_id: Uuid) -> anyhow::Result<Vec<Note>> {
        let rows = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, content, tags, is_pinned, user_id, created_on
            FROM notes
            WHERE user_id = $1
            ORDER BY seq
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn search_by_owner(&self, user_id: Uuid, query: &str) -> anyhow::Result<Vec<Note>> {
        let rows = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, content, tags, is_pinned, user_id, created_on
            FROM notes
            WHERE user_id = $1
              AND (title ILIKE $2 OR content ILIKE $2)
            ORDER BY seq
            "#,
        )
        .bind(user_id)
        .bind(like_pattern(query))
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}

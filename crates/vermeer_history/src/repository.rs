//! SQLite implementation of the history store.

use crate::connection::{establish_connection, establish_in_memory, run_migrations};
use crate::models::{HistoryRow, NewHistoryRow};
use crate::schema::generation_history;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, instrument};
use vermeer_core::{HistoryItem, Modality, NewHistoryItem};
use vermeer_error::{HistoryError, HistoryErrorKind, HistoryResult};
use vermeer_interface::{HistoryStore, HistoryStream};

/// History store backed by a single SQLite connection.
///
/// All statements run on the blocking pool behind one mutex, so writes from
/// concurrent generations are serialized. Every committed write bumps a
/// revision counter that drives [`HistoryStore::observe_all`].
#[derive(Clone)]
pub struct SqliteHistoryStore {
    conn: Arc<Mutex<SqliteConnection>>,
    revision: Arc<watch::Sender<u64>>,
    location: Option<PathBuf>,
}

impl std::fmt::Debug for SqliteHistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteHistoryStore")
            .field("location", &self.location)
            .field("revision", &*self.revision.borrow())
            .finish_non_exhaustive()
    }
}

impl SqliteHistoryStore {
    /// Open the database file at `path` and apply pending migrations.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened or migrated.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> HistoryResult<Self> {
        let path = path.as_ref();
        let mut conn = establish_connection(path)?;
        run_migrations(&mut conn)?;
        Ok(Self::from_connection(conn, Some(path.to_path_buf())))
    }

    /// Fresh in-memory store, used by tests and ephemeral sessions.
    ///
    /// # Errors
    ///
    /// Returns error if migrations fail.
    pub fn in_memory() -> HistoryResult<Self> {
        let mut conn = establish_in_memory()?;
        run_migrations(&mut conn)?;
        Ok(Self::from_connection(conn, None))
    }

    fn from_connection(conn: SqliteConnection, location: Option<PathBuf>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            conn: Arc::new(Mutex::new(conn)),
            revision: Arc::new(revision),
            location,
        }
    }

    /// Database file, or `None` for in-memory stores.
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    async fn run<T, F>(&self, op: F) -> HistoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> HistoryResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| {
                HistoryError::new(HistoryErrorKind::Connection(
                    "history connection lock poisoned".to_string(),
                ))
            })?;
            op(&mut guard)
        })
        .await
        .map_err(|e| {
            HistoryError::new(HistoryErrorKind::Connection(format!(
                "history worker failed: {}",
                e
            )))
        })?
    }

    fn changed(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    fn into_items(rows: Vec<HistoryRow>) -> HistoryResult<Vec<HistoryItem>> {
        rows.into_iter().map(HistoryItem::try_from).collect()
    }
}

/// Escape LIKE wildcards so the query matches literally.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    #[instrument(skip(self, item), fields(task_id = %item.task_id, modality = %item.modality))]
    async fn save(&self, item: NewHistoryItem) -> HistoryResult<i64> {
        let row = NewHistoryRow::from(item);
        let id = self
            .run(move |conn| {
                use generation_history::dsl;
                Ok(diesel::insert_into(dsl::generation_history)
                    .values(&row)
                    .returning(dsl::id)
                    .get_result::<i64>(conn)?)
            })
            .await?;

        self.changed();
        info!(id, "Saved history item");
        Ok(id)
    }

    async fn query_all(&self) -> HistoryResult<Vec<HistoryItem>> {
        let rows = self
            .run(|conn| {
                use generation_history::dsl;
                Ok(dsl::generation_history
                    .order((dsl::created_at.desc(), dsl::id.desc()))
                    .select(HistoryRow::as_select())
                    .load::<HistoryRow>(conn)?)
            })
            .await?;
        Self::into_items(rows)
    }

    #[instrument(skip(self))]
    async fn query_by_modality(&self, modality: Modality) -> HistoryResult<Vec<HistoryItem>> {
        let modality = modality.to_string();
        let rows = self
            .run(move |conn| {
                use generation_history::dsl;
                Ok(dsl::generation_history
                    .filter(dsl::modality.eq(modality))
                    .order((dsl::created_at.desc(), dsl::id.desc()))
                    .select(HistoryRow::as_select())
                    .load::<HistoryRow>(conn)?)
            })
            .await?;
        Self::into_items(rows)
    }

    #[instrument(skip(self))]
    async fn search_by_prompt(&self, query: &str) -> HistoryResult<Vec<HistoryItem>> {
        // SQLite LIKE is case-insensitive for ASCII
        let pattern = like_pattern(query);
        let rows = self
            .run(move |conn| {
                use generation_history::dsl;
                Ok(dsl::generation_history
                    .filter(dsl::prompt.like(pattern).escape('\\'))
                    .order((dsl::created_at.desc(), dsl::id.desc()))
                    .select(HistoryRow::as_select())
                    .load::<HistoryRow>(conn)?)
            })
            .await?;
        Self::into_items(rows)
    }

    async fn find_by_id(&self, id: i64) -> HistoryResult<Option<HistoryItem>> {
        let row = self
            .run(move |conn| {
                use generation_history::dsl;
                Ok(dsl::generation_history
                    .find(id)
                    .select(HistoryRow::as_select())
                    .first::<HistoryRow>(conn)
                    .optional()?)
            })
            .await?;
        row.map(HistoryItem::try_from).transpose()
    }

    async fn find_by_task_id(&self, task_id: &str) -> HistoryResult<Option<HistoryItem>> {
        let task_id = task_id.to_string();
        let row = self
            .run(move |conn| {
                use generation_history::dsl;
                Ok(dsl::generation_history
                    .filter(dsl::task_id.eq(task_id))
                    .order((dsl::created_at.desc(), dsl::id.desc()))
                    .select(HistoryRow::as_select())
                    .first::<HistoryRow>(conn)
                    .optional()?)
            })
            .await?;
        row.map(HistoryItem::try_from).transpose()
    }

    async fn count(&self) -> HistoryResult<i64> {
        self.run(|conn| {
            use generation_history::dsl;
            Ok(dsl::generation_history.count().get_result::<i64>(conn)?)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: i64) -> HistoryResult<bool> {
        let deleted = self
            .run(move |conn| {
                use generation_history::dsl;
                Ok(diesel::delete(dsl::generation_history.find(id)).execute(conn)?)
            })
            .await?;

        if deleted > 0 {
            self.changed();
            info!("Deleted history item");
        }
        Ok(deleted > 0)
    }

    #[instrument(skip(self))]
    async fn delete_by_task_id(&self, task_id: &str) -> HistoryResult<usize> {
        let task_id = task_id.to_string();
        let deleted = self
            .run(move |conn| {
                use generation_history::dsl;
                Ok(
                    diesel::delete(dsl::generation_history.filter(dsl::task_id.eq(task_id)))
                        .execute(conn)?,
                )
            })
            .await?;

        if deleted > 0 {
            self.changed();
            info!(deleted, "Deleted history items for task");
        }
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn clear_all(&self) -> HistoryResult<usize> {
        let deleted = self
            .run(|conn| {
                use generation_history::dsl;
                Ok(diesel::delete(dsl::generation_history).execute(conn)?)
            })
            .await?;

        if deleted > 0 {
            self.changed();
        }
        info!(deleted, "Cleared history");
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn update_local_path(&self, id: i64, path: &str) -> HistoryResult<()> {
        let path = path.to_string();
        let updated = self
            .run(move |conn| {
                use generation_history::dsl;
                Ok(diesel::update(dsl::generation_history.find(id))
                    .set(dsl::local_path.eq(Some(path)))
                    .execute(conn)?)
            })
            .await?;

        if updated == 0 {
            return Err(HistoryError::new(HistoryErrorKind::NotFound));
        }

        self.changed();
        debug!("Recorded local media path");
        Ok(())
    }

    fn observe_all(&self) -> HistoryStream {
        let store = self.clone();
        let mut revisions = WatchStream::new(self.revision.subscribe());

        Box::pin(async_stream::stream! {
            while revisions.next().await.is_some() {
                yield store.query_all().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("sunset"), "%sunset%");
        assert_eq!(like_pattern("100%_done"), "%100\\%\\_done%");
        assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
    }
}

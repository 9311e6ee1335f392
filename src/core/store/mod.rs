//! Clip Store
//!
//! SQLite persistence for video records and their detected clips. The
//! controller treats the store as an optional capability: persistence failures
//! degrade to a notice and never interrupt playback.

use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

use crate::core::clips::{Clip, VideoRecord, VideoStatus};
use crate::core::{CoreError, CoreResult, VideoId};

// =============================================================================
// Clip Store Trait
// =============================================================================

/// Persistence boundary for videos and clips
pub trait ClipStore: Send + Sync {
    /// Inserts a video record (typically in the `Analyzing` state), returning
    /// its id
    fn insert_video(&self, record: &VideoRecord) -> CoreResult<VideoId>;

    /// Updates the analysis status of an existing video
    fn update_video_status(&self, video_id: &VideoId, status: VideoStatus) -> CoreResult<()>;

    /// Fetches a video record by id
    fn get_video(&self, video_id: &VideoId) -> CoreResult<Option<VideoRecord>>;

    /// Appends a batch of clips for a video
    fn insert_many(&self, video_id: &VideoId, clips: &[Clip]) -> CoreResult<()>;

    /// Lists a video's clips ranked by score descending.
    ///
    /// Equal scores come back in insertion order.
    fn list_by_video(&self, video_id: &VideoId) -> CoreResult<Vec<Clip>>;
}

// =============================================================================
// SQLite Clip Store
// =============================================================================

/// SQLite-backed clip store
pub struct SqliteClipStore {
    conn: Mutex<Connection>,
}

impl SqliteClipStore {
    /// Opens (or creates) a clip database at the specified path
    pub fn open<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| CoreError::Persistence(format!("Failed to open clip database: {}", e)))?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Creates an in-memory database (for testing)
    pub fn in_memory() -> CoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            CoreError::Persistence(format!("Failed to create in-memory database: {}", e))
        })?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> CoreResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            -- Videos table: one row per loaded source
            CREATE TABLE IF NOT EXISTS videos (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                source TEXT NOT NULL,
                duration_sec REAL NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            -- Clips table: detected highlights; rowid preserves arrival order
            CREATE TABLE IF NOT EXISTS clips (
                id TEXT PRIMARY KEY,
                video_id TEXT NOT NULL REFERENCES videos(id),
                start_sec REAL NOT NULL,
                end_sec REAL NOT NULL,
                score REAL NOT NULL,
                reason TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_clips_video ON clips(video_id);
            "#,
        )
        .map_err(|e| CoreError::Persistence(format!("Failed to initialize schema: {}", e)))?;

        Ok(())
    }

    fn lock(&self) -> CoreResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| CoreError::Persistence("Clip database lock poisoned".to_string()))
    }
}

impl ClipStore for SqliteClipStore {
    fn insert_video(&self, record: &VideoRecord) -> CoreResult<VideoId> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO videos (id, title, source, duration_sec, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.id,
                record.title,
                record.source,
                record.duration_sec,
                record.status.as_str(),
                record.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| CoreError::Persistence(format!("Failed to insert video: {}", e)))?;
        Ok(record.id.clone())
    }

    fn update_video_status(&self, video_id: &VideoId, status: VideoStatus) -> CoreResult<()> {
        let conn = self.lock()?;
        let updated = conn
            .execute(
                "UPDATE videos SET status = ?1 WHERE id = ?2",
                params![status.as_str(), video_id],
            )
            .map_err(|e| CoreError::Persistence(format!("Failed to update video status: {}", e)))?;

        if updated == 0 {
            return Err(CoreError::VideoNotFound(video_id.clone()));
        }
        Ok(())
    }

    fn get_video(&self, video_id: &VideoId) -> CoreResult<Option<VideoRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, title, source, duration_sec, status, created_at
                 FROM videos WHERE id = ?1",
            )
            .map_err(|e| CoreError::Persistence(format!("Failed to prepare query: {}", e)))?;

        let mut rows = stmt
            .query(params![video_id])
            .map_err(|e| CoreError::Persistence(format!("Failed to query video: {}", e)))?;

        let row = rows
            .next()
            .map_err(|e| CoreError::Persistence(format!("Failed to read video row: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let status_str: String = row
            .get(4)
            .map_err(|e| CoreError::Persistence(format!("Failed to read status: {}", e)))?;
        let created_at_str: String = row
            .get(5)
            .map_err(|e| CoreError::Persistence(format!("Failed to read created_at: {}", e)))?;
        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| CoreError::Persistence(format!("Invalid created_at: {}", e)))?
            .with_timezone(&chrono::Utc);

        let read = |idx: usize| -> CoreResult<String> {
            row.get(idx)
                .map_err(|e| CoreError::Persistence(format!("Failed to read video row: {}", e)))
        };

        Ok(Some(VideoRecord {
            id: read(0)?,
            title: read(1)?,
            source: read(2)?,
            duration_sec: row
                .get(3)
                .map_err(|e| CoreError::Persistence(format!("Failed to read duration: {}", e)))?,
            status: VideoStatus::parse(&status_str)?,
            created_at,
        }))
    }

    fn insert_many(&self, video_id: &VideoId, clips: &[Clip]) -> CoreResult<()> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| CoreError::Persistence(format!("Failed to begin transaction: {}", e)))?;

        for clip in clips {
            tx.execute(
                "INSERT INTO clips (id, video_id, start_sec, end_sec, score, reason)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    clip.id,
                    video_id,
                    clip.start_sec,
                    clip.end_sec,
                    clip.score,
                    clip.reason,
                ],
            )
            .map_err(|e| CoreError::Persistence(format!("Failed to insert clip: {}", e)))?;
        }

        tx.commit()
            .map_err(|e| CoreError::Persistence(format!("Failed to commit clips: {}", e)))?;
        Ok(())
    }

    fn list_by_video(&self, video_id: &VideoId) -> CoreResult<Vec<Clip>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                // rowid keeps insertion order stable for equal scores
                "SELECT id, start_sec, end_sec, score, reason
                 FROM clips WHERE video_id = ?1
                 ORDER BY score DESC, rowid ASC",
            )
            .map_err(|e| CoreError::Persistence(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map(params![video_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .map_err(|e| CoreError::Persistence(format!("Failed to query clips: {}", e)))?;

        let mut clips = Vec::new();
        for row in rows {
            let (id, start_sec, end_sec, score, reason) = row
                .map_err(|e| CoreError::Persistence(format!("Failed to read clip row: {}", e)))?;
            clips.push(Clip::with_id(id, start_sec, end_sec, score, &reason)?);
        }
        Ok(clips)
    }
}

// =============================================================================
// Tests
// =============================================================================

use crate::controllers::ports::frame_codec::{CodecError, FrameCodec};
use crate::core::data::frame_buffer::FrameBuffer;
use crate::core::data::frame_meta::FrameMeta;
use crate::storage::artifacts::unique_artifact_path;
use crate::storage::snapshot::Snapshot;
use chrono::Local;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("already at the oldest history entry")]
    AtStart,

    #[error("already at the newest history entry")]
    AtEnd,

    #[error("history image is missing: {path}")]
    MissingArtifact { path: PathBuf },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Bounded undo/redo timeline of finished frames, each persisted to disk.
///
/// The cursor always points at a valid entry when the store is non-empty.
/// Pushing after an undo discards (and deletes) every entry past the cursor;
/// exceeding the capacity evicts from the oldest end.
pub struct HistoryStore {
    directory: PathBuf,
    capacity: usize,
    entries: Vec<Snapshot>,
    cursor: Option<usize>,
    codec: Box<dyn FrameCodec>,
}

impl HistoryStore {
    /// Creates `directory` if needed. A capacity of zero is treated as one.
    pub fn new(
        directory: impl Into<PathBuf>,
        capacity: usize,
        codec: Box<dyn FrameCodec>,
    ) -> Result<Self, HistoryError> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;

        Ok(Self {
            directory,
            capacity: capacity.max(1),
            entries: Vec::new(),
            cursor: None,
            codec,
        })
    }

    /// Persists `frame` and appends it as the newest entry.
    ///
    /// The image is written before anything else changes, so a failed write
    /// leaves the timeline untouched.
    pub fn push(&mut self, frame: &FrameBuffer, meta: FrameMeta) -> Result<Snapshot, HistoryError> {
        let created_at = Local::now();
        let image_path = unique_artifact_path(
            &self.directory,
            &created_at,
            frame.width(),
            frame.height(),
            self.codec.extension(),
        );

        self.codec.write(frame, &image_path)?;

        if let Some(cursor) = self.cursor {
            let discarded: Vec<Snapshot> = self.entries.drain(cursor + 1..).collect();
            if !discarded.is_empty() {
                tracing::debug!(count = discarded.len(), "truncating redo history");
            }
            for snapshot in &discarded {
                remove_artifact(snapshot.image_path());
            }
        }

        let snapshot = Snapshot {
            meta,
            created_at,
            image_path,
        };
        self.entries.push(snapshot.clone());
        self.cursor = Some(self.entries.len() - 1);

        while self.entries.len() > self.capacity {
            let evicted = self.entries.remove(0);
            tracing::debug!(path = %evicted.image_path.display(), "evicting oldest history entry");
            remove_artifact(evicted.image_path());
            self.cursor = self.cursor.map(|c| c.saturating_sub(1));
        }

        tracing::info!(
            position = self.entries.len(),
            capacity = self.capacity,
            path = %snapshot.image_path.display(),
            "history entry saved"
        );

        Ok(snapshot)
    }

    /// Moves the cursor one entry back.
    pub fn undo(&mut self) -> Result<&Snapshot, HistoryError> {
        let target = self.undo_target()?;
        self.cursor = Some(target);
        Ok(&self.entries[target])
    }

    /// Moves the cursor one entry forward.
    pub fn redo(&mut self) -> Result<&Snapshot, HistoryError> {
        let target = self.redo_target()?;
        self.cursor = Some(target);
        Ok(&self.entries[target])
    }

    /// Reads the image behind `snapshot` back into a frame.
    pub fn load(&self, snapshot: &Snapshot) -> Result<FrameBuffer, HistoryError> {
        if !snapshot.image_path.exists() {
            return Err(HistoryError::MissingArtifact {
                path: snapshot.image_path.clone(),
            });
        }

        Ok(self.codec.read(&snapshot.image_path)?)
    }

    /// Undo that only moves the cursor once the frame has been loaded.
    pub fn undo_and_load(&mut self) -> Result<(Snapshot, FrameBuffer), HistoryError> {
        let target = self.undo_target()?;
        self.load_at(target)
    }

    /// Redo that only moves the cursor once the frame has been loaded.
    pub fn redo_and_load(&mut self) -> Result<(Snapshot, FrameBuffer), HistoryError> {
        let target = self.redo_target()?;
        self.load_at(target)
    }

    #[must_use]
    pub fn current(&self) -> Option<&Snapshot> {
        self.cursor.map(|c| &self.entries[c])
    }

    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo_target().is_ok()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.redo_target().is_ok()
    }

    #[must_use]
    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn undo_target(&self) -> Result<usize, HistoryError> {
        match self.cursor {
            Some(cursor) if cursor > 0 => Ok(cursor - 1),
            _ => Err(HistoryError::AtStart),
        }
    }

    fn redo_target(&self) -> Result<usize, HistoryError> {
        match self.cursor {
            Some(cursor) if cursor + 1 < self.entries.len() => Ok(cursor + 1),
            _ => Err(HistoryError::AtEnd),
        }
    }

    fn load_at(&mut self, index: usize) -> Result<(Snapshot, FrameBuffer), HistoryError> {
        let snapshot = self.entries[index].clone();
        let frame = self.load(&snapshot)?;
        self.cursor = Some(index);

        tracing::debug!(position = index + 1, len = self.entries.len(), "history cursor moved");

        Ok((snapshot, frame))
    }
}

fn remove_artifact(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to delete history image");
        }
    }
}

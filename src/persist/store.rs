use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{EditorError, EditorResult};

/// Named-slot storage for snapshot text.
pub trait SnapshotStore {
    /// Overwrite `slot` with `text`.
    fn write(&mut self, slot: &str, text: &str) -> EditorResult<()>;

    /// Read `slot`, or `None` if it was never written.
    fn read(&self, slot: &str) -> EditorResult<Option<String>>;
}

/// Process-local store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    fn write(&mut self, slot: &str, text: &str) -> EditorResult<()> {
        self.slots.insert(slot.to_string(), text.to_string());
        Ok(())
    }

    fn read(&self, slot: &str) -> EditorResult<Option<String>> {
        Ok(self.slots.get(slot).cloned())
    }
}

/// One `<slot>.json` file per slot inside a directory.
#[derive(Clone, Debug)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, slot: &str) -> EditorResult<PathBuf> {
        let valid = !slot.is_empty()
            && slot
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(EditorError::validation(format!(
                "slot name '{slot}' must be non-empty and use only [A-Za-z0-9_-]"
            )));
        }
        Ok(self.dir.join(format!("{slot}.json")))
    }
}

impl SnapshotStore for DirStore {
    fn write(&mut self, slot: &str, text: &str) -> EditorResult<()> {
        let path = self.slot_path(slot)?;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create snapshot dir '{}'", self.dir.display()))?;
        std::fs::write(&path, text)
            .with_context(|| format!("write snapshot '{}'", path.display()))?;
        Ok(())
    }

    fn read(&self, slot: &str) -> EditorResult<Option<String>> {
        let path = self.slot_path(slot)?;
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("read snapshot '{}'", path.display()))
                .into()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/persist/store.rs"]
mod tests;

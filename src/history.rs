//! Append-only version history and the active selection.

use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};

use crate::model::PromptVersion;

/// Ordered, append-only sequence of prompt versions.
///
/// Clones share storage; an append on one clone copies on write, so a
/// snapshot handed to a renderer never observes later submissions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    versions: Arc<Vec<PromptVersion>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_versions(versions: Vec<PromptVersion>) -> Self {
        Self {
            versions: Arc::new(versions),
        }
    }

    /// Return a new history with `version` appended; `self` is untouched.
    pub fn appended(&self, version: PromptVersion) -> Self {
        let mut next = self.clone();
        next.push(version);
        next
    }

    pub fn push(&mut self, version: PromptVersion) {
        Arc::make_mut(&mut self.versions).push(version);
    }

    pub fn versions(&self) -> &[PromptVersion] {
        &self.versions
    }

    pub fn get(&self, index: usize) -> Option<&PromptVersion> {
        self.versions.get(index)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Content fingerprint (BLAKE3 over canonical JSON). Equal histories hash
    /// equal, including ones loaded separately from disk.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(self.versions())?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }

    pub(crate) fn stamp(&self) -> HistoryStamp {
        HistoryStamp {
            storage: Arc::downgrade(&self.versions),
            len: self.versions.len(),
        }
    }
}

/// Identity of a history value: its storage allocation plus length.
///
/// Storage is only ever appended to in place, and the weak handle keeps the
/// allocation from being reused, so a matching stamp means identical contents.
#[derive(Debug, Clone)]
pub(crate) struct HistoryStamp {
    storage: Weak<Vec<PromptVersion>>,
    len: usize,
}

impl HistoryStamp {
    pub(crate) fn matches(&self, history: &History) -> bool {
        self.len == history.len() && Weak::as_ptr(&self.storage) == Arc::as_ptr(&history.versions)
    }
}

/// Index of the active version, always clamped to the history bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    index: usize,
}

impl Selection {
    /// Clamp `index` into `[0, len - 1]` (0 when empty).
    pub fn clamped(index: usize, len: usize) -> Self {
        Self {
            index: index.min(len.saturating_sub(1)),
        }
    }

    /// Select the newest entry.
    pub fn latest(len: usize) -> Self {
        Self::clamped(usize::MAX, len)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn previous(self, len: usize) -> Self {
        Self::clamped(self.index.saturating_sub(1), len)
    }

    pub fn next(self, len: usize) -> Self {
        Self::clamped(self.index.saturating_add(1), len)
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self, len: usize) -> bool {
        self.index + 1 < len
    }
}

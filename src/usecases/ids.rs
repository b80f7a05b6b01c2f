use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::call::CallId;

pub trait IdSource: Send + Sync {
    fn next_id(&self) -> CallId;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&self) -> CallId {
        CallId::new(Uuid::new_v4().to_string())
    }
}

/// Monotonic counter ids (`{prefix}{n}`), starting at 1.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("call-")
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> CallId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        CallId::new(format!("{}{n}", self.prefix))
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IdSourceKind {
    #[default]
    Uuid,
    Sequential,
}

impl IdSourceKind {
    pub fn build(self) -> Box<dyn IdSource> {
        match self {
            Self::Uuid => Box::new(UuidIds),
            Self::Sequential => Box::new(SequentialIds::default()),
        }
    }
}

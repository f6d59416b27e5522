//! In-memory [`BlocksApi`] used by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use togglenote_notion::BlocksApi;
use togglenote_shared::{Block, BlockId, BlockKind, Result, RichText, TogglenoteError};

/// A remote call observed by [`FakeTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    List(String),
    Append(String, String),
}

/// Page tree held in memory, recording every call in order.
#[derive(Default)]
pub(crate) struct FakeTree {
    children: HashMap<String, Vec<Block>>,
    failing_reads: HashSet<String>,
    failing_appends: HashSet<String>,
    calls: Mutex<Vec<Call>>,
}

pub(crate) fn toggle(id: &str, title: &str, has_children: bool) -> Block {
    Block {
        id: BlockId::from(id),
        has_children,
        kind: BlockKind::Toggle {
            rich_text: vec![RichText {
                plain_text: title.into(),
            }],
        },
    }
}

pub(crate) fn untitled_toggle(id: &str, has_children: bool) -> Block {
    Block {
        id: BlockId::from(id),
        has_children,
        kind: BlockKind::Toggle { rich_text: vec![] },
    }
}

pub(crate) fn paragraph(id: &str, has_children: bool) -> Block {
    Block {
        id: BlockId::from(id),
        has_children,
        kind: BlockKind::Other("paragraph".into()),
    }
}

impl FakeTree {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_children(mut self, parent: &str, blocks: Vec<Block>) -> Self {
        self.children.insert(parent.into(), blocks);
        self
    }

    pub(crate) fn failing_read(mut self, block: &str) -> Self {
        self.failing_reads.insert(block.into());
        self
    }

    /// Make appends of exactly this fragment text fail.
    pub(crate) fn failing_append(mut self, text: &str) -> Self {
        self.failing_appends.insert(text.into());
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn reads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::List(id) => Some(id),
                Call::Append(..) => None,
            })
            .collect()
    }

    pub(crate) fn appends(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Append(id, text) => Some((id, text)),
                Call::List(_) => None,
            })
            .collect()
    }
}

impl BlocksApi for FakeTree {
    async fn list_children(&self, block_id: &BlockId) -> Result<Vec<Block>> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::List(block_id.to_string()));

        if self.failing_reads.contains(block_id.as_str()) {
            return Err(TogglenoteError::Notion {
                status: 500,
                message: "internal_server_error".into(),
            });
        }
        Ok(self
            .children
            .get(block_id.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn append_numbered_item(&self, block_id: &BlockId, text: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Append(block_id.to_string(), text.into()));

        if self.failing_appends.contains(text) {
            return Err(TogglenoteError::Network("connection reset".into()));
        }
        Ok(())
    }
}

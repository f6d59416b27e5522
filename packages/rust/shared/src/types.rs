//! Core domain types: Notion blocks and note fragments.

use serde::{Deserialize, Serialize};

/// Notion type tag of a collapsible toggle block.
pub const TOGGLE_TYPE: &str = "toggle";

/// Character separating sentences in an inbound note.
pub const SENTENCE_DELIMITER: char = '.';

// ---------------------------------------------------------------------------
// BlockId
// ---------------------------------------------------------------------------

/// Opaque Notion block (or page) identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// One run of rich text as returned by the Notion API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

/// A node of a Notion page tree, as listed by `GET /blocks/{id}/children`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    pub id: BlockId,
    /// Whether the block has nested children worth descending into.
    pub has_children: bool,
    pub kind: BlockKind,
}

/// Type-specific payload of a [`Block`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Toggle { rich_text: Vec<RichText> },
    NumberedListItem { rich_text: Vec<RichText> },
    /// Any block type we never inspect, keeping its type tag.
    Other(String),
}

impl Block {
    /// Title of a toggle block: the plain text of its first rich-text run.
    ///
    /// `None` for non-toggles and for toggles without any rich text.
    pub fn toggle_title(&self) -> Option<&str> {
        match &self.kind {
            BlockKind::Toggle { rich_text } => rich_text.first().map(|r| r.plain_text.as_str()),
            _ => None,
        }
    }

    /// The Notion type tag of this block.
    pub fn type_tag(&self) -> &str {
        match &self.kind {
            BlockKind::Toggle { .. } => TOGGLE_TYPE,
            BlockKind::NumberedListItem { .. } => "numbered_list_item",
            BlockKind::Other(tag) => tag,
        }
    }
}

#[derive(Deserialize)]
struct RichTextPayload {
    #[serde(default)]
    rich_text: Vec<RichText>,
}

/// Wire shape of a block; the type-specific payload sits under a key named after the type.
#[derive(Deserialize)]
struct RawBlock {
    id: String,
    #[serde(rename = "type")]
    type_tag: String,
    #[serde(default)]
    has_children: bool,
    toggle: Option<RichTextPayload>,
    numbered_list_item: Option<RichTextPayload>,
}

impl TryFrom<RawBlock> for Block {
    type Error = String;

    fn try_from(raw: RawBlock) -> std::result::Result<Self, Self::Error> {
        let kind = match raw.type_tag.as_str() {
            TOGGLE_TYPE => {
                let payload = raw
                    .toggle
                    .ok_or_else(|| format!("toggle block {} has no toggle payload", raw.id))?;
                BlockKind::Toggle {
                    rich_text: payload.rich_text,
                }
            }
            "numbered_list_item" => BlockKind::NumberedListItem {
                rich_text: raw
                    .numbered_list_item
                    .map(|p| p.rich_text)
                    .unwrap_or_default(),
            },
            _ => BlockKind::Other(raw.type_tag),
        };

        Ok(Self {
            id: BlockId(raw.id),
            has_children: raw.has_children,
            kind,
        })
    }
}

// ---------------------------------------------------------------------------
// Fragments
// ---------------------------------------------------------------------------

/// Split a note into sentence fragments.
///
/// Splits on [`SENTENCE_DELIMITER`], trims each piece, and drops empty ones.
/// Input order is preserved.
pub fn split_fragments(content: &str) -> Vec<String> {
    content
        .split(SENTENCE_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

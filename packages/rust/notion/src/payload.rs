//! Wire payloads for the blocks endpoints.

use serde::{Deserialize, Serialize};
use togglenote_shared::Block;

/// Body of `GET /blocks/{id}/children`.
#[derive(Debug, Deserialize)]
pub(crate) struct ChildrenPage {
    pub results: Vec<Block>,
    #[serde(default)]
    pub has_more: bool,
}

/// Error body returned by Notion on non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Body of `PATCH /blocks/{id}/children`.
#[derive(Debug, Clone, Serialize)]
pub struct AppendChildren {
    pub children: Vec<NewBlock>,
}

/// A block to be created.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NewBlock {
    NumberedListItem {
        object: &'static str,
        numbered_list_item: TextContent,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct TextContent {
    rich_text: Vec<TextRun>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TextRun {
    Text { text: PlainContent },
}

#[derive(Debug, Clone, Serialize)]
struct PlainContent {
    content: String,
}

impl NewBlock {
    /// A numbered-list item holding `text` as a single plain run.
    pub fn numbered_item(text: &str) -> Self {
        Self::NumberedListItem {
            object: "block",
            numbered_list_item: TextContent {
                rich_text: vec![TextRun::Text {
                    text: PlainContent {
                        content: text.to_string(),
                    },
                }],
            },
        }
    }
}

impl AppendChildren {
    pub fn single(block: NewBlock) -> Self {
        Self {
            children: vec![block],
        }
    }
}

//! Minimal typed client for the Notion blocks API.
//!
//! Only two endpoints are needed by togglenote:
//! - `GET /blocks/{id}/children` — list the direct children of a block
//! - `PATCH /blocks/{id}/children` — append new children to a block
//!
//! [`BlocksApi`] is the seam the section locator and appender are written
//! against; [`NotionClient`] is the HTTP implementation.

mod client;
mod payload;

use std::future::Future;

use togglenote_shared::{Block, BlockId, Result};

pub use client::NotionClient;
pub use payload::{AppendChildren, NewBlock};

/// Read and append access to a tree of Notion blocks.
pub trait BlocksApi: Send + Sync {
    /// Fetch the direct children of `block_id`, in the order the service returns them.
    fn list_children(&self, block_id: &BlockId) -> impl Future<Output = Result<Vec<Block>>> + Send;

    /// Append one numbered-list item containing `text` to the end of `block_id`'s children.
    fn append_numbered_item(
        &self,
        block_id: &BlockId,
        text: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

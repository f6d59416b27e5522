//! Depth-first lookup of a toggle section by title.

use tracing::{debug, info, instrument};

use togglenote_notion::BlocksApi;
use togglenote_shared::{Block, BlockId, Result, TogglenoteError};

/// Find the first toggle under `root` whose title equals `name`.
///
/// Walks the tree depth-first in pre-order, issuing one child listing per
/// visited block. A match short-circuits the walk. Toggles with no rich text
/// never match. Any failed read aborts the search with that error; `Ok(None)`
/// means the whole tree was visited without a match.
#[instrument(skip_all, fields(root = %root, name = %name))]
pub async fn locate<A: BlocksApi>(api: &A, root: &BlockId, name: &str) -> Result<Option<BlockId>> {
    if name.is_empty() {
        return Err(TogglenoteError::validation("toggle name must not be empty"));
    }

    // One frame per block whose children are being walked.
    let mut stack: Vec<std::vec::IntoIter<Block>> = vec![api.list_children(root).await?.into_iter()];
    let mut reads = 1usize;

    while let Some(frame) = stack.last_mut() {
        let Some(block) = frame.next() else {
            stack.pop();
            continue;
        };

        if block.toggle_title() == Some(name) {
            info!(toggle_id = %block.id, reads, "toggle found");
            return Ok(Some(block.id));
        }

        if block.has_children {
            let children = api.list_children(&block.id).await?;
            reads += 1;
            stack.push(children.into_iter());
        }
    }

    debug!(reads, "toggle not found");
    Ok(None)
}

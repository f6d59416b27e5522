//! Sequential, best-effort append of note fragments to a toggle section.

use tracing::{info, instrument, warn};

use togglenote_notion::BlocksApi;
use togglenote_shared::{BlockId, TogglenoteError};

/// Outcome of [`append_all`].
#[derive(Debug, Default)]
pub struct AppendReport {
    /// Number of fragments written successfully.
    pub appended: usize,
    /// Fragments whose write failed, in input order.
    pub failures: Vec<AppendFailure>,
}

/// A single fragment that could not be written.
#[derive(Debug)]
pub struct AppendFailure {
    /// Position of the fragment in the input.
    pub index: usize,
    pub fragment: String,
    pub error: TogglenoteError,
}

impl AppendReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Append each fragment to `section` as its own numbered-list item.
///
/// Writes are issued one at a time in input order; the next write starts only
/// after the previous one has finished. A failed write is logged and recorded,
/// then processing continues with the next fragment. Nothing is rolled back.
#[instrument(skip_all, fields(section = %section, fragments = fragments.len()))]
pub async fn append_all<A: BlocksApi>(
    api: &A,
    section: &BlockId,
    fragments: &[String],
) -> AppendReport {
    let mut report = AppendReport::default();

    for (index, fragment) in fragments.iter().enumerate() {
        match api.append_numbered_item(section, fragment).await {
            Ok(()) => report.appended += 1,
            Err(error) => {
                warn!(index, %error, "failed to append fragment, continuing");
                report.failures.push(AppendFailure {
                    index,
                    fragment: fragment.clone(),
                    error,
                });
            }
        }
    }

    info!(
        appended = report.appended,
        failed = report.failures.len(),
        "append finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeTree;

    fn frags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn one_write_per_fragment_in_order() {
        let tree = FakeTree::new();
        let section = BlockId::from("t1");

        let report = append_all(&tree, &section, &frags(&["Buy milk", "Call Alice", "Pay rent"])).await;

        assert!(report.is_complete());
        assert_eq!(report.appended, 3);
        assert_eq!(
            tree.appends(),
            vec![
                ("t1".to_string(), "Buy milk".to_string()),
                ("t1".to_string(), "Call Alice".to_string()),
                ("t1".to_string(), "Pay rent".to_string()),
            ]
        );
        assert!(tree.reads().is_empty());
    }

    #[tokio::test]
    async fn failure_does_not_stop_later_fragments() {
        let tree = FakeTree::new().failing_append("Call Alice");
        let section = BlockId::from("t1");

        let report = append_all(&tree, &section, &frags(&["Buy milk", "Call Alice", "Pay rent"])).await;

        assert_eq!(report.appended, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert_eq!(report.failures[0].fragment, "Call Alice");
        assert!(report.failures[0].error.is_remote());

        let attempted: Vec<String> = tree.appends().into_iter().map(|(_, t)| t).collect();
        assert_eq!(attempted, frags(&["Buy milk", "Call Alice", "Pay rent"]));
    }

    #[tokio::test]
    async fn every_write_failing_still_attempts_all() {
        let tree = FakeTree::new().failing_append("a").failing_append("b");
        let report = append_all(&tree, &BlockId::from("t"), &frags(&["a", "b"])).await;

        assert_eq!(report.appended, 0);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(tree.appends().len(), 2);
    }

    #[tokio::test]
    async fn no_fragments_no_writes() {
        let tree = FakeTree::new();
        let report = append_all(&tree, &BlockId::from("t"), &[]).await;
        assert_eq!(report.appended, 0);
        assert!(tree.calls().is_empty());
    }
}

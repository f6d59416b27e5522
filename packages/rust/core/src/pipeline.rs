//! End-to-end note pipeline: toggle lookup → sequential append.
//!
//! Runs detached from the HTTP request that triggered it, so every outcome is
//! reported through tracing only.

use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use togglenote_notion::{BlocksApi, NotionClient};
use togglenote_shared::{BlockId, NotionConfig, Result, TogglenoteError};

use crate::appender::append_all;
use crate::classifier::NoteClassifier;
use crate::locator::locate;

/// Toggle name that switches a request into classifier mode.
pub const USE_AI: &str = "Use AI";

/// Where the fragments of a job should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteTarget {
    /// Every fragment goes to the toggle titled `toggle_name` under `page_id`.
    Named {
        page_id: BlockId,
        toggle_name: String,
    },
    /// Each fragment is classified into one of these `(toggle name, page id)` lists.
    Classified { lists: Vec<(String, BlockId)> },
}

/// One accepted note, split into fragments.
#[derive(Debug, Clone)]
pub struct NoteJob {
    pub target: NoteTarget,
    pub fragments: Vec<String>,
}

/// Per-job counters, logged when the job ends.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct JobSummary {
    pub appended: usize,
    pub failed: usize,
    /// Fragments dropped because their list or toggle could not be resolved.
    pub skipped: usize,
}

/// Run a job against `api`.
///
/// Named mode locates the toggle once and fails with
/// [`TogglenoteError::SectionNotFound`] before any write if it is absent.
/// A failed lookup read aborts the job in either mode; a failed append is
/// only counted.
pub async fn process_notes<A, C>(api: &A, classifier: &C, job: &NoteJob) -> Result<JobSummary>
where
    A: BlocksApi,
    C: NoteClassifier,
{
    match &job.target {
        NoteTarget::Named {
            page_id,
            toggle_name,
        } => {
            let section = locate(api, page_id, toggle_name)
                .await?
                .ok_or_else(|| TogglenoteError::SectionNotFound {
                    name: toggle_name.clone(),
                })?;

            let report = append_all(api, &section, &job.fragments).await;
            Ok(JobSummary {
                appended: report.appended,
                failed: report.failures.len(),
                skipped: 0,
            })
        }
        NoteTarget::Classified { lists } => {
            process_classified(api, classifier, lists, &job.fragments).await
        }
    }
}

async fn process_classified<A, C>(
    api: &A,
    classifier: &C,
    lists: &[(String, BlockId)],
    fragments: &[String],
) -> Result<JobSummary>
where
    A: BlocksApi,
    C: NoteClassifier,
{
    let names: Vec<String> = lists.iter().map(|(name, _)| name.clone()).collect();
    let mut summary = JobSummary::default();

    for fragment in fragments {
        let list = classifier.classify(fragment, &names).await;

        let Some((_, page_id)) = lists.iter().find(|(name, _)| *name == list) else {
            error!(%list, "no page id for classified list, skipping fragment");
            summary.skipped += 1;
            continue;
        };

        let Some(section) = locate(api, page_id, &list).await? else {
            error!(%list, %page_id, "toggle list not found, skipping fragment");
            summary.skipped += 1;
            continue;
        };

        match api.append_numbered_item(&section, fragment).await {
            Ok(()) => summary.appended += 1,
            Err(e) => {
                warn!(%list, error = %e, "failed to append fragment, continuing");
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

/// Build a per-job Notion client for `api_key` and run `job` to completion.
///
/// The client lives only for the duration of the job. Failures are logged.
#[instrument(skip_all, fields(job_id = %Uuid::now_v7(), fragments = job.fragments.len()))]
pub async fn run_job<C: NoteClassifier>(
    api_key: &str,
    notion: &NotionConfig,
    classifier: &C,
    job: NoteJob,
) {
    let client = match NotionClient::new(api_key, notion) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "could not build Notion client");
            return;
        }
    };

    match process_notes(&client, classifier, &job).await {
        Ok(summary) if summary.failed == 0 && summary.skipped == 0 => {
            info!(appended = summary.appended, "notes processed");
        }
        Ok(summary) => {
            warn!(
                appended = summary.appended,
                failed = summary.failed,
                skipped = summary.skipped,
                "notes processed with failures"
            );
        }
        Err(e) => error!(error = %e, "error processing notes"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeTree, paragraph, toggle};

    /// Classifier that routes notes by keyword, falling back to the first list.
    struct KeywordClassifier(Vec<(&'static str, &'static str)>);

    impl NoteClassifier for KeywordClassifier {
        async fn classify(&self, note: &str, candidates: &[String]) -> String {
            self.0
                .iter()
                .find(|(keyword, _)| note.contains(keyword))
                .map(|(_, list)| list.to_string())
                .unwrap_or_else(|| candidates[0].clone())
        }
    }

    fn no_ai() -> KeywordClassifier {
        KeywordClassifier(vec![])
    }

    fn named(page: &str, toggle_name: &str, fragments: &[&str]) -> NoteJob {
        NoteJob {
            target: NoteTarget::Named {
                page_id: BlockId::from(page),
                toggle_name: toggle_name.into(),
            },
            fragments: fragments.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn named_job_locates_then_appends_in_order() {
        let tree = FakeTree::new()
            .with_children("page", vec![paragraph("p", true)])
            .with_children("p", vec![toggle("t1", "Groceries", false)]);

        let summary = process_notes(&tree, &no_ai(), &named("page", "Groceries", &["Buy milk", "Eggs"]))
            .await
            .unwrap();

        assert_eq!(summary.appended, 2);
        assert_eq!(
            tree.appends(),
            vec![
                ("t1".to_string(), "Buy milk".to_string()),
                ("t1".to_string(), "Eggs".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn missing_toggle_fails_job_without_writes() {
        let tree = FakeTree::new().with_children("page", vec![toggle("t1", "Work", false)]);

        let err = process_notes(&tree, &no_ai(), &named("page", "Groceries", &["Buy milk"]))
            .await
            .unwrap_err();

        assert!(matches!(err, TogglenoteError::SectionNotFound { ref name } if name == "Groceries"));
        assert!(tree.appends().is_empty());
    }

    #[tokio::test]
    async fn lookup_failure_aborts_before_any_write() {
        let tree = FakeTree::new().failing_read("page");

        let err = process_notes(&tree, &no_ai(), &named("page", "Groceries", &["a", "b"]))
            .await
            .unwrap_err();

        assert!(err.is_remote());
        assert!(tree.appends().is_empty());
    }

    #[tokio::test]
    async fn append_failure_is_counted_not_fatal() {
        let tree = FakeTree::new()
            .with_children("page", vec![toggle("t1", "Groceries", false)])
            .failing_append("b");

        let summary = process_notes(&tree, &no_ai(), &named("page", "Groceries", &["a", "b", "c"]))
            .await
            .unwrap();

        assert_eq!(summary, JobSummary { appended: 2, failed: 1, skipped: 0 });
        assert_eq!(tree.appends().len(), 3);
    }

    #[tokio::test]
    async fn classified_job_routes_each_fragment() {
        let tree = FakeTree::new()
            .with_children("home", vec![toggle("g", "Groceries", false)])
            .with_children("office", vec![toggle("w", "Work", false)]);

        let job = NoteJob {
            target: NoteTarget::Classified {
                lists: vec![
                    ("Groceries".into(), BlockId::from("home")),
                    ("Work".into(), BlockId::from("office")),
                ],
            },
            fragments: vec!["Buy milk".into(), "Email boss".into()],
        };
        let classifier = KeywordClassifier(vec![("boss", "Work")]);

        let summary = process_notes(&tree, &classifier, &job).await.unwrap();

        assert_eq!(summary.appended, 2);
        assert_eq!(
            tree.appends(),
            vec![
                ("g".to_string(), "Buy milk".to_string()),
                ("w".to_string(), "Email boss".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn classified_job_skips_unresolvable_toggle() {
        let tree = FakeTree::new()
            .with_children("home", vec![])
            .with_children("office", vec![toggle("w", "Work", false)]);

        let job = NoteJob {
            target: NoteTarget::Classified {
                lists: vec![
                    ("Groceries".into(), BlockId::from("home")),
                    ("Work".into(), BlockId::from("office")),
                ],
            },
            fragments: vec!["Buy milk".into(), "Email boss".into()],
        };
        let classifier = KeywordClassifier(vec![("boss", "Work")]);

        let summary = process_notes(&tree, &classifier, &job).await.unwrap();

        assert_eq!(summary, JobSummary { appended: 1, failed: 0, skipped: 1 });
        assert_eq!(tree.appends(), vec![("w".to_string(), "Email boss".to_string())]);
    }

    #[tokio::test]
    async fn classified_lookup_failure_aborts_remaining_fragments() {
        let tree = FakeTree::new()
            .failing_read("home")
            .with_children("office", vec![toggle("w", "Work", false)]);

        let job = NoteJob {
            target: NoteTarget::Classified {
                lists: vec![
                    ("Groceries".into(), BlockId::from("home")),
                    ("Work".into(), BlockId::from("office")),
                ],
            },
            fragments: vec!["Buy milk".into(), "Email boss".into()],
        };
        let classifier = KeywordClassifier(vec![("boss", "Work")]);

        let err = process_notes(&tree, &classifier, &job).await.unwrap_err();

        assert!(err.is_remote());
        assert!(tree.appends().is_empty());
        assert_eq!(tree.reads(), vec!["home".to_string()]);
    }

    #[tokio::test]
    async fn classified_job_skips_list_without_page() {
        let tree = FakeTree::new().with_children("home", vec![toggle("g", "Groceries", false)]);

        let job = NoteJob {
            target: NoteTarget::Classified {
                lists: vec![("Groceries".into(), BlockId::from("home"))],
            },
            fragments: vec!["Email boss".into()],
        };
        // Answers with a list the request never offered.
        let classifier = KeywordClassifier(vec![("boss", "Work")]);

        let summary = process_notes(&tree, &classifier, &job).await.unwrap();
        assert_eq!(summary.skipped, 1);
        assert!(tree.calls().is_empty());
    }
}

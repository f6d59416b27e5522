//! Validation of `POST /add-to-toggle` requests.
//!
//! Turns raw headers and body into a [`NoteJob`] plus the caller's Notion
//! key, or a [`TogglenoteError::Validation`] carrying the 400 reason.

use axum::http::HeaderMap;
use serde_json::{Map, Value};

use togglenote_core::{NoteJob, NoteTarget, USE_AI};
use togglenote_shared::{BlockId, Result, TogglenoteError, split_fragments};

/// Header carrying the caller's Notion integration token.
pub const API_KEY_HEADER: &str = "notionapikey";
/// Header carrying the root page (or block) id to search.
pub const PAGE_ID_HEADER: &str = "notionpageid";

/// Alternate spellings accepted for the same headers.
const API_KEY_HEADER_ALT: &str = "notion-api-key";
const PAGE_ID_HEADER_ALT: &str = "notion-page-id";

/// A validated request, ready to be run in the background.
#[derive(Debug)]
pub struct AcceptedNote {
    pub api_key: String,
    pub job: NoteJob,
}

/// Validate headers and body, in the order the client errors are reported.
pub fn parse_note_request(headers: &HeaderMap, body: &[u8]) -> Result<AcceptedNote> {
    // A missing or non-JSON body reads as an empty object, so `content` is reported first.
    let body: Map<String, Value> = match serde_json::from_slice(body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };

    let Some(Value::String(content)) = body.get("content") else {
        return Err(TogglenoteError::validation("Content must be a string"));
    };

    let api_key = header_value(headers, API_KEY_HEADER, API_KEY_HEADER_ALT);
    let page_id = header_value(headers, PAGE_ID_HEADER, PAGE_ID_HEADER_ALT);

    // Both headers are required in every mode; AI mode ignores the page id.
    let (Some(api_key), Some(page_id)) = (api_key, page_id) else {
        return Err(TogglenoteError::validation("Missing Notion API Key or Page ID"));
    };

    let toggle_name = match body.get("toggleName") {
        Some(Value::String(name)) if !name.is_empty() => name.clone(),
        _ => return Err(TogglenoteError::validation("Toggle name is required")),
    };

    let target = if toggle_name == USE_AI {
        NoteTarget::Classified {
            lists: parse_toggle_lists(body.get("toggleLists"))?,
        }
    } else {
        NoteTarget::Named {
            page_id: BlockId::new(page_id),
            toggle_name,
        }
    };

    Ok(AcceptedNote {
        api_key,
        job: NoteJob {
            target,
            fragments: split_fragments(content),
        },
    })
}

/// First non-empty value among the two header spellings.
fn header_value(headers: &HeaderMap, name: &str, alt: &str) -> Option<String> {
    [name, alt]
        .into_iter()
        .filter_map(|n| headers.get(n))
        .filter_map(|v| v.to_str().ok())
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(String::from)
}

/// `toggleLists` must map list names to page ids; object order is kept.
fn parse_toggle_lists(value: Option<&Value>) -> Result<Vec<(String, BlockId)>> {
    let invalid = || {
        TogglenoteError::validation("toggleLists must map toggle names to page ids for AI mode")
    };

    let Some(Value::Object(map)) = value else {
        return Err(invalid());
    };

    let lists = map
        .iter()
        .map(|(name, page)| match page {
            Value::String(id) if !name.is_empty() && !id.is_empty() => {
                Ok((name.clone(), BlockId::new(id.as_str())))
            }
            _ => Err(invalid()),
        })
        .collect::<Result<Vec<_>>>()?;

    if lists.is_empty() {
        return Err(invalid());
    }
    Ok(lists)
}

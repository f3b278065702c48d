//! Document-id filter text: parsing and merging.
//!
//! The filter is a free-text, comma-separated list the user edits directly.
//! Entries are trimmed, blanks dropped, and duplicates removed with the first
//! occurrence winning.

use std::collections::HashSet;

/// Separator used when the filter text is rewritten after an upload.
const JOIN_SEPARATOR: &str = ", ";

/// Parse filter text into trimmed, non-empty, de-duplicated ids.
pub fn parse_document_ids(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

/// Ids to send with a query. An empty filter means "search all", so it
/// becomes `None` rather than an empty list.
pub fn request_document_ids(text: &str) -> Option<Vec<String>> {
    let ids = parse_document_ids(text);
    if ids.is_empty() { None } else { Some(ids) }
}

/// Append newly returned ids to existing filter text.
///
/// Existing entries keep their order; new ids already present are skipped.
pub fn merge_document_ids<'a, I>(text: &str, new_ids: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ids = parse_document_ids(text);
    let mut seen: HashSet<String> = ids.iter().cloned().collect();
    for id in new_ids {
        let id = id.trim();
        if !id.is_empty() && seen.insert(id.to_string()) {
            ids.push(id.to_string());
        }
    }
    ids.join(JOIN_SEPARATOR)
}

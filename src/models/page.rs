use serde::Serialize;

use super::Record;

/// A page of records with navigation offsets.
///
/// Offsets are page numbers. `last_page` is `-1` when the server reports no
/// pages at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordPage {
    pub entries: Vec<Record>,
    pub result_count: usize,
    pub previous_offset: Option<i64>,
    pub current_offset: i64,
    pub next_offset: Option<i64>,
    pub current_limit: i64,
    pub last_page: i64,
}

impl RecordPage {
    pub fn new(entries: Vec<Record>, current_page: i64, last_page: i64, limit: i64) -> Self {
        Self {
            result_count: entries.len(),
            entries,
            previous_offset: (current_page != 0).then(|| current_page - 1),
            current_offset: current_page,
            next_offset: (last_page != current_page).then(|| current_page + 1),
            current_limit: limit,
            last_page,
        }
    }
}

//! Mapping of raw API records onto [`Transaction`] and [`HistoryItem`].
//!
//! Old clients stored the same information under different field names, so
//! each canonical field has an ordered list of aliases and the first
//! non-empty one wins.

use api_types::raw::{RawId, RawPayload, RawRecord, RawScalar};

use crate::{
    Clock,
    record::{Category, DRAFT_PREFIX, HistoryItem, Transaction, display_amount},
};

/// Normalizes one raw record.
///
/// A record without any id gets a `draft-<millis>` placeholder; such ids
/// are only meaningful for client-side drafts and are never sent back to
/// the server for deletion.
pub fn normalize(raw: &RawRecord, clock: &impl Clock) -> Transaction {
    normalize_with(raw, || draft_id(clock, None))
}

/// Normalizes an archived record. History entries are returned by
/// construction.
pub fn normalize_history(raw: &RawRecord, clock: &impl Clock) -> HistoryItem {
    history_with(raw, || draft_id(clock, None))
}

/// Normalizes a list response, whether the API sent an array or a single
/// object.
pub fn normalize_payload(payload: RawPayload, clock: &impl Clock) -> Vec<Transaction> {
    payload
        .into_records()
        .iter()
        .enumerate()
        .map(|(idx, raw)| normalize_with(raw, || draft_id(clock, Some(idx))))
        .collect()
}

pub(crate) fn normalize_history_payload(
    payload: RawPayload,
    clock: &impl Clock,
) -> Vec<HistoryItem> {
    payload
        .into_records()
        .iter()
        .enumerate()
        .map(|(idx, raw)| history_with(raw, || draft_id(clock, Some(idx))))
        .collect()
}

/// Server id of a record, if it carries one.
///
/// Preference: `_id` (object-id wrapper or bare string), `id`, then
/// `insertedId` from insert acknowledgements.
pub(crate) fn record_id(raw: &RawRecord) -> Option<String> {
    [&raw.object_id, &raw.id, &raw.inserted_id]
        .into_iter()
        .flatten()
        .map(RawId::as_text)
        .find(|id| !id.is_empty())
}

fn normalize_with(raw: &RawRecord, fallback_id: impl FnOnce() -> String) -> Transaction {
    let id = record_id(raw).unwrap_or_else(fallback_id);

    let amount = raw
        .amount
        .as_ref()
        .or(raw.item.as_ref())
        .map(display_amount)
        .unwrap_or_default();

    let returned = raw.returned.as_ref().is_some_and(RawScalar::is_true)
        || raw
            .status
            .as_ref()
            .is_some_and(|status| status.as_text().trim().eq_ignore_ascii_case("returned"));

    Transaction {
        id,
        amount,
        person: first_text([&raw.person, &raw.to_from, &raw.from, &raw.to]),
        due_date: first_text([&raw.due_date, &raw.given_date, &raw.date]),
        return_date: first_text([&raw.return_date, &raw.return_date_snake]),
        category: Category::infer(&first_text([&raw.category, &raw.kind])),
        returned,
    }
}

fn history_with(raw: &RawRecord, fallback_id: impl FnOnce() -> String) -> HistoryItem {
    let mut record = normalize_with(raw, fallback_id);
    record.returned = true;
    HistoryItem {
        record,
        archived_at: first_text([&raw.archived_at, &raw.created_at]),
    }
}

fn first_text<const N: usize>(candidates: [&Option<RawScalar>; N]) -> String {
    candidates
        .into_iter()
        .flatten()
        .map(RawScalar::as_text)
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

fn draft_id(clock: &impl Clock, idx: Option<usize>) -> String {
    let millis = clock.now().timestamp_millis();
    match idx {
        Some(idx) => format!("{DRAFT_PREFIX}{millis}-{idx}"),
        None => format!("{DRAFT_PREFIX}{millis}"),
    }
}

//! Newest-revision selection among references of the same logical version

use std::cmp::Ordering;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::reference::Reference;
use crate::search::query::SearchQuery;

/// Keep only the newest revision of every logical version on the query's channel
///
/// Candidates on another channel are dropped (channels are never wildcarded
/// here). The result holds one reference per (name, version, user, channel),
/// in the order each of them was first seen.
pub fn latest_revisions(
    candidates: impl IntoIterator<Item = Reference>,
    query: &SearchQuery,
) -> Vec<Reference> {
    let mut newest: IndexMap<Reference, Reference> = IndexMap::new();

    for candidate in candidates {
        if candidate.channel != query.channel {
            continue;
        }

        match newest.entry(candidate.without_revision()) {
            Entry::Vacant(entry) => {
                entry.insert(candidate);
            }
            Entry::Occupied(mut entry) => {
                let current = entry.get().revision.as_deref();
                if cmp_revision(candidate.revision.as_deref(), current).is_gt() {
                    entry.insert(candidate);
                }
            }
        }
    }

    newest.into_values().collect()
}

/// Revision ordering: a missing revision is the oldest, numeric revisions
/// compare as numbers, anything else compares as text
pub fn cmp_revision(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a.parse::<u64>(), b.parse::<u64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            _ => a.cmp(b),
        },
    }
}

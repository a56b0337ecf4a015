//! Duplicate suppression over the accumulated candidate records

use crate::records::Identified;
use std::collections::HashSet;
use std::hash::Hash;

/// Keeps the first record for every identity key, preserving order
///
/// # Examples
///
/// ```
/// use anime_harvest::crawler::dedup_by_identity;
/// use anime_harvest::records::SeasonAnime;
///
/// let anime = |id: u64, title: &str| SeasonAnime {
///     mal_id: Some(id),
///     title: Some(title.to_string()),
///     ..Default::default()
/// };
///
/// let unique = dedup_by_identity(vec![anime(1, "X"), anime(2, "Y"), anime(1, "X")]);
/// assert_eq!(unique.len(), 2);
/// ```
pub fn dedup_by_identity<R: Identified>(records: Vec<R>) -> Vec<R> {
    dedup_by_key(records, Identified::identity_key)
}

/// First-occurrence-wins deduplication under an arbitrary key
pub fn dedup_by_key<R, K, F>(records: Vec<R>, key: F) -> Vec<R>
where
    K: Eq + Hash,
    F: Fn(&R) -> K,
{
    let before = records.len();
    let mut seen = HashSet::with_capacity(before);

    let unique: Vec<R> = records
        .into_iter()
        .filter(|record| seen.insert(key(record)))
        .collect();

    if unique.len() < before {
        tracing::debug!("Dropped {} duplicate records", before - unique.len());
    }

    unique
}

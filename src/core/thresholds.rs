//! Threshold list editing by identity
//!
//! Thresholds are matched by `id` only. Editing a threshold never moves it,
//! since legend order is display order.

use indoor_map_types::Threshold;
use log::trace;

/// Where an upserted threshold ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    /// An entry with the same id was replaced at this index
    Replaced(usize),
    /// No entry had the id; the threshold was appended at this index
    Appended(usize),
}

/// Insert or replace a threshold by id
pub fn upsert(thresholds: &mut Vec<Threshold>, threshold: Threshold) -> Upserted {
    match thresholds.iter().position(|existing| existing.id == threshold.id) {
        Some(index) => {
            trace!("Replacing threshold {} at {}", threshold.id, index);
            thresholds[index] = threshold;
            Upserted::Replaced(index)
        }
        None => {
            trace!("Appending threshold {}", threshold.id);
            thresholds.push(threshold);
            Upserted::Appended(thresholds.len() - 1)
        }
    }
}

/// Remove the threshold with the same id, if any
///
/// Returns `false` when nothing matched; that is not an error.
pub fn remove(thresholds: &mut Vec<Threshold>, threshold: &Threshold) -> bool {
    match thresholds.iter().position(|existing| existing.id == threshold.id) {
        Some(index) => {
            thresholds.remove(index);
            true
        }
        None => false,
    }
}

/// Collapse duplicate ids in a loaded list
///
/// Each id keeps the position of its first occurrence and the value of its
/// last one.
pub fn normalize(thresholds: &mut Vec<Threshold>) {
    let loaded = std::mem::take(thresholds);
    for threshold in loaded {
        upsert(thresholds, threshold);
    }
}

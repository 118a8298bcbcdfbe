use std::collections::HashSet;

use super::{PhotoId, PhotoSequence};

pub type PhotoIdSet = HashSet<PhotoId>;

/// Inclusive set of ids between `anchor` and `current` in canonical order.
///
/// Direction-agnostic. Returns an empty set when either endpoint is no longer
/// part of `photos`.
pub fn chronological_range(
    photos: &PhotoSequence,
    anchor: &PhotoId,
    current: &PhotoId,
) -> PhotoIdSet {
    let (Some(anchor_pos), Some(current_pos)) =
        (photos.position_of(anchor), photos.position_of(current))
    else {
        tracing::trace!(%anchor, %current, "range endpoint missing from photo sequence");
        return PhotoIdSet::new();
    };

    let lo = anchor_pos.min(current_pos);
    let hi = anchor_pos.max(current_pos);
    photos.ids()[lo..=hi].iter().cloned().collect()
}

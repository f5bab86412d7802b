//! Time-range utilities shared by the selector and the analyzer strategies.

use crate::types::Segment;

/// Half-open intersection test: `[a.start, a.end)` vs `[b.start, b.end)`.
/// Touching endpoints (`a.end == b.start`) do not overlap.
pub fn overlaps(a: &Segment, b: &Segment) -> bool {
    a.start_time < b.end_time && b.start_time < a.end_time
}

/// Greedily keep each segment only if it overlaps none of the already-kept
/// ones. The caller supplies the priority order (highest score first); the
/// result is a maximal non-overlapping subset consistent with that order,
/// preserving it.
pub fn dedupe_by_overlap(segments: Vec<Segment>) -> Vec<Segment> {
    let mut kept: Vec<Segment> = Vec::with_capacity(segments.len());
    for candidate in segments {
        if kept.iter().all(|existing| !overlaps(existing, &candidate)) {
            kept.push(candidate);
        }
    }
    kept
}

//! Coverage overlap between two cameras.
//!
//! Coverage is expressed as grid cells of a shared ground plane; how cells are
//! derived (homography, survey) is up to the caller.

/// `(column, row)` of a coverage grid.
pub type GridCell = (u32, u32);

/// Share of `primary`'s cells that `peer` also covers, `[0,1]`.
///
/// 1 is full overlap; 0 when either camera covers nothing. Duplicate cells in
/// `primary` count once per occurrence.
pub fn calculate_redundancy(primary: &[GridCell], peer: &[GridCell]) -> f64 {
    if primary.is_empty() || peer.is_empty() {
        return 0.0;
    }
    let peer: std::collections::HashSet<&GridCell> = peer.iter().collect();
    let shared = primary.iter().filter(|cell| peer.contains(cell)).count();
    (shared as f64 / primary.len() as f64).clamp(0.0, 1.0)
}

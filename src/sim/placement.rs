//! Spawn placement
//!
//! Rejection sampling over the grid with a hard attempt cap. A full board is a
//! normal condition, so callers get `None` and retry on a later step.

use rand::Rng;

use super::grid::{Footprint, Grid, GridPosition, Occupancy, manhattan};

fn is_free(cell: GridPosition, excludes: &[&dyn Occupancy]) -> bool {
    excludes.iter().all(|ex| !ex.occupies(cell))
}

/// Find a single unoccupied cell in at most `max_attempts` samples
pub fn find_empty_cell<R: Rng + ?Sized>(
    grid: &Grid,
    rng: &mut R,
    excludes: &[&dyn Occupancy],
    max_attempts: u32,
) -> Option<GridPosition> {
    for _ in 0..max_attempts {
        let candidate = grid.random_cell(rng);
        if is_free(candidate, excludes) {
            return Some(candidate);
        }
    }
    None
}

/// Find a `width × height` region whose every cell is unoccupied
pub fn find_empty_region<R: Rng + ?Sized>(
    grid: &Grid,
    rng: &mut R,
    width: i32,
    height: i32,
    excludes: &[&dyn Occupancy],
    max_attempts: u32,
) -> Option<Footprint> {
    for _ in 0..max_attempts {
        let anchor = grid.random_anchor(rng, width, height)?;
        let candidate = Footprint::new(anchor, width, height);
        // Anchor first: cheap reject for the common case
        if !is_free(anchor, excludes) {
            continue;
        }
        if candidate.cells().all(|cell| is_free(cell, excludes)) {
            return Some(candidate);
        }
    }
    None
}

/// Find a cell farther than `min_distance` (Manhattan) from `origin`.
///
/// Always returns a cell: if no sample qualifies within `max_attempts`, the
/// farthest sample seen is used so tiny boards still terminate.
pub fn find_distant_cell<R: Rng + ?Sized>(
    grid: &Grid,
    rng: &mut R,
    origin: GridPosition,
    min_distance: i32,
    max_attempts: u32,
) -> GridPosition {
    let mut best = grid.random_cell(rng);
    let mut best_distance = manhattan(best, origin);
    if best_distance > min_distance {
        return best;
    }
    for _ in 1..max_attempts {
        let candidate = grid.random_cell(rng);
        let distance = manhattan(candidate, origin);
        if distance > min_distance {
            return candidate;
        }
        if distance > best_distance {
            best = candidate;
            best_distance = distance;
        }
    }
    log::debug!(
        "No cell beyond distance {} from {:?}; falling back to {:?} (distance {})",
        min_distance,
        origin,
        best,
        best_distance
    );
    best
}

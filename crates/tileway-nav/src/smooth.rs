use crate::{Cell, Grid};

/// Reduce a cell path to fewer waypoints while keeping a walkable
/// line-of-sight corridor between consecutive waypoints.
///
/// Endpoints are preserved, the output is never longer than the input, and
/// the result is a fixpoint: smoothing a smoothed path returns it unchanged.
/// Paths of length <= 2 are returned as-is.
pub fn smooth(grid: &Grid, path: &[Cell]) -> Vec<Cell> {
    let mut current = path.to_vec();
    loop {
        let reduced = smooth_pass(grid, &current);
        if reduced.len() == current.len() {
            return reduced;
        }
        current = reduced;
    }
}

/// One greedy pass: from each committed waypoint, extend line of sight as
/// far forward as it holds and commit the last visible waypoint.
fn smooth_pass(grid: &Grid, path: &[Cell]) -> Vec<Cell> {
    if path.len() <= 2 {
        return path.to_vec();
    }

    let mut out = vec![path[0]];
    let mut anchor = 0;

    while anchor + 1 < path.len() {
        // Consecutive path cells are adjacent and walkable, so the probe
        // always lands at least one cell forward.
        let mut probe = anchor + 1;
        while probe + 1 < path.len() && grid.line_of_sight(path[anchor], path[probe + 1]) {
            probe += 1;
        }
        out.push(path[probe]);
        anchor = probe;
    }

    out
}

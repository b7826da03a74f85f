//! Expanding shell search over the color grid.
//!
//! A search starts from the query's [`CellRange`] and grows it one cell per
//! side at a time. Each growth step is a shell: only cells not scanned by an
//! earlier shell are visited, and every entry in them is scored with
//! [`distance`]. After each shell the caller decides whether to keep going.
//!
//! The two drivers stop early:
//! - [`closest`] stops after the first shell that produced any candidate, so
//!   the answer is the best entry within the visited shells rather than the
//!   global optimum.
//! - [`k_nearest`] stops once `k` candidates have been collected. The last
//!   shell is scanned in full before sorting and truncating.
//!
//! Radii run from 0 to [`MAX_EXPANSION`]; the last radius spans the whole
//! grid from any starting box.

use crate::color::{distance, Lab};
use crate::grid::{CellRange, Grid, VisitMask, GRID_DIVISIONS};

/// Largest shell radius a search will reach.
///
/// One past the conventional `GRID_DIVISIONS - 2` cap: at this radius the
/// walk covers the whole grid from any start box, so a non-empty grid always
/// yields a match.
pub const MAX_EXPANSION: usize = GRID_DIVISIONS - 1;

/// Anything stored in the grid that has an index-space color.
pub trait Indexed {
    fn indexed_color(&self) -> Lab;
}

impl Indexed for Lab {
    fn indexed_color(&self) -> Lab {
        *self
    }
}

/// An entry scored against the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Position of the entry in the slice handed to the search.
    pub index: usize,
    pub distance: f64,
}

/// Search state reported to the caller after each shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellProgress {
    /// Radius of the shell just finished.
    pub radius: usize,
    /// Cells visited by this shell alone.
    pub new_cells: usize,
    /// Cells visited by all shells so far.
    pub total_cells: usize,
}

/// Receives the entries and shell boundaries of a [`walk_shells`] run.
pub trait ShellVisitor {
    /// Called for every entry in a newly visited cell.
    fn candidate(&mut self, candidate: Candidate);

    /// Called after each shell. Returning `false` ends the search.
    fn keep_expanding(&mut self, progress: ShellProgress) -> bool;
}

/// Walks shells around `query`, feeding `visitor` until it asks to stop or
/// the largest radius has been scanned.
///
/// Returns the number of shells walked.
pub fn walk_shells<P, V>(grid: &Grid<usize>, entries: &[P], query: Lab, visitor: &mut V) -> usize
where
    P: Indexed,
    V: ShellVisitor,
{
    let start = CellRange::query(query);
    let mut mask = VisitMask::new();

    for radius in 0..=MAX_EXPANSION {
        let mut new_cells = 0;
        for cell in start.expanded(radius).cells() {
            if !mask.mark(cell) {
                continue;
            }
            new_cells += 1;
            for &index in grid.bucket(cell) {
                visitor.candidate(Candidate {
                    index,
                    distance: distance(entries[index].indexed_color(), query),
                });
            }
        }
        let progress = ShellProgress {
            radius,
            new_cells,
            total_cells: mask.count(),
        };
        if !visitor.keep_expanding(progress) {
            return radius + 1;
        }
    }
    MAX_EXPANSION + 1
}

#[derive(Default)]
struct Closest {
    best: Option<Candidate>,
}

impl ShellVisitor for Closest {
    fn candidate(&mut self, candidate: Candidate) {
        if !candidate.distance.is_finite() {
            return;
        }
        if self.best.map_or(true, |b| candidate.distance < b.distance) {
            self.best = Some(candidate);
        }
    }

    fn keep_expanding(&mut self, _: ShellProgress) -> bool {
        self.best.is_none()
    }
}

struct Nearest {
    k: usize,
    found: Vec<Candidate>,
}

impl ShellVisitor for Nearest {
    fn candidate(&mut self, candidate: Candidate) {
        self.found.push(candidate);
    }

    fn keep_expanding(&mut self, _: ShellProgress) -> bool {
        self.found.len() < self.k
    }
}

/// Best entry within the first shell that contains any entry.
///
/// Entries scoring a non-finite distance are ignored. Among equal distances
/// the first one visited wins.
pub fn closest<P: Indexed>(grid: &Grid<usize>, entries: &[P], query: Lab) -> Option<Candidate> {
    let mut visitor = Closest::default();
    walk_shells(grid, entries, query, &mut visitor);
    visitor.best
}

/// Up to `k` entries ordered by ascending distance.
///
/// Expands until at least `k` candidates have been seen (or the grid is
/// exhausted), then sorts everything collected and keeps the first `k`. The
/// sort is stable, so ties keep visiting order.
pub fn k_nearest<P: Indexed>(
    grid: &Grid<usize>,
    entries: &[P],
    query: Lab,
    k: usize,
) -> Vec<Candidate> {
    if k == 0 {
        return Vec::new();
    }
    let mut visitor = Nearest {
        k,
        found: Vec::new(),
    };
    walk_shells(grid, entries, query, &mut visitor);
    let mut found = visitor.found;
    found.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    found.truncate(k);
    found
}

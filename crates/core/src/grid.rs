//! Fixed-resolution 3D grid over the normalized L\*a\*b\* space.
//!
//! The grid has `GRID_DIVISIONS` cells per axis. Each cell (bucket) holds
//! items whose index-space color falls inside it. Coordinates are always
//! clamped into `[0, GRID_DIVISIONS - 1]`, so colors outside the nominal
//! range still land in an edge cell.
//!
//! Placement uses a single cell per color. Queries use a small box of cells
//! computed with a half-cell bias either way, so a query close to a cell
//! boundary also covers the neighbor on the other side.

use crate::color::Lab;

/// Number of cells along each axis.
pub const GRID_DIVISIONS: usize = 8;

/// Total number of cells in the grid.
pub const CELL_COUNT: usize = GRID_DIVISIONS * GRID_DIVISIONS * GRID_DIVISIONS;

/// Offset applied, in cell units, when mapping a normalized coordinate to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    /// Half a cell down: lower corner of a query box.
    Floor,
    /// No offset: the cell an entry is stored in.
    Mid,
    /// Half a cell up: upper corner of a query box.
    Ceil,
}

impl Bias {
    fn offset(self) -> f64 {
        match self {
            Bias::Floor => -0.5,
            Bias::Mid => 0.0,
            Bias::Ceil => 0.5,
        }
    }
}

/// Maps an index-space color into `[0, 1]^3` (nominally; out-of-gamut colors
/// may fall outside).
///
/// Lightness is divided by 100; `a` and `b` are shifted from `[-100, 100]`.
pub fn normalize01(c: Lab) -> [f64; 3] {
    [c.l / 100.0, (c.a + 100.0) / 200.0, (c.b + 100.0) / 200.0]
}

/// Truncates toward zero and clamps to a valid axis coordinate.
fn axis_cell(v: f64, bias: Bias) -> usize {
    let scaled = (v * GRID_DIVISIONS as f64 + bias.offset()) as i64;
    scaled.clamp(0, GRID_DIVISIONS as i64 - 1) as usize
}

/// Integer coordinates of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl Cell {
    /// Computes the cell for `c` with the given bias.
    pub fn of(c: Lab, bias: Bias) -> Cell {
        let [x, y, z] = normalize01(c);
        Cell {
            x: axis_cell(x, bias),
            y: axis_cell(y, bias),
            z: axis_cell(z, bias),
        }
    }

    /// Flat index into a `CELL_COUNT`-sized array.
    fn index(self) -> usize {
        (self.x * GRID_DIVISIONS + self.y) * GRID_DIVISIONS + self.z
    }
}

/// The cell an entry with index-space color `c` is stored in.
pub fn insertion_cell(c: Lab) -> Cell {
    Cell::of(c, Bias::Mid)
}

/// An inclusive, axis-aligned box of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub low: Cell,
    pub high: Cell,
}

impl CellRange {
    /// The initial search box for a query color: floor-biased low corner,
    /// ceiling-biased high corner. Always contains [`insertion_cell`] of the
    /// same color.
    pub fn query(c: Lab) -> CellRange {
        CellRange {
            low: Cell::of(c, Bias::Floor),
            high: Cell::of(c, Bias::Ceil),
        }
    }

    /// This box grown by `radius` cells on every side, clamped to the grid.
    pub fn expanded(&self, radius: usize) -> CellRange {
        let max = GRID_DIVISIONS - 1;
        CellRange {
            low: Cell {
                x: self.low.x.saturating_sub(radius),
                y: self.low.y.saturating_sub(radius),
                z: self.low.z.saturating_sub(radius),
            },
            high: Cell {
                x: (self.high.x + radius).min(max),
                y: (self.high.y + radius).min(max),
                z: (self.high.z + radius).min(max),
            },
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (self.low.x..=self.high.x).contains(&cell.x)
            && (self.low.y..=self.high.y).contains(&cell.y)
            && (self.low.z..=self.high.z).contains(&cell.z)
    }

    /// True when the box spans every cell of the grid.
    pub fn covers_grid(&self) -> bool {
        let max = GRID_DIVISIONS - 1;
        self.low == Cell { x: 0, y: 0, z: 0 } && self.high == Cell { x: max, y: max, z: max }
    }

    /// Iterates over every cell in the box, `z` varying fastest.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let CellRange { low, high } = *self;
        (low.x..=high.x).flat_map(move |x| {
            (low.y..=high.y).flat_map(move |y| (low.z..=high.z).map(move |z| Cell { x, y, z }))
        })
    }
}

/// `CELL_COUNT` buckets of items, addressed by [`Cell`].
#[derive(Debug, Clone)]
pub struct Grid<T> {
    buckets: Vec<Vec<T>>,
}

impl<T> Default for Grid<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Grid<T> {
    /// Creates a grid with every bucket empty.
    pub fn new() -> Self {
        Self {
            buckets: (0..CELL_COUNT).map(|_| Vec::new()).collect(),
        }
    }

    /// Appends `item` to the bucket at `cell`.
    pub fn push(&mut self, cell: Cell, item: T) {
        self.buckets[cell.index()].push(item);
    }

    /// Items stored at `cell`, in insertion order.
    pub fn bucket(&self, cell: Cell) -> &[T] {
        &self.buckets[cell.index()]
    }

    /// Empties every bucket.
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(Vec::clear);
    }

    /// Total number of items across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }
}

/// Per-query record of which cells have already been scanned.
///
/// Lives on the stack for the duration of one search.
#[derive(Debug, Clone)]
pub struct VisitMask {
    visited: [bool; CELL_COUNT],
    count: usize,
}

impl Default for VisitMask {
    fn default() -> Self {
        Self::new()
    }
}

impl VisitMask {
    pub fn new() -> Self {
        Self {
            visited: [false; CELL_COUNT],
            count: 0,
        }
    }

    /// Marks `cell` as visited. Returns `false` if it was already marked.
    pub fn mark(&mut self, cell: Cell) -> bool {
        let slot = &mut self.visited[cell.index()];
        if *slot {
            return false;
        }
        *slot = true;
        self.count += 1;
        true
    }

    pub fn is_visited(&self, cell: Cell) -> bool {
        self.visited[cell.index()]
    }

    /// Number of distinct cells marked so far.
    pub fn count(&self) -> usize {
        self.count
    }
}

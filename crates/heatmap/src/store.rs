//! Occurrence store: sparse per-coordinate counts plus the running maximum.
//!
//! The store only does numeric bookkeeping. Every mutation reports what
//! happened through its return value and the engine decides what to redraw.

use std::collections::BTreeMap;

use heatmap_common::{DataPoint, DataSet};

/// Sparse grid, `x -> (y -> count)`. Iterates x ascending, then y ascending.
pub type OccurrenceGrid = BTreeMap<u32, BTreeMap<u32, f64>>;

/// Outcome of [`OccurrenceStore::add_point`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoreUpdate {
    /// Negative or out of range coordinate, or an unusable count
    Rejected,

    /// The cell grew but stayed within the running maximum
    Accumulated { x: u32, y: u32, count: f64 },

    /// The cell exceeded the running maximum, which now equals `count`
    Rescaled { x: u32, y: u32, count: f64 },
}

#[derive(Debug, Clone)]
pub struct OccurrenceStore {
    grid: OccurrenceGrid,
    max: f64,
    initial_max: f64,
}

fn coordinate(v: i64) -> Option<u32> {
    u32::try_from(v).ok()
}

fn usable_count(count: f64) -> bool {
    count.is_finite() && count > 0.0
}

impl OccurrenceStore {
    pub fn new(initial_max: f64) -> Self {
        let initial_max = if usable_count(initial_max) { initial_max } else { 1.0 };
        Self {
            grid: OccurrenceGrid::new(),
            max: initial_max,
            initial_max,
        }
    }

    /// Add `count` occurrences at (x, y).
    pub fn add_point(&mut self, x: i64, y: i64, count: f64) -> StoreUpdate {
        let (Some(x), Some(y)) = (coordinate(x), coordinate(y)) else {
            return StoreUpdate::Rejected;
        };
        if !usable_count(count) {
            return StoreUpdate::Rejected;
        }

        let cell = self.grid.entry(x).or_default().entry(y).or_insert(0.0);
        *cell += count;
        let count = *cell;

        if count > self.max {
            self.max = count;
            StoreUpdate::Rescaled { x, y, count }
        } else {
            StoreUpdate::Accumulated { x, y, count }
        }
    }

    /// Replace everything from flat triples. Duplicate coordinates accumulate;
    /// triples the store would reject are skipped.
    ///
    /// Returns the number of triples skipped.
    pub fn replace_all(&mut self, points: &[DataPoint], max: f64) -> usize {
        let mut grid = OccurrenceGrid::new();
        let mut skipped = 0;

        for point in points {
            match (coordinate(point.x()), coordinate(point.y())) {
                (Some(x), Some(y)) if usable_count(point.count()) => {
                    *grid.entry(x).or_default().entry(y).or_insert(0.0) += point.count();
                }
                _ => skipped += 1,
            }
        }

        self.install(grid, max);
        skipped
    }

    /// Replace everything with an already nested grid.
    pub fn replace_grid(&mut self, mut grid: OccurrenceGrid, max: f64) {
        for column in grid.values_mut() {
            column.retain(|_, count| usable_count(*count));
        }
        grid.retain(|_, column| !column.is_empty());
        self.install(grid, max);
    }

    fn install(&mut self, grid: OccurrenceGrid, max: f64) {
        self.grid = grid;
        let largest = self.largest_count();
        let requested = if max.is_finite() { max } else { 0.0 };
        let reconciled = requested.max(largest);

        if requested < largest {
            tracing::warn!(requested, largest, "Data set max is below its largest count, raising it");
        }
        self.max = if reconciled > 0.0 { reconciled } else { 1.0 };
    }

    /// Drop all counts and return to the initial maximum.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.max = self.initial_max;
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn get(&self, x: u32, y: u32) -> Option<f64> {
        self.grid.get(&x).and_then(|column| column.get(&y)).copied()
    }

    /// Number of distinct coordinates stored.
    pub fn len(&self) -> usize {
        self.grid.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    pub fn grid(&self) -> &OccurrenceGrid {
        &self.grid
    }

    /// Stored cells as `(x, y, count)` in grid order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, f64)> + '_ {
        self.grid
            .iter()
            .flat_map(|(&x, column)| column.iter().map(move |(&y, &count)| (x, y, count)))
    }

    fn largest_count(&self) -> f64 {
        self.iter().map(|(_, _, count)| count).fold(0.0, f64::max)
    }

    /// Current contents in wire format.
    pub fn to_data_set(&self) -> DataSet {
        DataSet::new(
            self.max,
            self.iter()
                .map(|(x, y, count)| DataPoint(x as i64, y as i64, count))
                .collect(),
        )
    }
}

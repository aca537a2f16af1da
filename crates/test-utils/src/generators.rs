//! Deterministic point generators.
//!
//! Everything here is reproducible without a random source so tests can
//! assert on exact grid contents.

use heatmap_common::{DataPoint, DataSet};

/// Points on a regular lattice, `count` each.
///
/// ```
/// use test_utils::lattice_points;
///
/// let points = lattice_points(3, 2, 10, 1.0);
/// assert_eq!(points.len(), 6);
/// assert_eq!(points[4].x(), 10);
/// assert_eq!(points[4].y(), 10);
/// ```
pub fn lattice_points(cols: u32, rows: u32, spacing: u32, count: f64) -> Vec<DataPoint> {
    let mut points = Vec::with_capacity((cols * rows) as usize);
    for row in 0..rows {
        for col in 0..cols {
            points.push(DataPoint((col * spacing) as i64, (row * spacing) as i64, count));
        }
    }
    points
}

/// A hotspot: counts fall off by one per ring of Chebyshev distance from
/// the center, so the center carries `peak`.
pub fn hotspot_points(cx: i64, cy: i64, peak: u32) -> Vec<DataPoint> {
    let reach = peak.saturating_sub(1) as i64;
    let mut points = Vec::new();
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let ring = dx.abs().max(dy.abs());
            points.push(DataPoint(cx + dx, cy + dy, (peak as i64 - ring) as f64));
        }
    }
    points
}

/// Pseudo-random points from a linear congruential sequence, inside
/// `width` x `height`, counts in 1..=max_count.
pub fn scattered_points(seed: u64, n: usize, width: u32, height: u32, max_count: u32) -> Vec<DataPoint> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) as u32
    };

    (0..n)
        .map(|_| {
            let x = next() % width.max(1);
            let y = next() % height.max(1);
            let count = 1 + next() % max_count.max(1);
            DataPoint(x as i64, y as i64, count as f64)
        })
        .collect()
}

/// Wrap points in a data set whose max is their largest count.
pub fn data_set_from(points: Vec<DataPoint>) -> DataSet {
    let max = points.iter().map(|p| p.count()).fold(0.0, f64::max);
    DataSet::new(max, points)
}

//! Grid configuration and world-to-cell snapping

use serde::{Deserialize, Serialize};

/// Smallest cell extent accepted on either axis
pub const CELL_SIZE_MIN: f32 = 0.05;

/// Per-axis tolerance when comparing two snapped coordinates
///
/// Far below `CELL_SIZE_MIN`, so neighbouring cells never compare equal.
pub const CELL_EPSILON: f32 = 1e-4;

/// Upper bound on overlay lines produced per axis
pub const MAX_GRID_LINES: usize = 4096;

/// Cell size of the painting grid
///
/// Both axes are kept at or above [`CELL_SIZE_MIN`]. Smaller values, including
/// zero, negatives and NaN, are replaced by the minimum wherever a size enters
/// the config (construction, `set_cell_size`, deserialization).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct GridConfig {
    cell_size: [f32; 2],
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: [1.0, 1.0],
        }
    }
}

impl From<[f32; 2]> for GridConfig {
    fn from(cell_size: [f32; 2]) -> Self {
        Self::new(cell_size[0], cell_size[1])
    }
}

impl From<GridConfig> for [f32; 2] {
    fn from(config: GridConfig) -> Self {
        config.cell_size
    }
}

impl GridConfig {
    /// Create a config, clamping each axis to the minimum
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            cell_size: [clamp_axis(width, "width"), clamp_axis(height, "height")],
        }
    }

    /// Current cell size as `[width, height]`
    pub fn cell_size(&self) -> [f32; 2] {
        self.cell_size
    }

    /// Replace the cell size, clamping each axis to the minimum
    pub fn set_cell_size(&mut self, cell_size: [f32; 2]) {
        *self = Self::from(cell_size);
    }

    /// Snap a world position to the nearest cell coordinate.
    ///
    /// Only x and y are gridded; z is carried through untouched.
    pub fn snap(&self, position: [f32; 3]) -> [f32; 3] {
        [
            snap_axis(position[0], self.cell_size[0]),
            snap_axis(position[1], self.cell_size[1]),
            position[2],
        ]
    }

    /// Whether two positions sit on the same cell coordinate, within [`CELL_EPSILON`] per axis
    pub fn same_cell(a: [f32; 3], b: [f32; 3]) -> bool {
        (a[0] - b[0]).abs() <= CELL_EPSILON && (a[1] - b[1]).abs() <= CELL_EPSILON
    }

    /// Line positions for a grid overlay covering the world rectangle `min..max`.
    ///
    /// Lines sit on cell borders, half a cell away from the snapped coordinates.
    pub fn grid_lines(&self, min: [f32; 2], max: [f32; 2]) -> GridLines {
        GridLines {
            vertical: axis_lines(min[0], max[0], self.cell_size[0]),
            horizontal: axis_lines(min[1], max[1], self.cell_size[1]),
        }
    }
}

/// Overlay line positions produced by [`GridConfig::grid_lines`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridLines {
    /// X positions of vertical lines
    pub vertical: Vec<f32>,
    /// Y positions of horizontal lines
    pub horizontal: Vec<f32>,
}

fn clamp_axis(value: f32, axis: &str) -> f32 {
    if value >= CELL_SIZE_MIN {
        return value;
    }
    tracing::warn!(
        "Incorrect cell {}: {} is below the minimum, using {}",
        axis,
        value,
        CELL_SIZE_MIN
    );
    CELL_SIZE_MIN
}

#[inline]
fn snap_axis(value: f32, cell: f32) -> f32 {
    (value / cell).round() * cell
}

fn axis_lines(a: f32, b: f32, cell: f32) -> Vec<f32> {
    if !a.is_finite() || !b.is_finite() {
        return Vec::new();
    }
    let (min, max) = if a <= b { (a, b) } else { (b, a) };

    let first = snap_axis(min, cell) - cell / 2.0;
    let last = snap_axis(max, cell) - cell / 2.0;
    let count = ((last - first) / cell).round() as i64 + 1;
    if count <= 0 {
        return Vec::new();
    }

    let count = (count as usize).min(MAX_GRID_LINES);
    (0..count).map(|i| first + i as f32 * cell).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cell_size() {
        assert_eq!(GridConfig::default().cell_size(), [1.0, 1.0]);
    }

    #[test]
    fn test_snap_rounds_to_nearest_cell() {
        let grid = GridConfig::default();
        assert_eq!(grid.snap([2.3, 4.6, 0.0]), [2.0, 5.0, 0.0]);
        assert_eq!(grid.snap([-0.4, -1.7, 0.0]), [0.0, -2.0, 0.0]);

        let grid = GridConfig::new(0.5, 2.0);
        assert_eq!(grid.snap([1.3, 3.2, 0.0]), [1.5, 4.0, 0.0]);
    }

    #[test]
    fn test_snap_keeps_depth() {
        let grid = GridConfig::default();
        assert_eq!(grid.snap([0.2, 0.2, -3.5])[2], -3.5);
    }

    #[test]
    fn test_snap_is_idempotent() {
        let points = [
            [0.0, 0.0, 0.0],
            [2.3, 4.6, 1.0],
            [-7.77, 13.01, 0.0],
            [123.456, -98.7, 0.0],
            [0.024, -0.026, 0.0],
        ];
        for cell in [0.05, 0.3, 1.0, 2.5, 32.0] {
            let grid = GridConfig::new(cell, cell);
            for p in points {
                let once = grid.snap(p);
                assert_eq!(grid.snap(once), once, "cell {} point {:?}", cell, p);
            }
        }
    }

    #[test]
    fn test_cell_size_below_minimum_is_clamped() {
        let mut grid = GridConfig::default();
        grid.set_cell_size([0.01, -3.0]);
        assert_eq!(grid.cell_size(), [CELL_SIZE_MIN, CELL_SIZE_MIN]);

        grid.set_cell_size([0.0, 2.0]);
        assert_eq!(grid.cell_size(), [CELL_SIZE_MIN, 2.0]);

        grid.set_cell_size([f32::NAN, 0.05]);
        assert_eq!(grid.cell_size(), [CELL_SIZE_MIN, CELL_SIZE_MIN]);
    }

    #[test]
    fn test_deserialize_clamps() {
        let grid: GridConfig = serde_json::from_str("[0.01, 1.5]").unwrap();
        assert_eq!(grid.cell_size(), [CELL_SIZE_MIN, 1.5]);

        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, "[0.05,1.5]");
    }

    #[test]
    fn test_same_cell_tolerance() {
        assert!(GridConfig::same_cell([1.0, 2.0, 0.0], [1.00001, 1.99999, 0.0]));
        assert!(GridConfig::same_cell([1.0, 2.0, 0.0], [1.0, 2.0, 5.0]));
        assert!(!GridConfig::same_cell([1.0, 2.0, 0.0], [1.05, 2.0, 0.0]));
        assert!(!GridConfig::same_cell([1.0, 2.0, 0.0], [1.0, 2.01, 0.0]));
    }

    #[test]
    fn test_grid_lines() {
        let grid = GridConfig::default();
        let lines = grid.grid_lines([-2.2, -1.1], [2.2, 1.1]);
        assert_eq!(lines.vertical, vec![-2.5, -1.5, -0.5, 0.5, 1.5]);
        assert_eq!(lines.horizontal, vec![-1.5, -0.5, 0.5]);

        // Reversed corners give the same lines
        let flipped = grid.grid_lines([2.2, 1.1], [-2.2, -1.1]);
        assert_eq!(flipped, lines);
    }

    #[test]
    fn test_grid_lines_are_capped() {
        let grid = GridConfig::new(CELL_SIZE_MIN, CELL_SIZE_MIN);
        let lines = grid.grid_lines([-1.0e6, 0.0], [1.0e6, 0.0]);
        assert_eq!(lines.vertical.len(), MAX_GRID_LINES);
        assert_eq!(lines.horizontal.len(), 1);
    }
}

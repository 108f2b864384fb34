use super::config::GameConfig;

/// Size of the host surface in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Square play area: `grid_size` cells per side, `cell_size` pixels per cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    pub grid_size: usize,
    pub cell_size: u32,
}

impl GridGeometry {
    /// Derive the grid for a viewport.
    ///
    /// Outside fullscreen the grid is always `min_grid_size`. In fullscreen it
    /// is the number of whole cells that fit the smaller axis once the margin
    /// is taken away, but never fewer than `min_grid_size`.
    pub fn calculate(viewport: Viewport, is_fullscreen: bool, config: &GameConfig) -> Self {
        let cell_size = config.cell_size;

        if !is_fullscreen {
            return Self {
                grid_size: config.min_grid_size,
                cell_size,
            };
        }

        let available_width = viewport.width.saturating_sub(config.fullscreen_margin);
        let available_height = viewport.height.saturating_sub(config.fullscreen_margin);

        let horizontal_cells = (available_width / cell_size) as usize;
        let vertical_cells = (available_height / cell_size) as usize;

        Self {
            grid_size: horizontal_cells.min(vertical_cells).max(config.min_grid_size),
            cell_size,
        }
    }

    /// Side length of the board in pixels
    pub fn board_pixels(&self) -> u64 {
        self.grid_size as u64 * self.cell_size as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windowed_is_fixed() {
        let config = GameConfig::default();
        for viewport in [
            Viewport::new(0, 0),
            Viewport::new(320, 240),
            Viewport::new(3840, 2160),
        ] {
            let geometry = GridGeometry::calculate(viewport, false, &config);
            assert_eq!(geometry.grid_size, 30);
            assert_eq!(geometry.cell_size, 20);
        }
    }

    #[test]
    fn test_fullscreen_uses_smaller_axis() {
        let config = GameConfig::default();
        let geometry = GridGeometry::calculate(Viewport::new(1200, 900), true, &config);
        assert_eq!(geometry.grid_size, 35);
        assert_eq!(geometry.cell_size, 20);
        assert_eq!(geometry.board_pixels(), 700);
    }

    #[test]
    fn test_fullscreen_floors_partial_cells() {
        let config = GameConfig::default();
        // 1019 - 200 = 819 -> 40 cells, 1139 - 200 = 939 -> 46 cells
        let geometry = GridGeometry::calculate(Viewport::new(1139, 1019), true, &config);
        assert_eq!(geometry.grid_size, 40);
    }

    #[test]
    fn test_fullscreen_never_below_minimum() {
        let config = GameConfig::default();
        let small = GridGeometry::calculate(Viewport::new(640, 480), true, &config);
        assert_eq!(small.grid_size, 30);

        let tiny = GridGeometry::calculate(Viewport::new(100, 50), true, &config);
        assert_eq!(tiny.grid_size, 30);
    }

    #[test]
    fn test_calculation_is_pure() {
        let config = GameConfig::default();
        let viewport = Viewport::new(1920, 1080);
        let first = GridGeometry::calculate(viewport, true, &config);
        let second = GridGeometry::calculate(viewport, true, &config);
        assert_eq!(first, second);
        assert_eq!(first.grid_size, 44);
    }
}

//! Polyline display buffer

use glam::Vec3;
use smallvec::SmallVec;

use crate::ai::RouteRenderer;

/// Holds the points of a connected line, the way a line renderer component
/// does. Short routes stay inline.
#[derive(Debug, Clone, Default)]
pub struct LineRenderer {
    positions: SmallVec<[Vec3; 16]>,
    /// Number of times the line was redrawn
    revision: u64,
}

impl LineRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of points on the line
    #[must_use]
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Replace all points
    pub fn set_positions(&mut self, positions: &[Vec3]) {
        self.positions.clear();
        self.positions.extend_from_slice(positions);
        self.revision += 1;
    }

    /// Remove all points
    pub fn clear(&mut self) {
        self.set_positions(&[]);
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Total length of the displayed line
    #[must_use]
    pub fn length(&self) -> f32 {
        self.positions.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

impl RouteRenderer for LineRenderer {
    fn draw_polyline(&mut self, points: &[Vec3]) {
        log::trace!("Drawing route line with {} points", points.len());
        self.set_positions(points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_and_clear() {
        let mut line = LineRenderer::new();

        line.draw_polyline(&[Vec3::ZERO, Vec3::X, Vec3::new(1.0, 0.0, 2.0)]);
        assert_eq!(line.position_count(), 3);
        assert!((line.length() - 3.0).abs() < 1e-5);

        line.draw_polyline(&[]);
        assert_eq!(line.position_count(), 0);
        assert_eq!(line.revision(), 2);
    }

    #[test]
    fn test_long_line_spills() {
        let mut line = LineRenderer::new();
        let points: Vec<Vec3> = (0..40).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();

        line.set_positions(&points);
        assert_eq!(line.positions(), points.as_slice());

        line.clear();
        assert!(line.positions().is_empty());
    }
}

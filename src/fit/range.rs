use glam::Vec3A;

use super::{closest, principal_component, snap_to_grid, weighted_covariance, BestFit, ColorFit};
use crate::block::{write_color_block3, write_color_block4};
use crate::colorset::ColorSet;

/// Picks the two colors furthest apart along the principal axis as the
/// endpoints.
pub(crate) struct RangeFit<'a> {
    set: &'a ColorSet,
    metric_sq: Vec3A,
    start: Vec3A,
    end: Vec3A,
}
impl<'a> RangeFit<'a> {
    pub fn new(set: &'a ColorSet, metric: Vec3A) -> Self {
        let points = set.points();
        let axis = principal_component(weighted_covariance(points, set.weights()));

        let mut start = Vec3A::ZERO;
        let mut end = Vec3A::ZERO;
        if let Some((&first, rest)) = points.split_first() {
            start = first;
            end = first;
            let mut min = first.dot(axis);
            let mut max = min;
            for &p in rest {
                let t = p.dot(axis);
                if t < min {
                    start = p;
                    min = t;
                } else if t > max {
                    end = p;
                    max = t;
                }
            }
        }

        Self {
            set,
            metric_sq: metric * metric,
            start: snap_to_grid(start),
            end: snap_to_grid(end),
        }
    }

    /// Assigns each point to the closest palette color.
    fn fit_palette<const N: usize>(&self, palette: &[Vec3A; N]) -> [u8; 16] {
        let mut indexes = [0; 16];
        for (index, &p) in indexes.iter_mut().zip(self.set.points()) {
            *index = closest(palette, p, self.metric_sq).0;
        }
        indexes
    }
}

impl ColorFit for RangeFit<'_> {
    fn compress3(&mut self, best: &mut BestFit) {
        let (start, end) = (self.start, self.end);
        let palette = [start, end, 0.5 * (start + end)];

        let indexes = self.fit_palette(&palette);
        best.offer(write_color_block3(start, end, &self.set.remap_indexes(&indexes)));
    }

    fn compress4(&mut self, best: &mut BestFit) {
        let (start, end) = (self.start, self.end);
        let palette = [
            start,
            end,
            (2.0 / 3.0) * start + (1.0 / 3.0) * end,
            (1.0 / 3.0) * start + (2.0 / 3.0) * end,
        ];

        let indexes = self.fit_palette(&palette);
        best.offer(write_color_block4(start, end, &self.set.remap_indexes(&indexes)));
    }
}

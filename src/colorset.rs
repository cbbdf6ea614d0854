use glam::Vec3A;

use crate::block::Indexes;
use crate::convert::n8;

/// The distinct colors of a block that take part in the endpoint fit.
///
/// Pixels outside the mask, and in BC1 pixels with alpha < 128, are excluded.
/// Pixels of identical color are merged into a single point whose weight is
/// the sum of the pixel weights.
#[derive(Debug, Clone)]
pub(crate) struct ColorSet {
    count: usize,
    points: [Vec3A; 16],
    weights: [f32; 16],
    /// Maps each pixel to its point, or `None` if the pixel is excluded.
    remap: [Option<u8>; 16],
    transparent: bool,
}
impl ColorSet {
    pub fn new(
        rgba: &[[u8; 4]; 16],
        mask: u16,
        is_bc1: bool,
        weigh_color_by_alpha: bool,
    ) -> Self {
        let mut set = Self {
            count: 0,
            points: [Vec3A::ZERO; 16],
            weights: [0.0; 16],
            remap: [None; 16],
            transparent: false,
        };

        let is_included = |i: usize| mask & (1 << i) != 0 && !(is_bc1 && rgba[i][3] < 128);

        for i in 0..16 {
            if mask & (1 << i) == 0 {
                continue;
            }
            // BC1 can only represent binary alpha
            if is_bc1 && rgba[i][3] < 128 {
                set.transparent = true;
                continue;
            }

            let [r, g, b, a] = rgba[i];
            let weight = if weigh_color_by_alpha {
                (a as f32 + 1.0) * (1.0 / 256.0)
            } else {
                1.0
            };

            let existing = (0..i)
                .find(|&j| is_included(j) && rgba[j][..3] == rgba[i][..3])
                .and_then(|j| set.remap[j]);

            match existing {
                Some(index) => {
                    set.weights[index as usize] += weight;
                    set.remap[i] = Some(index);
                }
                None => {
                    set.points[set.count] = Vec3A::new(n8::f32(r), n8::f32(g), n8::f32(b));
                    set.weights[set.count] = weight;
                    set.remap[i] = Some(set.count as u8);
                    set.count += 1;
                }
            }
        }

        set
    }

    pub fn len(&self) -> usize {
        self.count
    }
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
    pub fn points(&self) -> &[Vec3A] {
        &self.points[..self.count]
    }
    pub fn weights(&self) -> &[f32] {
        &self.weights[..self.count]
    }
    /// Whether the set excluded pixels for being transparent.
    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    /// The point of the given pixel, or `None` if the pixel is excluded.
    pub fn point_of(&self, pixel: usize) -> Option<u8> {
        self.remap[pixel]
    }

    /// Expands per-point indexes to per-pixel indexes.
    ///
    /// Excluded pixels get index 3, which is transparent black in 3-color
    /// mode.
    pub fn remap_indexes(&self, point_indexes: &[u8]) -> Indexes {
        debug_assert!(point_indexes.len() >= self.count);
        self.remap
            .map(|point| point.map_or(3, |j| point_indexes[j as usize]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    #[test]
    fn merges_duplicates() {
        let mut rgba = [RED; 16];
        rgba[5] = BLUE;
        rgba[9] = BLUE;

        let set = ColorSet::new(&rgba, 0xFFFF, false, false);
        assert_eq!(set.len(), 2);
        assert_eq!(set.points(), &[Vec3A::X, Vec3A::Z]);
        assert_eq!(set.weights(), &[14.0, 2.0]);
        assert!(!set.is_transparent());

        let indexes = set.remap_indexes(&[0, 1]);
        assert_eq!(indexes[0], 0);
        assert_eq!(indexes[5], 1);
        assert_eq!(indexes[9], 1);
        assert_eq!(indexes[15], 0);
    }

    #[test]
    fn mask_excludes_pixels() {
        let mut rgba = [RED; 16];
        rgba[0] = BLUE;

        let set = ColorSet::new(&rgba, 0xFFFE, false, false);
        assert_eq!(set.len(), 1);
        assert_eq!(set.points(), &[Vec3A::X]);
        assert!(!set.is_transparent());
        assert_eq!(set.remap_indexes(&[1])[0], 3);
        assert_eq!(set.remap_indexes(&[1])[1], 1);
        assert_eq!(set.point_of(0), None);
        assert_eq!(set.point_of(1), Some(0));

        let set = ColorSet::new(&rgba, 0, true, false);
        assert!(set.is_empty());
        assert!(!set.is_transparent());
        assert_eq!(set.remap_indexes(&[]), [3; 16]);
    }

    #[test]
    fn bc1_transparency() {
        let mut rgba = [RED; 16];
        rgba[3] = [255, 0, 0, 127];
        rgba[4] = [0, 255, 0, 0];

        let set = ColorSet::new(&rgba, 0xFFFF, true, false);
        assert_eq!(set.len(), 1);
        assert_eq!(set.weights(), &[14.0]);
        assert!(set.is_transparent());

        // alpha is ignored by BC2 and BC3 color blocks
        let set = ColorSet::new(&rgba, 0xFFFF, false, false);
        assert_eq!(set.len(), 2);
        assert!(!set.is_transparent());
    }

    #[test]
    fn alpha_weights() {
        let mut rgba = [[0, 0, 0, 255]; 16];
        rgba[1] = [255, 255, 255, 63];

        let set = ColorSet::new(&rgba, 0xFFFF, false, true);
        assert_eq!(set.len(), 2);
        assert_eq!(set.weights(), &[15.0, 0.25]);
    }
}

//! Endpoint fitting for color blocks.
//!
//! Each fit is asked to compress the color set in 3-color and/or 4-color mode
//! and offers its candidate blocks to a [`BestFit`]. Fits rank their own
//! candidates however they like. [`BestFit`] decodes every offered block,
//! moves each color to the closest entry of the decoded palette, and keeps
//! the block with the lowest `Σ weight * |metric * (color - decoded)|²`. A
//! later fit can therefore never make the result worse.

mod cluster;
mod range;
mod single;

use glam::Vec3A;

use crate::block::{decode_palette, read_indexes, with_indexes, TRANSPARENT_BLOCK};
use crate::colorset::ColorSet;
use crate::convert::n8;
use crate::{FitMethod, Params};

pub(crate) use cluster::ClusterFit;
pub(crate) use range::RangeFit;
pub(crate) use single::SingleColorFit;

/// The best color block found so far, scored on its decoded colors.
#[derive(Debug, Clone)]
pub(crate) struct BestFit<'a> {
    set: &'a ColorSet,
    metric_sq: Vec3A,
    is_bc1: bool,
    pub block: [u8; 8],
    pub error: f32,
}
impl<'a> BestFit<'a> {
    pub fn new(set: &'a ColorSet, metric: Vec3A, is_bc1: bool) -> Self {
        Self {
            set,
            metric_sq: metric * metric,
            is_bc1,
            block: [0; 8],
            error: f32::INFINITY,
        }
    }

    /// Replaces the current block if the decoded error of `block` is
    /// strictly lower.
    pub fn offer(&mut self, block: [u8; 8]) {
        let (block, error) = self.reassign_indexes(block);
        if error < self.error {
            self.error = error;
            self.block = block;
        }
    }

    /// Points every color of the set to the closest entry of the decoded
    /// palette and returns the new block and its error.
    ///
    /// Excluded pixels keep their index. Transparent black is never chosen.
    fn reassign_indexes(&self, block: [u8; 8]) -> ([u8; 8], f32) {
        let (palette, three_color) = decode_palette(block, self.is_bc1);
        let palette = palette.map(|[r, g, b, _]| Vec3A::new(n8::f32(r), n8::f32(g), n8::f32(b)));
        let opaque = [palette[0], palette[1], palette[2]];

        let mut point_indexes = [0; 16];
        let mut error = 0.0;
        let points = self.set.points().iter().zip(self.set.weights());
        for (index, (&p, &w)) in point_indexes.iter_mut().zip(points) {
            let (closest_index, dist) = if three_color {
                closest(&opaque, p, self.metric_sq)
            } else {
                closest(&palette, p, self.metric_sq)
            };
            *index = closest_index;
            error += w * dist;
        }

        let mut indexes = read_indexes(block);
        for (pixel, index) in indexes.iter_mut().enumerate() {
            if let Some(point) = self.set.point_of(pixel) {
                *index = point_indexes[point as usize];
            }
        }
        (with_indexes(block, &indexes), error)
    }
}

pub(crate) trait ColorFit {
    /// Fits the set with the palette `[c0, c1, (c0 + c1) / 2, transparent]`.
    fn compress3(&mut self, best: &mut BestFit);
    /// Fits the set with the palette `[c0, c1, 2/3 c0 + 1/3 c1, 1/3 c0 + 2/3 c1]`.
    fn compress4(&mut self, best: &mut BestFit);

    /// Tries all palette modes the format allows.
    ///
    /// BC1 blocks with transparent pixels must use 3-color mode. Otherwise
    /// BC1 tries both modes. BC2 and BC3 only support 4-color mode.
    fn compress(&mut self, is_bc1: bool, is_transparent: bool, best: &mut BestFit) {
        if is_bc1 {
            self.compress3(best);
            if !is_transparent {
                self.compress4(best);
            }
        } else {
            self.compress4(best);
        }
    }
}

/// Compresses the color part of a block.
pub(crate) fn compress_color_block<'a>(
    set: &'a ColorSet,
    params: &Params,
    is_bc1: bool,
) -> BestFit<'a> {
    let metric = Vec3A::from(params.weights);
    let mut best = BestFit::new(set, metric, is_bc1);

    if set.is_empty() {
        best.block = if set.is_transparent() {
            TRANSPARENT_BLOCK
        } else {
            [0; 8]
        };
        best.error = 0.0;
        return best;
    }

    let transparent = set.is_transparent();

    if set.len() == 1 {
        SingleColorFit::new(set).compress(is_bc1, transparent, &mut best);
        return best;
    }

    // The range fit is the baseline for the cluster fits.
    RangeFit::new(set, metric).compress(is_bc1, transparent, &mut best);
    match params.fit {
        FitMethod::RangeFit => {}
        FitMethod::ClusterFit => {
            ClusterFit::new(set, metric, false).compress(is_bc1, transparent, &mut best);
        }
        FitMethod::IterativeClusterFit => {
            ClusterFit::new(set, metric, true).compress(is_bc1, transparent, &mut best);
        }
    }

    best
}

const GRID: Vec3A = Vec3A::new(31.0, 63.0, 31.0);
const GRID_RCP: Vec3A = Vec3A::new(1.0 / 31.0, 1.0 / 63.0, 1.0 / 31.0);

/// Clamps the color to `0..=1` and rounds it to the nearest 5:6:5 color.
pub(crate) fn snap_to_grid(color: Vec3A) -> Vec3A {
    let color = color.clamp(Vec3A::ZERO, Vec3A::ONE);
    (color * GRID + Vec3A::splat(0.5)).floor() * GRID_RCP
}

/// Returns the index of the closest palette color and the weighted squared
/// error. Ties go to the lower index.
pub(crate) fn closest<const N: usize>(palette: &[Vec3A; N], color: Vec3A, metric_sq: Vec3A) -> (u8, f32) {
    let mut best_index = 0;
    let mut min_error = f32::INFINITY;
    for (i, &p) in palette.iter().enumerate() {
        let diff = color - p;
        let error = (diff * diff).dot(metric_sq);
        if error < min_error {
            best_index = i as u8;
            min_error = error;
        }
    }
    (best_index, min_error)
}

/// Returns the weighted covariance matrix of the points as rows.
pub(crate) fn weighted_covariance(points: &[Vec3A], weights: &[f32]) -> [Vec3A; 3] {
    debug_assert_eq!(points.len(), weights.len());

    let mut total = 0.0;
    let mut centroid = Vec3A::ZERO;
    for (&p, &w) in points.iter().zip(weights) {
        total += w;
        centroid += p * w;
    }
    if total > f32::EPSILON {
        centroid /= total;
    }

    let mut cov = [Vec3A::ZERO; 3];
    for (&p, &w) in points.iter().zip(weights) {
        let d = p - centroid;
        let wd = d * w;
        cov[0] += wd * d.x;
        cov[1] += wd * d.y;
        cov[2] += wd * d.z;
    }
    cov
}

/// Approximates the dominant eigenvector of a symmetric 3x3 matrix.
///
/// Returns zero if the matrix is zero, i.e. all points are the same.
pub(crate) fn principal_component(matrix: [Vec3A; 3]) -> Vec3A {
    const POWER_ITERATIONS: usize = 8;

    // The row with the largest norm is a vector in the column space, so it
    // can't be orthogonal to all eigenvectors with non-zero eigenvalues.
    let mut v = matrix
        .iter()
        .copied()
        .fold(Vec3A::ZERO, |best, row| {
            if row.length_squared() > best.length_squared() {
                row
            } else {
                best
            }
        })
        .normalize_or_zero();

    for _ in 0..POWER_ITERATIONS {
        let w = Vec3A::new(matrix[0].dot(v), matrix[1].dot(v), matrix[2].dot(v));
        let w = w.normalize_or_zero();
        if w == Vec3A::ZERO {
            break;
        }
        v = w;
    }
    v
}

use glam::{Vec3A, Vec4};

use super::{principal_component, snap_to_grid, weighted_covariance, BestFit, ColorFit};
use crate::block::{write_color_block3, write_color_block4, Indexes};
use crate::colorset::ColorSet;

const MAX_ITERATIONS: usize = 8;

// The W lane carries the squared interpolation weight.
const HALF_HALF2: Vec4 = Vec4::new(0.5, 0.5, 0.5, 0.25);
const TWOTHIRDS_TWOTHIRDS2: Vec4 = Vec4::new(2.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0, 4.0 / 9.0);
const ONETHIRD_ONETHIRD2: Vec4 = Vec4::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 9.0);
const TWONINTHS: f32 = 2.0 / 9.0;

/// Least-squares endpoint fit.
///
/// The points are sorted along an axis. Every way of splitting the sorted
/// points into consecutive clusters, one cluster per palette entry, is
/// solved for the optimal endpoints. The iterative variant re-sorts the
/// points along the best endpoints found so far and repeats.
pub(crate) struct ClusterFit<'a> {
    set: &'a ColorSet,
    metric_sq: Vec3A,
    axis: Vec3A,
    iterations: usize,
    orders: [[u8; 16]; MAX_ITERATIONS],
    /// Points in the current order, premultiplied by their weight with the
    /// weight in W.
    points_weights: [Vec4; 16],
    xsum_wsum: Vec4,
    /// `Σ w * x²`, the part of the error that doesn't depend on the endpoints.
    xxsum: Vec3A,
}

/// Endpoints and error of a cluster split.
struct Solution {
    start: Vec3A,
    end: Vec3A,
    error: f32,
}

/// The best split of one ordering: the solution and the exclusive ends of
/// the clusters except the last one.
type Split = (Solution, [usize; 3]);

impl<'a> ClusterFit<'a> {
    pub fn new(set: &'a ColorSet, metric: Vec3A, iterate: bool) -> Self {
        let axis = principal_component(weighted_covariance(set.points(), set.weights()));
        let xxsum = set
            .points()
            .iter()
            .zip(set.weights())
            .fold(Vec3A::ZERO, |acc, (&p, &w)| acc + p * p * w);

        Self {
            set,
            metric_sq: metric * metric,
            axis,
            iterations: if iterate { MAX_ITERATIONS } else { 1 },
            orders: [[0; 16]; MAX_ITERATIONS],
            points_weights: [Vec4::ZERO; 16],
            xsum_wsum: Vec4::ZERO,
            xxsum,
        }
    }

    /// Sorts the points along `axis`.
    ///
    /// Returns `false` if the order was already tried in an earlier
    /// iteration.
    fn construct_ordering(&mut self, axis: Vec3A, iteration: usize) -> bool {
        let points = self.set.points();
        let weights = self.set.weights();
        let count = points.len();

        let (previous, rest) = self.orders.split_at_mut(iteration);
        let order = &mut rest[0];

        let mut dps = [0.0_f32; 16];
        for (i, &p) in points.iter().enumerate() {
            dps[i] = p.dot(axis);
            order[i] = i as u8;
        }
        // stable insertion sort
        for i in 1..count {
            let mut j = i;
            while j > 0 && dps[j] < dps[j - 1] {
                dps.swap(j, j - 1);
                order.swap(j, j - 1);
                j -= 1;
            }
        }

        if previous.iter().any(|p| p[..count] == order[..count]) {
            return false;
        }

        self.xsum_wsum = Vec4::ZERO;
        for (pw, &index) in self.points_weights.iter_mut().zip(&order[..count]) {
            let p = points[index as usize];
            let w = weights[index as usize];
            *pw = Vec4::new(p.x, p.y, p.z, 1.0) * w;
            self.xsum_wsum += *pw;
        }
        true
    }

    /// Solves for the endpoints minimizing the squared error given the sums of
    /// the clusters, then snaps them to the 5:6:5 grid.
    fn solve(&self, alphax_sum: Vec4, betax_sum: Vec4, alphabeta_sum: f32) -> Option<Solution> {
        let alpha2_sum = alphax_sum.w;
        let beta2_sum = betax_sum.w;
        let alphax = Vec3A::new(alphax_sum.x, alphax_sum.y, alphax_sum.z);
        let betax = Vec3A::new(betax_sum.x, betax_sum.y, betax_sum.z);

        let factor = 1.0 / (alpha2_sum * beta2_sum - alphabeta_sum * alphabeta_sum);
        if !factor.is_finite() {
            return None;
        }

        let a = (alphax * beta2_sum - betax * alphabeta_sum) * factor;
        let b = (betax * alpha2_sum - alphax * alphabeta_sum) * factor;
        let a = snap_to_grid(a);
        let b = snap_to_grid(b);

        let e = a * a * alpha2_sum
            + b * b * beta2_sum
            + 2.0 * (a * b * alphabeta_sum - a * alphax - b * betax)
            + self.xxsum;
        Some(Solution {
            start: a,
            end: b,
            error: e.dot(self.metric_sq),
        })
    }

    /// Runs `search` on each ordering until it stops improving, and offers
    /// the best split of every ordering.
    ///
    /// `search` returns the best split of the current ordering with an error
    /// below the given one.
    fn iterate(
        &mut self,
        best_fit: &mut BestFit,
        search: fn(&Self, f32) -> Option<Split>,
        cluster_indexes: &[u8],
        write_block: fn(Vec3A, Vec3A, &Indexes) -> [u8; 8],
    ) {
        if !self.construct_ordering(self.axis, 0) {
            return;
        }

        let mut best_error = f32::INFINITY;
        let mut iteration = 0;
        while let Some((solution, bounds)) = search(self, best_error) {
            best_error = solution.error;
            let indexes = self.unorder(iteration, &bounds, cluster_indexes);
            best_fit.offer(write_block(
                solution.start,
                solution.end,
                &self.set.remap_indexes(&indexes),
            ));

            iteration += 1;
            if iteration == self.iterations {
                break;
            }
            if !self.construct_ordering(solution.end - solution.start, iteration) {
                break;
            }
        }
    }

    fn unorder(&self, iteration: usize, bounds: &[usize; 3], cluster_indexes: &[u8]) -> [u8; 16] {
        let count = self.set.len();
        let order = &self.orders[iteration];

        let mut indexes = [0; 16];
        let mut cluster = 0;
        for (i, &point) in order[..count].iter().enumerate() {
            while cluster < bounds.len() && i >= bounds[cluster] {
                cluster += 1;
            }
            indexes[point as usize] = cluster_indexes[cluster];
        }
        indexes
    }

    fn search3(&self, mut best_error: f32) -> Option<Split> {
        let count = self.set.len();
        let mut best = None;

        let mut part0 = Vec4::ZERO;
        for i in 0..count {
            let mut part1 = if i == 0 {
                self.points_weights[0]
            } else {
                Vec4::ZERO
            };
            let mut j = i.max(1);
            loop {
                let part2 = self.xsum_wsum - part1 - part0;

                let half = part1 * HALF_HALF2;
                let alphax_sum = half + part0;
                let betax_sum = half + part2;
                if let Some(solution) = self.solve(alphax_sum, betax_sum, half.w) {
                    if solution.error < best_error {
                        best_error = solution.error;
                        best = Some((solution, [i, j, count]));
                    }
                }

                if j == count {
                    break;
                }
                part1 += self.points_weights[j];
                j += 1;
            }
            part0 += self.points_weights[i];
        }
        best
    }

    fn search4(&self, mut best_error: f32) -> Option<Split> {
        let count = self.set.len();
        let mut best = None;

        let mut part0 = Vec4::ZERO;
        for i in 0..count {
            let mut part1 = Vec4::ZERO;
            for j in i..=count {
                let mut part2 = if j == 0 {
                    self.points_weights[0]
                } else {
                    Vec4::ZERO
                };
                let mut k = j.max(1);
                loop {
                    let part3 = self.xsum_wsum - part2 - part1 - part0;

                    let alphax_sum =
                        part2 * ONETHIRD_ONETHIRD2 + part1 * TWOTHIRDS_TWOTHIRDS2 + part0;
                    let betax_sum =
                        part1 * ONETHIRD_ONETHIRD2 + part2 * TWOTHIRDS_TWOTHIRDS2 + part3;
                    let alphabeta_sum = TWONINTHS * (part1 + part2).w;

                    if let Some(solution) = self.solve(alphax_sum, betax_sum, alphabeta_sum) {
                        if solution.error < best_error {
                            best_error = solution.error;
                            best = Some((solution, [i, j, k]));
                        }
                    }

                    if k == count {
                        break;
                    }
                    part2 += self.points_weights[k];
                    k += 1;
                }
                if j < count {
                    part1 += self.points_weights[j];
                }
            }
            part0 += self.points_weights[i];
        }
        best
    }
}

impl ColorFit for ClusterFit<'_> {
    fn compress3(&mut self, best_fit: &mut BestFit) {
        self.iterate(best_fit, Self::search3, &[0, 2, 1], write_color_block3);
    }

    fn compress4(&mut self, best_fit: &mut BestFit) {
        self.iterate(best_fit, Self::search4, &[0, 2, 3, 1], write_color_block4);
    }
}

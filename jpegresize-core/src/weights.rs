// SPDX-License-Identifier: MIT
//! Per-axis weight tables.
//!
//! One table per axis, built once right after planning and reused for every
//! row (x table) or every output row (y table). Degenerate sums are not
//! detected here; the convolution passes guard them when the weights are
//! consumed.

use crate::filter::FilterSpec;
use crate::plan::AxisGeometry;

/// `window` contiguous weights for every output coordinate along one axis.
#[derive(Clone, Debug)]
pub struct WeightTable {
    window: usize,
    weights: Vec<f32>,
    /// First contributing source coordinate for each output coordinate.
    bases: Vec<i64>,
    /// `⌊mapped coordinate⌋` for each output coordinate.
    centers: Vec<i64>,
}

impl WeightTable {
    pub fn build(axis: &AxisGeometry, filter: &FilterSpec) -> Self {
        let n = axis.target as usize;
        let mut weights = Vec::with_capacity(n * axis.window);
        let mut bases = Vec::with_capacity(n);
        let mut centers = Vec::with_capacity(n);

        for o in 0..axis.target {
            let m = axis.map(o);
            let center = m.floor() as i64;
            let base = center - axis.offset as i64;
            for i in 0..axis.window {
                let d = (m - (base + i as i64) as f64).abs() as f32 / axis.radius;
                weights.push(filter.weight(d));
            }
            bases.push(base);
            centers.push(center);
        }

        Self {
            window: axis.window,
            weights,
            bases,
            centers,
        }
    }

    /// Number of output coordinates covered.
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Weights for output coordinate `o`, one per source coordinate starting
    /// at [`base`](Self::base).
    #[inline]
    pub fn weights(&self, o: usize) -> &[f32] {
        &self.weights[o * self.window..(o + 1) * self.window]
    }

    #[inline]
    pub fn base(&self, o: usize) -> i64 {
        self.bases[o]
    }

    /// Nearest-sample source coordinate used by the degenerate fallbacks.
    #[inline]
    pub fn center(&self, o: usize) -> i64 {
        self.centers[o]
    }
}

// SPDX-License-Identifier: MIT
//! # Row Window
//!
//! Bounded cache of horizontally pre-convolved source rows feeding the
//! vertical pass.
//!
//! ## Overview
//!
//! The vertical kernel for output row `y2` needs `h3` consecutive source rows
//! starting at `⌊yf⌋ - y_offset`. Rather than holding the whole image, the
//! window keeps exactly `h3` [`RowSlot`]s in a ring indexed by
//! `source_row mod h3`:
//!
//! ```text
//!   needed rows:   [ base ........................ base + h3 )
//!   slot index:      base % h3, (base+1) % h3, ...
//!
//!   slot tagged with a row still in range  -> kept, no recomputation
//!   slot tagged with any other row         -> evicted and refilled
//!   needed row outside the image           -> slot left empty
//! ```
//!
//! Because output rows advance monotonically, a step usually loads at most
//! one new source row. Larger jumps (the first row, strong downscales) simply
//! refill more slots.
//!
//! ## Forward-only sources
//!
//! Rows come from a [`ScanlineCursor`], which reads and discards any rows
//! between the last one consumed and the one requested, and refuses to go
//! backwards.

use log::{trace, warn};
use smallvec::{SmallVec, smallvec};

use crate::error::ResampleError;
use crate::scanline::ScanlineSource;
use crate::weights::WeightTable;

/// Weights at or below this magnitude are skipped.
pub(crate) const NEGLIGIBLE_WEIGHT: f32 = 1e-8;
/// Weight sums at or below this magnitude trigger the nearest-sample fallback.
pub(crate) const DEGENERATE_SUM: f32 = 1e-3;

/// Per-channel accumulator; inline for the usual 1, 3 or 4 channels.
pub(crate) type Accum = SmallVec<[f32; 4]>;

/// Forward-only cursor over a [`ScanlineSource`].
pub struct ScanlineCursor<S> {
    source: S,
    line: Vec<u8>,
    next_row: usize,
    rows_skipped: usize,
}

impl<S: ScanlineSource> ScanlineCursor<S> {
    pub fn new(source: S) -> Self {
        let len = source.width() as usize * source.channels();
        Self {
            source,
            line: vec![0; len],
            next_row: 0,
            rows_skipped: 0,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Index of the next row the source will deliver.
    pub fn next_row(&self) -> usize {
        self.next_row
    }

    /// Rows read and discarded without being convolved.
    pub fn rows_skipped(&self) -> usize {
        self.rows_skipped
    }

    /// Advance to `row` and return its samples, discarding anything between.
    pub fn advance_to(&mut self, row: usize) -> Result<&[u8], ResampleError> {
        if row < self.next_row {
            return Err(ResampleError::RowRewind {
                requested: row,
                next: self.next_row,
            });
        }
        while self.next_row <= row {
            let current = self.next_row;
            match self.source.read_scanline(&mut self.line) {
                Ok(true) => {}
                Ok(false) => return Err(ResampleError::Truncated { row: current }),
                Err(source) => return Err(ResampleError::Source { row: current, source }),
            }
            self.next_row += 1;
            if current < row {
                self.rows_skipped += 1;
            }
        }
        Ok(&self.line)
    }
}

/// Horizontally convolved partial sums for one source row.
///
/// For each output column the slot stores `channels` weighted sums followed
/// by the weight sum.
#[derive(Clone, Debug)]
pub struct RowSlot {
    row: Option<usize>,
    sums: Vec<f32>,
}

impl RowSlot {
    fn new(len: usize) -> Self {
        Self {
            row: None,
            sums: vec![0.0; len],
        }
    }

    /// Source row currently held, if any.
    pub fn row(&self) -> Option<usize> {
        self.row
    }
}

/// Fixed-capacity ring of [`RowSlot`]s.
#[derive(Clone, Debug)]
pub struct RowWindow {
    slots: Vec<RowSlot>,
    source_width: usize,
    source_height: usize,
    channels: usize,
    out_width: usize,
}

impl RowWindow {
    /// Empty window of `capacity` slots for `out_width` columns.
    pub fn new(
        capacity: usize,
        source_width: u32,
        source_height: u32,
        out_width: u32,
        channels: usize,
    ) -> Self {
        let len = out_width as usize * (channels + 1);
        Self {
            slots: (0..capacity).map(|_| RowSlot::new(len)).collect(),
            source_width: source_width as usize,
            source_height: source_height as usize,
            channels,
            out_width: out_width as usize,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Distinct source rows currently held.
    pub fn rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().filter_map(|s| s.row)
    }

    /// Slot holding `row`, or `None` if it is not resident.
    #[inline]
    pub fn slot(&self, row: i64) -> Option<&RowSlot> {
        if row < 0 || self.slots.is_empty() {
            return None;
        }
        let slot = &self.slots[self.index(row)];
        (slot.row == Some(row as usize)).then_some(slot)
    }

    /// `channels + 1` partial sums of output column `x2` in `slot`.
    #[inline]
    pub fn column<'a>(&self, slot: &'a RowSlot, x2: usize) -> &'a [f32] {
        let stride = self.channels + 1;
        &slot.sums[x2 * stride..(x2 + 1) * stride]
    }

    #[inline]
    fn index(&self, row: i64) -> usize {
        row.rem_euclid(self.slots.len() as i64) as usize
    }

    /// Make the window hold exactly the rows `[base, base + capacity)` that
    /// lie inside the image, loading missing ones through `cursor`.
    ///
    /// Returns the number of horizontal fallbacks taken.
    pub fn fill<S: ScanlineSource>(
        &mut self,
        base: i64,
        cursor: &mut ScanlineCursor<S>,
        xw: &WeightTable,
    ) -> Result<usize, ResampleError> {
        let mut fallbacks = 0;
        let mut loaded = 0;
        for i in 0..self.slots.len() {
            let row = base + i as i64;
            let idx = self.index(row);
            if row < 0 || row as usize >= self.source_height {
                self.slots[idx].row = None;
                continue;
            }
            let row = row as usize;
            if self.slots[idx].row == Some(row) {
                continue;
            }

            let line = cursor.advance_to(row)?;
            let slot = &mut self.slots[idx];
            fallbacks += convolve_row(
                line,
                self.source_width,
                self.channels,
                xw,
                &mut slot.sums[..self.out_width * (self.channels + 1)],
            );
            slot.row = Some(row);
            loaded += 1;
        }
        trace!("window at row {}: loaded {} of {} rows", base, loaded, self.slots.len());
        if fallbacks > 0 {
            warn!(
                "x factor near zero in {} column(s) near source row {}; used nearest sample",
                fallbacks,
                base.max(0)
            );
        }
        Ok(fallbacks)
    }
}

/// Horizontal pass for one source row into `out`.
///
/// Returns how many columns fell back to the nearest sample because their
/// weight sum was degenerate.
pub(crate) fn convolve_row(
    line: &[u8],
    source_width: usize,
    channels: usize,
    xw: &WeightTable,
    out: &mut [f32],
) -> usize {
    let stride = channels + 1;
    let mut acc: Accum = smallvec![0.0; channels];
    let mut fallbacks = 0;

    for (x2, dst) in out.chunks_exact_mut(stride).enumerate().take(xw.len()) {
        acc.iter_mut().for_each(|a| *a = 0.0);
        let mut s = 0.0f32;
        let base = xw.base(x2);
        for (j, &f) in xw.weights(x2).iter().enumerate() {
            let x = base + j as i64;
            if x < 0 || x as usize >= source_width || f.abs() <= NEGLIGIBLE_WEIGHT {
                continue;
            }
            let px = &line[x as usize * channels..(x as usize + 1) * channels];
            for (a, &v) in acc.iter_mut().zip(px) {
                *a += f * v as f32;
            }
            s += f;
        }

        if s.abs() > DEGENERATE_SUM {
            dst[..channels].copy_from_slice(&acc);
            dst[channels] = s;
        } else {
            fallbacks += 1;
            match nearest(xw.center(x2), source_width) {
                Some(x) => {
                    let px = &line[x * channels..(x + 1) * channels];
                    for (d, &v) in dst[..channels].iter_mut().zip(px) {
                        *d = v as f32;
                    }
                }
                None => dst[..channels].iter_mut().for_each(|d| *d = 0.0),
            }
            dst[channels] = 1.0;
        }
    }
    fallbacks
}

/// Clamp a source coordinate into `[0, len)`.
#[inline]
pub(crate) fn nearest(c: i64, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(c.clamp(0, len as i64 - 1) as usize)
    }
}

// SPDX-License-Identifier: MIT
// Streaming separable resampler: horizontal pass into the row window, vertical
// pass out of it, one finished scanline at a time.

use log::{debug, warn};
use smallvec::smallvec;

use crate::error::ResampleError;
use crate::filter::FilterSpec;
use crate::plan::{ResizePlan, Size, TargetDirective, build_plan};
use crate::scanline::{ScanlineSink, ScanlineSource};
use crate::weights::WeightTable;
use crate::window::{Accum, DEGENERATE_SUM, NEGLIGIBLE_WEIGHT, RowWindow, ScanlineCursor};

/// Counters gathered over one resize.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResampleStats {
    /// Source rows pulled from the source, convolved or not.
    pub rows_read: usize,
    /// Source rows read and discarded without contributing.
    pub rows_skipped: usize,
    pub rows_written: usize,
    /// Output columns whose horizontal weight sum was degenerate.
    pub horizontal_fallbacks: usize,
    /// Output samples whose vertical weight sum was degenerate.
    pub vertical_fallbacks: usize,
}

/// Planned resize with its weight tables built.
///
/// The filter, plan and tables are read-only once constructed; a single
/// `Resampler` can drive any number of sources of the planned size.
#[derive(Clone, Debug)]
pub struct Resampler {
    filter: FilterSpec,
    plan: ResizePlan,
    xw: WeightTable,
    yw: WeightTable,
}

impl Resampler {
    pub fn new(filter: FilterSpec, plan: ResizePlan) -> Self {
        let xw = WeightTable::build(&plan.x, &filter);
        let yw = WeightTable::build(&plan.y, &filter);
        if let Some(c) = filter.coefficients() {
            debug!("cubic coefficients: {:?}", c.0);
        }
        Self { filter, plan, xw, yw }
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn plan(&self) -> &ResizePlan {
        &self.plan
    }

    /// Stream `source` through the resize into `sink`.
    ///
    /// Source rows are requested strictly in increasing order and each output
    /// row is handed to the sink as soon as it is finished.
    pub fn run<S, K>(&self, source: S, sink: &mut K) -> Result<ResampleStats, ResampleError>
    where
        S: ScanlineSource,
        K: ScanlineSink + ?Sized,
    {
        let channels = source.channels();
        if channels == 0 {
            return Err(ResampleError::UnsupportedChannels(channels));
        }

        let out = self.plan.out;
        let out_w = out.w as usize;
        let mut cursor = ScanlineCursor::new(source);
        let mut window = RowWindow::new(
            self.plan.y.window,
            self.plan.input.w,
            self.plan.input.h,
            out.w,
            channels,
        );
        let mut line = vec![0u8; out_w * channels];
        let mut acc: Accum = smallvec![0.0; channels];
        let mut stats = ResampleStats::default();

        for y2 in 0..out.h as usize {
            let base = self.yw.base(y2);
            stats.horizontal_fallbacks += window.fill(base, &mut cursor, &self.xw)?;

            let weights = self.yw.weights(y2);
            let center = window.slot(self.yw.center(y2));
            let mut row_fallbacks = 0;

            for (x2, px) in line.chunks_exact_mut(channels).enumerate() {
                acc.iter_mut().for_each(|a| *a = 0.0);
                let mut s = 0.0f32;
                for (i, &f) in weights.iter().enumerate() {
                    if f.abs() <= NEGLIGIBLE_WEIGHT {
                        continue;
                    }
                    let Some(slot) = window.slot(base + i as i64) else {
                        continue;
                    };
                    let col = window.column(slot, x2);
                    for (a, &v) in acc.iter_mut().zip(&col[..channels]) {
                        *a += f * v;
                    }
                    s += f * col[channels];
                }

                if s.abs() > DEGENERATE_SUM {
                    for (p, &a) in px.iter_mut().zip(acc.iter()) {
                        *p = to_sample(a / s);
                    }
                } else {
                    row_fallbacks += 1;
                    match center {
                        Some(slot) => {
                            let col = window.column(slot, x2);
                            let ws = col[channels];
                            for (p, &v) in px.iter_mut().zip(&col[..channels]) {
                                *p = to_sample(v / ws);
                            }
                        }
                        None => px.iter_mut().for_each(|p| *p = 0),
                    }
                }
            }

            if row_fallbacks > 0 {
                warn!(
                    "y factor near zero in {} column(s) of output row {}; used nearest row",
                    row_fallbacks, y2
                );
                stats.vertical_fallbacks += row_fallbacks;
            }

            sink.write_scanline(&line)
                .map_err(|source| ResampleError::Sink { row: y2, source })?;
            stats.rows_written += 1;
        }

        stats.rows_read = cursor.next_row();
        stats.rows_skipped = cursor.rows_skipped();
        debug!("resample finished: {:?}", stats);
        Ok(stats)
    }
}

/// Plan, build tables and stream in one call.
pub fn resize<S, K>(
    source: S,
    sink: &mut K,
    target_box: Size,
    directive: TargetDirective,
    radius: f32,
    filter: FilterSpec,
) -> Result<(ResizePlan, ResampleStats), ResampleError>
where
    S: ScanlineSource,
    K: ScanlineSink + ?Sized,
{
    let input = Size::new(source.width(), source.height());
    let plan = build_plan(input, target_box, directive, radius, &filter);
    let stats = Resampler::new(filter, plan).run(source, sink)?;
    Ok((plan, stats))
}

/// Round to nearest and clamp into `[0, 255]`.
#[inline]
fn to_sample(v: f32) -> u8 {
    (v + 0.5).floor().clamp(0.0, 255.0) as u8
}

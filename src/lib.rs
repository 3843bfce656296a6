//! # jpegresize
//!
//! High-quality JPEG resizing built on a streaming resampler.
//!
//! The convolution in `jpegresize-core` holds only a bounded window of source
//! rows. The JPEG adapters in [`codec`] sit on the `image` crate, which decodes
//! and encodes whole rasters, so a file-to-file resize still keeps one input
//! and one output image in memory.
//!
//! ## Architecture
//!
//! The library is organized into a few small modules around the streaming
//! core in `jpegresize-core`:
//! - `config`: resize configuration and validation
//! - `codec`: JPEG scanline source and sink built on the `image` crate
//! - `error`: error type for the file-level workflow
//!
//! The core never sees files. [`resize_jpeg`] opens the input, resolves the
//! filter and plan, and streams rows from a [`codec::JpegSource`] through a
//! [`jpegresize_core::Resampler`] into a [`codec::JpegSink`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use jpegresize::{config::ResizeConfig, resize_jpeg};
//! use jpegresize_core::{Size, TargetDirective};
//!
//! let mut config = ResizeConfig::new("photo.jpg", "thumb.jpg", Size::new(320, 320));
//! config.directive = TargetDirective::BoundedShrink;
//! let summary = resize_jpeg(&config)?;
//! println!("wrote {}x{}", summary.plan.out.w, summary.plan.out.h);
//! # Ok::<(), jpegresize::error::JpegResizeError>(())
//! ```

use jpegresize_core::{
    FilterSpec, ResampleStats, Resampler, ResizePlan, ScanlineSource, build_plan, kernel_samples,
};
use log::{debug, info};

pub mod codec;
pub mod config;
pub mod error;

use codec::{JpegSink, JpegSource};
use config::ResizeConfig;
pub use error::{JpegResizeError, ResizeResult};

/// Outcome of a completed resize.
#[derive(Clone, Copy, Debug)]
pub struct ResizeSummary {
    pub plan: ResizePlan,
    pub channels: usize,
    pub quality: u8,
    pub stats: ResampleStats,
}

/// Resize the JPEG at `config.input` into `config.output`.
///
/// # Errors
///
/// Returns an error if:
/// - the configuration fails validation
/// - the input cannot be opened or decoded
/// - the output cannot be created or encoded
/// - the source ends or is corrupted before a needed row
pub fn resize_jpeg(config: &ResizeConfig) -> ResizeResult<ResizeSummary> {
    config.validate()?;

    let source = JpegSource::open(&config.input)?;
    let spec = config.filter_spec();
    let quality = config.effective_quality();
    let plan = build_plan(
        source.size(),
        config.target_box,
        config.directive(),
        config.radius,
        &spec,
    );
    log_settings(config, quality);

    let channels = source.channels();
    let mut sink = JpegSink::create(&config.output, plan.out, channels, quality)?;
    let stats = Resampler::new(spec, plan).run(source, &mut sink)?;
    sink.finish()?;

    info!(
        "resized {} -> {} ({}x{} -> {}x{})",
        config.input.display(),
        config.output.display(),
        plan.input.w,
        plan.input.h,
        plan.out.w,
        plan.out.h
    );
    Ok(ResizeSummary {
        plan,
        channels,
        quality,
        stats,
    })
}

/// Kernel dump: one `distance weight` line per sample, no image involved.
pub fn kernel_dump(spec: &FilterSpec) -> Vec<String> {
    kernel_samples(spec)
        .into_iter()
        .map(|(d, w)| format!("{:5.2} {:7.4}", d, w))
        .collect()
}

fn log_settings(config: &ResizeConfig, quality: u8) {
    debug!("quality: {}", quality);
    debug!("radius:  {:.6}", config.radius);
    debug!("sharp:   {:.6}", config.sharpen);
    debug!("filter:  {}", config.filter);
}

// SPDX-License-Identifier: MIT
//! # jpegresize-core: Streaming Separable Resampling
//!
//! Rescales 8-bit interleaved rasters with a separable 2-D convolution while
//! holding only a bounded window of source rows in memory.
//!
//! ## Pipeline
//!
//! ```text
//! FilterSpec ─▶ ResizePlan ─▶ WeightTable (x, y) ─▶ RowWindow ─▶ Resampler
//!                                                       ▲            │
//!                                  ScanlineSource ──────┘            ▼
//!                                                              ScanlineSink
//! ```
//!
//! 1. [`filter`]: kernel families (box, linear, hermite, Keys cubic,
//!    windowed sinc) plus additive Catmull-Rom sharpening.
//! 2. [`plan`]: output size from a target box and directive, per-axis
//!    support radius and window size.
//! 3. [`weights`]: per-axis weight tables, built once per resize.
//! 4. [`window`]: ring of horizontally convolved rows and the forward-only
//!    source cursor.
//! 5. [`resample`]: the vertical pass and the row loop.
//!
//! Everything runs on the caller's thread. The filter, plan and tables are
//! immutable after construction; the row window is owned by a single run.
//!
//! ## Usage Example
//!
//! ```rust
//! use jpegresize_core::{
//!     filter::FilterSpec,
//!     plan::{Size, TargetDirective},
//!     resample::resize,
//!     scanline::{MemorySink, MemorySource},
//! };
//!
//! let src = MemorySource::new(8, 8, 3, vec![128; 8 * 8 * 3]).unwrap();
//! let mut sink = MemorySink::new();
//! let (plan, _stats) = resize(
//!     src,
//!     &mut sink,
//!     Size::new(4, 4),
//!     TargetDirective::BoundedShrink,
//!     1.0,
//!     FilterSpec::mitchell(),
//! )
//! .unwrap();
//! assert_eq!(plan.out, Size::new(4, 4));
//! assert!(sink.as_slice().iter().all(|&v| v == 128));
//! ```

pub mod error;
pub mod filter;
pub mod plan;
pub mod resample;
pub mod scanline;
pub mod weights;
pub mod window;

pub use error::ResampleError;
pub use filter::{FilterFamily, FilterSpec, kernel_samples};
pub use plan::{AxisGeometry, ResizePlan, Size, TargetDirective, build_plan, resolve_target};
pub use resample::{ResampleStats, Resampler, resize};
pub use scanline::{CodecError, MemorySink, MemorySource, ScanlineSink, ScanlineSource};

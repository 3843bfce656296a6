//! # Codec Adapters
//!
//! File-backed implementations of the scanline interface the resampler
//! consumes. JPEG bit-stream work is delegated to the `image` crate; these
//! adapters only translate between whole-file codecs and one-row-at-a-time
//! delivery.

pub mod jpeg;

pub use jpeg::{JpegSink, JpegSource};

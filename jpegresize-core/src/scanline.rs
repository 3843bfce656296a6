// SPDX-License-Identifier: MIT
//! # Scanline Codec Interface
//!
//! The resampler never sees files or bit-streams. It pulls rows from a
//! [`ScanlineSource`] and pushes rows to a [`ScanlineSink`], one scanline of
//! `width × channels` 8-bit samples at a time.
//!
//! Sources are forward-only: there is no seek, and a row once read is gone.
//! Dimensions and channel count must be known before the first read.
//!
//! [`MemorySource`] and [`MemorySink`] adapt in-memory rasters to the same
//! interface for callers that already hold pixels.

use std::error::Error;

/// Boxed error produced by codec adapters.
pub type CodecError = Box<dyn Error + Send + Sync>;

/// Forward-only producer of source scanlines.
pub trait ScanlineSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn channels(&self) -> usize;

    /// Decode the next scanline into `line` (`width × channels` bytes).
    ///
    /// Returns `Ok(false)` at end-of-stream, `Err` on corruption.
    fn read_scanline(&mut self, line: &mut [u8]) -> Result<bool, CodecError>;
}

/// Sequential consumer of output scanlines, one call per output row in order.
pub trait ScanlineSink {
    fn write_scanline(&mut self, line: &[u8]) -> Result<(), CodecError>;
}

impl<S: ScanlineSource + ?Sized> ScanlineSource for &mut S {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn channels(&self) -> usize {
        (**self).channels()
    }

    fn read_scanline(&mut self, line: &mut [u8]) -> Result<bool, CodecError> {
        (**self).read_scanline(line)
    }
}

/// Interleaved 8-bit raster served row by row.
#[derive(Clone, Debug)]
pub struct MemorySource {
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<u8>,
    next_row: usize,
}

impl MemorySource {
    /// `data` must hold `width × height × channels` samples.
    pub fn new(width: u32, height: u32, channels: usize, data: Vec<u8>) -> Result<Self, CodecError> {
        let expected = width as usize * height as usize * channels;
        if data.len() != expected {
            return Err(format!(
                "raster holds {} samples, expected {} for {}x{}x{}",
                data.len(),
                expected,
                width,
                height,
                channels
            )
            .into());
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
            next_row: 0,
        })
    }

    fn row_len(&self) -> usize {
        self.width as usize * self.channels
    }
}

impl ScanlineSource for MemorySource {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn read_scanline(&mut self, line: &mut [u8]) -> Result<bool, CodecError> {
        if self.next_row >= self.height as usize {
            return Ok(false);
        }
        let len = self.row_len();
        let start = self.next_row * len;
        line[..len].copy_from_slice(&self.data[start..start + len]);
        self.next_row += 1;
        Ok(true)
    }
}

/// Collects output rows into one interleaved buffer.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    data: Vec<u8>,
    rows: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl ScanlineSink for MemorySink {
    fn write_scanline(&mut self, line: &[u8]) -> Result<(), CodecError> {
        self.data.extend_from_slice(line);
        self.rows += 1;
        Ok(())
    }
}

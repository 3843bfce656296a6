// JPEG source and sink built on the `image` crate.
//
// The decoder hands back a whole raster, so the source buffers it and serves
// rows strictly forward; the sink collects rows and only creates the output
// file once all of them have arrived, so a failed resize leaves any existing
// file untouched. Only 8-bit grayscale and RGB layouts are carried.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageReader};
use jpegresize_core::{CodecError, ScanlineSink, ScanlineSource, Size};
use log::debug;

use crate::error::{JpegResizeError, ResizeResult};

/// Forward-only scanline view of a decoded JPEG.
#[derive(Debug)]
pub struct JpegSource {
    path: PathBuf,
    size: Size,
    channels: usize,
    pixels: Vec<u8>,
    next_row: usize,
}

impl JpegSource {
    pub fn open(path: impl AsRef<Path>) -> ResizeResult<Self> {
        let path = path.as_ref();
        let reader = ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|e| JpegResizeError::io("open input", Some(path.to_path_buf()), e))?;
        let image = reader.decode().map_err(|source| JpegResizeError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_image(path, image))
    }

    /// Wrap an already decoded image. Anything other than 8-bit gray or RGB
    /// is converted to whichever of the two keeps its colour.
    pub fn from_image(path: impl Into<PathBuf>, image: DynamicImage) -> Self {
        let size = Size::new(image.width(), image.height());
        let (channels, pixels) = match image {
            DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
            other if other.color().has_color() => (3, other.to_rgb8().into_raw()),
            other => (1, other.to_luma8().into_raw()),
        };
        let path = path.into();
        debug!(
            "input:   {}x{} ({}) {}",
            size.w,
            size.h,
            channels,
            path.display()
        );
        Self {
            path,
            size,
            channels,
            pixels,
            next_row: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> Size {
        self.size
    }
}

impl ScanlineSource for JpegSource {
    fn width(&self) -> u32 {
        self.size.w
    }

    fn height(&self) -> u32 {
        self.size.h
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn read_scanline(&mut self, line: &mut [u8]) -> Result<bool, CodecError> {
        if self.next_row >= self.size.h as usize {
            return Ok(false);
        }
        let len = self.size.w as usize * self.channels;
        let start = self.next_row * len;
        let row = self
            .pixels
            .get(start..start + len)
            .ok_or_else(|| format!("JPEG image corrupted at line {}", self.next_row))?;
        line[..len].copy_from_slice(row);
        self.next_row += 1;
        Ok(true)
    }
}

/// Collects output rows and writes them as a JPEG on [`JpegSink::finish`].
pub struct JpegSink {
    path: PathBuf,
    size: Size,
    color: ExtendedColorType,
    channels: usize,
    quality: u8,
    pixels: Vec<u8>,
    rows: usize,
}

impl JpegSink {
    /// Prepare an image of `size` with `channels` components for `path`.
    /// Nothing is written until [`JpegSink::finish`].
    pub fn create(
        path: impl AsRef<Path>,
        size: Size,
        channels: usize,
        quality: u8,
    ) -> ResizeResult<Self> {
        let path = path.as_ref();
        let color = match channels {
            1 => ExtendedColorType::L8,
            3 => ExtendedColorType::Rgb8,
            n => {
                return Err(JpegResizeError::UnsupportedLayout {
                    channels: n,
                    reason: "not sure what colorspace to make output for".to_string(),
                });
            }
        };
        debug!(
            "output:  {}x{} ({}) {}",
            size.w,
            size.h,
            channels,
            path.display()
        );
        Ok(Self {
            path: path.to_path_buf(),
            size,
            color,
            channels,
            quality,
            pixels: Vec::with_capacity(size.w as usize * size.h as usize * channels),
            rows: 0,
        })
    }

    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Create the output file and encode the collected rows. Fails without
    /// touching the file if fewer rows arrived than announced.
    pub fn finish(self) -> ResizeResult<()> {
        if self.rows != self.size.h as usize {
            return Err(JpegResizeError::io(
                "finish output",
                Some(self.path.clone()),
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("received {} of {} rows", self.rows, self.size.h),
                ),
            ));
        }
        let file = File::create(&self.path)
            .map_err(|e| JpegResizeError::io("create output", Some(self.path.clone()), e))?;
        let mut writer = BufWriter::new(file);
        JpegEncoder::new_with_quality(&mut writer, self.quality)
            .encode(&self.pixels, self.size.w, self.size.h, self.color)
            .map_err(|source| JpegResizeError::Encode {
                path: self.path.clone(),
                source,
            })?;
        writer
            .flush()
            .map_err(|e| JpegResizeError::io("flush output", Some(self.path.clone()), e))
    }
}

impl ScanlineSink for JpegSink {
    fn write_scanline(&mut self, line: &[u8]) -> Result<(), CodecError> {
        if self.rows >= self.size.h as usize {
            return Err(format!("more than {} rows written", self.size.h).into());
        }
        let len = self.size.w as usize * self.channels;
        if line.len() != len {
            return Err(format!("scanline has {} samples, expected {}", line.len(), len).into());
        }
        self.pixels.extend_from_slice(line);
        self.rows += 1;
        Ok(())
    }
}

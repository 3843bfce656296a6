//! # Configuration Module
//!
//! This module provides the configuration structure and validation for resize
//! operations. It is the common interface between the CLI and the library
//! entry point [`crate::resize_jpeg`].
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Range | Description |
//! |-----------|------|-------|-------------|
//! | `input` | `PathBuf` | Any readable JPEG | Source image |
//! | `output` | `PathBuf` | Any writable path | Destination image (clobbered) |
//! | `target_box` | `Size` | both sides > 0 | Box interpreted by `directive` |
//! | `directive` | `TargetDirective` | 6 modes | How the box maps to the output size |
//! | `filter` | `FilterChoice` | 7 filters | Reconstruction kernel |
//! | `radius` | `f32` | > 0 | Kernel radius, default 1.0 |
//! | `sharpen` | `f32` | >= 0 | Added Catmull-Rom lobe, default 0.2 |
//! | `quality` | `Option<u8>` | 1-100 | JPEG quality, default depends on box |
//! | `verbose` | `bool` | - | Log settings and geometry at debug level |
//! | `kernel_dump` | `bool` | - | Print the kernel instead of resizing |
//!
//! Validation lives here and only here: the resampler accepts whatever it is
//! given.
//!
//! ## Examples
//!
//! ```rust
//! use jpegresize::config::{FilterChoice, ResizeConfig};
//! use jpegresize_core::{Size, TargetDirective};
//!
//! let mut config = ResizeConfig::new("in.jpg", "out.jpg", Size::new(200, 200));
//! config.directive = TargetDirective::BoundedShrink;
//! config.filter = FilterChoice::Mitchell;
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.effective_quality(), 95);
//! ```

use std::path::PathBuf;

use jpegresize_core::{FilterSpec, Size, TargetDirective};

use crate::error::{JpegResizeError, ResizeResult};

/// Kernel selection as exposed to users, before it is resolved into a
/// [`FilterSpec`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterChoice {
    /// Average pixels within the radius.
    Flat,
    /// Weight pixels linearly by closeness.
    Linear,
    /// Hermite cubic; similar to a Gaussian.
    Hermite,
    /// Catmull-Rom spline with tension `m`.
    CatmullRom { m: f32 },
    /// Mitchell-Netravali (Keys with B = C = 1/3).
    Mitchell,
    /// Keys family cubic.
    Keys { b: f32, c: f32 },
    /// Lanczos windowed sinc.
    Lanczos { lobes: f32 },
}

impl Default for FilterChoice {
    fn default() -> Self {
        FilterChoice::Lanczos { lobes: 3.0 }
    }
}

impl std::fmt::Display for FilterChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterChoice::Flat => write!(f, "flat"),
            FilterChoice::Linear => write!(f, "bilinear"),
            FilterChoice::Hermite => write!(f, "hermite"),
            FilterChoice::CatmullRom { m } => write!(f, "Catmull-Rom (M={:.6})", m),
            FilterChoice::Mitchell => write!(f, "Mitchell-Netravali"),
            FilterChoice::Keys { b, c } => write!(f, "Keys-family (B={:.6}, C={:.6})", b, c),
            FilterChoice::Lanczos { lobes } => write!(f, "Lanczos (N={:.6})", lobes),
        }
    }
}

impl FilterChoice {
    /// Resolve into an immutable spec carrying `sharpen`.
    pub fn to_spec(self, sharpen: f32) -> FilterSpec {
        let spec = match self {
            FilterChoice::Flat => FilterSpec::box_filter(),
            FilterChoice::Linear => FilterSpec::linear(),
            FilterChoice::Hermite => FilterSpec::hermite(),
            FilterChoice::CatmullRom { m } => FilterSpec::catmull_rom(m),
            FilterChoice::Mitchell => FilterSpec::mitchell(),
            FilterChoice::Keys { b, c } => FilterSpec::keys(b, c),
            FilterChoice::Lanczos { lobes } => FilterSpec::lanczos(lobes),
        };
        spec.with_sharpen(sharpen)
    }

    fn params(&self) -> Vec<f32> {
        match *self {
            FilterChoice::CatmullRom { m } => vec![m],
            FilterChoice::Keys { b, c } => vec![b, c],
            FilterChoice::Lanczos { lobes } => vec![lobes],
            _ => Vec::new(),
        }
    }
}

/// Configuration for a single resize.
///
/// # Examples
///
/// ```rust
/// use jpegresize::config::{FilterChoice, ResizeConfig};
/// use jpegresize_core::{Size, TargetDirective};
///
/// let config = ResizeConfig {
///     filter: FilterChoice::Keys { b: 0.0, c: 0.75 },
///     sharpen: 0.0,
///     directive: TargetDirective::AreaShrink,
///     ..ResizeConfig::new("photo.jpg", "thumb.jpg", Size::new(160, 160))
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ResizeConfig {
    /// Source JPEG path.
    pub input: PathBuf,

    /// Destination JPEG path. Any existing file is overwritten.
    pub output: PathBuf,

    /// Box the directive is applied against.
    pub target_box: Size,

    /// How `target_box` is turned into the output size.
    pub directive: TargetDirective,

    /// Reconstruction kernel.
    pub filter: FilterChoice,

    /// Half-width of the kernel in output pixels. Must be greater than 0.
    pub radius: f32,

    /// Amount of Catmull-Rom sharpening added to the kernel. Must be >= 0.
    pub sharpen: f32,

    /// JPEG quality 1-100. `None` picks a default from the box size.
    pub quality: Option<u8>,

    /// Log settings and plan geometry at debug level.
    pub verbose: bool,

    /// Print the sampled kernel and stop; no image is read or written.
    pub kernel_dump: bool,
}

impl Default for ResizeConfig {
    /// Lanczos-3, radius 1.0, sharpen 0.2, exact size, 200x200 box.
    fn default() -> Self {
        Self {
            input: PathBuf::from("input.jpg"),
            output: PathBuf::from("output.jpg"),
            target_box: Size::new(200, 200),
            directive: TargetDirective::Exact,
            filter: FilterChoice::default(),
            radius: 1.0,
            sharpen: 0.2,
            quality: None,
            verbose: false,
            kernel_dump: false,
        }
    }
}

impl ResizeConfig {
    /// Creates a configuration with default filter settings.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, target_box: Size) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            target_box,
            ..Self::default()
        }
    }

    /// Validates the configuration parameters.
    ///
    /// The error names the offending field and value, matching what the CLI
    /// prints before exiting.
    pub fn validate(&self) -> ResizeResult<()> {
        if self.target_box.w == 0 || self.target_box.h == 0 {
            return Err(JpegResizeError::config(
                "size",
                format!("{}x{}", self.target_box.w, self.target_box.h),
                "both sides must be positive",
            ));
        }
        self.validate_filter()?;
        if let Some(q) = self.quality {
            if !(1..=100).contains(&q) {
                return Err(JpegResizeError::config(
                    "quality",
                    q.to_string(),
                    "must be between 1 and 100",
                ));
            }
        }
        Ok(())
    }

    /// Checks only the kernel parameters; enough for the kernel dump.
    pub fn validate_filter(&self) -> ResizeResult<()> {
        if !(self.radius > 0.0) || !self.radius.is_finite() {
            return Err(JpegResizeError::config(
                "radius",
                self.radius.to_string(),
                "must be greater than 0",
            ));
        }
        if !(self.sharpen >= 0.0) || !self.sharpen.is_finite() {
            return Err(JpegResizeError::config(
                "sharpen",
                self.sharpen.to_string(),
                "must be >= 0",
            ));
        }
        if self.filter.params().iter().any(|p| !p.is_finite()) {
            return Err(JpegResizeError::config(
                "filter",
                self.filter.to_string(),
                "parameters must be finite",
            ));
        }
        if let FilterChoice::Lanczos { lobes } = self.filter {
            if lobes < 1.0 {
                return Err(JpegResizeError::config(
                    "lanczos",
                    lobes.to_string(),
                    "needs at least one lobe",
                ));
            }
        }
        Ok(())
    }

    pub fn filter_spec(&self) -> FilterSpec {
        self.filter.to_spec(self.sharpen)
    }

    /// Sizing mode applied to `target_box`.
    pub fn directive(&self) -> TargetDirective {
        self.directive
    }

    /// Default `env_logger` filter for this run.
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "warn" }
    }

    /// Explicit quality, or the size-based default.
    pub fn effective_quality(&self) -> u8 {
        self.quality
            .unwrap_or_else(|| default_quality(self.target_box.w, self.target_box.h))
    }
}

/// Reasonable JPEG quality for a given output box: small images get more.
pub fn default_quality(w: u32, h: u32) -> u8 {
    let short = w.min(h);
    match short {
        0..300 => 95,
        300..600 => 90,
        600..1000 => 85,
        1000..2000 => 80,
        2000..3000 => 75,
        _ => 70,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jpegresize_core::FilterFamily;

    #[test]
    fn test_default_config() {
        let config = ResizeConfig::default();
        assert_eq!(config.filter, FilterChoice::Lanczos { lobes: 3.0 });
        assert_eq!(config.radius, 1.0);
        assert!((config.sharpen - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.directive, TargetDirective::Exact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ResizeConfig::default();

        config.radius = 0.0;
        assert!(config.validate().is_err());
        config.radius = f32::NAN;
        assert!(config.validate().is_err());
        config.radius = 1.5;

        config.sharpen = -0.1;
        assert!(config.validate().is_err());
        config.sharpen = 0.0;

        config.target_box = Size::new(0, 10);
        assert!(config.validate().is_err());
        config.target_box = Size::new(10, 10);

        config.quality = Some(0);
        assert!(config.validate().is_err());
        config.quality = Some(101);
        assert!(config.validate().is_err());
        config.quality = Some(75);

        config.filter = FilterChoice::Lanczos { lobes: 0.5 };
        assert!(config.validate().is_err());
        config.filter = FilterChoice::Keys { b: f32::INFINITY, c: 0.0 };
        assert!(config.validate().is_err());
        config.filter = FilterChoice::Hermite;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_names_field_and_value() {
        let config = ResizeConfig {
            radius: -1.0,
            ..ResizeConfig::default()
        };
        match config.validate() {
            Err(JpegResizeError::Config { field, value, .. }) => {
                assert_eq!(field, "radius");
                assert_eq!(value, "-1");
            }
            other => panic!("expected config error, got {:?}", other),
        }
        let message = config.validate().unwrap_err().to_string();
        assert_eq!(message, "Invalid radius '-1': must be greater than 0");

        let config = ResizeConfig {
            target_box: Size::new(0, 10),
            ..ResizeConfig::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("'0x10'"));
    }

    #[test]
    fn test_run_flags() {
        let mut config = ResizeConfig::default();
        assert!(!config.kernel_dump);
        assert_eq!(config.log_level(), "warn");
        config.verbose = true;
        assert_eq!(config.log_level(), "debug");
        config.directive = TargetDirective::AreaGrow;
        assert_eq!(config.directive(), TargetDirective::AreaGrow);
    }

    #[test]
    fn test_default_quality_steps() {
        assert_eq!(default_quality(200, 2000), 95);
        assert_eq!(default_quality(300, 300), 90);
        assert_eq!(default_quality(800, 1200), 85);
        assert_eq!(default_quality(1024, 1024), 80);
        assert_eq!(default_quality(2500, 4000), 75);
        assert_eq!(default_quality(3000, 3000), 70);
    }

    #[test]
    fn test_filter_spec_resolution() {
        let mut config = ResizeConfig::default();
        config.filter = FilterChoice::CatmullRom { m: 0.5 };
        config.sharpen = 0.3;
        let spec = config.filter_spec();
        assert_eq!(spec.family(), FilterFamily::CubicSpline { b: 0.0, c: 0.5 });
        assert!((spec.sharpen() - 0.3).abs() < f32::EPSILON);

        config.filter = FilterChoice::Mitchell;
        assert_eq!(config.filter_spec().extra_lobes(), 2.0);
        config.filter = FilterChoice::Flat;
        assert_eq!(config.filter_spec().extra_lobes(), 1.0);
    }
}

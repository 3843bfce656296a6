// SPDX-License-Identifier: MIT
//! # Reconstruction Kernels
//!
//! Pure kernel evaluation for the resampler. A [`FilterSpec`] is resolved once
//! from the caller's choice of family and sharpen amount, then shared by
//! reference with every component that needs weights.
//!
//! Distances handed to [`FilterSpec::weight`] are already normalized by the
//! per-axis support radius, so every family sees its natural support:
//!
//! | Family          | Support      | Extra lobes |
//! |-----------------|--------------|-------------|
//! | box             | `[0, 1)`     | 1           |
//! | linear          | `[0, 1)`     | 1           |
//! | hermite         | `[0, 1)`     | 1           |
//! | cubic spline    | `[0, 2)`     | 2           |
//! | windowed sinc   | `[0, N)`     | N           |
//!
//! Sharpening adds a scaled Catmull-Rom lobe on top of whichever family was
//! chosen. It is the only place the sharpen amount touches the kernel.

use std::f32::consts::PI;

/// Below this distance the windowed sinc switches to its small-angle form.
const SINC_SMALL_ANGLE: f32 = 0.01;

/// Kernel family with its family-specific parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterFamily {
    /// Flat average over the unit support.
    Box,
    /// Triangle (tent) filter.
    Linear,
    /// Cubic smoothstep `2d³ - 3d² + 1`.
    Hermite,
    /// Generalized Keys two-piece cubic. `B = 0, C = 0.5` is Catmull-Rom,
    /// `B = C = 1/3` is Mitchell-Netravali.
    CubicSpline { b: f32, c: f32 },
    /// Lanczos windowed sinc truncated to `lobes` lobes.
    WindowedSinc { lobes: f32 },
}

impl FilterFamily {
    /// Multiplier applied to the support radius to size the sampling window.
    pub fn extra_lobes(&self) -> f32 {
        match *self {
            FilterFamily::Box | FilterFamily::Linear | FilterFamily::Hermite => 1.0,
            FilterFamily::CubicSpline { .. } => 2.0,
            FilterFamily::WindowedSinc { lobes } => lobes,
        }
    }

    /// Normalized distance at and beyond which the family weight is zero.
    pub fn support(&self) -> f32 {
        self.extra_lobes()
    }

    pub fn name(&self) -> &'static str {
        match self {
            FilterFamily::Box => "box",
            FilterFamily::Linear => "linear",
            FilterFamily::Hermite => "hermite",
            FilterFamily::CubicSpline { .. } => "cubic-spline",
            FilterFamily::WindowedSinc { .. } => "windowed-sinc",
        }
    }
}

/// Piecewise-cubic coefficients `c1..c8` derived from `(B, C)`.
///
/// Piece one covers `0 <= d < 1`, piece two covers `1 <= d < 2` and is
/// evaluated in `e = d - 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicCoefficients(pub [f32; 8]);

impl CubicCoefficients {
    pub fn from_bc(b: f32, c: f32) -> Self {
        Self([
            (12.0 - 9.0 * b - 6.0 * c) / 6.0,
            (-18.0 + 12.0 * b + 6.0 * c) / 6.0,
            0.0,
            (6.0 - 2.0 * b) / 6.0,
            (-b - 6.0 * c) / 6.0,
            (3.0 * b + 12.0 * c) / 6.0,
            (-3.0 * b - 6.0 * c) / 6.0,
            b / 6.0,
        ])
    }

    #[inline]
    fn eval(&self, d: f32) -> f32 {
        let [c1, c2, c3, c4, c5, c6, c7, c8] = self.0;
        if d < 1.0 {
            ((c1 * d + c2) * d + c3) * d + c4
        } else if d < 2.0 {
            let e = d - 1.0;
            ((c5 * e + c6) * e + c7) * e + c8
        } else {
            0.0
        }
    }
}

/// Immutable, fully resolved filter: family, sharpen amount and any derived
/// coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterSpec {
    family: FilterFamily,
    sharpen: f32,
    cubic: Option<CubicCoefficients>,
}

impl Default for FilterSpec {
    /// Three-lobe Lanczos with the stock sharpen amount of 0.2.
    fn default() -> Self {
        Self::lanczos(3.0).with_sharpen(0.2)
    }
}

impl FilterSpec {
    /// Resolve a family into a spec. Cubic coefficients are derived here and
    /// never recomputed.
    pub fn new(family: FilterFamily, sharpen: f32) -> Self {
        let cubic = match family {
            FilterFamily::CubicSpline { b, c } => Some(CubicCoefficients::from_bc(b, c)),
            _ => None,
        };
        Self {
            family,
            sharpen,
            cubic,
        }
    }

    pub fn box_filter() -> Self {
        Self::new(FilterFamily::Box, 0.0)
    }

    pub fn linear() -> Self {
        Self::new(FilterFamily::Linear, 0.0)
    }

    pub fn hermite() -> Self {
        Self::new(FilterFamily::Hermite, 0.0)
    }

    /// Catmull-Rom with tension `m` (0.5 is the classic kernel).
    pub fn catmull_rom(m: f32) -> Self {
        Self::keys(0.0, m)
    }

    pub fn mitchell() -> Self {
        Self::keys(1.0 / 3.0, 1.0 / 3.0)
    }

    pub fn keys(b: f32, c: f32) -> Self {
        Self::new(FilterFamily::CubicSpline { b, c }, 0.0)
    }

    pub fn lanczos(lobes: f32) -> Self {
        Self::new(FilterFamily::WindowedSinc { lobes }, 0.0)
    }

    /// Same family with a different sharpen amount.
    pub fn with_sharpen(self, sharpen: f32) -> Self {
        Self { sharpen, ..self }
    }

    pub fn family(&self) -> FilterFamily {
        self.family
    }

    pub fn sharpen(&self) -> f32 {
        self.sharpen
    }

    pub fn coefficients(&self) -> Option<&CubicCoefficients> {
        self.cubic.as_ref()
    }

    pub fn extra_lobes(&self) -> f32 {
        self.family.extra_lobes()
    }

    /// Kernel weight at normalized distance `d >= 0`.
    pub fn weight(&self, d: f32) -> f32 {
        let mut f = match self.family {
            FilterFamily::Box => {
                if d < 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
            FilterFamily::Linear => {
                if d < 1.0 {
                    1.0 - d
                } else {
                    0.0
                }
            }
            FilterFamily::Hermite => {
                if d < 1.0 {
                    (2.0 * d - 3.0) * d * d + 1.0
                } else {
                    0.0
                }
            }
            FilterFamily::CubicSpline { b, c } => match self.cubic {
                Some(coeffs) => coeffs.eval(d),
                None => CubicCoefficients::from_bc(b, c).eval(d),
            },
            FilterFamily::WindowedSinc { lobes } => {
                if d < SINC_SMALL_ANGLE {
                    sinc_small_angle(d, lobes)
                } else if d < lobes {
                    sinc_direct(d, lobes)
                } else {
                    0.0
                }
            }
        };

        if self.sharpen > 0.0 {
            f += self.sharpen * catmull_rom_lobe(d);
        }
        f
    }
}

/// `a·sin(πd)·sin(πd/a) / (π²d²)`; unstable as `d -> 0`.
#[inline]
fn sinc_direct(d: f32, lobes: f32) -> f32 {
    (PI * d).sin() * (PI * d / lobes).sin() / (d * d) * lobes / (PI * PI)
}

/// Second-order Taylor expansion of both sine factors.
#[inline]
fn sinc_small_angle(d: f32, lobes: f32) -> f32 {
    let x1 = PI * d;
    let x2 = PI * d / lobes;
    (1.0 - x1 * x1 / 6.0) * (1.0 - x2 * x2 / 6.0)
}

/// Shape added per unit of sharpen.
#[inline]
fn catmull_rom_lobe(d: f32) -> f32 {
    if d < 1.0 {
        (d - 2.0) * d * d + 1.0
    } else if d < 2.0 {
        let e = d - 1.0;
        ((2.0 - e) * e - 1.0) * e
    } else {
        0.0
    }
}

/// Sample the kernel on `0.0, 0.1, 0.2, ...` below 10, stopping after two
/// consecutive exact zeros. Used by the kernel dump diagnostic.
pub fn kernel_samples(spec: &FilterSpec) -> Vec<(f32, f32)> {
    let mut samples = Vec::new();
    let mut prev = -1.0f32;
    let mut step = 0u32;
    loop {
        let d = step as f32 * 0.1;
        if d >= 10.0 {
            break;
        }
        let w = spec.weight(d);
        samples.push((d, w));
        if w == 0.0 && prev == 0.0 {
            break;
        }
        prev = w;
        step += 1;
    }
    samples
}

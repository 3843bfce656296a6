// SPDX-License-Identifier: MIT
//! # Resize Planning
//!
//! Turns a source size, a target box and a [`TargetDirective`] into the final
//! output dimensions, then derives the per-axis kernel geometry the weight
//! tables and row window are sized from.
//!
//! ## Directives
//!
//! 1. **Exact**: the box is the output, aspect ratio is ignored.
//! 2. **Bounded**: aspect-preserving fit within (shrink) or around (grow) the
//!    box. Sources that already satisfy the bound pass through unchanged.
//! 3. **Area**: aspect-preserving match of the box's pixel count, optionally
//!    restricted to shrinking or growing.
//!
//! All rounding is `⌊x + 0.5⌋`. No range validation happens here: zero or
//! nonsensical targets are the caller's problem.

use log::debug;

use crate::filter::FilterSpec;

/// Width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
}

/// How the target box maps to the output size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TargetDirective {
    /// Output is exactly the box.
    #[default]
    Exact,
    /// Keep aspect, reduce to fit within the box.
    BoundedShrink,
    /// Keep aspect, enlarge to contain the box.
    BoundedGrow,
    /// Keep aspect, reduce to the box's area.
    AreaShrink,
    /// Keep aspect, enlarge to the box's area.
    AreaGrow,
    /// Keep aspect, reduce or enlarge to the box's area.
    AreaExact,
}

/// Kernel footprint along one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisGeometry {
    /// Source extent along this axis.
    pub source: u32,
    /// Output extent along this axis.
    pub target: u32,
    /// Support radius in source pixels; widened when downscaling.
    pub radius: f32,
    /// Source samples either side of the mapped center.
    pub offset: usize,
    /// `2 * offset + 1` contributing source samples.
    pub window: usize,
}

impl AxisGeometry {
    pub fn new(source: u32, target: u32, radius: f32, extra_lobes: f32) -> Self {
        let radius = if target > 0 && target < source {
            radius * source as f32 / target as f32
        } else {
            radius
        };
        let offset = (radius * extra_lobes + 0.5).max(0.0) as usize;
        Self {
            source,
            target,
            radius,
            offset,
            window: 2 * offset + 1,
        }
    }

    /// Real-valued source coordinate of output coordinate `o`.
    #[inline]
    pub fn map(&self, o: u32) -> f64 {
        o as f64 * self.source as f64 / self.target as f64
    }
}

/// Everything decided before streaming starts. Read-only afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizePlan {
    pub input: Size,
    pub target_box: Size,
    pub directive: TargetDirective,
    pub out: Size,
    pub x: AxisGeometry,
    pub y: AxisGeometry,
}

/// Apply `directive` to `input` against `target_box`.
pub fn resolve_target(input: Size, target_box: Size, directive: TargetDirective) -> Size {
    let (w1, h1) = (input.w as f64, input.h as f64);
    let (w2, h2) = (target_box.w as f64, target_box.h as f64);
    match directive {
        TargetDirective::Exact => target_box,
        TargetDirective::BoundedShrink => {
            if w1 > w2 && h1 * w2 / w1 < h2 {
                Size::new(target_box.w, round(h1 * w2 / w1))
            } else if h1 > h2 {
                Size::new(round(w1 * h2 / h1), target_box.h)
            } else {
                input
            }
        }
        TargetDirective::BoundedGrow => {
            if w1 < w2 && h1 * w2 / w1 > h2 {
                Size::new(target_box.w, round(h1 * w2 / w1))
            } else if h1 < h2 {
                Size::new(round(w1 * h2 / h1), target_box.h)
            } else {
                input
            }
        }
        TargetDirective::AreaExact => scale_area(input, target_box),
        TargetDirective::AreaShrink => {
            if input.area() > target_box.area() {
                scale_area(input, target_box)
            } else {
                input
            }
        }
        TargetDirective::AreaGrow => {
            if input.area() < target_box.area() {
                scale_area(input, target_box)
            } else {
                input
            }
        }
    }
}

/// Resolve the output size and per-axis geometry for `filter` at `radius`.
pub fn build_plan(
    input: Size,
    target_box: Size,
    directive: TargetDirective,
    radius: f32,
    filter: &FilterSpec,
) -> ResizePlan {
    let out = resolve_target(input, target_box, directive);
    let extra = filter.extra_lobes();
    let plan = ResizePlan {
        input,
        target_box,
        directive,
        out,
        x: AxisGeometry::new(input.w, out.w, radius, extra),
        y: AxisGeometry::new(input.h, out.h, radius, extra),
    };
    debug!(
        "plan: {}x{} -> {}x{} ({:?}), radius {:.5}/{:.5}, offset {}/{}, window {}x{}",
        input.w,
        input.h,
        out.w,
        out.h,
        directive,
        plan.x.radius,
        plan.y.radius,
        plan.x.offset,
        plan.y.offset,
        plan.x.window,
        plan.y.window
    );
    plan
}

fn scale_area(input: Size, target_box: Size) -> Size {
    let f = (target_box.area() as f64 / input.area() as f64).sqrt();
    Size::new(round(input.w as f64 * f), round(input.h as f64 * f))
}

#[inline]
fn round(x: f64) -> u32 {
    (x + 0.5).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    #[test]
    fn area_exact_matches_box_area() {
        let out = resolve_target(
            Size::new(100, 50),
            Size::new(80, 80),
            TargetDirective::AreaExact,
        );
        assert_eq!(out, Size::new(113, 57));
    }

    #[test]
    fn bounded_shrink_width_binds() {
        let out = resolve_target(
            Size::new(200, 100),
            Size::new(50, 50),
            TargetDirective::BoundedShrink,
        );
        assert_eq!(out, Size::new(50, 25));
    }

    #[test]
    fn bounded_shrink_height_binds() {
        let out = resolve_target(
            Size::new(100, 400),
            Size::new(50, 50),
            TargetDirective::BoundedShrink,
        );
        assert_eq!(out, Size::new(13, 50));
    }

    #[test]
    fn bounded_shrink_passes_small_sources_through() {
        let input = Size::new(40, 30);
        let out = resolve_target(input, Size::new(50, 50), TargetDirective::BoundedShrink);
        assert_eq!(out, input);
    }

    #[test]
    fn bounded_grow_contains_box() {
        let out = resolve_target(
            Size::new(20, 10),
            Size::new(50, 50),
            TargetDirective::BoundedGrow,
        );
        assert_eq!(out, Size::new(100, 50));

        let big = Size::new(300, 200);
        assert_eq!(
            resolve_target(big, Size::new(50, 50), TargetDirective::BoundedGrow),
            big
        );
    }

    #[test]
    fn area_variants_respect_direction() {
        let input = Size::new(100, 50);
        let small = Size::new(10, 10);
        let large = Size::new(200, 200);
        assert_eq!(resolve_target(input, large, TargetDirective::AreaShrink), input);
        assert_eq!(resolve_target(input, small, TargetDirective::AreaGrow), input);
        assert_eq!(
            resolve_target(input, small, TargetDirective::AreaShrink),
            Size::new(14, 7)
        );
        assert_eq!(
            resolve_target(input, large, TargetDirective::AreaGrow),
            Size::new(283, 141)
        );
    }

    #[test]
    fn exact_ignores_aspect() {
        let out = resolve_target(Size::new(640, 480), Size::new(10, 300), TargetDirective::Exact);
        assert_eq!(out, Size::new(10, 300));
    }

    #[test]
    fn radius_widens_only_when_downscaling() {
        let spec = FilterSpec::lanczos(3.0);
        let plan = build_plan(
            Size::new(400, 100),
            Size::new(100, 200),
            TargetDirective::Exact,
            1.0,
            &spec,
        );
        assert!((plan.x.radius - 4.0).abs() < 1e-6);
        assert_eq!(plan.x.offset, 12);
        assert_eq!(plan.x.window, 25);
        assert!((plan.y.radius - 1.0).abs() < 1e-6);
        assert_eq!(plan.y.offset, 3);
        assert_eq!(plan.y.window, 7);
    }

    #[test]
    fn box_filter_window_geometry() {
        let plan = build_plan(
            Size::new(4, 4),
            Size::new(2, 2),
            TargetDirective::Exact,
            1.0,
            &FilterSpec::box_filter(),
        );
        assert_eq!(plan.out, Size::new(2, 2));
        assert_eq!(plan.x.offset, 2);
        assert_eq!(plan.x.window, 5);
        assert_eq!(plan.x.map(1), 2.0);
    }

    #[quickcheck]
    fn window_is_odd_and_positive(w1: u16, w2: u16, r: u8) -> TestResult {
        if w1 == 0 || w2 == 0 || r == 0 {
            return TestResult::discard();
        }
        let axis = AxisGeometry::new(w1 as u32, w2 as u32, r as f32 / 16.0, 2.0);
        TestResult::from_bool(axis.window % 2 == 1 && axis.window >= 1)
    }
}

//! End-to-end tests for the streaming resampler through in-memory adapters.

use jpegresize_core::{
    CodecError, FilterSpec, MemorySink, MemorySource, ResampleError, ScanlineSink,
    ScanlineSource, Size, TargetDirective, resize,
};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

/// Source that records how many rows were pulled and can stop early.
struct RecordingSource {
    inner: MemorySource,
    reads: usize,
    deliver: usize,
}

impl RecordingSource {
    fn new(inner: MemorySource) -> Self {
        let deliver = inner.height() as usize;
        Self {
            inner,
            reads: 0,
            deliver,
        }
    }

    fn truncated(inner: MemorySource, deliver: usize) -> Self {
        Self {
            inner,
            reads: 0,
            deliver,
        }
    }
}

impl ScanlineSource for RecordingSource {
    fn width(&self) -> u32 {
        self.inner.width()
    }

    fn height(&self) -> u32 {
        self.inner.height()
    }

    fn channels(&self) -> usize {
        self.inner.channels()
    }

    fn read_scanline(&mut self, line: &mut [u8]) -> Result<bool, CodecError> {
        if self.reads >= self.deliver {
            return Err(format!("corrupt data at row {}", self.reads).into());
        }
        self.reads += 1;
        self.inner.read_scanline(line)
    }
}

struct FailingSink;

impl ScanlineSink for FailingSink {
    fn write_scanline(&mut self, _line: &[u8]) -> Result<(), CodecError> {
        Err("disk full".into())
    }
}

fn all_filters() -> Vec<FilterSpec> {
    vec![
        FilterSpec::box_filter(),
        FilterSpec::linear(),
        FilterSpec::hermite(),
        FilterSpec::catmull_rom(0.5),
        FilterSpec::mitchell(),
        FilterSpec::keys(0.0, 1.0),
        FilterSpec::lanczos(2.0),
        FilterSpec::lanczos(3.0),
    ]
}

#[test]
fn uniform_image_stays_uniform_when_shrinking() {
    for filter in all_filters() {
        for (w2, h2) in [(20, 15), (7, 3), (1, 1), (33, 29)] {
            let src = MemorySource::new(37, 31, 3, vec![128; 37 * 31 * 3]).unwrap();
            let mut sink = MemorySink::new();
            let (plan, stats) = resize(
                src,
                &mut sink,
                Size::new(w2, h2),
                TargetDirective::Exact,
                1.0,
                filter,
            )
            .unwrap();
            assert_eq!(plan.out, Size::new(w2, h2));
            assert_eq!(stats.horizontal_fallbacks + stats.vertical_fallbacks, 0);
            assert_eq!(sink.rows(), h2 as usize);
            assert!(
                sink.as_slice().iter().all(|&v| v == 128),
                "{:?} to {}x{}",
                filter.family(),
                w2,
                h2
            );
        }
    }
}

#[test]
fn box_filter_four_by_four_to_two_by_two() {
    #[rustfmt::skip]
    let data = vec![
        0,   0,   0, 0,
        0, 255, 255, 0,
        0, 255, 255, 0,
        0,   0,   0, 0,
    ];
    let src = MemorySource::new(4, 4, 1, data).unwrap();
    let mut sink = MemorySink::new();
    let (plan, stats) = resize(
        src,
        &mut sink,
        Size::new(2, 2),
        TargetDirective::Exact,
        1.0,
        FilterSpec::box_filter(),
    )
    .unwrap();

    // The downscale widens the box to two source pixels either side of the
    // mapped coordinate, so the top-left output averages the 2x2 corner block
    // and later outputs (mapped to source 2) pick up three rows/columns.
    assert_eq!(plan.x.window, 5);
    assert_eq!(stats.rows_written, 2);
    assert_eq!(sink.into_inner(), vec![64, 85, 85, 113]);
}

#[test]
fn sharpened_box_overshoots_and_clamps() {
    let data = vec![0, 0, 255, 255];
    let src = MemorySource::new(4, 1, 1, data).unwrap();
    let mut sink = MemorySink::new();
    resize(
        src,
        &mut sink,
        Size::new(8, 1),
        TargetDirective::Exact,
        1.0,
        FilterSpec::box_filter().with_sharpen(2.0),
    )
    .unwrap();
    let out = sink.into_inner();
    assert_eq!(out.len(), 8);
    assert_eq!(out[2], 0);
    // 270 before clamping.
    assert_eq!(out[5], 255);
}

#[test]
fn source_rows_are_read_forward_once() {
    for (h1, h2) in [(50u32, 7u32), (7, 50), (30, 29), (9, 9), (100, 1)] {
        let data: Vec<u8> = (0..h1 * 5).map(|v| (v % 251) as u8).collect();
        let mut src = RecordingSource::new(MemorySource::new(5, h1, 1, data).unwrap());
        let mut sink = MemorySink::new();
        let (_, stats) = resize(
            &mut src,
            &mut sink,
            Size::new(3, h2),
            TargetDirective::Exact,
            1.0,
            FilterSpec::lanczos(3.0),
        )
        .unwrap();
        assert!(src.reads <= h1 as usize);
        assert_eq!(stats.rows_read, src.reads);
        assert_eq!(sink.rows(), h2 as usize);
    }
}

#[quickcheck]
fn any_geometry_streams_without_rewinding(w1: u8, h1: u8, w2: u8, h2: u8, radius: u8) -> TestResult {
    if w1 == 0 || h1 == 0 || w2 == 0 || h2 == 0 || radius == 0 {
        return TestResult::discard();
    }
    let (w1, h1, w2, h2) = (w1 as u32 % 40 + 1, h1 as u32 % 40 + 1, w2 as u32 % 40 + 1, h2 as u32 % 40 + 1);
    let data = vec![77; (w1 * h1 * 2) as usize];
    let mut src = RecordingSource::new(MemorySource::new(w1, h1, 2, data).unwrap());
    let mut sink = MemorySink::new();
    let result = resize(
        &mut src,
        &mut sink,
        Size::new(w2, h2),
        TargetDirective::Exact,
        radius as f32 / 64.0 + 0.25,
        FilterSpec::mitchell(),
    );
    match result {
        Ok(_) => TestResult::from_bool(
            src.reads <= h1 as usize && sink.as_slice().len() == (w2 * h2 * 2) as usize,
        ),
        Err(_) => TestResult::failed(),
    }
}

#[test_log::test]
fn degenerate_weights_fall_back_to_nearest_sample() {
    // A tiny box radius on an upscale leaves fractional coordinates with
    // nothing but zero-weight samples in their window.
    let src = MemorySource::new(2, 2, 1, vec![10, 200, 30, 40]).unwrap();
    let mut sink = MemorySink::new();
    let (plan, stats) = resize(
        src,
        &mut sink,
        Size::new(4, 4),
        TargetDirective::Exact,
        0.1,
        FilterSpec::box_filter(),
    )
    .unwrap();

    assert_eq!(plan.x.window, 1);
    assert_eq!(stats.horizontal_fallbacks, 4);
    assert_eq!(stats.vertical_fallbacks, 8);
    #[rustfmt::skip]
    let expected = vec![
        10, 10, 200, 200,
        10, 10, 200, 200,
        30, 30,  40,  40,
        30, 30,  40,  40,
    ];
    assert_eq!(sink.into_inner(), expected);
}

#[test]
fn truncated_source_is_fatal() {
    let data = vec![1; 6 * 6];
    let mut src = RecordingSource::truncated(MemorySource::new(6, 6, 1, data).unwrap(), 3);
    let mut sink = MemorySink::new();
    let err = resize(
        &mut src,
        &mut sink,
        Size::new(3, 3),
        TargetDirective::Exact,
        1.0,
        FilterSpec::hermite(),
    )
    .unwrap_err();
    assert!(matches!(err, ResampleError::Source { row: 3, .. }), "{err}");
}

#[test]
fn short_stream_reports_truncation() {
    struct Short(u32);
    impl ScanlineSource for Short {
        fn width(&self) -> u32 {
            4
        }
        fn height(&self) -> u32 {
            8
        }
        fn channels(&self) -> usize {
            1
        }
        fn read_scanline(&mut self, _line: &mut [u8]) -> Result<bool, CodecError> {
            if self.0 == 0 {
                return Ok(false);
            }
            self.0 -= 1;
            Ok(true)
        }
    }

    let mut sink = MemorySink::new();
    let err = resize(
        Short(2),
        &mut sink,
        Size::new(4, 8),
        TargetDirective::Exact,
        1.0,
        FilterSpec::linear(),
    )
    .unwrap_err();
    assert!(matches!(err, ResampleError::Truncated { row: 2 }));
}

#[test]
fn sink_failure_is_fatal() {
    let src = MemorySource::new(2, 2, 1, vec![0; 4]).unwrap();
    let err = resize(
        src,
        &mut FailingSink,
        Size::new(1, 1),
        TargetDirective::Exact,
        1.0,
        FilterSpec::linear(),
    )
    .unwrap_err();
    assert!(matches!(err, ResampleError::Sink { row: 0, .. }));
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn bounded_shrink_through_the_pipeline() {
    let src = MemorySource::new(200, 100, 1, vec![9; 200 * 100]).unwrap();
    let mut sink = MemorySink::new();
    let (plan, _) = resize(
        src,
        &mut sink,
        Size::new(50, 50),
        TargetDirective::BoundedShrink,
        1.0,
        FilterSpec::default().with_sharpen(0.0),
    )
    .unwrap();
    assert_eq!(plan.out, Size::new(50, 25));
    assert_eq!(sink.as_slice().len(), 50 * 25);
    assert!(sink.as_slice().iter().all(|&v| v == 9));
}

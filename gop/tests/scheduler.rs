use gop_rs::decoder::{compensate, decode_intra, DecoderOption, GopConfig, GopScheduler, RgbImage};
use gop_rs::encoder::{
    estimate_motion_field, residual_between, write_b_payload, write_intra_payload,
    write_p_payload,
};
use gop_rs::types::{ChromaSubsampling, MotionField, PlanarImage, ResidualPlane};
use gop_rs::{Error, FrameSink};
use std::error::Error as StdError;

const WIDTH: usize = 32;
const HEIGHT: usize = 32;

#[derive(Default)]
struct CollectFrames {
    frames: Vec<(usize, String, RgbImage)>,
    fail_at: Option<usize>,
}

impl FrameSink for CollectFrames {
    fn write_frame(
        &mut self,
        index: usize,
        name: &str,
        frame: &RgbImage,
    ) -> Result<(), Box<dyn StdError + Send + Sync>> {
        if self.fail_at == Some(index) {
            return Err("disk full".into());
        }

        self.frames.push((index, name.to_string(), frame.clone()));
        Ok(())
    }
}

/// A gray 4:4:4 picture, along with its expected RGB decoding.
fn gray_picture<F>(sample: F) -> (PlanarImage, RgbImage)
where
    F: Fn(usize, usize) -> u8,
{
    let luma: Vec<u8> = (0..HEIGHT)
        .flat_map(|y| (0..WIDTH).map(move |x| (x, y)))
        .map(|(x, y)| sample(x, y))
        .collect();
    let rgb = luma.iter().flat_map(|&value| vec![value; 3]).collect();

    let planar = PlanarImage::new(
        WIDTH,
        HEIGHT,
        ChromaSubsampling::Yuv444,
        luma,
        vec![128; WIDTH * HEIGHT],
        vec![128; WIDTH * HEIGHT],
    )
    .unwrap();

    (planar, RgbImage::from_raw(WIDTH, HEIGHT, rgb).unwrap())
}

fn pattern(x: usize, y: usize) -> u8 {
    ((x * 7 + y * 13) % 200 + 20) as u8
}

fn still_b() -> Vec<u8> {
    let field = MotionField::zero(WIDTH, HEIGHT);

    write_b_payload(&field, &field, &ResidualPlane::zero(WIDTH, HEIGHT))
}

fn average(a: &RgbImage, b: &RgbImage) -> Vec<u8> {
    a.as_bytes()
        .iter()
        .zip(b.as_bytes())
        .map(|(&a, &b)| ((a as u16 + b as u16) / 2) as u8)
        .collect()
}

/// Encode an I P B B group where the P frame is the intra picture panned
/// three pixels to the right.
fn panning_sequence() -> (Vec<Vec<u8>>, RgbImage, RgbImage) {
    let (intra, expected_intra) = gray_picture(pattern);
    let (_, panned) = gray_picture(|x, y| pattern(x.saturating_sub(3), y));

    let intra_payload = write_intra_payload(&intra);
    let reference = decode_intra(&intra_payload, WIDTH, HEIGHT, ChromaSubsampling::Yuv444)
        .unwrap();
    assert_eq!(reference, expected_intra);

    let field = estimate_motion_field(&panned, &reference, 4).unwrap();
    let prediction =
        compensate(&reference, &field, WIDTH, HEIGHT, DecoderOption::empty()).unwrap();
    let residual = residual_between(&panned, &prediction).unwrap();

    let payloads = vec![
        intra_payload,
        write_p_payload(&field, &residual),
        still_b(),
        still_b(),
    ];

    (payloads, expected_intra, panned)
}

#[test]
fn emits_frames_in_index_order() {
    let (payloads, intra, panned) = panning_sequence();
    let config = GopConfig::new(WIDTH, HEIGHT, 4, ChromaSubsampling::Yuv444);
    let mut scheduler = GopScheduler::new(config, &payloads).unwrap();
    let mut sink = CollectFrames::default();

    assert_eq!(scheduler.decode_all(&mut sink).unwrap(), 4);

    let names: Vec<_> = sink.frames.iter().map(|(_, name, _)| name.as_str()).collect();
    assert_eq!(names, ["frame_000", "frame_001", "frame_002", "frame_003"]);

    let indices: Vec<_> = sink.frames.iter().map(|(index, _, _)| *index).collect();
    assert_eq!(indices, [0, 1, 2, 3]);

    let frames: Vec<_> = sink.frames.into_iter().map(|(_, _, frame)| frame).collect();
    assert_eq!(frames[0], intra);
    assert_eq!(frames[1], panned);

    // The last frame has no future, so it averages against black; frame 2
    // then averages frame 1 against it.
    let black = RgbImage::new(WIDTH, HEIGHT);
    assert_eq!(frames[3].as_bytes(), &average(&frames[1], &black)[..]);
    assert_eq!(frames[2].as_bytes(), &average(&frames[1], &frames[3])[..]);

    for frame in &frames {
        assert_eq!(frame.dimensions(), (WIDTH, HEIGHT));
    }
}

#[test]
fn second_group_restarts_from_intra() {
    let (mut payloads, _, _) = panning_sequence();
    let (second, expected_second) = gray_picture(|x, _| (x * 8) as u8);
    payloads.push(write_intra_payload(&second));

    let config = GopConfig::new(WIDTH, HEIGHT, 4, ChromaSubsampling::Yuv444);
    let mut scheduler = GopScheduler::new(config, payloads).unwrap();
    let mut sink = CollectFrames::default();

    assert_eq!(scheduler.decode_all(&mut sink).unwrap(), 5);

    let (index, name, frame) = &sink.frames[4];
    assert_eq!(*index, 4);
    assert_eq!(name, "frame_004");
    assert_eq!(frame, &expected_second);

    // Frame 3's future is now the intra frame of the next group.
    let expected = average(&sink.frames[1].2, &expected_second);
    assert_eq!(sink.frames[3].2.as_bytes(), &expected[..]);
}

#[test]
fn malformed_payload_halts_the_run() {
    let (mut payloads, _, _) = panning_sequence();
    let len = payloads[1].len() - 1;
    payloads[1].truncate(len);

    let config = GopConfig::new(WIDTH, HEIGHT, 4, ChromaSubsampling::Yuv444);
    let mut scheduler = GopScheduler::new(config, &payloads).unwrap();
    let mut sink = CollectFrames::default();

    let error = scheduler.decode_all(&mut sink).unwrap_err();

    assert_eq!(error.frame_index(), Some(1));
    assert!(matches!(error.root(), Error::MalformedPayload { .. }));
    assert_eq!(sink.frames.len(), 1);
    assert_eq!(sink.frames[0].0, 0);
}

#[test]
fn out_of_range_vector_names_the_frame() {
    let (mut payloads, _, _) = panning_sequence();
    let mut vectors = MotionField::zero(WIDTH, HEIGHT).as_vectors().to_vec();
    vectors[1].dx = 1;
    payloads[1] = write_p_payload(
        &MotionField::new(vectors),
        &ResidualPlane::zero(WIDTH, HEIGHT),
    );

    let config = GopConfig::new(WIDTH, HEIGHT, 4, ChromaSubsampling::Yuv444);
    let mut scheduler = GopScheduler::new(config, &payloads).unwrap();

    scheduler.decode_next_frame().unwrap();
    let error = scheduler.decode_next_frame().unwrap_err();

    assert_eq!(error.frame_index(), Some(1));
    assert!(matches!(
        error.root(),
        Error::OutOfRangeMotionVector { block: 1, .. }
    ));

    // Clamping reads to the edge lets the same stream decode.
    let config = config.with_options(DecoderOption::CLAMP_MOTION_VECTORS);
    let mut scheduler = GopScheduler::new(config, &payloads).unwrap();
    let mut sink = CollectFrames::default();

    assert_eq!(scheduler.decode_all(&mut sink).unwrap(), 4);
}

#[test]
fn sink_failure_stops_decoding() {
    let (payloads, _, _) = panning_sequence();
    let config = GopConfig::new(WIDTH, HEIGHT, 4, ChromaSubsampling::Yuv444);
    let mut scheduler = GopScheduler::new(config, &payloads).unwrap();
    let mut sink = CollectFrames {
        fail_at: Some(2),
        ..CollectFrames::default()
    };

    let error = scheduler.decode_all(&mut sink).unwrap_err();

    assert!(matches!(error, Error::FrameSink(_)));
    assert_eq!(sink.frames.len(), 2);
    assert_eq!(scheduler.store().len(), 3);
}

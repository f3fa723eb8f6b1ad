//! Payload serialization

use crate::types::{MotionField, PlanarImage, ResidualPlane};
use byteorder::{ByteOrder, LittleEndian};

/// Append 16-bit little-endian integers to a payload.
fn write_i16s(payload: &mut Vec<u8>, values: &[i16]) {
    let start = payload.len();
    payload.resize(start + values.len() * 2, 0);
    LittleEndian::write_i16_into(values, &mut payload[start..]);
}

fn write_motion_field(payload: &mut Vec<u8>, field: &MotionField) {
    let components: Vec<i16> = field
        .as_vectors()
        .iter()
        .flat_map(|mv| vec![mv.dx, mv.dy])
        .collect();

    write_i16s(payload, &components);
}

/// Serialize a planar picture as an intra payload.
pub fn write_intra_payload(image: &PlanarImage) -> Vec<u8> {
    let size = image
        .subsampling()
        .planar_size(image.width(), image.height());

    let mut payload = Vec::with_capacity(size);
    payload.extend_from_slice(image.as_luma());
    payload.extend_from_slice(image.as_chroma_b());
    payload.extend_from_slice(image.as_chroma_r());

    payload
}

/// Serialize a forward-predicted payload.
pub fn write_p_payload(field: &MotionField, residual: &ResidualPlane) -> Vec<u8> {
    let mut payload = Vec::new();
    write_motion_field(&mut payload, field);
    write_i16s(&mut payload, residual.as_samples());

    payload
}

/// Serialize a bidirectionally-predicted payload.
pub fn write_b_payload(
    forward: &MotionField,
    backward: &MotionField,
    residual: &ResidualPlane,
) -> Vec<u8> {
    let mut payload = Vec::new();
    write_motion_field(&mut payload, forward);
    write_motion_field(&mut payload, backward);
    write_i16s(&mut payload, residual.as_samples());

    payload
}

//! Stateless single-frame effects.

use super::kernel::{convolve, BorderPolicy, Kernel3x3};
use crate::capture::{Frame, FrameError, PixelData};

/// Laplacian edge response with the default border policy.
pub fn edge_filter(frame: &Frame) -> Frame {
    edge_filter_with_border(frame, BorderPolicy::default())
}

pub fn edge_filter_with_border(frame: &Frame, border: BorderPolicy) -> Frame {
    convolve(frame, &Kernel3x3::LAPLACE, border)
}

/// Eight-neighbour edge response with the default border policy.
pub fn edge_filter_wide(frame: &Frame) -> Frame {
    edge_filter_wide_with_border(frame, BorderPolicy::default())
}

pub fn edge_filter_wide_with_border(frame: &Frame, border: BorderPolicy) -> Frame {
    convolve(frame, &Kernel3x3::LAPLACE_WIDE, border)
}

/// `frame - edge_filter(frame)`, saturated.
pub fn sharpen(frame: &Frame) -> Frame {
    sharpen_with_border(frame, BorderPolicy::default())
}

/// The edge response is saturated into the element type before it is
/// subtracted, so unsigned frames only lose their positive responses.
pub fn sharpen_with_border(frame: &Frame, border: BorderPolicy) -> Frame {
    let edges = edge_filter_with_border(frame, border);
    subtract(frame, &edges)
}

/// Reinterprets each sample as the signed type of the same width and
/// negates it with two's-complement wrapping.
///
/// This is not a brightness inversion: `u8` 200 is read as `i8` -56 and
/// becomes 56. Output frames are `i8`/`i16`; `f32` frames are negated
/// directly. Applying `negate` twice restores the original bit pattern.
pub fn negate(frame: &Frame) -> Frame {
    let data = match frame.packed_data() {
        PixelData::U8(s) => PixelData::I8(s.into_iter().map(|v| (v as i8).wrapping_neg()).collect()),
        PixelData::I8(s) => PixelData::I8(s.into_iter().map(i8::wrapping_neg).collect()),
        PixelData::U16(s) => {
            PixelData::I16(s.into_iter().map(|v| (v as i16).wrapping_neg()).collect())
        }
        PixelData::I16(s) => PixelData::I16(s.into_iter().map(i16::wrapping_neg).collect()),
        PixelData::F32(s) => PixelData::F32(s.into_iter().map(|v| -v).collect()),
    };
    frame.derive(data)
}

/// Three-frame motion difference: `current - prev2`, saturated.
///
/// `prev1` takes part only in the shape check. A second-difference
/// formula over all three frames was considered and never enabled.
pub fn difference(prev2: &Frame, prev1: &Frame, current: &Frame) -> Result<Frame, FrameError> {
    current.ensure_same_shape(prev1)?;
    current.ensure_same_shape(prev2)?;
    Ok(subtract(current, prev2))
}

/// `a - b` per sample, saturated into `a`'s element type.
///
/// Callers guarantee matching shapes.
fn subtract(a: &Frame, b: &Frame) -> Frame {
    let values: Vec<f64> = a
        .to_f64_vec()
        .into_iter()
        .zip(b.to_f64_vec())
        .map(|(x, y)| x - y)
        .collect();
    a.derive_f64(&values)
}

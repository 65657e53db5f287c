//! Frame type representing a captured image with metadata.

use super::sample::{map_samples, with_samples, Sample};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use thiserror::Error;

/// Errors raised by frame construction and frame history operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("frame history is empty")]
    EmptyHistory,
    #[error("frame shape {found} does not match expected {expected}")]
    DimensionMismatch { expected: FrameShape, found: FrameShape },
    #[error("pixel buffer of {len} samples is too small for {shape} with stride {stride}")]
    InvalidBuffer {
        shape: FrameShape,
        stride: usize,
        len: usize,
    },
    #[error("frame dimensions must be non-zero, got {0}")]
    InvalidDimensions(FrameShape),
}

/// Storage type of a single sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    #[default]
    U8,
    I8,
    U16,
    I16,
    F32,
}

impl ElementType {
    /// Returns true for signed integer and floating point storage.
    pub fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::F32)
    }

    /// Nominal value range of the element type.
    ///
    /// Float frames are treated as normalized to `0.0..=1.0`; the range is
    /// only used for synthesizing frames, never for clamping.
    pub fn range(self) -> (f64, f64) {
        match self {
            Self::U8 => (0.0, u8::MAX as f64),
            Self::I8 => (i8::MIN as f64, i8::MAX as f64),
            Self::U16 => (0.0, u16::MAX as f64),
            Self::I16 => (i16::MIN as f64, i16::MAX as f64),
            Self::F32 => (0.0, 1.0),
        }
    }

    /// Lowercase name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::I8 => "i8",
            Self::U16 => "u16",
            Self::I16 => "i16",
            Self::F32 => "f32",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything that must agree between two frames for them to be combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameShape {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub element: ElementType,
}

impl FrameShape {
    /// Creates a shape description.
    pub fn new(width: u32, height: u32, channels: u8, element: ElementType) -> Self {
        Self {
            width,
            height,
            channels,
            element,
        }
    }

    /// Single-channel 8-bit shape.
    pub fn gray(width: u32, height: u32) -> Self {
        Self::new(width, height, 1, ElementType::U8)
    }

    /// Samples in one packed row (`width * channels`).
    #[inline]
    pub fn row_len(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    /// Samples in a packed frame of this shape.
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.row_len() * self.height as usize
    }

    fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.channels == 0
    }
}

impl fmt::Display for FrameShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}x{} {}",
            self.width, self.height, self.channels, self.element
        )
    }
}

/// Typed sample storage of a frame.
#[derive(Clone, PartialEq)]
pub enum PixelData {
    U8(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    F32(Vec<f32>),
}

impl PixelData {
    /// Element type of the stored samples.
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::U8(_) => ElementType::U8,
            Self::I8(_) => ElementType::I8,
            Self::U16(_) => ElementType::U16,
            Self::I16(_) => ElementType::I16,
            Self::F32(_) => ElementType::F32,
        }
    }

    /// Number of stored samples, including any row padding.
    pub fn len(&self) -> usize {
        with_samples!(self, |s| s.len())
    }

    /// Returns true if no samples are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrows the samples if they are unsigned 8-bit.
    pub fn as_u8(&self) -> Option<&[u8]> {
        match self {
            Self::U8(s) => Some(s),
            _ => None,
        }
    }

    /// Borrows the samples if they are signed 8-bit.
    pub fn as_i8(&self) -> Option<&[i8]> {
        match self {
            Self::I8(s) => Some(s),
            _ => None,
        }
    }

    /// Borrows the samples if they are 32-bit float.
    pub fn as_f32(&self) -> Option<&[f32]> {
        match self {
            Self::F32(s) => Some(s),
            _ => None,
        }
    }

    fn filled(element: ElementType, len: usize, value: f64) -> Self {
        match element {
            ElementType::U8 => Self::U8(vec![u8::saturate(value); len]),
            ElementType::I8 => Self::I8(vec![i8::saturate(value); len]),
            ElementType::U16 => Self::U16(vec![u16::saturate(value); len]),
            ElementType::I16 => Self::I16(vec![i16::saturate(value); len]),
            ElementType::F32 => Self::F32(vec![f32::saturate(value); len]),
        }
    }

    fn from_f64(element: ElementType, values: &[f64]) -> Self {
        fn narrow<T: Sample>(values: &[f64]) -> Vec<T> {
            values.iter().map(|&v| T::saturate(v)).collect()
        }

        match element {
            ElementType::U8 => Self::U8(narrow(values)),
            ElementType::I8 => Self::I8(narrow(values)),
            ElementType::U16 => Self::U16(narrow(values)),
            ElementType::I16 => Self::I16(narrow(values)),
            ElementType::F32 => Self::F32(narrow(values)),
        }
    }
}

/// Iterates the samples of a possibly padded buffer in packed row-major order.
fn packed<T: Copy>(
    samples: &[T],
    stride: usize,
    row_len: usize,
    height: usize,
) -> impl Iterator<Item = T> + '_ {
    samples
        .chunks(stride)
        .take(height)
        .flat_map(move |row| row[..row_len].iter().copied())
}

/// A single video frame.
///
/// Frames are immutable: every effect produces a new, tightly packed frame
/// that inherits the source's sequence number and timestamp.
#[derive(Clone)]
pub struct Frame {
    /// Sample storage, row-major and channel-interleaved.
    data: PixelData,
    /// Frame width in pixels.
    width: u32,
    /// Frame height in pixels.
    height: u32,
    /// Interleaved channels per pixel.
    channels: u8,
    /// Distance between row starts, in samples.
    stride: usize,
    /// Capture timestamp.
    timestamp: Instant,
    /// Monotonic sequence number.
    sequence: u64,
}

impl Frame {
    /// Creates a single-channel 8-bit frame from packed pixels.
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, sequence: u64) -> Result<Self, FrameError> {
        Self::from_data(PixelData::U8(pixels), width, height, 1, sequence)
    }

    /// Creates a packed frame from typed sample storage.
    pub fn from_data(
        data: PixelData,
        width: u32,
        height: u32,
        channels: u8,
        sequence: u64,
    ) -> Result<Self, FrameError> {
        let stride = width as usize * channels as usize;
        Self::with_stride(data, width, height, channels, stride, sequence)
    }

    /// Creates a frame whose rows start `stride` samples apart.
    pub fn with_stride(
        data: PixelData,
        width: u32,
        height: u32,
        channels: u8,
        stride: usize,
        sequence: u64,
    ) -> Result<Self, FrameError> {
        let shape = FrameShape::new(width, height, channels, data.element_type());
        if shape.is_empty() {
            return Err(FrameError::InvalidDimensions(shape));
        }

        let row_len = shape.row_len();
        let required = stride
            .checked_mul(height as usize - 1)
            .and_then(|n| n.checked_add(row_len));
        match required {
            Some(required) if stride >= row_len && data.len() >= required => {}
            _ => {
                return Err(FrameError::InvalidBuffer {
                    shape,
                    stride,
                    len: data.len(),
                })
            }
        }

        Ok(Self {
            data,
            width,
            height,
            channels,
            stride,
            timestamp: Instant::now(),
            sequence,
        })
    }

    /// Creates a frame with every sample set to `value` (saturated).
    pub fn filled(shape: FrameShape, value: f64, sequence: u64) -> Result<Self, FrameError> {
        let data = PixelData::filled(shape.element, shape.sample_count(), value);
        Self::from_data(data, shape.width, shape.height, shape.channels, sequence)
    }

    /// Creates a frame by evaluating `f(row, col, channel)` for every sample.
    pub fn from_fn<F>(shape: FrameShape, sequence: u64, mut f: F) -> Result<Self, FrameError>
    where
        F: FnMut(u32, u32, u8) -> f64,
    {
        let mut values = Vec::with_capacity(shape.sample_count());
        for row in 0..shape.height {
            for col in 0..shape.width {
                for ch in 0..shape.channels {
                    values.push(f(row, col, ch));
                }
            }
        }
        Self::from_packed_f64(shape, &values, sequence)
    }

    /// Creates a packed frame from widened samples, saturating each one.
    fn from_packed_f64(
        shape: FrameShape,
        values: &[f64],
        sequence: u64,
    ) -> Result<Self, FrameError> {
        let data = PixelData::from_f64(shape.element, values);
        Self::from_data(data, shape.width, shape.height, shape.channels, sequence)
    }

    /// Wraps packed output of a transform, keeping this frame's metadata.
    ///
    /// `data` must hold exactly `self.sample_count()` samples.
    pub(crate) fn derive(&self, data: PixelData) -> Frame {
        debug_assert_eq!(data.len(), self.sample_count());
        Frame {
            data,
            width: self.width,
            height: self.height,
            channels: self.channels,
            stride: self.row_len(),
            timestamp: self.timestamp,
            sequence: self.sequence,
        }
    }

    /// Like [`derive`](Self::derive), saturating widened packed samples
    /// into this frame's element type.
    pub(crate) fn derive_f64(&self, values: &[f64]) -> Frame {
        self.derive(PixelData::from_f64(self.element_type(), values))
    }

    /// Returns the raw sample storage (may contain row padding).
    #[inline]
    pub fn data(&self) -> &PixelData {
        &self.data
    }

    /// Returns the frame width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the frame height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Distance between row starts, in samples.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    /// Returns the shape used for compatibility checks.
    pub fn shape(&self) -> FrameShape {
        FrameShape::new(self.width, self.height, self.channels, self.element_type())
    }

    /// Returns the capture timestamp.
    #[inline]
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Returns the sequence number.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Samples in one packed row.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    /// Samples in the packed frame, excluding padding.
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.row_len() * self.height as usize
    }

    /// Reads one sample, widened to `f64`.
    pub fn sample(&self, row: u32, col: u32, channel: u8) -> Option<f64> {
        if row >= self.height || col >= self.width || channel >= self.channels {
            return None;
        }
        let idx = row as usize * self.stride + col as usize * self.channels as usize
            + channel as usize;
        Some(with_samples!(&self.data, |s| s[idx].to_f64()))
    }

    /// Returns all samples in packed row-major order, widened to `f64`.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        let (stride, row_len, height) = (self.stride, self.row_len(), self.height as usize);
        with_samples!(&self.data, |s| packed(s, stride, row_len, height)
            .map(Sample::to_f64)
            .collect())
    }

    /// Adds `weight * sample` to `acc` for every packed sample.
    pub(crate) fn add_scaled_into(&self, acc: &mut [f64], weight: f64) {
        let (stride, row_len, height) = (self.stride, self.row_len(), self.height as usize);
        with_samples!(&self.data, |s| {
            for (a, v) in acc.iter_mut().zip(packed(s, stride, row_len, height)) {
                *a += v.to_f64() * weight;
            }
        })
    }

    /// Returns a packed copy of the sample storage.
    pub(crate) fn packed_data(&self) -> PixelData {
        let (stride, row_len, height) = (self.stride, self.row_len(), self.height as usize);
        map_samples!(&self.data, |s| packed(s, stride, row_len, height).collect())
    }

    /// Little-endian bytes of the packed samples.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let (stride, row_len, height) = (self.stride, self.row_len(), self.height as usize);
        let mut out = Vec::new();
        with_samples!(&self.data, |s| {
            for v in packed(s, stride, row_len, height) {
                v.extend_le(&mut out);
            }
        });
        out
    }

    /// BLAKE3 digest of the shape and packed samples.
    ///
    /// Metadata (sequence, timestamp) and row padding are excluded, so two
    /// frames with the same content always hash equal.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.width.to_le_bytes());
        hasher.update(&self.height.to_le_bytes());
        hasher.update(&[self.channels]);
        hasher.update(self.element_type().name().as_bytes());
        hasher.update(&self.to_le_bytes());
        *hasher.finalize().as_bytes()
    }

    /// Fails with `DimensionMismatch` unless `other` has this frame's shape.
    pub fn ensure_same_shape(&self, other: &Frame) -> Result<(), FrameError> {
        let (expected, found) = (self.shape(), other.shape());
        if expected != found {
            return Err(FrameError::DimensionMismatch { expected, found });
        }
        Ok(())
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("shape", &format_args!("{}", self.shape()))
            .field("stride", &self.stride)
            .field("sequence", &self.sequence)
            .field("samples", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let frame = Frame::new(vec![0u8; 640 * 480], 640, 480, 1).unwrap();

        assert_eq!(frame.width(), 640);
        assert_eq!(frame.height(), 480);
        assert_eq!(frame.sequence(), 1);
        assert_eq!(frame.stride(), 640);
        assert_eq!(frame.shape(), FrameShape::gray(640, 480));
    }

    #[test]
    fn test_frame_invalid_size() {
        let result = Frame::new(vec![0u8; 100], 640, 480, 1);
        assert!(matches!(result, Err(FrameError::InvalidBuffer { len: 100, .. })));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let result = Frame::new(Vec::new(), 0, 4, 1);
        assert!(matches!(result, Err(FrameError::InvalidDimensions(_))));
    }

    #[test]
    fn test_stride_smaller_than_row_rejected() {
        let result = Frame::with_stride(PixelData::U8(vec![0; 64]), 8, 4, 1, 4, 0);
        assert!(matches!(result, Err(FrameError::InvalidBuffer { .. })));
    }

    #[test]
    fn test_padded_rows_are_skipped() {
        // 2x2 gray with one padding sample per row; last row unpadded.
        let data = PixelData::U8(vec![1, 2, 99, 3, 4]);
        let frame = Frame::with_stride(data, 2, 2, 1, 3, 0).unwrap();

        assert_eq!(frame.to_f64_vec(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(frame.sample(1, 0, 0), Some(3.0));
        assert_eq!(frame.packed_data().as_u8(), Some(&[1u8, 2, 3, 4][..]));
    }

    #[test]
    fn test_filled_saturates_value() {
        let frame = Frame::filled(FrameShape::gray(2, 2), 400.0, 0).unwrap();
        assert!(frame.to_f64_vec().iter().all(|&v| v == 255.0));
    }

    #[test]
    fn test_from_fn_interleaves_channels() {
        let shape = FrameShape::new(2, 1, 3, ElementType::I16);
        let frame = Frame::from_fn(shape, 0, |_, col, ch| (col * 10) as f64 + ch as f64).unwrap();

        assert_eq!(frame.to_f64_vec(), vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(frame.sample(0, 1, 2), Some(12.0));
        assert_eq!(frame.sample(0, 2, 0), None);
    }

    #[test]
    fn test_fingerprint_ignores_metadata_and_padding() {
        let packed = Frame::new(vec![1, 2, 3, 4], 2, 2, 1).unwrap();
        let padded =
            Frame::with_stride(PixelData::U8(vec![1, 2, 0, 3, 4, 0]), 2, 2, 1, 3, 7).unwrap();
        let other = Frame::new(vec![1, 2, 3, 5], 2, 2, 1).unwrap();

        assert_eq!(packed.fingerprint(), padded.fingerprint());
        assert_ne!(packed.fingerprint(), other.fingerprint());
    }

    #[test]
    fn test_fingerprint_distinguishes_element_type() {
        let a = Frame::filled(FrameShape::new(2, 2, 1, ElementType::U8), 0.0, 0).unwrap();
        let b = Frame::filled(FrameShape::new(2, 2, 1, ElementType::I8), 0.0, 0).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_shape_mismatch_detected() {
        let a = Frame::filled(FrameShape::gray(4, 4), 0.0, 0).unwrap();
        let b = Frame::filled(FrameShape::new(4, 4, 3, ElementType::U8), 0.0, 0).unwrap();

        assert!(a.ensure_same_shape(&a.clone()).is_ok());
        assert!(matches!(
            a.ensure_same_shape(&b),
            Err(FrameError::DimensionMismatch { .. })
        ));
    }
}

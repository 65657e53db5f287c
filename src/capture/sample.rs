//! Per-element numeric conversions shared by every frame transform.
//!
//! All arithmetic is carried out in `f64` and written back through
//! [`Sample::saturate`], which rounds half to even and clamps to the
//! element range. Integer samples therefore never wrap.

pub(crate) trait Sample: Copy + Default + Send + Sync + 'static {
    /// Widens the sample for arithmetic.
    fn to_f64(self) -> f64;

    /// Narrows an arithmetic result back into the element type.
    fn saturate(value: f64) -> Self;

    /// Appends the little-endian encoding of the sample.
    fn extend_le(self, out: &mut Vec<u8>);
}

macro_rules! impl_int_sample {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn saturate(value: f64) -> Self {
                    // `as` clamps out-of-range values and maps NaN to zero.
                    value.round_ties_even() as $t
                }

                #[inline]
                fn extend_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_int_sample!(u8, i8, u16, i16);

impl Sample for f32 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn saturate(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn extend_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

/// Runs `$body` with `$s` bound to the typed sample slice of a `PixelData`.
macro_rules! with_samples {
    ($data:expr, |$s:ident| $body:expr) => {
        match $data {
            $crate::capture::PixelData::U8($s) => $body,
            $crate::capture::PixelData::I8($s) => $body,
            $crate::capture::PixelData::U16($s) => $body,
            $crate::capture::PixelData::I16($s) => $body,
            $crate::capture::PixelData::F32($s) => $body,
        }
    };
}

/// Like `with_samples!`, but `$body` yields a `Vec` of the same element
/// type, which is rewrapped in the matching `PixelData` variant.
macro_rules! map_samples {
    ($data:expr, |$s:ident| $body:expr) => {
        match $data {
            $crate::capture::PixelData::U8($s) => $crate::capture::PixelData::U8($body),
            $crate::capture::PixelData::I8($s) => $crate::capture::PixelData::I8($body),
            $crate::capture::PixelData::U16($s) => $crate::capture::PixelData::U16($body),
            $crate::capture::PixelData::I16($s) => $crate::capture::PixelData::I16($body),
            $crate::capture::PixelData::F32($s) => $crate::capture::PixelData::F32($body),
        }
    };
}

pub(crate) use map_samples;
pub(crate) use with_samples;

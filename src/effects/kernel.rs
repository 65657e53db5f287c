//! 3x3 convolution with explicit border handling.

use crate::capture::Frame;
use serde::{Deserialize, Serialize};

/// How samples outside the frame are synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderPolicy {
    /// Repeat the edge sample: `aaa|abcd|ddd`.
    #[default]
    Replicate,
    /// Mirror without repeating the edge: `dcb|abcd|cba`.
    Reflect101,
}

impl BorderPolicy {
    /// Maps a possibly out-of-range coordinate onto `0..len`.
    fn resolve(self, i: isize, len: usize) -> usize {
        let last = len as isize - 1;
        let mapped = match self {
            Self::Replicate => i.clamp(0, last),
            Self::Reflect101 if last == 0 => 0,
            Self::Reflect101 if i < 0 => (-i).min(last),
            Self::Reflect101 if i > last => (2 * last - i).max(0),
            Self::Reflect101 => i,
        };
        mapped as usize
    }
}

impl std::str::FromStr for BorderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replicate" => Ok(Self::Replicate),
            "reflect101" => Ok(Self::Reflect101),
            other => Err(format!(
                "unknown border policy '{other}' (expected replicate or reflect101)"
            )),
        }
    }
}

/// A 3x3 convolution kernel, row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel3x3(pub [[f64; 3]; 3]);

impl Kernel3x3 {
    /// Four-neighbour Laplacian.
    pub const LAPLACE: Self = Self([[0.0, 1.0, 0.0], [1.0, -4.0, 1.0], [0.0, 1.0, 0.0]]);

    /// Eight-neighbour Laplacian with doubled edge weights.
    pub const LAPLACE_WIDE: Self = Self([[1.0, 2.0, 1.0], [2.0, -12.0, 2.0], [1.0, 2.0, 1.0]]);

    /// Sum of all weights. Zero-sum kernels map flat regions to zero.
    pub fn sum(&self) -> f64 {
        self.0.iter().flatten().sum()
    }
}

/// Correlates every channel of `frame` with `kernel`.
///
/// Sums are formed in `f64` and saturated into the frame's element type,
/// so negative responses clamp to zero on unsigned frames.
pub fn convolve(frame: &Frame, kernel: &Kernel3x3, border: BorderPolicy) -> Frame {
    let src = frame.to_f64_vec();
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let channels = frame.channels() as usize;

    let mut out = Vec::with_capacity(src.len());
    for row in 0..height {
        for col in 0..width {
            for ch in 0..channels {
                let mut acc = 0.0;
                for (ky, weights) in kernel.0.iter().enumerate() {
                    let y = border.resolve(row as isize + ky as isize - 1, height);
                    for (kx, &k) in weights.iter().enumerate() {
                        if k == 0.0 {
                            continue;
                        }
                        let x = border.resolve(col as isize + kx as isize - 1, width);
                        acc += k * src[(y * width + x) * channels + ch];
                    }
                }
                out.push(acc);
            }
        }
    }

    frame.derive_f64(&out)
}

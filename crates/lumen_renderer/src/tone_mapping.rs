//! HDR to LDR tone mapping operators.
//!
//! Radiance is physical and unbounded; luminance weights it by perceived
//! brightness. The `*_luminance` variants preserve hue better.

use crate::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rec. 709 luma weights.
const LUMA: Color = Color::new(0.2126, 0.7152, 0.0722);

/// Clamp each channel to [0, 1].
#[inline]
pub fn trivial(v: Color) -> Color {
    v.clamp(Color::ZERO, Color::ONE)
}

/// `v / (1 + v)`, always inside [0, 1) for non-negative input.
#[inline]
pub fn reinhard(v: Color) -> Color {
    v / (Color::ONE + v)
}

/// Reinhard with `max_white` mapped to 1.
#[inline]
pub fn reinhard_extended(v: Color, max_white: f32) -> Color {
    let numerator = v * (Color::ONE + v / Color::splat(max_white * max_white));
    numerator / (Color::ONE + v)
}

#[inline]
pub fn luminance(v: Color) -> f32 {
    v.dot(LUMA)
}

/// Scale `c` so its luminance becomes `l_out`.
pub fn change_luminance(c: Color, l_out: f32) -> Color {
    let l_in = luminance(c);
    if l_in == 0.0 {
        return Color::ZERO;
    }
    c * (l_out / l_in)
}

/// Extended Reinhard applied to luminance only.
pub fn reinhard_extended_luminance(v: Color, max_white_l: f32) -> Color {
    assert!(max_white_l > 0.0, "white point must be positive");
    let l_old = luminance(v);
    let numerator = l_old * (1.0 + l_old / (max_white_l * max_white_l));
    let l_new = numerator / (1.0 + l_old);
    change_luminance(v, l_new)
}

/// Operator applied to each averaged pixel before 8-bit encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneMapper {
    Clamp,
    Reinhard,
    ReinhardExtended,
    ReinhardExtendedLuminance,
}

impl ToneMapper {
    pub const ALL: [ToneMapper; 4] = [
        ToneMapper::Clamp,
        ToneMapper::Reinhard,
        ToneMapper::ReinhardExtended,
        ToneMapper::ReinhardExtendedLuminance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToneMapper::Clamp => "clamp",
            ToneMapper::Reinhard => "reinhard",
            ToneMapper::ReinhardExtended => "reinhard_extended",
            ToneMapper::ReinhardExtendedLuminance => "reinhard_extended_luminance",
        }
    }

    /// Map `hdr` into [0, 1]. `white_point` is only read by the extended
    /// operators and must be positive.
    pub fn apply(self, hdr: Color, white_point: f32) -> Color {
        let mapped = match self {
            ToneMapper::Clamp => hdr,
            ToneMapper::Reinhard => reinhard(hdr),
            ToneMapper::ReinhardExtended => reinhard_extended(hdr, white_point),
            ToneMapper::ReinhardExtendedLuminance => {
                reinhard_extended_luminance(hdr, white_point)
            }
        };
        trivial(mapped)
    }
}

impl fmt::Display for ToneMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToneMapper {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ToneMapper::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown tone mapper '{s}'"))
    }
}

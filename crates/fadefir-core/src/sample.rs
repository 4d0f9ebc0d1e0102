//! Sample and coefficient widths.
//!
//! The engine is generic over its sample type ([`i16`] or [`i32`]) and takes
//! coefficients of either width at run time. Both traits are sealed to those
//! two integer types.

use crate::fixed::{sat_i16, sat_i32};

/// Bit width of the audio samples an engine processes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DataWidth {
    /// 16-bit samples.
    #[default]
    Bits16,
    /// 32-bit samples.
    Bits32,
}

impl DataWidth {
    /// Bytes per sample.
    pub const fn bytes(self) -> usize {
        match self {
            Self::Bits16 => 2,
            Self::Bits32 => 4,
        }
    }

    /// Bits per sample.
    pub const fn bits(self) -> u32 {
        match self {
            Self::Bits16 => 16,
            Self::Bits32 => 32,
        }
    }

    /// Parses a bit count (16 or 32).
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            16 => Some(Self::Bits16),
            32 => Some(Self::Bits32),
            _ => None,
        }
    }
}

/// Bit width of filter coefficients.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CoefWidth {
    /// 16-bit coefficients.
    #[default]
    Bits16,
    /// 32-bit coefficients.
    Bits32,
}

impl CoefWidth {
    /// Bits per coefficient.
    pub const fn bits(self) -> u32 {
        match self {
            Self::Bits16 => 16,
            Self::Bits32 => 32,
        }
    }

    /// Parses a bit count (16 or 32).
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            16 => Some(Self::Bits16),
            32 => Some(Self::Bits32),
            _ => None,
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for i16 {}
    impl Sealed for i32 {}
}

/// An audio sample the kernels can filter.
///
/// `Pod` lets the engine view regions of the caller's byte block as sample
/// slices without copying.
pub trait Sample:
    sealed::Sealed + bytemuck::Pod + Default + PartialEq + core::fmt::Debug + Send + Sync + 'static
{
    /// Width tag matching `StaticParams::data_width`.
    const WIDTH: DataWidth;

    /// Widens to the accumulator type.
    fn to_acc(self) -> i64;

    /// Narrows an accumulator value, clamping to the sample range.
    fn saturate(acc: i64) -> Self;
}

impl Sample for i16 {
    const WIDTH: DataWidth = DataWidth::Bits16;

    #[inline]
    fn to_acc(self) -> i64 {
        i64::from(self)
    }

    #[inline]
    fn saturate(acc: i64) -> Self {
        sat_i16(acc)
    }
}

impl Sample for i32 {
    const WIDTH: DataWidth = DataWidth::Bits32;

    #[inline]
    fn to_acc(self) -> i64 {
        i64::from(self)
    }

    #[inline]
    fn saturate(acc: i64) -> Self {
        sat_i32(acc)
    }
}

/// A filter coefficient.
pub trait Coefficient: sealed::Sealed + Copy + core::fmt::Debug + 'static {
    /// Width tag.
    const WIDTH: CoefWidth;

    /// Widens to the accumulator type.
    fn widen(self) -> i64;
}

impl Coefficient for i16 {
    const WIDTH: CoefWidth = CoefWidth::Bits16;

    #[inline]
    fn widen(self) -> i64 {
        i64::from(self)
    }
}

impl Coefficient for i32 {
    const WIDTH: CoefWidth = CoefWidth::Bits32;

    #[inline]
    fn widen(self) -> i64 {
        i64::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_round_trip_through_bits() {
        for w in [DataWidth::Bits16, DataWidth::Bits32] {
            assert_eq!(DataWidth::from_bits(w.bits()), Some(w));
            assert_eq!(w.bytes() * 8, w.bits() as usize);
        }
        for w in [CoefWidth::Bits16, CoefWidth::Bits32] {
            assert_eq!(CoefWidth::from_bits(w.bits()), Some(w));
        }
        assert_eq!(DataWidth::from_bits(24), None);
        assert_eq!(CoefWidth::from_bits(8), None);
    }

    #[test]
    fn saturate_clamps_to_sample_range() {
        assert_eq!(<i16 as Sample>::saturate(1 << 20), i16::MAX);
        assert_eq!(<i32 as Sample>::saturate(-(1 << 40)), i32::MIN);
        assert_eq!(<i32 as Sample>::saturate(-5), -5);
    }
}

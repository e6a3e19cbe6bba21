//! Fixed-point quantization.

/// Fractional bits of the hardware fixed-point format.
pub const FRACTION_BITS: u32 = 10;

/// Quantization scale, `2 ^ FRACTION_BITS`.
pub const SCALE: f32 = (1 << FRACTION_BITS) as f32;

/// Tie-breaking policy for rounding to the nearest integer.
///
/// The policy is part of the portability contract between the exporter
/// and the hardware consumer. Mismatched policies drift by at most one
/// code on exact ties.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Rounding {
    /// Ties round away from zero.
    #[default]
    HalfAwayFromZero,
    /// Ties round to the even integer.
    HalfToEven,
}

/// Quantize values into signed 16-bit fixed-point codes at [`SCALE`].
///
/// Out-of-range values saturate to the boundary codes instead of
/// failing. Saturation is observable through the log output.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Quantizer {
    /// Tie-breaking policy.
    pub rounding: Rounding,
}

impl Quantizer {
    /// Initialize the quantizer with the default rounding policy.
    #[inline]
    pub const fn init() -> Self {
        Self {
            rounding: Rounding::HalfAwayFromZero,
        }
    }

    /// Quantize one value.
    #[inline]
    pub fn quantize_one(
        &self,
        value: f32,
    ) -> i16 {
        self.round(value * SCALE)
            .clamp(i16::MIN as f32, i16::MAX as f32) as i16
    }

    /// Quantize all values. The saturated element count is logged.
    pub fn quantize(
        &self,
        values: &[f32],
    ) -> Vec<i16> {
        let mut saturated = 0_usize;
        let codes = values
            .iter()
            .map(|&value| {
                let rounded = self.round(value * SCALE);
                if rounded > i16::MAX as f32 || rounded < i16::MIN as f32 {
                    saturated += 1;
                }
                rounded.clamp(i16::MIN as f32, i16::MAX as f32) as i16
            })
            .collect();

        if saturated != 0 {
            log::debug!(
                target: "nerf::exporter::hardware::quantize",
                "quantize > saturated {saturated} of {} values",
                values.len(),
            );
        }

        codes
    }

    /// Recover the nearest representable value of one code.
    #[inline]
    pub fn dequantize_one(
        &self,
        code: i16,
    ) -> f32 {
        code as f32 / SCALE
    }

    /// Recover the nearest representable values of all codes.
    pub fn dequantize(
        &self,
        codes: &[i16],
    ) -> Vec<f32> {
        codes.iter().map(|&code| self.dequantize_one(code)).collect()
    }

    #[inline]
    fn round(
        &self,
        scaled: f32,
    ) -> f32 {
        match self.rounding {
            Rounding::HalfAwayFromZero => scaled.round(),
            Rounding::HalfToEven => scaled.round_ties_even(),
        }
    }
}

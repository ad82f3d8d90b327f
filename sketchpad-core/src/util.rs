//! Utility types, used throughout the crate.

/// An `f32` which is never NaN nor infinite.
// Not Pod: most NaN/Inf bitpatterns are invalid values of this type.
#[derive(Copy, Clone, PartialEq, PartialOrd, bytemuck::NoUninit, bytemuck::Zeroable, Debug)]
#[repr(transparent)]
pub struct FiniteF32(f32);
impl FiniteF32 {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);
    pub fn new(val: f32) -> Result<Self, FiniteF32Error> {
        if val.is_finite() {
            Ok(Self(val))
        } else {
            Err(FiniteF32Error::NotFinite)
        }
    }
    /// Like [`Self::new`], additionally rejecting values below zero.
    pub fn new_non_negative(val: f32) -> Result<Self, FiniteF32Error> {
        let finite = Self::new(val)?;
        if finite.0 < 0.0 {
            Err(FiniteF32Error::Negative)
        } else {
            Ok(finite)
        }
    }
    /// Saturate into `[0, 1]`. NaN becomes zero.
    #[must_use]
    pub fn saturating_unit(val: f32) -> Self {
        // `max` discards a NaN operand.
        Self(val.max(0.0).min(1.0))
    }
    #[must_use]
    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for FiniteF32 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<f32> for FiniteF32 {
    type Error = FiniteF32Error;
    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
impl From<FiniteF32> for f32 {
    fn from(value: FiniteF32) -> Self {
        value.get()
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FiniteF32Error {
    #[error("not finite")]
    NotFinite,
    #[error("negative")]
    Negative,
}

// NaN is unrepresentable, so equality is total.
impl Eq for FiniteF32 {}
#[allow(clippy::derive_ord_xor_partial_ord)]
impl Ord for FiniteF32 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Only NaN compares as None.
        self.0
            .partial_cmp(&other.0)
            .unwrap_or(std::cmp::Ordering::Equal)
    }
}
impl std::hash::Hash for FiniteF32 {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        // -0.0 and 0.0 are equal but differ in bits, fold them together.
        let bits = if self.0 == 0.0 { 0 } else { self.0.to_bits() };
        state.write_u32(bits);
    }
}

/// Clamp `val` into `[0, max]`, treating NaN as the lower bound.
///
/// `max` is finite and non-negative by construction, so this never panics the way
/// [`f32::clamp`] can.
#[must_use]
pub fn clamp_to_extent(val: f32, max: FiniteF32) -> f32 {
    if val.is_nan() {
        0.0
    } else {
        val.clamp(0.0, max.get())
    }
}

#[cfg(test)]
mod test {
    use super::{clamp_to_extent, FiniteF32, FiniteF32Error};
    #[test]
    fn rejects_non_finite() {
        assert_eq!(FiniteF32::new(f32::NAN), Err(FiniteF32Error::NotFinite));
        assert_eq!(FiniteF32::new(f32::INFINITY), Err(FiniteF32Error::NotFinite));
        assert_eq!(
            FiniteF32::new_non_negative(-1.0),
            Err(FiniteF32Error::Negative)
        );
        assert_eq!(FiniteF32::new_non_negative(0.0), Ok(FiniteF32::ZERO));
    }
    #[test]
    fn saturate() {
        assert_eq!(FiniteF32::saturating_unit(f32::NAN), FiniteF32::ZERO);
        assert_eq!(FiniteF32::saturating_unit(-3.0), FiniteF32::ZERO);
        assert_eq!(FiniteF32::saturating_unit(7.0), FiniteF32::ONE);
        assert_eq!(FiniteF32::saturating_unit(0.25).get(), 0.25);
    }
    #[test]
    fn clamp_extent() {
        let max = FiniteF32::new(200.0).unwrap();
        assert_eq!(clamp_to_extent(9999.0, max), 200.0);
        assert_eq!(clamp_to_extent(-5.0, max), 0.0);
        assert_eq!(clamp_to_extent(f32::NAN, max), 0.0);
        assert_eq!(clamp_to_extent(f32::NEG_INFINITY, max), 0.0);
        assert_eq!(clamp_to_extent(120.0, max), 120.0);
        // Degenerate, zero-sized extent.
        assert_eq!(clamp_to_extent(3.0, FiniteF32::ZERO), 0.0);
    }
}

//! Stress visualization colors.

use serde::{Deserialize, Serialize};

/// RGBA color with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
    /// Alpha channel.
    pub a: f64,
}

impl Color {
    /// Fully transparent black, used as the out-of-range sentinel.
    pub const CLEAR: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque green, the relaxed end of the load gradient.
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0, 1.0);
    /// Opaque yellow, the midpoint of the load gradient.
    pub const YELLOW: Self = Self::new(1.0, 1.0, 0.0, 1.0);
    /// Opaque red, the overloaded end of the load gradient.
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);

    /// Create a color from explicit channels.
    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    #[must_use]
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Linearly interpolate every channel, including alpha.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

/// Ordered stops of the load indicator gradient.
pub const LOAD_GRADIENT: [Color; 3] = [Color::GREEN, Color::YELLOW, Color::RED];

/// Interpolate across an ordered list of color stops.
///
/// `value` selects a position along the gradient: 0 is exactly the first
/// stop and 1 exactly the last. The two stops bracketing
/// `value * (stops - 1)` are blended by the fractional position between
/// them. An empty stop list or a `value` outside `[0, 1]` (NaN included)
/// yields [`Color::CLEAR`].
#[must_use]
pub fn multi_lerp(stops: &[Color], value: f64) -> Color {
    if stops.is_empty() || !(0.0..=1.0).contains(&value) {
        return Color::CLEAR;
    }
    let count = stops.len();
    let position = (value * (count - 1) as f64).clamp(0.0, (count - 1) as f64);
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(count - 1);
    let t = position - lower as f64;
    stops[lower].lerp(stops[upper], t)
}

/// Map a normalized stress coefficient onto the load gradient.
#[must_use]
pub fn load_color(coefficient: f64) -> Color {
    multi_lerp(&LOAD_GRADIENT, coefficient)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn endpoints_are_exact() {
        assert_eq!(load_color(0.0), Color::GREEN);
        assert_eq!(load_color(1.0), Color::RED);
        assert_eq!(load_color(0.5), Color::YELLOW);
    }

    #[test]
    fn out_of_range_yields_sentinel() {
        assert_eq!(load_color(-0.1), Color::CLEAR);
        assert_eq!(load_color(1.1), Color::CLEAR);
        assert_eq!(load_color(f64::NAN), Color::CLEAR);
        assert_eq!(multi_lerp(&[], 0.5), Color::CLEAR);
    }

    #[test]
    fn single_stop_gradients_are_constant() {
        assert_eq!(multi_lerp(&[Color::RED], 0.0), Color::RED);
        assert_eq!(multi_lerp(&[Color::RED], 1.0), Color::RED);
    }

    #[test]
    fn quarter_point_blends_the_first_pair() {
        let c = load_color(0.25);
        assert_relative_eq!(c.r, 0.5);
        assert_relative_eq!(c.g, 1.0);
        assert_relative_eq!(c.b, 0.0);
        assert_relative_eq!(c.a, 1.0);
    }

    proptest! {
        #[test]
        fn red_channel_is_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(load_color(lo).r <= load_color(hi).r + 1e-12);
        }

        #[test]
        fn gradient_is_continuous(v in 0.0f64..1.0) {
            let here = load_color(v);
            let near = load_color((v + 1e-9).min(1.0));
            prop_assert!((here.r - near.r).abs() < 1e-6);
            prop_assert!((here.g - near.g).abs() < 1e-6);
        }
    }
}

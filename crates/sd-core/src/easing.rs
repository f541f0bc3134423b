//! Easing curves and a single-value tween

use serde::{Deserialize, Serialize};

/// Default overshoot for the back curves
pub const BACK_OVERSHOOT: f64 = 1.70158;

/// Easing curve type for position tweens
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Ease {
    /// Linear interpolation (constant rate)
    Linear,
    /// Quadratic, fast start and slow end
    QuadOut,
    /// Cubic, fast start and slow end
    CubicOut,
    /// Overshoots the target then settles back
    #[default]
    BackOut,
    /// BackOut with a custom overshoot amount
    BackOutWith { overshoot: f64 },
}

impl Ease {
    /// Evaluate curve at position t (0.0 - 1.0)
    ///
    /// Returns 0.0 at t = 0 and 1.0 at t = 1; back curves exceed 1.0 in between.
    #[inline]
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Ease::Linear => t,

            Ease::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),

            Ease::CubicOut => 1.0 - (1.0 - t).powi(3),

            Ease::BackOut => back_out(t, BACK_OVERSHOOT),

            Ease::BackOutWith { overshoot } => back_out(t, *overshoot),
        }
    }
}

// y = 1 + (s+1)(t-1)^3 + s(t-1)^2
#[inline]
fn back_out(t: f64, s: f64) -> f64 {
    let u = t - 1.0;
    1.0 + (s + 1.0) * u * u * u + s * u * u
}

/// Tween of one scalar from `from` to `to` over `duration_ms`
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    from: f64,
    to: f64,
    duration_ms: f64,
    elapsed_ms: f64,
    ease: Ease,
}

impl Tween {
    pub fn new(from: f64, to: f64, duration_ms: f64, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms.max(0.0),
            elapsed_ms: 0.0,
            ease,
        }
    }

    /// Advance by `ms` and return the current value
    pub fn advance(&mut self, ms: f64) -> f64 {
        self.elapsed_ms = (self.elapsed_ms + ms.max(0.0)).min(self.duration_ms);
        self.value()
    }

    pub fn value(&self) -> f64 {
        if self.is_finished() {
            return self.to;
        }
        let t = self.elapsed_ms / self.duration_ms;
        self.from + (self.to - self.from) * self.ease.evaluate(t)
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    #[inline]
    pub fn target(&self) -> f64 {
        self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_curve_endpoints() {
        for ease in [Ease::Linear, Ease::QuadOut, Ease::CubicOut, Ease::BackOut] {
            assert_relative_eq!(ease.evaluate(0.0), 0.0, epsilon = 1e-12);
            assert_relative_eq!(ease.evaluate(1.0), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_back_out_overshoots() {
        let peak = (1..100)
            .map(|i| Ease::BackOut.evaluate(i as f64 / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0);
        assert!(peak < 1.2);
    }

    #[test]
    fn test_tween_lands_exactly() {
        let mut tween = Tween::new(-37.5, 0.0, 200.0, Ease::BackOut);
        tween.advance(100.0);
        assert!(!tween.is_finished());
        let end = tween.advance(150.0);
        assert!(tween.is_finished());
        assert_eq!(end, 0.0);
    }

    #[test]
    fn test_zero_duration_tween() {
        let tween = Tween::new(5.0, 10.0, 0.0, Ease::Linear);
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 10.0);
    }
}

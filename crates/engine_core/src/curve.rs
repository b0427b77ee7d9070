//! Sampled keyframe curves.
//!
//! A `Curve` is a pure function `t in [0, 1] -> value` defined by a keyframe
//! list and an interpolation rule. Trajectory shaping consumes these instead
//! of any renderer-coupled animation type.

/// A single keyframe: input position and output value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub t: f32,
    pub value: f32,
}

impl Keyframe {
    pub fn new(t: f32, value: f32) -> Self {
        Self { t, value }
    }
}

/// How values between adjacent keyframes are blended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Interpolation {
    /// Straight lines between keys.
    Linear,
    /// Smoothstep easing between keys (zero slope at each key).
    #[default]
    Smooth,
}

/// Piecewise-defined real-valued function over [0, 1].
///
/// Keys are kept sorted by `t`. Sampling outside the key range clamps to the
/// first/last value, so a curve never extrapolates.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    keys: Vec<Keyframe>,
    interpolation: Interpolation,
}

impl Curve {
    /// Build a curve from keyframes. Keys are sorted by `t`; an empty list
    /// collapses to a constant zero curve.
    pub fn new(mut keys: Vec<Keyframe>, interpolation: Interpolation) -> Self {
        if keys.is_empty() {
            keys.push(Keyframe::new(0.0, 0.0));
        }
        keys.sort_by(|a, b| a.t.partial_cmp(&b.t).unwrap_or(std::cmp::Ordering::Equal));
        Self {
            keys,
            interpolation,
        }
    }

    /// Constant curve returning `value` everywhere.
    pub fn constant(value: f32) -> Self {
        Self::new(vec![Keyframe::new(0.0, value)], Interpolation::Linear)
    }

    /// Straight ramp from `from` at t=0 to `to` at t=1.
    pub fn ramp(from: f32, to: f32) -> Self {
        Self::new(
            vec![Keyframe::new(0.0, from), Keyframe::new(1.0, to)],
            Interpolation::Linear,
        )
    }

    /// Symmetric bell: 0 at both ends, 1 at the midpoint. The standard lob
    /// silhouette for curve-mode trajectory height.
    pub fn bell() -> Self {
        Self::new(
            vec![
                Keyframe::new(0.0, 0.0),
                Keyframe::new(0.5, 1.0),
                Keyframe::new(1.0, 0.0),
            ],
            Interpolation::Smooth,
        )
    }

    /// Sample the curve at `t`. Out-of-range input clamps to the end keys.
    pub fn sample(&self, t: f32) -> f32 {
        let first = self.keys[0];
        let last = self.keys[self.keys.len() - 1];
        if t <= first.t {
            return first.value;
        }
        if t >= last.t {
            return last.value;
        }

        // Keys are sorted and t is strictly inside the range here.
        let mut hi = 1;
        while self.keys[hi].t < t {
            hi += 1;
        }
        let a = self.keys[hi - 1];
        let b = self.keys[hi];
        let span = b.t - a.t;
        if span <= f32::EPSILON {
            return b.value;
        }
        let s = (t - a.t) / span;
        let s = match self.interpolation {
            Interpolation::Linear => s,
            Interpolation::Smooth => s * s * (3.0 - 2.0 * s),
        };
        a.value + (b.value - a.value) * s
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }
}

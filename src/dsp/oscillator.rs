use std::f64::consts::PI;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Phase-Accumulator Oscillator
============================

The voice keeps a single running number, the phase, and turns it into a
sample with a pure function. Everything about pitch lives in how fast the
phase moves; everything about timbre lives in the function.

Vocabulary
----------

  phase       Position inside one waveform cycle, kept in [-1, 1).
              One full trip from -1 up to 1 is one period.

  increment   How far the phase moves per sample. For a note at f Hz and
              a sample rate of sr:  increment = 2 * f / sr
              (the factor 2 is the width of the [-1, 1) range).

  wrap        When the phase reaches 1 it drops back by 2, so it stays
              inside the cycle range without ever resetting to a fixed point.

  partial     One sinusoidal term of a Fourier series. The n-th partial
              runs at n times the fundamental frequency.

  harmonics   How many partials we add up. More partials give sharper edges
              and cost more CPU per sample.


Angle Convention
----------------

The phase maps to an angle with θ = π * phase, so the [-1, 1) cycle covers
one full turn (-π, π]. The sine is simply sin(θ).


Fourier Partial Sums
--------------------

The three classic shapes are built by adding sinusoids. With N partials:

  Square       Σ  sin(nθ) / n            n = 1, 3, 5, ...  (odd only)
  Sawtooth     Σ  (-1)^(k) sin(nθ) / n   n = 1, 2, 3, ...  (all)
  Triangle     Σ  (-1)^(k) sin(nθ) / n²  n = 1, 3, 5, ...  (odd only)

where k counts terms from zero. The fundamental always has weight 1, so a
single partial is exactly sin(θ) for every shape and switching waveforms at
one harmonic does not change the level. As N grows the series settle on:

  Square     plateaus at ±π/4 ≈ ±0.785 (Gibbs overshoot to about 0.93)
  Sawtooth   the ramp (π/2)·phase, up to ±1.57 (overshoot to about 1.85)
  Triangle   peaks of ±π²/8 ≈ ±1.234 at phase ±0.5


Why Not the Closed Form?
------------------------

A naive square (sign of the phase) has infinitely many harmonics, and every
one above Nyquist folds back as aliasing. Truncating the series puts an
upper bound on the highest partial, so the operator trades brightness for
aliasing by choosing the harmonic count.


Cost
----

Calling sin() for every partial would be N transcendental calls per sample.
Instead we use the Chebyshev recurrence

    sin((n + s)θ) = 2cos(sθ) · sin(nθ) - sin((n - s)θ)

which needs one sin/cos pair up front and then two multiplies per partial.
The stride s is 1 for the sawtooth and 2 for the odd-only shapes. The sum is
accumulated in f64 so the recurrence does not drift at high harmonic counts.
*/

/// Largest accepted harmonic count. Keeps the per-sample cost bounded.
pub const MAX_HARMONICS: u32 = 512;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Waveform {
    #[default]
    Sine = 0,
    Square = 1,
    Sawtooth = 2,
    Triangle = 3,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Sawtooth,
        Waveform::Triangle,
    ];

    /// Parse the single-letter console code (`a` = sine ... `d` = triangle).
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'a' => Some(Waveform::Sine),
            'b' => Some(Waveform::Square),
            'c' => Some(Waveform::Sawtooth),
            'd' => Some(Waveform::Triangle),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Waveform::Sine => 'a',
            Waveform::Square => 'b',
            Waveform::Sawtooth => 'c',
            Waveform::Triangle => 'd',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
        }
    }

    pub(crate) fn from_index(index: u8) -> Self {
        match index {
            1 => Waveform::Square,
            2 => Waveform::Sawtooth,
            3 => Waveform::Triangle,
            _ => Waveform::Sine,
        }
    }

    /// Evaluate this waveform at `phase` using `harmonics` partials.
    ///
    /// The sine ignores `harmonics`. A count of zero is treated as one.
    #[inline]
    pub fn sample(self, phase: f32, harmonics: u32) -> f32 {
        match self {
            Waveform::Sine => sine(phase),
            Waveform::Square => square(phase, harmonics),
            Waveform::Sawtooth => sawtooth(phase, harmonics),
            Waveform::Triangle => triangle(phase, harmonics),
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[inline]
pub fn sine(phase: f32) -> f32 {
    (std::f32::consts::PI * phase).sin()
}

/// Odd harmonics, amplitude 1/n.
#[inline]
pub fn square(phase: f32, harmonics: u32) -> f32 {
    partial_sum(phase, harmonics, 2, |n, _| 1.0 / n) as f32
}

/// All harmonics, amplitude 1/n, alternating sign.
#[inline]
pub fn sawtooth(phase: f32, harmonics: u32) -> f32 {
    partial_sum(phase, harmonics, 1, |n, k| alternate(k) / n) as f32
}

/// Odd harmonics, amplitude 1/n², alternating sign.
#[inline]
pub fn triangle(phase: f32, harmonics: u32) -> f32 {
    partial_sum(phase, harmonics, 2, |n, k| alternate(k) / (n * n)) as f32
}

#[inline]
fn alternate(term: u32) -> f64 {
    if term % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}

/// Sum `weight(n, k) * sin(nθ)` for the first `terms` partials n = 1, 1+s, 1+2s, ...
#[inline]
fn partial_sum(phase: f32, terms: u32, stride: u32, weight: impl Fn(f64, u32) -> f64) -> f64 {
    let theta = PI * phase as f64;
    let step = stride as f64 * theta;
    let factor = 2.0 * step.cos();

    let mut previous = (theta - step).sin();
    let mut current = theta.sin();
    let mut n = 1.0;
    let mut sum = 0.0;

    for k in 0..terms.clamp(1, MAX_HARMONICS) {
        sum += weight(n, k) * current;
        let next = factor * current - previous;
        previous = current;
        current = next;
        n += stride as f64;
    }

    sum
}

/// Running phase in [-1, 1), advanced once per sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Phase(f32);

impl Phase {
    /// Create a phase, folding `value` into [-1, 1) if it lies outside.
    pub fn new(value: f32) -> Self {
        if (-1.0..1.0).contains(&value) {
            Self(value)
        } else {
            Self((value + 1.0).rem_euclid(2.0) - 1.0)
        }
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Move forward by `increment` and return the new phase.
    ///
    /// Increments in [0, 2) wrap by a single subtraction of 2; anything
    /// larger is folded back with a modulo.
    #[inline]
    pub fn advance(&mut self, increment: f32) -> f32 {
        let mut next = self.0 + increment;
        if next >= 1.0 {
            next -= 2.0;
            if next >= 1.0 {
                next = (next + 1.0).rem_euclid(2.0) - 1.0;
            }
        }
        self.0 = next;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHASES: [f32; 9] = [-1.0, -0.75, -0.5, -0.2, 0.0, 0.1, 0.33, 0.5, 0.9];

    #[test]
    fn sine_follows_half_cycle_angle() {
        assert!(sine(0.0).abs() < 1e-7);
        assert!((sine(0.5) - 1.0).abs() < 1e-6);
        assert!((sine(-0.5) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn single_harmonic_is_a_pure_sine() {
        for waveform in Waveform::ALL {
            for &phase in &PHASES {
                let value = waveform.sample(phase, 1);
                let expected = sine(phase);
                assert!(
                    (value - expected).abs() < 1e-6,
                    "{waveform} at {phase}: expected {expected}, got {value}"
                );
            }
        }
    }

    #[test]
    fn zero_harmonics_behaves_like_one() {
        for waveform in Waveform::ALL {
            assert_eq!(waveform.sample(0.3, 0), waveform.sample(0.3, 1));
        }
    }

    #[test]
    fn square_converges_to_quarter_pi_plateaus() {
        let plateau = std::f32::consts::FRAC_PI_4;
        assert!((square(0.5, 200) - plateau).abs() < 0.01);
        assert!((square(-0.5, 200) + plateau).abs() < 0.01);
    }

    #[test]
    fn sawtooth_converges_to_scaled_phase() {
        for &phase in &[-0.5f32, -0.25, 0.0, 0.25, 0.5] {
            let value = sawtooth(phase, 300);
            let expected = std::f32::consts::FRAC_PI_2 * phase;
            assert!(
                (value - expected).abs() < 0.01,
                "sawtooth({phase}) = {value}, expected {expected}"
            );
        }
    }

    #[test]
    fn triangle_peaks_at_quarter_points() {
        let peak = (PI * PI / 8.0) as f32;
        assert!((triangle(0.5, 50) - peak).abs() < 0.01);
        assert!((triangle(-0.5, 50) + peak).abs() < 0.01);
        assert!(triangle(0.0, 50).abs() < 1e-6);
    }

    #[test]
    fn more_harmonics_change_the_shape() {
        for waveform in [Waveform::Square, Waveform::Sawtooth, Waveform::Triangle] {
            assert!(
                (waveform.sample(0.5, 1) - waveform.sample(0.5, 16)).abs() > 0.01,
                "{waveform}"
            );
        }
    }

    #[test]
    fn recurrence_matches_direct_evaluation() {
        // Sawtooth with 7 partials, computed term by term with sin().
        let phase = 0.37f32;
        let theta = PI * phase as f64;
        let direct: f64 = (1..=7)
            .map(|n| {
                let sign = if n % 2 == 1 { 1.0 } else { -1.0 };
                sign * (n as f64 * theta).sin() / n as f64
            })
            .sum();
        let expected = direct as f32;
        assert!((sawtooth(phase, 7) - expected).abs() < 1e-6);
    }

    #[test]
    fn evaluation_is_deterministic() {
        for waveform in Waveform::ALL {
            let a = waveform.sample(0.123, 64);
            let b = waveform.sample(0.123, 64);
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn letters_round_trip() {
        for waveform in Waveform::ALL {
            assert_eq!(Waveform::from_letter(waveform.letter()), Some(waveform));
            assert_eq!(Waveform::from_index(waveform as u8), waveform);
        }
        assert_eq!(Waveform::from_letter('e'), None);
        assert_eq!(Waveform::from_letter('A'), None);
    }

    #[test]
    fn phase_wraps_by_two() {
        let mut phase = Phase::new(0.9);
        let next = phase.advance(0.2);
        assert!((next - (0.9 + 0.2 - 2.0)).abs() < 1e-6);
        assert!((-1.0..1.0).contains(&next));

        let mut phase = Phase::new(0.1);
        assert!((phase.advance(0.2) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn phase_folds_oversized_increments() {
        let mut phase = Phase::default();
        let next = phase.advance(5.5);
        assert!((-1.0..1.0).contains(&next));
        assert!((next + 0.5).abs() < 1e-6);
    }

    #[test]
    fn phase_new_folds_into_range() {
        assert_eq!(Phase::new(1.0).value(), -1.0);
        assert!((Phase::new(2.5).value() - 0.5).abs() < 1e-6);
        assert!((Phase::new(-1.5).value() - 0.5).abs() < 1e-6);
    }
}

use std::sync::Arc;

use mono_osc::{
    note_frequency, MonoSynth, Phase, RawMidi, SynthParams, VoiceState, Waveform,
};

const BLOCK: usize = 128;

fn synth_at(sample_rate: u32) -> (MonoSynth, Arc<SynthParams>) {
    let params = Arc::new(SynthParams::new());
    (MonoSynth::new(sample_rate, Arc::clone(&params)), params)
}

#[test]
fn releasing_top_note_falls_back_to_next_highest() {
    let (mut synth, _) = synth_at(48_000);
    let mut out = vec![0.0f32; BLOCK];

    synth.render(
        &mut out,
        &[
            RawMidi::note_on(0, 0, 60, 100),
            RawMidi::note_on(10, 0, 64, 100),
            RawMidi::note_off(20, 0, 64),
        ],
    );

    assert_eq!(synth.state(), VoiceState::Sounding { note: 60 });
    assert!(out[20..].iter().any(|&s| s != 0.0), "voice must keep sounding");
}

#[test]
fn releasing_lower_note_keeps_top_note() {
    let (mut synth, _) = synth_at(48_000);
    let mut out = vec![0.0f32; BLOCK];

    synth.render(
        &mut out,
        &[
            RawMidi::note_on(0, 0, 60, 100),
            RawMidi::note_on(0, 0, 64, 100),
        ],
    );
    assert_eq!(synth.active_note(), Some(64));

    synth.render(&mut out, &[RawMidi::note_off(5, 0, 60)]);
    assert_eq!(synth.active_note(), Some(64));
    assert_eq!(synth.status().held, 1);
}

#[test]
fn silent_block_is_flat_closed_gate() {
    let (mut synth, params) = synth_at(48_000);
    params.set_amplitude(0.8).unwrap();
    params.set_waveform(Waveform::Square);

    let mut out = vec![f32::NAN; BLOCK];
    synth.render(&mut out, &[]);

    assert!(out.iter().all(|&s| s.to_bits() == 0.0f32.to_bits()));
    assert_eq!(synth.state(), VoiceState::Silent);
}

#[test]
fn silent_block_with_negative_amplitude_is_negative_zero() {
    let (mut synth, params) = synth_at(48_000);
    params.set_amplitude(-0.8).unwrap();

    let mut out = vec![f32::NAN; BLOCK];
    synth.render(&mut out, &[]);

    assert!(out.iter().all(|&s| s == 0.0 && s.is_sign_negative()));
}

#[test]
fn silence_after_release_does_not_oscillate() {
    let (mut synth, _) = synth_at(44_100);
    let mut out = vec![0.0f32; BLOCK];

    synth.render(
        &mut out,
        &[RawMidi::note_on(0, 0, 69, 100), RawMidi::note_off(64, 0, 69)],
    );

    let tail = &out[64..];
    assert!(tail.iter().all(|&s| s == tail[0]));
    assert!(out[..64].iter().any(|&s| s != 0.0));
}

#[test]
fn sample_rate_change_uses_new_increments() {
    let (mut synth, params) = synth_at(44_100);
    params.set_amplitude(1.0).unwrap();
    let mut out = vec![0.0f32; BLOCK];

    synth.render(&mut out, &[RawMidi::note_on(0, 0, 69, 100)]);
    let old_increment = synth.frequency_table().increment(69);

    synth.set_sample_rate(48_000);
    let new_increment = synth.frequency_table().increment(69);
    let expected_increment = (2.0 * note_frequency(69) / 48_000.0) as f32;
    assert_eq!(synth.sample_rate(), 48_000);
    assert!((new_increment - expected_increment).abs() < 1e-9);
    assert!(new_increment < old_increment);

    let mut phase = Phase::new(synth.phase());
    synth.render(&mut out, &[]);
    for &sample in &out {
        let expected = Waveform::Sine.sample(phase.advance(expected_increment), 1);
        assert!(
            (sample - expected).abs() < 1e-4,
            "expected {expected}, got {sample}"
        );
    }
}

#[test]
fn parameter_changes_apply_on_the_next_block() {
    let (mut synth, params) = synth_at(48_000);
    let mut out = vec![0.0f32; BLOCK];
    synth.render(&mut out, &[RawMidi::note_on(0, 0, 57, 100)]);

    params.set_amplitude(0.0).unwrap();
    synth.render(&mut out, &[]);
    assert!(out.iter().all(|&s| s == 0.0));
    assert_eq!(synth.active_note(), Some(57));
}

/// Re-derive a sounding block from the oscillator primitives.
fn expected_block(
    phase: f32,
    increment: f32,
    amplitude: f32,
    waveform: Waveform,
    harmonics: u32,
    len: usize,
) -> Vec<f32> {
    let mut phase = Phase::new(phase);
    (0..len)
        .map(|_| amplitude * waveform.sample(phase.advance(increment), harmonics))
        .collect()
}

fn assert_block_eq(actual: &[f32], expected: &[f32], label: &str) {
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!((a - e).abs() < 1e-6, "{label} frame {i}: expected {e}, got {a}");
    }
}

#[test]
fn selected_waveform_and_harmonics_reach_the_output() {
    for waveform in [Waveform::Square, Waveform::Sawtooth, Waveform::Triangle] {
        for harmonics in [3, 24] {
            let (mut synth, params) = synth_at(48_000);
            params.set_amplitude(0.6).unwrap();
            params.set_waveform(waveform);
            params.set_harmonics(harmonics).unwrap();

            let mut out = vec![0.0f32; BLOCK];
            synth.render(&mut out, &[RawMidi::note_on(0, 0, 57, 100)]);

            let increment = synth.frequency_table().increment(57);
            let expected = expected_block(0.0, increment, 0.6, waveform, harmonics, BLOCK);
            assert_block_eq(&out, &expected, &format!("{waveform} x{harmonics}"));
        }
    }
}

#[test]
fn harmonic_change_between_blocks_changes_output() {
    let (mut synth, params) = synth_at(48_000);
    params.set_amplitude(1.0).unwrap();
    params.set_waveform(Waveform::Square);
    params.set_harmonics(1).unwrap();

    let mut out = vec![0.0f32; BLOCK];
    synth.render(&mut out, &[RawMidi::note_on(0, 0, 45, 100)]);
    let increment = synth.frequency_table().increment(45);
    let start = synth.phase();

    params.set_harmonics(16).unwrap();
    synth.render(&mut out, &[]);

    let sharp = expected_block(start, increment, 1.0, Waveform::Square, 16, BLOCK);
    let plain = expected_block(start, increment, 1.0, Waveform::Square, 1, BLOCK);
    assert_block_eq(&out, &sharp, "16 harmonics");
    assert!(out.iter().zip(&plain).any(|(a, p)| (a - p).abs() > 0.01));
}

#[test]
fn every_waveform_stays_within_its_limit_shape() {
    for (waveform, bound) in [
        (Waveform::Sine, 1.0),
        (Waveform::Square, 1.0),
        (Waveform::Sawtooth, 1.86),
        (Waveform::Triangle, 1.24),
    ] {
        let (mut synth, params) = synth_at(48_000);
        params.set_amplitude(1.0).unwrap();
        params.set_harmonics(64).unwrap();
        params.set_waveform(waveform);

        let mut out = vec![0.0f32; 2048];
        synth.render(&mut out, &[RawMidi::note_on(0, 0, 45, 100)]);
        let peak = out.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        assert!(peak > 0.5, "{waveform} peak {peak} too quiet");
        assert!(peak <= bound, "{waveform} peak {peak} above {bound}");
    }
}

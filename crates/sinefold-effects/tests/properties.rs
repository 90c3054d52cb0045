//! Property-based tests for sinefold-effects.
//!
//! Dry passthrough at zero mix and finite output across the control ranges.

use proptest::prelude::*;
use sinefold_core::{Effect, FilterType};
use sinefold_effects::{BusFilter, Cabinet, CombFilter, CombParams, Echo};

const SAMPLE_RATE: f32 = 48000.0;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// With mix 0 the cabinet returns its input exactly, whatever the
    /// other settings are.
    #[test]
    fn cabinet_zero_mix_is_identity(
        drive in 0.0f32..50.0,
        tilt in -25.0f32..25.0,
        fold in 0.0f32..1.0,
        asym in 0.0f32..1.0,
        input in prop::collection::vec(-1.0f32..=1.0, 256),
    ) {
        let mut cab = Cabinet::new(SAMPLE_RATE);
        cab.set_mix(0.0);
        cab.set_drive_db(drive);
        cab.set_tilt_db(tilt);
        cab.set_fold(fold);
        cab.set_asym(asym);
        for _ in 0..400 {
            cab.process_stereo(0.1, -0.1);
        }
        for &x in &input {
            let (l, r) = cab.process_stereo(x, x * 0.5);
            prop_assert_eq!(l, x);
            prop_assert_eq!(r, x * 0.5);
        }
    }

    /// With mix 0 the echo returns its input exactly.
    #[test]
    fn echo_zero_mix_is_identity(
        time in 0.0f32..2.0,
        feedback in 0.0f32..1.0,
        cross in 0.0f32..1.0,
        spread in -0.33f32..0.33,
        input in prop::collection::vec(-1.0f32..=1.0, 256),
    ) {
        let mut echo = Echo::new(SAMPLE_RATE);
        echo.set_time(time);
        echo.set_feedback(feedback);
        echo.set_cross(cross);
        echo.set_spread(spread);
        echo.set_mix(0.0);
        for &x in &input {
            let (l, r) = echo.process_stereo(x, -x);
            prop_assert_eq!(l, x);
            prop_assert_eq!(r, -x);
        }
    }

    #[test]
    fn bus_filter_is_stable(
        cutoff in 0.0f32..30000.0,
        resonance in -1.0f32..1.0,
        shelf in -24.0f32..24.0,
        cycles in 0usize..4,
        input in prop::collection::vec(-1.0f32..=1.0, 512),
    ) {
        let mut filter = BusFilter::new(SAMPLE_RATE);
        for _ in 0..cycles {
            filter.cycle_type();
        }
        filter.set_cutoff(cutoff);
        filter.set_resonance(resonance);
        filter.set_shelf_amount(shelf);
        for &x in &input {
            let (l, r) = filter.process_stereo(x, -x);
            prop_assert!(l.is_finite() && r.is_finite());
        }
        prop_assert_eq!(filter.filter_type(), FilterType::ALL[cycles]);
    }

    /// The comb loop never runs away: loop gain stays below one for any
    /// pitch and decay.
    #[test]
    fn comb_is_stable(
        pitch in 0.0f32..127.0,
        decay in 0.0f32..10.0,
        key_track in 0.0f32..1.0,
        tune in -24.0f32..24.0,
        resonance in -0.999f32..0.999,
        hicut in 20.0f32..20000.0,
    ) {
        let mut params = CombParams::new(SAMPLE_RATE);
        params.decay.set_immediate(decay);
        params.key_track.set_immediate(key_track);
        params.allpass_tune.set_immediate(tune);
        params.allpass_resonance.set_immediate(resonance);
        params.hicut.set_immediate(hicut);
        let mut comb = CombFilter::new(SAMPLE_RATE);
        comb.retune(pitch, &params);
        prop_assert!(comb.feedback_gain() < 1.0);
        let mut peak = 0.0f32;
        for n in 0..9600 {
            let x = if n < 64 { 1.0 } else { 0.0 };
            let y = comb.process(x, 0.0, 0.0);
            prop_assert!(y.is_finite());
            peak = peak.max(y.abs());
        }
        prop_assert!(peak < 1000.0);
    }
}

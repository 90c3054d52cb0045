//! Integration tests for sinefold-synth.
//!
//! Tests cover voice allocation invariants, stealing order, click-free note
//! boundaries, and control messages routed through a controller map.

use proptest::prelude::*;
use sinefold_synth::{
    ControlMap, ControlMessage, EchoParam, MixerParam, ModuleId, ModuleParam, ParamId,
    SampleSpecs, SlotState, VoiceAllocator, VoiceManager,
};

fn engine<const N: usize>() -> VoiceManager<N> {
    VoiceManager::new(SampleSpecs::default(), ControlMap::new())
}

fn assert_lists_partition<const N: usize>(alloc: &VoiceAllocator<N>) {
    let mut seen = [0u8; N];
    for slot in alloc.assigned() {
        assert!(matches!(alloc.state(slot), SlotState::Assigned(_)));
        seen[slot] += 1;
    }
    for slot in alloc.released() {
        assert_eq!(alloc.state(slot), SlotState::Free);
        seen[slot] += 1;
    }
    assert!(seen.iter().all(|&n| n == 1), "slot lists overlap: {seen:?}");
    assert_eq!(alloc.assigned().count(), alloc.assigned_count());
    assert_eq!(alloc.released().count(), alloc.released_count());
}

// ---------------------------------------------------------------------------
// 1. Allocation invariants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Event {
    On(u8),
    Off(u8),
    AllOff,
}

fn event() -> impl Strategy<Value = Event> {
    prop_oneof![
        6 => (48u8..60).prop_map(Event::On),
        5 => (48u8..60).prop_map(Event::Off),
        1 => Just(Event::AllOff),
    ]
}

proptest! {
    #[test]
    fn voice_pool_is_always_partitioned(events in prop::collection::vec(event(), 1..200)) {
        let mut alloc: VoiceAllocator<6> = VoiceAllocator::new();
        for e in events {
            match e {
                Event::On(p) => { alloc.note_on(p); }
                Event::Off(p) => { alloc.note_off(p); }
                Event::AllOff => { alloc.release_all(); }
            }
            prop_assert!(alloc.assigned_count() <= 6);
            prop_assert_eq!(alloc.assigned_count() + alloc.released_count(), 6);
            assert_lists_partition(&alloc);
        }
    }

    #[test]
    fn engine_counts_match_allocator(events in prop::collection::vec(event(), 1..60)) {
        let mut synth: VoiceManager<4> = engine();
        for e in events {
            match e {
                Event::On(p) => synth.note_on(p, 100),
                Event::Off(p) => synth.note_off(p),
                Event::AllOff => synth.all_notes_off(),
            }
            synth.tick();
            prop_assert_eq!(synth.assigned_count() + synth.released_count(), 4);
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Stealing order
// ---------------------------------------------------------------------------

#[test]
fn extra_note_reuses_oldest_slot() {
    let mut synth: VoiceManager<4> = engine();
    for pitch in [60, 64, 67, 72] {
        synth.note_on(pitch, 100);
    }
    let oldest = synth.allocator().assigned().next();
    assert_eq!(oldest, Some(0));

    synth.note_on(76, 100);
    assert_eq!(synth.assigned_count(), 4);
    assert_eq!(synth.allocator().state(0), SlotState::Assigned(76));
    assert_eq!(synth.voice_table().pitch(0), 76);
    // the stolen note no longer answers note-off
    synth.note_off(60);
    assert_eq!(synth.assigned_count(), 4);
}

#[test]
fn released_voice_is_reused_last() {
    let mut synth: VoiceManager<3> = engine();
    synth.note_on(60, 100);
    synth.note_off(60);
    synth.note_on(62, 100);
    // slot 0 went to the back of the released list
    assert_eq!(synth.allocator().state(1), SlotState::Assigned(62));
    assert_eq!(synth.allocator().state(0), SlotState::Free);
}

// ---------------------------------------------------------------------------
// 3. Note scenario
// ---------------------------------------------------------------------------

#[test]
fn note_off_boundary_has_no_click() {
    let mut synth: VoiceManager = engine();
    let n = synth.voice_count();

    synth.note_on(69, 100);
    assert_eq!(synth.released_count(), n - 1);

    let mut prev = 0.0f32;
    let mut max_step_held = 0.0f32;
    for i in 0..1000 {
        let (l, _) = synth.tick();
        if i >= 500 {
            max_step_held = max_step_held.max((l - prev).abs());
        }
        prev = l;
    }
    assert!(max_step_held > 1e-3, "note is silent");

    synth.note_off(69);
    assert_eq!(synth.released_count(), n);

    let mut max_step_release = 0.0f32;
    let mut tail = 0.0f32;
    for i in 0..1000 {
        let (l, _) = synth.tick();
        if i < 100 {
            max_step_release = max_step_release.max((l - prev).abs());
        }
        if i >= 900 {
            tail = tail.max(l.abs());
        }
        prev = l;
    }
    assert!(
        max_step_release <= 2.0 * max_step_held + 1e-6,
        "step {max_step_release} vs held {max_step_held}"
    );
    assert!(tail < max_step_held, "note still sounding: {tail}");
}

#[test]
fn output_is_finite_under_full_polyphony() {
    let mut synth: VoiceManager = engine();
    for m in ModuleId::ALL {
        synth.set_param(ParamId::Module(m, ModuleParam::PmSelf), 0.8);
        synth.set_param(ParamId::Module(m, ModuleParam::Drive), 30.0);
    }
    synth.set_param(ParamId::Mixer(MixerParam::LevelComb), 1.0);
    synth.set_param(ParamId::Echo(EchoParam::Mix), 0.5);
    synth.set_param(ParamId::Echo(EchoParam::Feedback), 0.95);
    for pitch in 40..60 {
        synth.note_on(pitch, 127);
    }
    let mut buffer = vec![0.0f32; 2 * 4800];
    synth.process_interleaved(&mut buffer, 2);
    assert!(buffer.iter().all(|s| s.is_finite() && s.abs() < 10.0));
}

// ---------------------------------------------------------------------------
// 4. Control map routing
// ---------------------------------------------------------------------------

#[test]
fn mapped_cc_reaches_parameter() {
    let mut map = ControlMap::new();
    map.bind(7, ParamId::Mixer(MixerParam::Level));
    let mut synth: VoiceManager<2> = VoiceManager::new(SampleSpecs::default(), map);
    synth.handle_message(ControlMessage::note_on(0, 60, 127));
    synth.handle_message(ControlMessage::control_change(0, 7, 0));

    let mut peak = 0.0f32;
    for i in 0..12000 {
        let (l, r) = synth.tick();
        if i > 10000 {
            peak = peak.max(l.abs()).max(r.abs());
        }
    }
    assert!(peak < 1e-6, "level CC ignored: {peak}");
}

#[test]
fn raw_bytes_drive_the_engine() {
    let mut synth: VoiceManager<4> = engine();
    for bytes in [[0x90, 60, 100], [0x90, 64, 100], [0x80, 60, 0]] {
        if let Some(msg) = ControlMessage::from_bytes(&bytes) {
            synth.handle_message(msg);
        }
    }
    assert_eq!(synth.assigned_count(), 1);
    assert_eq!(synth.allocator().state(1), SlotState::Assigned(64));
}

#[test]
fn every_param_accepts_extreme_values() {
    let mut synth: VoiceManager<2> = engine();
    synth.note_on(60, 127);
    for id in ParamId::all() {
        for raw in [0u8, 127] {
            synth.apply_midi_value(id, raw);
            for _ in 0..64 {
                let (l, r) = synth.tick();
                assert!(l.is_finite() && r.is_finite(), "{id} = {raw}");
            }
        }
    }
}

#[test]
fn natural_units_out_of_range_clamp_and_recover() {
    for id in ParamId::all() {
        for extreme in [1e6f32, -1e6] {
            let mut synth: VoiceManager<2> = engine();
            synth.note_on(60, 100);
            synth.set_param(id, extreme);
            for _ in 0..1000 {
                let (l, r) = synth.tick();
                assert!(l.is_finite() && r.is_finite(), "{id} = {extreme}");
            }

            synth.set_param(id, 0.0);
            for _ in 0..2000 {
                let (l, r) = synth.tick();
                assert!(l.is_finite() && r.is_finite(), "{id} back to 0 after {extreme}");
            }
        }
    }
}

#[test]
fn cabinet_recovers_after_extreme_tilt() {
    let tilt = ParamId::from_name("cabinet.tilt").unwrap();
    let mut abused: VoiceManager<2> = engine();
    abused.note_on(60, 100);

    abused.set_param(tilt, 1000.0);
    for _ in 0..2000 {
        abused.tick();
    }
    abused.set_param(tilt, 0.0);

    let mut peak = 0.0f32;
    for _ in 0..48000 {
        let (l, r) = abused.tick();
        assert!(l.is_finite() && r.is_finite());
        peak = peak.max(l.abs()).max(r.abs());
    }
    assert!(peak > 1e-3, "engine fell silent: {peak}");
}

//! Criterion benchmarks for sinefold-synth components
//!
//! Run with: cargo bench -p sinefold-synth

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sinefold_synth::{
    CombParam, ControlMap, MixerParam, ModuleId, ModuleParam, Oscillator, ParamId, SampleSpecs,
    VoiceManager,
};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

// ============================================================================
// Oscillator benchmarks
// ============================================================================

fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("Oscillator");

    for &block_size in BLOCK_SIZES {
        let mut osc = Oscillator::new(SAMPLE_RATE, 1);
        osc.set_frequency(440.0);

        group.bench_with_input(
            BenchmarkId::new("PM", block_size),
            &block_size,
            |b, &size| {
                b.iter(|| {
                    let mut last = 0.0f32;
                    let mut sum = 0.0f32;
                    for _ in 0..size {
                        last = osc.tick(last * 0.3, 1.0, 0.01);
                        sum += last;
                    }
                    black_box(sum)
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// Engine benchmarks
// ============================================================================

fn full_patch<const N: usize>() -> VoiceManager<N> {
    let mut synth: VoiceManager<N> = VoiceManager::new(
        SampleSpecs::stereo(SAMPLE_RATE as u32, 256),
        ControlMap::new(),
    );
    for m in ModuleId::ALL {
        synth.set_param(ParamId::Module(m, ModuleParam::PmSelf), 0.3);
        synth.set_param(ParamId::Module(m, ModuleParam::PmCross), 0.2);
        synth.set_param(ParamId::Module(m, ModuleParam::Mix), 0.5);
    }
    synth.set_param(ParamId::Mixer(MixerParam::LevelB), 0.7);
    synth.set_param(ParamId::Mixer(MixerParam::LevelComb), 0.5);
    synth.set_param(ParamId::Comb(CombParam::Decay), 2.0);
    synth
}

fn bench_voice_manager(c: &mut Criterion) {
    let mut group = c.benchmark_group("VoiceManager");

    let chords: [(&str, &[u8]); 3] = [
        ("1_voice", &[60]),
        ("4_voices", &[60, 64, 67, 72]),
        ("12_voices", &[48, 52, 55, 60, 64, 67, 72, 76, 79, 84, 88, 91]),
    ];

    for (name, notes) in chords {
        for &block_size in BLOCK_SIZES {
            let mut synth: VoiceManager = full_patch();
            for &note in notes {
                synth.note_on(note, 100);
            }

            group.bench_with_input(
                BenchmarkId::new(name, block_size),
                &block_size,
                |b, &size| {
                    let mut buffer = vec![0.0f32; size * 2];
                    b.iter(|| {
                        synth.process_interleaved(&mut buffer, 2);
                        black_box(buffer[0])
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_voice_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("VoiceCount");
    let block_size = 256;

    macro_rules! bench_n {
        ($n:literal) => {{
            let mut synth: VoiceManager<$n> = full_patch();
            for i in 0..$n {
                synth.note_on(48 + i as u8, 100);
            }
            group.bench_function(BenchmarkId::from_parameter($n), |b| {
                let mut buffer = vec![0.0f32; block_size * 2];
                b.iter(|| {
                    synth.process_interleaved(&mut buffer, 2);
                    black_box(buffer[0])
                })
            });
        }};
    }

    bench_n!(4);
    bench_n!(8);
    bench_n!(16);
    bench_n!(32);

    group.finish();
}

criterion_group!(
    benches,
    bench_oscillator,
    bench_voice_manager,
    bench_voice_count
);
criterion_main!(benches);

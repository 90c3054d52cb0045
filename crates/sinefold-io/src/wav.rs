//! WAV file reading and writing.

use crate::Result;
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample: 16 or 24 for PCM, 32 for float.
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Planar stereo audio.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoSamples {
    /// Left channel.
    pub left: Vec<f32>,
    /// Right channel.
    pub right: Vec<f32>,
}

impl StereoSamples {
    /// Create from separate channels.
    pub fn new(left: Vec<f32>, right: Vec<f32>) -> Self {
        Self { left, right }
    }

    /// Silent buffers of `frames` frames.
    pub fn silence(frames: usize) -> Self {
        Self::new(vec![0.0; frames], vec![0.0; frames])
    }

    /// Split interleaved `[L, R, L, R, ...]` samples.
    pub fn from_interleaved(interleaved: &[f32]) -> Self {
        let (left, right) = interleaved
            .chunks_exact(2)
            .map(|frame| (frame[0], frame[1]))
            .unzip();
        Self { left, right }
    }

    /// Interleave to `[L, R, L, R, ...]`.
    pub fn interleave(&self) -> Vec<f32> {
        self.left
            .iter()
            .zip(&self.right)
            .flat_map(|(&l, &r)| [l, r])
            .collect()
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.left.len().min(self.right.len())
    }

    /// True when there are no frames.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Largest absolute sample in either channel.
    pub fn peak(&self) -> f32 {
        self.left
            .iter()
            .chain(&self.right)
            .fold(0.0f32, |peak, s| peak.max(s.abs()))
    }
}

/// Write stereo samples to a WAV file.
///
/// `spec.channels` is ignored; the file is always stereo. 32-bit files are
/// written as float, anything else as clipped integer PCM.
///
/// # Example
/// ```ignore
/// let samples = StereoSamples::silence(48000);
/// write_wav_stereo("output.wav", &samples, WavSpec::default())?;
/// ```
pub fn write_wav_stereo<P: AsRef<Path>>(
    path: P,
    samples: &StereoSamples,
    spec: WavSpec,
) -> Result<()> {
    let stereo_spec = WavSpec {
        channels: 2,
        ..spec
    };

    let mut writer = WavWriter::create(path, hound::WavSpec::from(stereo_spec))?;

    if spec.bits_per_sample == 32 {
        for (l, r) in samples.left.iter().zip(&samples.right) {
            writer.write_sample(*l)?;
            writer.write_sample(*r)?;
        }
    } else {
        let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
        for (l, r) in samples.left.iter().zip(&samples.right) {
            writer.write_sample((*l * max_val).clamp(-max_val, max_val - 1.0) as i32)?;
            writer.write_sample((*r * max_val).clamp(-max_val, max_val - 1.0) as i32)?;
        }
    }

    writer.finalize()?;
    Ok(())
}

/// Read a WAV file as stereo.
///
/// Mono files are duplicated to both channels; channels beyond the second
/// are dropped.
pub fn read_wav_stereo<P: AsRef<Path>>(path: P) -> Result<(StereoSamples, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = usize::from(spec.channels.max(1));

    let all_samples: Vec<f32> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let (left, right) = all_samples
        .chunks_exact(channels)
        .map(|frame| (frame[0], frame.get(1).copied().unwrap_or(frame[0])))
        .unzip();

    Ok((StereoSamples::new(left, right), spec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn ramp(frames: usize) -> StereoSamples {
        let left = (0..frames).map(|i| i as f32 / frames as f32 - 0.5).collect();
        let right = (0..frames).map(|i| 0.5 - i as f32 / frames as f32).collect();
        StereoSamples::new(left, right)
    }

    #[test]
    fn test_float_file_is_exact() {
        let samples = ramp(1000);
        let file = NamedTempFile::new().unwrap();
        write_wav_stereo(file.path(), &samples, WavSpec::default()).unwrap();

        let (loaded, spec) = read_wav_stereo(file.path()).unwrap();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.bits_per_sample, 32);
        assert_eq!(loaded, samples);
    }

    #[test]
    fn test_pcm16_is_within_one_step() {
        let samples = ramp(500);
        let file = NamedTempFile::new().unwrap();
        let spec = WavSpec {
            bits_per_sample: 16,
            ..WavSpec::default()
        };
        write_wav_stereo(file.path(), &samples, spec).unwrap();

        let (loaded, _) = read_wav_stereo(file.path()).unwrap();
        assert_eq!(loaded.len(), 500);
        for (a, b) in samples.left.iter().zip(&loaded.left) {
            assert!((a - b).abs() <= 1.0 / 32768.0 + 1e-6);
        }
    }

    #[test]
    fn test_pcm_clips_instead_of_wrapping() {
        let samples = StereoSamples::new(vec![2.0], vec![-2.0]);
        let file = NamedTempFile::new().unwrap();
        let spec = WavSpec {
            bits_per_sample: 16,
            ..WavSpec::default()
        };
        write_wav_stereo(file.path(), &samples, spec).unwrap();
        let (loaded, _) = read_wav_stereo(file.path()).unwrap();
        assert!(loaded.left[0] > 0.99);
        assert_eq!(loaded.right[0], -1.0);
    }

    #[test]
    fn test_interleave_round_trip() {
        let samples = StereoSamples::new(vec![1.0, 2.0], vec![-1.0, -2.0]);
        assert_eq!(samples.interleave(), [1.0, -1.0, 2.0, -2.0]);
        assert_eq!(StereoSamples::from_interleaved(&samples.interleave()), samples);
        assert_eq!(samples.peak(), 2.0);
    }
}

use alloc::{rc::Rc, string::String, vec::Vec};
use core::time::Duration;
use hashbrown::HashMap;

use crate::*;

/// Sample rate of speech returned by the text-to-speech collaborator.
pub const SPEECH_SAMPLE_RATE: u32 = 24_000;

/// Decoded mono 16-bit PCM.
///
/// Samples sit behind an `Rc` so a cached clip can be handed to playback without copying.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PcmClip {
    samples: Rc<[i16]>,
    sample_rate: u32,
}

impl PcmClip {
    pub fn new(samples: impl Into<Rc<[i16]>>, sample_rate: u32) -> Self {
        Self {
            samples: samples.into(),
            sample_rate,
        }
    }

    /// Decodes little-endian signed 16-bit samples at [`SPEECH_SAMPLE_RATE`].
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 2 != 0 {
            return Err(Error::OddPcmLength(bytes.len()));
        }
        let samples: Vec<i16> = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Ok(Self::new(samples, SPEECH_SAMPLE_RATE))
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples scaled to `[-1.0, 1.0)` as Web Audio buffers expect.
    pub fn to_f32(&self) -> Vec<f32> {
        self.samples
            .iter()
            .map(|&sample| f32::from(sample) / 32768.0)
            .collect()
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        let millis = self.samples.len() as u64 * 1000 / u64::from(self.sample_rate);
        Duration::from_millis(millis)
    }
}

/// Speech already synthesized for a piece of text, so replaying it costs no request.
#[derive(Clone, Debug, Default)]
pub struct AudioCache {
    clips: HashMap<String, PcmClip>,
}

impl AudioCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, key: &str) -> Option<PcmClip> {
        let clip = self.clips.get(key).cloned();
        log::trace!(
            "audio cache {} for {:?}",
            if clip.is_some() { "hit" } else { "miss" },
            key
        );
        clip
    }

    pub fn store(&mut self, key: impl Into<String>, clip: PcmClip) {
        self.clips.insert(key.into(), clip);
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_little_endian_samples() {
        let clip = PcmClip::from_le_bytes(&[0x01, 0x00, 0xff, 0xff, 0x00, 0x80]).unwrap();

        assert_eq!(clip.samples(), &[1, -1, i16::MIN]);
        assert_eq!(clip.sample_rate(), SPEECH_SAMPLE_RATE);
        assert_eq!(clip.to_f32(), [1.0 / 32768.0, -1.0 / 32768.0, -1.0]);
    }

    #[test]
    fn odd_byte_count_is_rejected() {
        assert_eq!(
            PcmClip::from_le_bytes(&[0, 1, 2]),
            Err(Error::OddPcmLength(3))
        );
        assert!(PcmClip::from_le_bytes(&[]).unwrap().is_empty());
    }

    #[test]
    fn duration_follows_sample_rate() {
        let clip = PcmClip::new(alloc::vec![0; 36_000], SPEECH_SAMPLE_RATE);
        assert_eq!(clip.duration(), Duration::from_millis(1500));
    }

    #[test]
    fn cache_hits_after_store() {
        let mut cache = AudioCache::new();
        let clip = PcmClip::new(alloc::vec![3, 4], SPEECH_SAMPLE_RATE);

        assert_eq!(cache.lookup("Lily the Cat"), None);
        cache.store("Lily the Cat", clip.clone());

        assert_eq!(cache.lookup("Lily the Cat"), Some(clip));
        assert_eq!(cache.lookup("Bobo the Bear"), None);
        assert_eq!(cache.len(), 1);
    }
}

//! Offline backend producing silence.
//!
//! Writes a silent 16-bit mono file whose length follows the length of the
//! text and the requested speed. Useful for tests and for running the whole
//! pipeline without network access.

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use uuid::Uuid;

use super::{AudioFormat, SynthesisBackend, TtsOptions, VoiceInfo};
use crate::error::Error;
use crate::pronunciation::PronunciationTables;
use crate::transcribe::strip_markup;

pub const SAMPLE_RATE: u32 = 16_000;

/// Speech time per character at normal speed.
const SECONDS_PER_CHAR: f32 = 0.06;
const MIN_SECONDS: f32 = 0.1;

const AUDIO_FORMATS: &[AudioFormat] = &[AudioFormat::Wav, AudioFormat::Pcm];

pub struct SilentBackend {
    audio_dir: PathBuf,
    voices: BTreeMap<String, VoiceInfo>,
    tables: Arc<PronunciationTables>,
}

impl SilentBackend {
    /// Backend writing into `audio_dir`, created on first use.
    pub fn new(audio_dir: impl Into<PathBuf>) -> Self {
        let voices = ["Gudrun", "Gunnar"]
            .into_iter()
            .map(|v| (v.to_string(), VoiceInfo::new(v, "is-IS")))
            .collect();
        Self {
            audio_dir: audio_dir.into(),
            voices,
            tables: Arc::new(PronunciationTables::default()),
        }
    }

    pub fn with_pronunciation(mut self, tables: PronunciationTables) -> Self {
        self.tables = Arc::new(tables);
        self
    }

    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }

    fn sample_count(text: &str, speed: f32) -> usize {
        let chars = strip_markup(text).chars().count() as f32;
        let seconds = (chars * SECONDS_PER_CHAR / speed).max(MIN_SECONDS);
        (seconds * SAMPLE_RATE as f32) as usize
    }

    /// 16-bit PCM, which every player decodes.
    fn write_wav(path: &Path, samples: usize) -> Result<()> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer =
            hound::WavWriter::create(path, spec).with_context(|| format!("Cannot create WAV: {}", path.display()))?;
        for _ in 0..samples {
            writer.write_sample(0i16).context("WAV write error")?;
        }
        writer.finalize().context("WAV finalise error")?;
        Ok(())
    }

    /// Raw little-endian 16-bit samples.
    fn write_pcm(path: &Path, samples: usize) -> Result<()> {
        let file = fs::File::create(path).with_context(|| format!("Cannot create PCM file: {}", path.display()))?;
        let mut out = BufWriter::new(file);
        for _ in 0..samples {
            out.write_all(&0i16.to_le_bytes())?;
        }
        out.flush().context("PCM write error")?;
        Ok(())
    }
}

impl SynthesisBackend for SilentBackend {
    fn name(&self) -> &str {
        "Silent"
    }

    fn voices(&self) -> &BTreeMap<String, VoiceInfo> {
        &self.voices
    }

    fn audio_formats(&self) -> &[AudioFormat] {
        AUDIO_FORMATS
    }

    fn pronunciation(&self) -> Arc<PronunciationTables> {
        Arc::clone(&self.tables)
    }

    fn synthesize(&self, text: &str, options: &TtsOptions) -> Result<PathBuf> {
        if !self.voices.contains_key(&options.voice) {
            return Err(Error::VoiceNotAvailable(options.voice.clone()).into());
        }
        fs::create_dir_all(&self.audio_dir)
            .with_context(|| format!("Cannot create audio directory: {}", self.audio_dir.display()))?;

        let path = self
            .audio_dir
            .join(format!("{}.{}", Uuid::new_v4(), options.audio_format.suffix()));
        let samples = Self::sample_count(text, options.speed.value());
        match options.audio_format {
            AudioFormat::Wav => Self::write_wav(&path, samples)?,
            AudioFormat::Pcm => Self::write_pcm(&path, samples)?,
            other => {
                return Err(Error::UnsupportedAudioFormat {
                    service: self.name().to_string(),
                    format: other.to_string(),
                }
                .into())
            }
        }
        log::debug!("Wrote {} silent samples to {}", samples, path.display());
        Ok(path)
    }
}

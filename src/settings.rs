//! Service configuration.
//!
//! [`Settings`] can be read from a JSON file, from `TALA_*` environment
//! variables, or both (environment variables win).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::voices::{AudioFormat, Speed, TextFormat, TtsOptions};

const ENV_PREFIX: &str = "TALA_";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_voice: String,
    pub default_voice_speed: Speed,
    pub default_text_format: TextFormat,
    pub default_audio_format: AudioFormat,
    /// Where backends write synthesized audio.
    pub audio_dir: PathBuf,
    /// Maximum number of cached audio files, 0 for no limit.
    pub audio_cache_size: usize,
    /// Delete audio files when they leave the cache.
    pub audio_cache_clean: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_voice: "Gudrun".to_string(),
            default_voice_speed: Speed::default(),
            default_text_format: TextFormat::Ssml,
            default_audio_format: AudioFormat::Wav,
            audio_dir: env::temp_dir().join("tala"),
            audio_cache_size: 300,
            audio_cache_clean: true,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file. Missing keys take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).with_context(|| format!("Cannot read settings: {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("Failed to parse settings: {}", path.display()))
    }

    /// Defaults overridden by `TALA_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| env::var(format!("{}{}", ENV_PREFIX, key)).ok())
    }

    /// Override fields from `lookup`, which maps an upper-case field name
    /// such as `AUDIO_DIR` to its value if set.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(v) = lookup("DEFAULT_VOICE") {
            self.default_voice = v;
        }
        if let Some(v) = lookup("DEFAULT_VOICE_SPEED") {
            let speed: f32 = v
                .trim()
                .parse()
                .with_context(|| format!("{}DEFAULT_VOICE_SPEED is not a number: {:?}", ENV_PREFIX, v))?;
            self.default_voice_speed = Speed::new(speed)?;
        }
        if let Some(v) = lookup("DEFAULT_TEXT_FORMAT") {
            self.default_text_format = v.trim().parse()?;
        }
        if let Some(v) = lookup("DEFAULT_AUDIO_FORMAT") {
            self.default_audio_format = v.trim().parse()?;
        }
        if let Some(v) = lookup("AUDIO_DIR") {
            self.audio_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("AUDIO_CACHE_SIZE") {
            self.audio_cache_size = v
                .trim()
                .parse()
                .with_context(|| format!("{}AUDIO_CACHE_SIZE is not a count: {:?}", ENV_PREFIX, v))?;
        }
        if let Some(v) = lookup("AUDIO_CACHE_CLEAN") {
            self.audio_cache_clean = match v.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => bail!("{}AUDIO_CACHE_CLEAN must be true or false, got {:?}", ENV_PREFIX, v),
            };
        }
        Ok(self)
    }

    /// Synthesis options for `voice` (or the default voice) with the default
    /// speed and formats.
    pub fn tts_options(&self, voice: Option<&str>) -> TtsOptions {
        TtsOptions::new(voice.unwrap_or(&self.default_voice))
            .with_speed(self.default_voice_speed)
            .with_text_format(self.default_text_format)
            .with_audio_format(self.default_audio_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.default_voice, "Gudrun");
        assert_eq!(s.default_voice_speed.value(), 1.0);
        assert_eq!(s.default_text_format, TextFormat::Ssml);
        assert_eq!(s.default_audio_format, AudioFormat::Wav);
        assert_eq!(s.audio_cache_size, 300);
        assert!(s.audio_cache_clean);
        assert!(s.audio_dir.ends_with("tala"));
    }

    #[test]
    fn test_json_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tala.json");
        fs::write(&path, r#"{"default_voice": "Gunnar", "audio_cache_size": 5, "default_audio_format": "pcm"}"#)
            .unwrap();
        let s = Settings::from_json_file(&path).unwrap();
        assert_eq!(s.default_voice, "Gunnar");
        assert_eq!(s.audio_cache_size, 5);
        assert_eq!(s.default_audio_format, AudioFormat::Pcm);
        assert!(s.audio_cache_clean);
    }

    #[test]
    fn test_json_rejects_bad_speed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tala.json");
        fs::write(&path, r#"{"default_voice_speed": 3.0}"#).unwrap();
        assert!(Settings::from_json_file(&path).is_err());
        assert!(Settings::from_json_file(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DEFAULT_VOICE_SPEED", "1.5"),
            ("AUDIO_CACHE_CLEAN", "false"),
            ("DEFAULT_TEXT_FORMAT", "text"),
        ]
        .into_iter()
        .collect();
        let s = Settings::default()
            .with_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(s.default_voice_speed.value(), 1.5);
        assert!(!s.audio_cache_clean);
        assert_eq!(s.default_text_format, TextFormat::Text);

        let bad = Settings::default().with_overrides(|k| (k == "DEFAULT_VOICE_SPEED").then(|| "9".to_string()));
        assert!(bad.is_err());
    }

    #[test]
    fn test_tts_options() {
        let s = Settings::default();
        let opts = s.tts_options(None);
        assert_eq!(opts.voice, "Gudrun");
        assert_eq!(opts.text_format, TextFormat::Ssml);
        assert_eq!(s.tts_options(Some("Gunnar")).voice, "Gunnar");
    }
}

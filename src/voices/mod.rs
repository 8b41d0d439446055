//! Voices, synthesis backends and the options they take.
//!
//! A [`SynthesisBackend`] turns transcribed text into an audio file. The
//! [`VoiceRegistry`] is assembled once from a list of backends and maps every
//! voice name to the backend that provides it, together with a
//! [`Transcriber`] using that backend's pronunciation tables.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pronunciation::PronunciationTables;
use crate::transcribe::Transcriber;

mod silent;

pub use silent::SilentBackend;

// ─────────────────────────────────────────────────────────────────────────────
// Formats
// ─────────────────────────────────────────────────────────────────────────────

const BINARY_MIMETYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    Mp3,
    Wav,
    OggVorbis,
    Pcm,
    Opus,
}

impl AudioFormat {
    pub fn code(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::OggVorbis => "ogg_vorbis",
            AudioFormat::Pcm => "pcm",
            AudioFormat::Opus => "opus",
        }
    }

    /// File name suffix for audio in this format.
    pub fn suffix(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::OggVorbis => "ogg",
            AudioFormat::Pcm => "pcm",
            AudioFormat::Opus => "opus",
        }
    }

    pub fn mimetype(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Wav => "audio/wav",
            // Opus goes in an Ogg container
            AudioFormat::OggVorbis | AudioFormat::Opus => "audio/ogg",
            AudioFormat::Pcm => BINARY_MIMETYPE,
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AudioFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        [AudioFormat::Mp3, AudioFormat::Wav, AudioFormat::OggVorbis, AudioFormat::Pcm, AudioFormat::Opus]
            .into_iter()
            .find(|f| f.code() == s)
            .ok_or_else(|| Error::InvalidAttribute {
                name: "audio_format".to_string(),
                value: s.to_string(),
            })
    }
}

/// How the backend should interpret the text it is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    #[default]
    Ssml,
    Text,
}

impl FromStr for TextFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ssml" => Ok(TextFormat::Ssml),
            "text" => Ok(TextFormat::Text),
            _ => Err(Error::InvalidAttribute {
                name: "text_format".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Speed
// ─────────────────────────────────────────────────────────────────────────────

pub const MIN_SPEED: f32 = 0.5;
pub const MAX_SPEED: f32 = 2.0;

/// Speaking rate, 1.0 being normal speed.
///
/// Always within [`MIN_SPEED`, `MAX_SPEED`] and never NaN, which is what
/// makes it usable in a cache key.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Speed(f32);

impl Speed {
    pub fn new(value: f32) -> Result<Self> {
        if (MIN_SPEED..=MAX_SPEED).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::InvalidSpeed(value))
        }
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(1.0)
    }
}

impl Eq for Speed {}

impl Hash for Speed {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl TryFrom<f32> for Speed {
    type Error = Error;

    fn try_from(value: f32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Speed> for f32 {
    fn from(speed: Speed) -> f32 {
        speed.0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Options and output
// ─────────────────────────────────────────────────────────────────────────────

/// Synthesis options. Part of the audio cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TtsOptions {
    pub voice: String,
    pub speed: Speed,
    pub text_format: TextFormat,
    pub audio_format: AudioFormat,
}

impl TtsOptions {
    pub fn new(voice: impl Into<String>) -> Self {
        Self {
            voice: voice.into(),
            speed: Speed::default(),
            text_format: TextFormat::default(),
            audio_format: AudioFormat::Wav,
        }
    }

    pub fn with_speed(mut self, speed: Speed) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_text_format(mut self, text_format: TextFormat) -> Self {
        self.text_format = text_format;
        self
    }

    pub fn with_audio_format(mut self, audio_format: AudioFormat) -> Self {
        self.audio_format = audio_format;
        self
    }
}

/// A synthesized audio file and the text that was sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtsOutput {
    pub file: PathBuf,
    pub text: String,
}

/// Description of one voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    /// Identifier the backend knows the voice by.
    pub id: String,
    /// BCP 47 language tag, e.g. "is-IS".
    pub lang: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl VoiceInfo {
    pub fn new(id: impl Into<String>, lang: impl Into<String>) -> Self {
        Self { id: id.into(), lang: lang.into(), style: None }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend contract
// ─────────────────────────────────────────────────────────────────────────────

/// A speech synthesis service.
pub trait SynthesisBackend: Send + Sync {
    /// Service name, used in diagnostics.
    fn name(&self) -> &str;

    /// Voices offered, keyed by voice name.
    fn voices(&self) -> &BTreeMap<String, VoiceInfo>;

    fn audio_formats(&self) -> &[AudioFormat];

    /// Pronunciation tables for this service's voices.
    fn pronunciation(&self) -> Arc<PronunciationTables> {
        Arc::new(PronunciationTables::default())
    }

    /// Whether the service can be used at all, e.g. has credentials.
    fn is_available(&self) -> bool {
        true
    }

    /// Synthesize `text` and return the path of the written audio file.
    fn synthesize(&self, text: &str, options: &TtsOptions) -> anyhow::Result<PathBuf>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_LOCALE: &str = "is_IS";

const LOCALE_TO_VOICE: &[(&str, &str)] = &[
    ("is_IS", "Gudrun"),
    ("en_US", "Jenny"),
    ("en_GB", "Abbi"),
    ("de_DE", "Amala"),
    ("fr_FR", "Brigitte"),
    ("da_DK", "Christel"),
    ("sv_SE", "Sofie"),
    ("nb_NO", "Finn"),
    ("no_NO", "Finn"),
    ("es_ES", "Abril"),
    ("pl_PL", "Agnieszka"),
];

/// Default voice for `locale`, or for [`DEFAULT_LOCALE`] if it has none.
pub fn voice_for_locale(locale: &str) -> &'static str {
    let find = |loc: &str| LOCALE_TO_VOICE.iter().find(|(l, _)| *l == loc).map(|&(_, v)| v);
    find(locale).or_else(|| find(DEFAULT_LOCALE)).unwrap_or("Gudrun")
}

struct Service {
    backend: Arc<dyn SynthesisBackend>,
    transcriber: Transcriber,
}

/// Every usable voice and the backend behind it.
pub struct VoiceRegistry {
    services: Vec<Service>,
    /// Voice name to index into `services`.
    voices: BTreeMap<String, usize>,
}

impl VoiceRegistry {
    /// Build the registry. Unavailable backends are left out, and a voice
    /// name already taken by an earlier backend is skipped.
    pub fn new(backends: Vec<Arc<dyn SynthesisBackend>>) -> Self {
        let base = Transcriber::default();
        let mut services = Vec::new();
        let mut voices = BTreeMap::new();

        for backend in backends {
            if !backend.is_available() {
                log::warn!("Service {} is not available, its voices are disabled", backend.name());
                continue;
            }
            let idx = services.len();
            for name in backend.voices().keys() {
                if voices.contains_key(name) {
                    log::warn!(
                        "Voice named {:?} already exists! Skipping the one defined in service {}.",
                        name,
                        backend.name()
                    );
                } else {
                    voices.insert(name.clone(), idx);
                }
            }
            let transcriber = base.with_tables(backend.pronunciation());
            services.push(Service { backend, transcriber });
        }
        log::debug!("Voice registry: {} voices from {} services", voices.len(), services.len());
        Self { services, voices }
    }

    fn service(&self, voice: &str) -> Option<&Service> {
        self.voices.get(voice).and_then(|&i| self.services.get(i))
    }

    pub fn contains(&self, voice: &str) -> bool {
        self.voices.contains_key(voice)
    }

    /// Voice names in alphabetical order.
    pub fn voice_names(&self) -> impl Iterator<Item = &str> {
        self.voices.keys().map(String::as_str)
    }

    pub fn voice_info(&self, voice: &str) -> Option<&VoiceInfo> {
        self.service(voice)?.backend.voices().get(voice)
    }

    pub fn backend(&self, voice: &str) -> Option<&Arc<dyn SynthesisBackend>> {
        self.service(voice).map(|s| &s.backend)
    }

    pub fn transcriber(&self, voice: &str) -> Option<&Transcriber> {
        self.service(voice).map(|s| &s.transcriber)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub {
        name: &'static str,
        voices: BTreeMap<String, VoiceInfo>,
        available: bool,
        tables: Arc<PronunciationTables>,
    }

    impl Stub {
        fn new(name: &'static str, voices: &[&str], available: bool) -> Self {
            Self {
                name,
                voices: voices.iter().map(|v| (v.to_string(), VoiceInfo::new(*v, "is-IS"))).collect(),
                available,
                tables: Arc::new(PronunciationTables::default()),
            }
        }
    }

    impl SynthesisBackend for Stub {
        fn name(&self) -> &str {
            self.name
        }
        fn voices(&self) -> &BTreeMap<String, VoiceInfo> {
            &self.voices
        }
        fn audio_formats(&self) -> &[AudioFormat] {
            &[AudioFormat::Mp3]
        }
        fn pronunciation(&self) -> Arc<PronunciationTables> {
            Arc::clone(&self.tables)
        }
        fn is_available(&self) -> bool {
            self.available
        }
        fn synthesize(&self, _text: &str, _options: &TtsOptions) -> anyhow::Result<PathBuf> {
            anyhow::bail!("stub")
        }
    }

    #[test]
    fn test_audio_format_codes() {
        assert_eq!("ogg_vorbis".parse::<AudioFormat>().unwrap(), AudioFormat::OggVorbis);
        assert_eq!(AudioFormat::OggVorbis.suffix(), "ogg");
        assert_eq!(AudioFormat::Opus.mimetype(), "audio/ogg");
        assert_eq!(AudioFormat::Pcm.mimetype(), "application/octet-stream");
        assert!("flac".parse::<AudioFormat>().is_err());
        assert_eq!(serde_json::to_string(&AudioFormat::OggVorbis).unwrap(), "\"ogg_vorbis\"");
    }

    #[test]
    fn test_speed_bounds() {
        assert!(Speed::new(0.5).is_ok());
        assert!(Speed::new(2.0).is_ok());
        assert!(matches!(Speed::new(2.5), Err(Error::InvalidSpeed(_))));
        assert!(Speed::new(f32::NAN).is_err());
        assert!(serde_json::from_str::<Speed>("0.1").is_err());
        assert_eq!(serde_json::from_str::<Speed>("1.5").unwrap().value(), 1.5);
    }

    #[test]
    fn test_voice_for_locale() {
        assert_eq!(voice_for_locale("is_IS"), "Gudrun");
        assert_eq!(voice_for_locale("en_GB"), "Abbi");
        assert_eq!(voice_for_locale("xx_XX"), "Gudrun");
    }

    #[test]
    fn test_registry_skips_duplicates_and_unavailable() {
        let mut first = Stub::new("first", &["Gudrun", "Gunnar"], true);
        first.tables = Arc::new(PronunciationTables::azure());
        let second = Stub::new("second", &["Gudrun", "Dora"], true);
        let offline = Stub::new("offline", &["Karl"], false);
        let registry = VoiceRegistry::new(vec![Arc::new(first), Arc::new(second), Arc::new(offline)]);

        assert_eq!(registry.voice_names().collect::<Vec<_>>(), vec!["Dora", "Gudrun", "Gunnar"]);
        assert_eq!(registry.backend("Gudrun").unwrap().name(), "first");
        assert_eq!(registry.backend("Dora").unwrap().name(), "second");
        assert!(!registry.contains("Karl"));
        assert_eq!(registry.voice_info("Gunnar").unwrap().lang, "is-IS");
        // Each voice spells with its own service's tables
        assert_eq!(registry.transcriber("Gudrun").unwrap().tables().chars[&'b'], "bjé");
        assert_eq!(registry.transcriber("Dora").unwrap().tables().chars[&'b'], "bé");
    }
}

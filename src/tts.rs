//! The text-to-speech service: transcription, synthesis and caching.

use std::sync::Arc;

use crate::cache::AudioCache;
use crate::error::{Error, Result};
use crate::markup::MarkupParser;
use crate::normalize::TranscriptionOptions;
use crate::settings::Settings;
use crate::voices::{SilentBackend, SynthesisBackend, TtsOptions, TtsOutput, VoiceRegistry};

/// Entry point for synthesizing speech.
///
/// Owns the voice registry and the audio cache. Identical requests are
/// synthesized once and served from the cache afterwards. Dropping the
/// service (or calling [`TextToSpeech::shutdown`]) deletes cached audio
/// files when `audio_cache_clean` is set.
pub struct TextToSpeech {
    settings: Settings,
    registry: VoiceRegistry,
    cache: AudioCache,
}

impl TextToSpeech {
    pub fn new(settings: Settings, backends: Vec<Arc<dyn SynthesisBackend>>) -> Result<Self> {
        let registry = VoiceRegistry::new(backends);
        if !registry.contains(&settings.default_voice) {
            log::warn!("Default voice '{}' is not available", settings.default_voice);
        }
        let cache = AudioCache::new(settings.audio_cache_size, settings.audio_cache_clean)?;
        log::info!(
            "Text-to-speech ready: {} voices, audio cache size {}",
            registry.voice_names().count(),
            settings.audio_cache_size
        );
        Ok(Self { settings, registry, cache })
    }

    /// Service backed only by the offline [`SilentBackend`].
    pub fn offline(settings: Settings) -> Result<Self> {
        let backend = SilentBackend::new(settings.audio_dir.clone());
        Self::new(settings, vec![Arc::new(backend)])
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &VoiceRegistry {
        &self.registry
    }

    /// Markup parser using the pronunciation of `voice`.
    pub fn markup_parser(&self, voice: &str) -> MarkupParser {
        MarkupParser::for_voice(&self.registry, voice, &self.settings.default_voice)
    }

    /// Synthesize speech for `text` and return the audio file together with
    /// the text that was sent to the backend.
    ///
    /// Missing options take the defaults from [`Settings`]. With `transcribe`
    /// set the text first goes through the Token Normalizer. The voice and
    /// audio format are checked before anything is synthesized.
    pub fn text_to_speech(
        &self,
        text: &str,
        tts_options: Option<&TtsOptions>,
        transcription_options: Option<&TranscriptionOptions>,
        transcribe: bool,
    ) -> Result<TtsOutput> {
        let options = tts_options.cloned().unwrap_or_else(|| self.settings.tts_options(None));
        let backend = self
            .registry
            .backend(&options.voice)
            .ok_or_else(|| Error::VoiceNotAvailable(options.voice.clone()))?;
        if !backend.audio_formats().contains(&options.audio_format) {
            return Err(Error::UnsupportedAudioFormat {
                service: backend.name().to_string(),
                format: options.audio_format.to_string(),
            });
        }
        let transcription = transcribe.then(|| transcription_options.copied().unwrap_or_default());

        self.cache.get_or_compute(text, &options, transcription.as_ref(), || {
            let text = match (&transcription, self.registry.transcriber(&options.voice)) {
                (Some(opt), Some(transcriber)) => transcriber.token_transcribe(text, opt),
                _ => text.to_string(),
            };
            log::debug!("Synthesizing {:?} with {} ({})", text, options.voice, backend.name());
            // Backends may report typed rejections through anyhow
            let file = backend
                .synthesize(&text, &options)
                .map_err(|e| e.downcast::<Error>().unwrap_or_else(Error::Backend))?;
            Ok(TtsOutput { file, text })
        })
    }

    /// Empty the audio cache and stop its cleanup worker. Later requests are
    /// still served and cached.
    pub fn shutdown(&self) {
        self.cache.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::voices::{AudioFormat, Speed, VoiceInfo};

    /// Backend writing the received text to a file and counting calls.
    struct Recorder {
        dir: PathBuf,
        voices: BTreeMap<String, VoiceInfo>,
        calls: AtomicUsize,
    }

    impl Recorder {
        fn new(dir: PathBuf) -> Self {
            let voices = [("Dora".to_string(), VoiceInfo::new("Dora", "is-IS"))].into_iter().collect();
            Self { dir, voices, calls: AtomicUsize::new(0) }
        }
    }

    impl SynthesisBackend for Recorder {
        fn name(&self) -> &str {
            "Recorder"
        }
        fn voices(&self) -> &BTreeMap<String, VoiceInfo> {
            &self.voices
        }
        fn audio_formats(&self) -> &[AudioFormat] {
            &[AudioFormat::Mp3]
        }
        fn synthesize(&self, text: &str, _options: &TtsOptions) -> anyhow::Result<PathBuf> {
            if text.contains("hrun") {
                anyhow::bail!("service unreachable");
            }
            if text == "wav" {
                return Err(Error::UnsupportedAudioFormat { service: self.name().to_string(), format: "wav".to_string() }.into());
            }
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let path = self.dir.join(format!("{}.mp3", n));
            fs::write(&path, text)?;
            Ok(path)
        }
    }

    fn service(dir: &std::path::Path) -> (TextToSpeech, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::new(dir.to_path_buf()));
        let settings = Settings { default_voice: "Dora".to_string(), ..Settings::default() };
        let tts = TextToSpeech::new(settings, vec![Arc::clone(&recorder) as Arc<dyn SynthesisBackend>]).unwrap();
        (tts, recorder)
    }

    fn mp3(voice: &str) -> TtsOptions {
        TtsOptions::new(voice).with_audio_format(AudioFormat::Mp3)
    }

    #[test]
    fn test_identical_requests_hit_cache() {
        let dir = tempfile::tempdir().unwrap();
        let (tts, recorder) = service(dir.path());
        let first = tts.text_to_speech("Halló", Some(&mp3("Dora")), None, true).unwrap();
        let second = tts.text_to_speech("Halló", Some(&mp3("Dora")), None, true).unwrap();
        assert_eq!(first.file, second.file);
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 1);

        let faster = mp3("Dora").with_speed(Speed::new(1.5).unwrap());
        tts.text_to_speech("Halló", Some(&faster), None, true).unwrap();
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_transcribed_text_is_sent() {
        let dir = tempfile::tempdir().unwrap();
        let (tts, _) = service(dir.path());
        let out = tts.text_to_speech("Kl. 14:30 t.d.", Some(&mp3("Dora")), None, true).unwrap();
        assert_eq!(fs::read_to_string(&out.file).unwrap(), out.text);
        assert!(out.text.contains("fjórtán þrjátíu"), "got: {}", out.text);

        let raw = tts.text_to_speech("Kl. 14:30 t.d.", Some(&mp3("Dora")), None, false).unwrap();
        assert_eq!(raw.text, "Kl. 14:30 t.d.");
        assert_ne!(raw.file, out.file);
    }

    #[test]
    fn test_validation_before_backend_call() {
        let dir = tempfile::tempdir().unwrap();
        let (tts, recorder) = service(dir.path());
        assert!(matches!(
            tts.text_to_speech("Halló", Some(&mp3("Gudrun")), None, true),
            Err(Error::VoiceNotAvailable(v)) if v == "Gudrun"
        ));
        let wav = TtsOptions::new("Dora").with_audio_format(AudioFormat::Wav);
        assert!(matches!(
            tts.text_to_speech("Halló", Some(&wav), None, true),
            Err(Error::UnsupportedAudioFormat { .. })
        ));
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_backend_failure_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let (tts, _) = service(dir.path());
        let err = tts.text_to_speech("hrun", Some(&mp3("Dora")), None, false).unwrap_err();
        assert!(matches!(err, Error::Backend(_)));
        assert!(err.to_string().contains("unreachable"), "got: {}", err);
        // The service keeps working
        assert!(tts.text_to_speech("Halló", Some(&mp3("Dora")), None, false).is_ok());
    }

    #[test]
    fn test_typed_backend_rejection_passes_through() {
        let dir = tempfile::tempdir().unwrap();
        let (tts, _) = service(dir.path());
        let err = tts.text_to_speech("wav", Some(&mp3("Dora")), None, false).unwrap_err();
        assert!(matches!(err, Error::UnsupportedAudioFormat { ref service, .. } if service == "Recorder"), "got: {}", err);
    }

    #[test]
    fn test_offline_service_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings { audio_dir: dir.path().join("audio"), ..Settings::default() };
        let tts = TextToSpeech::offline(settings).unwrap();
        let out = tts.text_to_speech("Það kostar 21 kr.", None, None, true).unwrap();
        assert_eq!(out.file.extension().unwrap(), "wav");
        assert!(out.text.contains("tuttugu og ein króna"), "got: {}", out.text);
        assert!(out.file.exists());
        tts.shutdown();
        assert!(!out.file.exists());
    }

    #[test]
    fn test_markup_parser_falls_back_to_default_voice() {
        let dir = tempfile::tempdir().unwrap();
        let (tts, _) = service(dir.path());
        let parser = tts.markup_parser("Nobody");
        assert_eq!(parser.transcribe(r#"<greynir type="number">5</greynir>"#).unwrap(), "Fimm");
    }
}

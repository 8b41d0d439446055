//! # tala
//!
//! Icelandic text-to-speech front end: turns written Icelandic into text a
//! speech synthesizer can read aloud correctly, and caches the synthesized
//! audio.
//!
//! Numbers, dates and ordinals in Icelandic inflect by case, gender and
//! number, so "3" is "þrír", "þrjá", "þremur" or "þriggja" depending on the
//! sentence. This crate picks the right form.
//!
//! ## Quick start
//!
//! ```no_run
//! use tala::{Settings, TextToSpeech, TranscriptionOptions, Transcriber};
//!
//! // Fast, context-free normalization
//! let t = Transcriber::default();
//! let text = t.token_transcribe("Fundurinn er kl. 14:30 þann 25. janúar.", &TranscriptionOptions::default());
//! assert!(text.contains("fjórtán þrjátíu"));
//!
//! // Inline markup
//! let parser = tala::MarkupParser::new(t);
//! let text = parser.transcribe(r#"Með <greynir type="number" case="þgf" gender="kk">3</greynir> hestum"#)?;
//! assert_eq!(text, "Með þremur hestum");
//!
//! // Synthesis through the cache, here with the offline backend
//! let tts = TextToSpeech::offline(Settings::default())?;
//! let out = tts.text_to_speech("Það kostar 21 kr.", None, None, true)?;
//! println!("{} <- {:?}", out.file.display(), out.text);
//! # Ok::<(), tala::Error>(())
//! ```
//!
//! ## Pipeline
//! 1. **Markup** — `<greynir type="…">` tags select a transformation for a
//!    span of text ([`markup`]).
//! 2. **Normalization** — tokens such as times, amounts and e-mail addresses
//!    are written out ([`normalize`]), or, given a syntax parse, every number
//!    is inflected from its context ([`context`]).
//! 3. **Numerals** — integers, decimals, ordinals and years become words in
//!    the requested case, gender and number ([`num`]).
//! 4. **Synthesis** — a [`SynthesisBackend`] writes an audio file; identical
//!    requests are answered from the [`AudioCache`].
//!
//! Diagnostics go through the [`log`] facade. The crate never installs a
//! logger.

pub mod cache;
pub mod context;
pub mod error;
pub mod grammar;
pub mod lexicon;
pub mod markup;
pub mod normalize;
pub mod num;
pub mod pronunciation;
pub mod settings;
pub mod tokenize;
pub mod transcribe;
pub mod tts;
pub mod units;
pub mod voices;

// ─── Re-exports for convenience ─────────────────────────────────────────────

pub use cache::{AudioCache, LfuCache};
pub use context::{ContextTranscriber, ParsedSentence, ShallowParser, SyntaxParser, Term};
pub use error::{Error, Result};
pub use grammar::{Case, Gender, Number};
pub use markup::{gssml, MarkupParser, TranscriptionMethod};
pub use normalize::TranscriptionOptions;
pub use pronunciation::PronunciationTables;
pub use settings::Settings;
pub use transcribe::{strip_markup, Transcriber};
pub use tts::TextToSpeech;
pub use voices::{
    voice_for_locale, AudioFormat, SilentBackend, Speed, SynthesisBackend, TextFormat, TtsOptions, TtsOutput,
    VoiceInfo, VoiceRegistry,
};

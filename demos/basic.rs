//! Basic tala example: transcribes Icelandic text and synthesizes it with the
//! offline backend.
//!
//! Usage:
//!   cargo run --example basic
//!   cargo run --example basic -- --voice Gunnar --text "Klukkan er 14:30."
//!   cargo run --example basic -- --markup '<greynir type="number" case="þgf">3</greynir> hestum'
//!
//! Settings are read from `--settings FILE` if given, then `TALA_*`
//! environment variables. Set `RUST_LOG=debug` to see what happens.

use anyhow::Context;
use tala::{MarkupParser, Settings, Speed, TextToSpeech, TranscriptionOptions};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // ── Parse simple CLI arguments ───────────────────────────────────────────
    let mut args = std::env::args().skip(1);

    let mut settings_file = None;
    let mut voice = None;
    let mut text = "Fundurinn er kl. 14:30 þann 25. janúar 2021 og kostar 5.000 kr.".to_string();
    let mut markup = None;
    let mut speed = None;
    let mut numbers = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" => settings_file = args.next(),
            "--voice" => voice = args.next(),
            "--text" => { if let Some(v) = args.next() { text = v; } }
            "--markup" => markup = args.next(),
            "--speed" => speed = args.next(),
            "--numbers" => numbers = true,
            "--help" => {
                println!(
                    "Usage: basic [--settings FILE] [--voice NAME] [--text TEXT] \
                     [--markup MARKUP] [--speed FLOAT] [--numbers]"
                );
                return Ok(());
            }
            other => anyhow::bail!("Unknown argument {:?}", other),
        }
    }

    // ── Settings ─────────────────────────────────────────────────────────────
    let settings = match settings_file {
        Some(path) => Settings::from_json_file(&path)?,
        None => Settings::default(),
    };
    let settings = settings.with_overrides(|key| std::env::var(format!("TALA_{}", key)).ok())?;

    let tts = TextToSpeech::offline(settings)?;
    let mut options = tts.settings().tts_options(voice.as_deref());
    if let Some(speed) = speed {
        let speed: f32 = speed.parse().context("--speed must be a number")?;
        options = options.with_speed(Speed::new(speed)?);
    }

    println!("Voices : {:?}", tts.registry().voice_names().collect::<Vec<_>>());
    println!("Voice  : {}", options.voice);
    println!("Speed  : {}", options.speed.value());
    println!();

    // ── Markup ───────────────────────────────────────────────────────────────
    let transcribe = markup.is_none();
    if let Some(markup) = markup {
        let parser: MarkupParser = tts.markup_parser(&options.voice);
        text = parser.transcribe(&markup)?;
        println!("Markup : {}", markup);
    }

    // ── Synthesize ───────────────────────────────────────────────────────────
    let transcription = TranscriptionOptions { numbers, ..Default::default() };
    let out = tts.text_to_speech(&text, Some(&options), Some(&transcription), transcribe)?;

    println!("Text   : {}", out.text);
    println!("Audio  : {} ({})", out.file.display(), options.audio_format.mimetype());

    // Keep the file; the cache deletes everything it holds on shutdown
    let kept = std::env::temp_dir().join(format!("tala-basic.{}", options.audio_format.suffix()));
    std::fs::copy(&out.file, &kept).with_context(|| format!("Cannot copy audio to {}", kept.display()))?;
    println!("Copied : {}", kept.display());
    Ok(())
}

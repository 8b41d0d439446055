//! Crate-wide error type.

/// Everything the transcription and synthesis front end can fail with.
///
/// Markup errors are fatal to the request that produced them but leave the
/// parser reusable. Backend failures are carried through unchanged.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unbalanced tags: {0} open <greynir> tag(s) left at end of input")]
    UnbalancedTags(usize),
    #[error("Closing </greynir> tag without a matching opening tag")]
    UnexpectedClosingTag,
    #[error("Missing type attribute in <greynir> tag around {0:?}")]
    MissingType(String),
    #[error("'{0}' is not a transcription method")]
    UnknownTransformation(String),
    #[error("Malformed markup at byte {pos}: {reason}")]
    MalformedTag { pos: usize, reason: String },
    #[error("Invalid value {value:?} for attribute '{name}'")]
    InvalidAttribute { name: String, value: String },
    #[error("Unexpected attribute '{name}' for transcription method '{method}'")]
    UnexpectedAttribute { method: String, name: String },
    #[error("Invalid number: {0:?}")]
    InvalidNumber(String),
    #[error("Break strength {0:?} is invalid")]
    InvalidBreakStrength(String),
    #[error("Speed {0} outside the allowed range [0.5, 2.0]")]
    InvalidSpeed(f32),
    #[error("Voice {0:?} not available")]
    VoiceNotAvailable(String),
    #[error("Service {service} doesn't support audio format {format}")]
    UnsupportedAudioFormat { service: String, format: String },
    #[error("Speech synthesis failed: {0}")]
    Backend(#[source] anyhow::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

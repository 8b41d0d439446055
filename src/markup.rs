//! Markup Tag Parser for inline `<greynir>` transcription tags.
//!
//! Callers mark spans of text with the transformation they want applied:
//!
//! ```text
//! Klukkan er <greynir type="time">14:30</greynir> þann
//! <greynir type="date" case="þf">25. janúar</greynir>.<greynir type="vbreak" time="1s" />
//! ```
//!
//! Grammar accepted by [`MarkupParser::transcribe`]:
//!
//! - `<greynir ATTRS>DATA</greynir>` applies the method named by the `type`
//!   attribute to the transcribed DATA. Tags nest.
//! - `<greynir ATTRS />` applies the method to empty text.
//! - ATTRS are `name="value"`, `name='value'` or `name=value`. `type` is
//!   required and must name a [`TranscriptionMethod`]; any other attribute
//!   must be one the method accepts.
//! - Any other tag (`<p>`, `</b>`, `<br/>`) and comments are removed.
//!   A `<` not followed by a letter, `/` or `!` is text.
//! - Character references in text and attribute values are decoded.
//!
//! Every opening `greynir` tag must be closed. Unterminated tags, stray
//! closing tags and missing or unknown types are errors.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::context::ContextTranscriber;
use crate::error::{Error, Result};
use crate::grammar::{Case, Gender, Number};
use crate::normalize::TranscriptionOptions;
use crate::transcribe::Transcriber;
use crate::voices::VoiceRegistry;

/// The one tag the parser acts on.
pub const TAG_NAME: &str = "greynir";

// ─────────────────────────────────────────────────────────────────────────────
// Methods
// ─────────────────────────────────────────────────────────────────────────────

/// Transformations that can be requested with the `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranscriptionMethod {
    DangerSymbols,
    Number,
    Numbers,
    Float,
    Floats,
    Ordinal,
    Ordinals,
    Digits,
    Phone,
    Time,
    Date,
    Year,
    Years,
    Spell,
    Abbrev,
    Currency,
    Unit,
    Molecule,
    Numalpha,
    Username,
    Domain,
    Email,
    Entity,
    Person,
    Vbreak,
    Paragraph,
    Sentence,
    TokenTranscribe,
    ParserTranscribe,
}

const NUMBER_ATTRS: &[&str] = &["case", "gender", "one_hundred"];
const FLOAT_ATTRS: &[&str] = &["case", "gender", "one_hundred", "comma_null"];
const ORDINAL_ATTRS: &[&str] = &["case", "gender", "number"];
const OPTION_ATTRS: &[&str] = &[
    "emails",
    "dates",
    "years",
    "domains",
    "urls",
    "amounts",
    "measurements",
    "percentages",
    "numbers",
    "ordinals",
];

impl TranscriptionMethod {
    pub const ALL: [TranscriptionMethod; 29] = [
        Self::DangerSymbols,
        Self::Number,
        Self::Numbers,
        Self::Float,
        Self::Floats,
        Self::Ordinal,
        Self::Ordinals,
        Self::Digits,
        Self::Phone,
        Self::Time,
        Self::Date,
        Self::Year,
        Self::Years,
        Self::Spell,
        Self::Abbrev,
        Self::Currency,
        Self::Unit,
        Self::Molecule,
        Self::Numalpha,
        Self::Username,
        Self::Domain,
        Self::Email,
        Self::Entity,
        Self::Person,
        Self::Vbreak,
        Self::Paragraph,
        Self::Sentence,
        Self::TokenTranscribe,
        Self::ParserTranscribe,
    ];

    /// Value of the `type` attribute selecting this method.
    pub fn name(self) -> &'static str {
        match self {
            Self::DangerSymbols => "danger_symbols",
            Self::Number => "number",
            Self::Numbers => "numbers",
            Self::Float => "float",
            Self::Floats => "floats",
            Self::Ordinal => "ordinal",
            Self::Ordinals => "ordinals",
            Self::Digits => "digits",
            Self::Phone => "phone",
            Self::Time => "time",
            Self::Date => "date",
            Self::Year => "year",
            Self::Years => "years",
            Self::Spell => "spell",
            Self::Abbrev => "abbrev",
            Self::Currency => "currency",
            Self::Unit => "unit",
            Self::Molecule => "molecule",
            Self::Numalpha => "numalpha",
            Self::Username => "username",
            Self::Domain => "domain",
            Self::Email => "email",
            Self::Entity => "entity",
            Self::Person => "person",
            Self::Vbreak => "vbreak",
            Self::Paragraph => "paragraph",
            Self::Sentence => "sentence",
            Self::TokenTranscribe => "token_transcribe",
            Self::ParserTranscribe => "parser_transcribe",
        }
    }

    /// Attributes besides `type` the method accepts.
    pub fn attributes(self) -> &'static [&'static str] {
        match self {
            Self::Number | Self::Numbers => NUMBER_ATTRS,
            Self::Float | Self::Floats => FLOAT_ATTRS,
            Self::Ordinal | Self::Ordinals => ORDINAL_ATTRS,
            Self::Date => &["case"],
            Self::Spell => &["pause_length", "literal"],
            Self::Currency | Self::Unit => &["number"],
            Self::Vbreak => &["time", "strength"],
            Self::TokenTranscribe => OPTION_ATTRS,
            Self::ParserTranscribe => &["full_text"],
            _ => &[],
        }
    }
}

impl fmt::Display for TranscriptionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TranscriptionMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| Error::UnknownTransformation(s.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Attributes
// ─────────────────────────────────────────────────────────────────────────────

/// Attributes of one tag, `type` removed.
struct Attrs {
    method: TranscriptionMethod,
    values: Vec<(String, String)>,
}

impl Attrs {
    fn new(method: TranscriptionMethod, values: Vec<(String, String)>) -> Result<Self> {
        let allowed = method.attributes();
        if let Some((name, _)) = values.iter().find(|(name, _)| !allowed.contains(&name.as_str())) {
            return Err(Error::UnexpectedAttribute { method: method.name().to_string(), name: name.clone() });
        }
        Ok(Self { method, values })
    }

    /// Last value given for `name`.
    fn get(&self, name: &str) -> Option<&str> {
        self.values.iter().rev().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    fn code<T: FromStr>(&self, name: &str, default: T) -> Result<T> {
        match self.get(name) {
            None => Ok(default),
            Some(v) => v.parse().map_err(|_| Error::InvalidAttribute { name: name.to_string(), value: v.to_string() }),
        }
    }

    fn case(&self) -> Result<Case> {
        self.code("case", Case::Nominative)
    }

    fn gender(&self, default: Gender) -> Result<Gender> {
        self.code("gender", default)
    }

    fn number(&self, default: Number) -> Result<Number> {
        self.code("number", default)
    }

    /// Booleans are true only when written "True".
    fn flag(&self, name: &str) -> bool {
        self.get(name) == Some("True")
    }

    fn flag_or(&self, name: &str, default: bool) -> bool {
        self.get(name).map_or(default, |v| v == "True")
    }

    fn options(&self) -> TranscriptionOptions {
        let d = TranscriptionOptions::default();
        TranscriptionOptions {
            emails: self.flag_or("emails", d.emails),
            dates: self.flag_or("dates", d.dates),
            years: self.flag_or("years", d.years),
            domains: self.flag_or("domains", d.domains),
            urls: self.flag_or("urls", d.urls),
            amounts: self.flag_or("amounts", d.amounts),
            measurements: self.flag_or("measurements", d.measurements),
            percentages: self.flag_or("percentages", d.percentages),
            numbers: self.flag_or("numbers", d.numbers),
            ordinals: self.flag_or("ordinals", d.ordinals),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Character references
// ─────────────────────────────────────────────────────────────────────────────

static RE_CHAR_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|amp|lt|gt|quot|apos);").unwrap());

/// Decode HTML character references. Unknown or invalid ones are kept.
pub fn decode_char_refs(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    RE_CHAR_REF
        .replace_all(text, |caps: &Captures| {
            let body = &caps[1];
            let decoded = match body {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => {
                    let digits = &body[1..];
                    let code = match digits.strip_prefix(|c: char| c == 'x' || c == 'X') {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => digits.parse().ok(),
                    };
                    code.and_then(char::from_u32)
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn escape(text: &str, quote: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quote => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build a `<greynir>` tag requesting `kind` for `data`.
///
/// Without data the tag is self-closing. Text and attribute values are
/// escaped, so the tag parses back to exactly `data`.
pub fn gssml(data: Option<&str>, kind: &str, attrs: &[(&str, &str)]) -> String {
    let mut tag = format!("<{} type=\"{}\"", TAG_NAME, escape(kind, true));
    for (name, value) in attrs {
        tag.push_str(&format!(" {}=\"{}\"", name, escape(value, true)));
    }
    match data {
        Some(data) => format!("{}>{}</{}>", tag, escape(data, false), TAG_NAME),
        None => format!("{} />", tag),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scanner
// ─────────────────────────────────────────────────────────────────────────────

/// A tag as written.
#[derive(Debug, PartialEq, Eq)]
struct Tag {
    name: String,
    closing: bool,
    self_closing: bool,
    attrs: Vec<(String, String)>,
}

fn malformed(pos: usize, reason: impl Into<String>) -> Error {
    Error::MalformedTag { pos, reason: reason.into() }
}

/// Length of the tag starting at `s[0] == '<'`, through its `>`. Quoted
/// attribute values may contain `>`.
fn tag_len(s: &str) -> Option<usize> {
    let mut quote = None;
    for (i, c) in s.char_indices().skip(1) {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, '>') => return Some(i + 1),
            _ => {}
        }
    }
    None
}

/// Parse the inside of a tag, between `<` and `>`. `pos` is for errors.
fn parse_tag(inner: &str, pos: usize) -> Result<Tag> {
    let (closing, rest) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };
    let (self_closing, rest) = match rest.trim_end().strip_suffix('/') {
        Some(rest) => (true, rest),
        None => (false, rest),
    };
    let name_len = rest.find(|c: char| c.is_whitespace() || c == '/').unwrap_or(rest.len());
    let name = rest[..name_len].to_lowercase();
    if name.is_empty() || !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(malformed(pos, "missing tag name"));
    }
    if name != TAG_NAME {
        // Other markup is dropped, its attributes don't matter
        return Ok(Tag { name, closing, self_closing, attrs: Vec::new() });
    }
    if closing && self_closing {
        return Err(malformed(pos, "tag is both closing and self-closing"));
    }

    let mut attrs = Vec::new();
    let mut rest = rest[name_len..].trim_start();
    while !rest.is_empty() {
        let key_len = rest
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(rest.len());
        let key = rest[..key_len].to_lowercase();
        if key.is_empty() {
            return Err(malformed(pos, "expected attribute name"));
        }
        rest = rest[key_len..].trim_start();
        let value = match rest.strip_prefix('=') {
            None => String::new(),
            Some(after) => {
                let after = after.trim_start();
                match after.chars().next() {
                    Some(q @ ('"' | '\'')) => {
                        let body = &after[1..];
                        let end = body
                            .find(q)
                            .ok_or_else(|| malformed(pos, format!("unterminated value for attribute '{}'", key)))?;
                        rest = &body[end + 1..];
                        decode_char_refs(&body[..end])
                    }
                    Some(_) => {
                        let end = after.find(char::is_whitespace).unwrap_or(after.len());
                        rest = &after[end..];
                        decode_char_refs(&after[..end])
                    }
                    None => return Err(malformed(pos, format!("missing value for attribute '{}'", key))),
                }
            }
        };
        if closing {
            return Err(malformed(pos, "closing tag with attributes"));
        }
        attrs.push((key, value));
        rest = rest.trim_start();
    }
    Ok(Tag { name, closing, self_closing, attrs })
}

// ─────────────────────────────────────────────────────────────────────────────
// Parser
// ─────────────────────────────────────────────────────────────────────────────

/// Open `<greynir>` tag: text collected so far and the tag's attributes.
struct Frame {
    text: String,
    attrs: Vec<(String, String)>,
}

/// Transcribes text containing `<greynir>` tags.
#[derive(Clone)]
pub struct MarkupParser {
    transcriber: Transcriber,
    context: Arc<ContextTranscriber>,
}

impl MarkupParser {
    pub fn new(transcriber: Transcriber) -> Self {
        let context = Arc::new(ContextTranscriber::shallow(transcriber.clone()));
        Self { transcriber, context }
    }

    /// Parser whose `parser_transcribe` method uses `context`.
    pub fn with_context(context: Arc<ContextTranscriber>) -> Self {
        Self { transcriber: context.transcriber().clone(), context }
    }

    /// Parser using the pronunciation of `voice`.
    ///
    /// An unknown voice falls back to `default_voice`, and failing that to
    /// the default pronunciation tables.
    pub fn for_voice(registry: &VoiceRegistry, voice: &str, default_voice: &str) -> Self {
        if let Some(t) = registry.transcriber(voice) {
            return Self::new(t.clone());
        }
        log::warn!("Voice '{}' not in supported voices, reverting to default ({})", voice, default_voice);
        match registry.transcriber(default_voice) {
            Some(t) => Self::new(t.clone()),
            None => {
                log::warn!("Default voice '{}' not available either, using default pronunciation", default_voice);
                Self::new(Transcriber::default())
            }
        }
    }

    pub fn transcriber(&self) -> &Transcriber {
        &self.transcriber
    }

    /// Parse `text` and return it transcribed, first letter capitalized.
    pub fn transcribe(&self, text: &str) -> Result<String> {
        let mut root = String::new();
        let mut stack: Vec<Frame> = Vec::new();
        let mut pos = 0;

        while pos < text.len() {
            let rest = &text[pos..];
            let Some(lt) = find_tag_start(rest) else {
                self.push_data(top(&mut root, &mut stack), rest);
                break;
            };
            self.push_data(top(&mut root, &mut stack), &rest[..lt]);
            pos += lt;
            let rest = &text[pos..];

            if rest.starts_with("<!--") {
                let end = rest.find("-->").ok_or_else(|| malformed(pos, "unterminated comment"))?;
                pos += end + 3;
                continue;
            }
            let len = tag_len(rest).ok_or_else(|| malformed(pos, "unterminated tag"))?;
            if rest.starts_with("<!") || rest.starts_with("<?") {
                // Doctype or processing instruction
                pos += len;
                continue;
            }
            let tag = parse_tag(&rest[1..len - 1], pos)?;
            pos += len;
            if tag.name != TAG_NAME {
                continue;
            }

            if tag.self_closing {
                let out = self.apply("", tag.attrs)?;
                top(&mut root, &mut stack).push_str(&out);
            } else if tag.closing {
                let frame = stack.pop().ok_or(Error::UnexpectedClosingTag)?;
                let out = self.apply(&frame.text, frame.attrs)?;
                top(&mut root, &mut stack).push_str(&out);
            } else {
                stack.push(Frame { text: String::new(), attrs: tag.attrs });
            }
        }

        if !stack.is_empty() {
            return Err(Error::UnbalancedTags(stack.len()));
        }
        Ok(capitalize_first(&root))
    }

    /// Transcribe `text` with the Token Normalizer and the voice's tables.
    pub fn fast_transcribe(&self, text: &str, options: &TranscriptionOptions) -> Result<String> {
        let flags = [
            ("emails", options.emails),
            ("dates", options.dates),
            ("years", options.years),
            ("domains", options.domains),
            ("urls", options.urls),
            ("amounts", options.amounts),
            ("measurements", options.measurements),
            ("percentages", options.percentages),
            ("numbers", options.numbers),
            ("ordinals", options.ordinals),
        ];
        let attrs: Vec<(&str, &str)> = flags
            .iter()
            .map(|&(name, on)| (name, if on { "True" } else { "False" }))
            .collect();
        self.transcribe(&gssml(Some(text), TranscriptionMethod::TokenTranscribe.name(), &attrs))
    }

    fn push_data(&self, buf: &mut String, data: &str) {
        if !data.is_empty() {
            buf.push_str(&self.transcriber.danger_symbols(&decode_char_refs(data)));
        }
    }

    /// Run the method named by the `type` attribute on `text`.
    fn apply(&self, text: &str, mut attrs: Vec<(String, String)>) -> Result<String> {
        let kind = match attrs.iter().rposition(|(name, _)| name == "type") {
            Some(i) => attrs.remove(i).1,
            None => String::new(),
        };
        attrs.retain(|(name, _)| name != "type");
        if kind.is_empty() {
            return Err(Error::MissingType(text.to_string()));
        }
        let method: TranscriptionMethod = kind.parse()?;
        let a = Attrs::new(method, attrs)?;
        self.dispatch(text, &a)
    }

    fn dispatch(&self, txt: &str, a: &Attrs) -> Result<String> {
        use TranscriptionMethod as M;
        let t = &self.transcriber;
        let out = match a.method {
            M::DangerSymbols => t.danger_symbols(txt),
            M::Number => t.number(txt, a.case()?, a.gender(Gender::Neuter)?, a.flag("one_hundred"))?,
            M::Numbers => t.numbers(txt, a.case()?, a.gender(Gender::Neuter)?, a.flag("one_hundred")),
            M::Float => t.float(
                txt,
                a.case()?,
                a.gender(Gender::Neuter)?,
                a.flag("one_hundred"),
                a.flag("comma_null"),
            )?,
            M::Floats => t.floats(
                txt,
                a.case()?,
                a.gender(Gender::Neuter)?,
                a.flag("one_hundred"),
                a.flag("comma_null"),
            ),
            M::Ordinal => t.ordinal(txt, a.case()?, a.gender(Gender::Neuter)?, a.number(Number::Singular)?)?,
            M::Ordinals => t.ordinals(txt, a.case()?, a.gender(Gender::Neuter)?, a.number(Number::Singular)?),
            M::Digits => t.digits(txt),
            M::Phone => t.phone(txt),
            M::Time => t.time(txt),
            M::Date => t.date(txt, a.case()?),
            M::Year => t.year(txt)?,
            M::Years => t.years(txt),
            M::Spell => t.spell(txt, a.get("pause_length"), a.flag("literal")),
            M::Abbrev => t.abbrev(txt),
            M::Currency => t.currency(txt, a.number(Number::Plural)?),
            M::Unit => t.unit(txt, a.number(Number::Plural)?),
            M::Molecule => t.molecule(txt),
            M::Numalpha => t.numalpha(txt),
            M::Username => t.username(txt),
            M::Domain => t.domain(txt),
            M::Email => t.email(txt),
            M::Entity => t.entity(txt),
            M::Person => t.person(txt),
            M::Vbreak => t.vbreak(a.get("time"), a.get("strength"))?,
            M::Paragraph => t.paragraph(txt),
            M::Sentence => t.sentence(txt),
            M::TokenTranscribe => t.token_transcribe(txt, &a.options()),
            M::ParserTranscribe => self.context.parser_transcribe(txt, a.flag("full_text")),
        };
        Ok(out)
    }
}

/// Buffer that character data currently goes to.
fn top<'a>(root: &'a mut String, stack: &'a mut [Frame]) -> &'a mut String {
    match stack.last_mut() {
        Some(frame) => &mut frame.text,
        None => root,
    }
}

/// Byte offset of the next `<` that opens a tag or comment.
fn find_tag_start(s: &str) -> Option<usize> {
    s.match_indices('<').map(|(i, _)| i).find(|&i| {
        s[i + 1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
    })
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

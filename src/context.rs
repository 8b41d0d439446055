//! Deep Context Transcriber: transcription guided by a syntax parse.
//!
//! Where [`Transcriber::token_transcribe`] has to guess, a parse tells which
//! case, gender and number each word is in, so "með 3 hestum" can be read
//! "með þremur hestum". The parser is pluggable through [`SyntaxParser`];
//! [`ShallowParser`] only splits sentences and leaves every term unknown, in
//! which case the defaults (nominative, neuter, singular) apply.

use std::convert::Infallible;
use std::sync::Arc;

use fancy_regex::Regex;
use once_cell::sync::Lazy;

use crate::cache::LfuCache;
use crate::grammar::{Case, Gender, Number, Variant};
use crate::num;
use crate::tokenize::{detokenize, RegexTokenizer, Token, TokenKind, Tokenizer};
use crate::transcribe::{is_upper, Transcriber};
use crate::units;

const MEMO_SIZE: usize = 50;

/// Lemmas suggesting a sentence reports a sports result, where "2-1" is a
/// score and not a range.
const SPORTS_LEMMAS: &[&str] = &["leikur", "vinna", "tapa", "sigra"];

const HYPHENS: &[&str] = &["-", "‐", "‑", "‒", "–", "—", "―"];

// "t.d.", "MSc", "RÚV"
static RE_ABBREV: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-ZÁÐÉÍÓÚÝÞÆÖa-záðéíóúýþæö]\.|\b[A-ZÁÐÉÍÓÚÝÞÆÖ]{2,5}(?![A-ZÁÐÉÍÓÚÝÞÆÖ]))").unwrap()
});

fn abbreviation_shaped(s: &str) -> bool {
    RE_ABBREV.is_match(s).unwrap_or(false)
}

// ─────────────────────────────────────────────────────────────────────────────
// Parser seam
// ─────────────────────────────────────────────────────────────────────────────

/// Grammatical annotation of the terminal a token was parsed into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Term {
    pub variants: Vec<Variant>,
    pub lemma: String,
    /// Number of children of the parent nonterminal.
    pub parent_arity: usize,
    /// Position among the sentence's terminals.
    pub index: Option<usize>,
}

impl Term {
    pub fn case(&self) -> Option<Case> {
        self.variants.iter().find_map(|v| match v {
            Variant::Case(c) => Some(*c),
            _ => None,
        })
    }

    pub fn gender(&self) -> Option<Gender> {
        self.variants.iter().find_map(|v| match v {
            Variant::Gender(g) => Some(*g),
            _ => None,
        })
    }

    pub fn number(&self) -> Option<Number> {
        self.variants.iter().find_map(|v| match v {
            Variant::Number(n) => Some(*n),
            _ => None,
        })
    }
}

/// One parsed sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSentence {
    pub tokens: Vec<Token>,
    /// One entry per token, `None` if the sentence could not be parsed.
    pub terms: Option<Vec<Option<Term>>>,
    pub lemmas: Option<Vec<String>>,
}

impl ParsedSentence {
    fn term(&self, i: usize) -> Option<&Term> {
        self.terms.as_ref()?.get(i)?.as_ref()
    }
}

pub trait SyntaxParser: Send + Sync {
    fn parse(&self, text: &str) -> Vec<ParsedSentence>;
}

/// Sentence splitter without grammatical analysis.
pub struct ShallowParser {
    tokenizer: Box<dyn Tokenizer>,
}

impl Default for ShallowParser {
    fn default() -> Self {
        Self { tokenizer: Box::new(RegexTokenizer::default()) }
    }
}

impl ShallowParser {
    pub fn new(tokenizer: Box<dyn Tokenizer>) -> Self {
        Self { tokenizer }
    }
}

impl SyntaxParser for ShallowParser {
    fn parse(&self, text: &str) -> Vec<ParsedSentence> {
        let mut sentences = Vec::new();
        let mut current = Vec::new();
        for token in self.tokenizer.tokenize(text) {
            let ends = token.kind == TokenKind::Punctuation && matches!(token.text.as_str(), "." | "!" | "?" | "…");
            current.push(token);
            if ends {
                sentences.push(ParsedSentence { tokens: std::mem::take(&mut current), ..Default::default() });
            }
        }
        if !current.is_empty() {
            sentences.push(ParsedSentence { tokens: current, ..Default::default() });
        }
        sentences
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transcriber
// ─────────────────────────────────────────────────────────────────────────────

/// Transcribes whole texts sentence by sentence, using a [`SyntaxParser`]
/// to pick inflections. Results are memoized.
pub struct ContextTranscriber {
    transcriber: Transcriber,
    parser: Arc<dyn SyntaxParser>,
    memo: LfuCache<(String, bool), String>,
}

impl ContextTranscriber {
    pub fn new(transcriber: Transcriber, parser: Arc<dyn SyntaxParser>) -> Self {
        Self { transcriber, parser, memo: LfuCache::new(MEMO_SIZE) }
    }

    /// Context transcriber without a real parser.
    pub fn shallow(transcriber: Transcriber) -> Self {
        let tokenizer = RegexTokenizer::new(transcriber.lexicon_handle());
        Self::new(transcriber, Arc::new(ShallowParser::new(Box::new(tokenizer))))
    }

    pub fn transcriber(&self) -> &Transcriber {
        &self.transcriber
    }

    /// Slow, context-aware transcription of Icelandic text.
    ///
    /// With `full_text` every sentence is wrapped in `<s>` and the whole
    /// output in `<p>`.
    pub fn parser_transcribe(&self, text: &str, full_text: bool) -> String {
        log::trace!("Input to parser_transcribe, txt: {:?}", text);
        if text.is_empty() {
            return String::new();
        }
        let out = self
            .memo
            .get_or_try_insert_with((text.to_string(), full_text), || {
                Ok::<_, Infallible>(self.transcribe_uncached(text, full_text))
            })
            .unwrap_or_else(|never| match never {});
        log::trace!("Output from parser_transcribe, txt: {:?}", out);
        out
    }

    fn transcribe_uncached(&self, text: &str, full_text: bool) -> String {
        let parts: Vec<String> = self
            .parser
            .parse(text)
            .iter()
            .map(|sentence| {
                let spoken = self.transcribe_sentence(sentence);
                if full_text {
                    self.transcriber.sentence(&spoken)
                } else {
                    spoken
                }
            })
            .collect();
        let para = parts.join(" ");
        if full_text {
            self.transcriber.paragraph(&para)
        } else {
            para
        }
    }

    fn transcribe_sentence(&self, sentence: &ParsedSentence) -> String {
        let mut out = Vec::with_capacity(sentence.tokens.len());
        for (i, token) in sentence.tokens.iter().enumerate() {
            let term = sentence.term(i);
            let spoken = match self.handle(token, term, sentence) {
                Some(spoken) => spoken,
                None => match self.fallback(token, term, sentence) {
                    Some(spoken) => spoken,
                    None => continue,
                },
            };
            out.push(Token::new(token.kind.clone(), spoken));
        }
        detokenize(&out).trim().to_string()
    }

    /// Transcription by token kind, `None` if the kind has no handler.
    fn handle(&self, token: &Token, term: Option<&Term>, sentence: &ParsedSentence) -> Option<String> {
        let t = &self.transcriber;
        let txt = token.text.as_str();
        let case = term.and_then(Term::case).unwrap_or_default();
        let gender = term.and_then(Term::gender).unwrap_or_default();

        let spoken = match &token.kind {
            TokenKind::Entity | TokenKind::Company => t.entity(txt),
            TokenKind::Person => t.person(txt),
            TokenKind::Email => t.email(txt),
            TokenKind::Hashtag => format!("myllumerki {}", txt.trim_start_matches('#')),
            TokenKind::Time { .. } => t.time(txt),
            TokenKind::Year(_) => t.years(txt),
            // Accusative is the most common case for dates
            TokenKind::Date { .. } => t.date(txt, Case::Accusative),
            TokenKind::Timestamp => t.time(&t.date(txt, Case::Accusative)),
            TokenKind::Ssn | TokenKind::Telno | TokenKind::SerialNumber => t.digits(txt),
            TokenKind::Molecule => t.molecule(txt),
            TokenKind::Username => t.username(txt),
            TokenKind::Domain => t.domain(txt),
            TokenKind::Url => match txt.split_once("://") {
                Some((protocol, domain)) => format!("{}{}", t.spell(protocol, None, false), t.domain(domain)),
                None => t.domain(txt),
            },
            TokenKind::Number => {
                if !txt.chars().filter(|c| *c != '.' && *c != ',').all(|c| c.is_ascii_digit()) {
                    return Some(txt.to_string());
                }
                let spoken = if txt.contains(',') {
                    t.float(txt, case, gender, false, false)
                } else {
                    t.number(txt, case, gender, false)
                };
                spoken.unwrap_or_else(|_| txt.to_string())
            }
            TokenKind::NumWLetter { number, letter } => format!(
                "{} {}",
                t.number(number, Case::Nominative, Gender::Neuter, false).ok()?,
                t.spell(letter, None, false)
            ),
            TokenKind::Ordinal => {
                // The noun after the ordinal decides its number
                let number = term
                    .and_then(|term| term.index)
                    .and_then(|idx| sentence.terms.as_ref()?.get(idx + 1)?.as_ref())
                    .and_then(Term::number)
                    .unwrap_or_default();
                t.ordinal(txt, case, gender, number).unwrap_or_else(|_| txt.to_string())
            }
            TokenKind::Percent { value } => {
                let value = value.replace('.', "");
                let n = t.float(&value, case, Gender::Neuter, false, false).ok()?;
                let word = if txt.contains('%') {
                    "prósent"
                } else if txt.contains('‰') {
                    "prómill"
                } else {
                    // Written out, keep the inflected word as is
                    txt.rsplit(' ').next().unwrap_or("prósent")
                };
                format!("{} {}", n, word)
            }
            TokenKind::Amount { value, code } => {
                let value = value.replace('.', "");
                let n = t.float(&value, case, units::currency_gender(code), false, false).ok()?;
                format!("{} {}", n, t.currency(code, plural_for(&value)))
            }
            TokenKind::Measurement { value, unit } => {
                let value = value.replace('.', "");
                let n = t.float(&value, case, units::unit_gender(unit), false, false).ok()?;
                format!("{} {}", n, t.unit(unit, plural_for(&value)))
            }
            _ => return None,
        };
        Some(spoken)
    }

    /// Handling for tokens without a kind handler. `None` drops the token.
    fn fallback(&self, token: &Token, term: Option<&Term>, sentence: &ParsedSentence) -> Option<String> {
        let t = &self.transcriber;
        let txt = token.text.as_str();

        if is_upper(txt) {
            // Possibly part of an entity name
            return Some(t.entity(txt));
        }
        if abbreviation_shaped(txt)
            && (term.is_some_and(|term| !abbreviation_shaped(&term.lemma))
                || t
                    .lexicon()
                    .abbreviation_meanings(txt)
                    .iter()
                    .any(|m| !abbreviation_shaped(&m.expansion)))
        {
            return Some(t.abbrev(txt));
        }
        if HYPHENS.contains(&txt) {
            if let Some(term) = term.filter(|term| term.parent_arity >= 3) {
                // A hyphen in a phrase of three or more parts denotes a range,
                // unless it's a sports result
                log::trace!("Range hyphen, lemma {:?}", term.lemma);
                let sports = sentence
                    .lemmas
                    .as_ref()
                    .map(|lemmas| lemmas.iter().any(|l| SPORTS_LEMMAS.contains(&l.as_str())));
                return (sports == Some(false)).then(|| "til".to_string());
            }
        }
        Some(txt.to_string())
    }
}

fn plural_for(value: &str) -> Number {
    if num::is_plural(value) {
        Number::Plural
    } else {
        Number::Singular
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Parser returning a fixed analysis.
    struct FixedParser {
        sentences: Vec<ParsedSentence>,
        calls: AtomicUsize,
    }

    impl SyntaxParser for FixedParser {
        fn parse(&self, _text: &str) -> Vec<ParsedSentence> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.sentences.clone()
        }
    }

    fn term(codes: &[&str], lemma: &str, index: usize) -> Option<Term> {
        Some(Term {
            variants: codes.iter().map(|c| c.parse().unwrap()).collect(),
            lemma: lemma.to_string(),
            parent_arity: 1,
            index: Some(index),
        })
    }

    fn word(text: &str) -> Token {
        Token::new(TokenKind::Word, text)
    }

    fn fixed(sentences: Vec<ParsedSentence>) -> (ContextTranscriber, Arc<FixedParser>) {
        let parser = Arc::new(FixedParser { sentences, calls: AtomicUsize::new(0) });
        let ct = ContextTranscriber::new(Transcriber::default(), Arc::clone(&parser) as Arc<dyn SyntaxParser>);
        (ct, parser)
    }

    #[test]
    fn test_number_inflected_from_term() {
        let sentence = ParsedSentence {
            tokens: vec![word("með"), Token::new(TokenKind::Number, "3"), word("hestum")],
            terms: Some(vec![None, term(&["þgf", "kk", "ft"], "3", 1), term(&["þgf", "kk", "ft"], "hestur", 2)]),
            lemmas: Some(vec!["með".into(), "3".into(), "hestur".into()]),
        };
        let (ct, _) = fixed(vec![sentence]);
        assert_eq!(ct.parser_transcribe("með 3 hestum", false), "með þremur hestum");
    }

    #[test]
    fn test_ordinal_number_from_following_term() {
        let sentence = ParsedSentence {
            tokens: vec![word("á"), Token::new(TokenKind::Ordinal, "2."), word("hæðum")],
            terms: Some(vec![None, term(&["þgf", "kvk"], "2.", 1), term(&["þgf", "kvk", "ft"], "hæð", 2)]),
            lemmas: None,
        };
        let (ct, _) = fixed(vec![sentence]);
        assert_eq!(ct.parser_transcribe("á 2. hæðum", false), "á öðrum hæðum");
    }

    #[test]
    fn test_range_hyphen() {
        let range_term = Some(Term { parent_arity: 3, ..Default::default() });
        let tokens = vec![
            Token::new(TokenKind::Number, "2"),
            Token::new(TokenKind::Punctuation, "-"),
            Token::new(TokenKind::Number, "5"),
        ];
        let range = ParsedSentence {
            tokens: tokens.clone(),
            terms: Some(vec![None, range_term.clone(), None]),
            lemmas: Some(vec!["2".into(), "-".into(), "5".into()]),
        };
        let (ct, _) = fixed(vec![range]);
        assert_eq!(ct.parser_transcribe("2-5", false), "tvö til fimm");

        let score = ParsedSentence {
            tokens,
            terms: Some(vec![None, range_term, None]),
            lemmas: Some(vec!["leikur".into(), "2".into(), "-".into(), "5".into()]),
        };
        let (ct, _) = fixed(vec![score]);
        let out = ct.parser_transcribe("2-5", false);
        assert!(!out.contains("til"), "got: {}", out);
        assert!(!out.contains('-'), "got: {}", out);
    }

    #[test]
    fn test_fallbacks() {
        let (ct, _) = fixed(vec![ParsedSentence {
            tokens: vec![word("Hann"), word("sá"), word("KSÍ"), word("t.d."), word("í"), word("gær")],
            terms: None,
            lemmas: None,
        }]);
        let out = ct.parser_transcribe("x", false);
        // Unknown acronyms are spelled out
        assert!(!out.contains("KSÍ"), "got: {}", out);
        assert!(out.contains("<break time=\"20ms\" />í<break"), "got: {}", out);
        assert!(out.contains("til dæmis"), "got: {}", out);
        assert!(out.starts_with("Hann sá"), "got: {}", out);
    }

    #[test]
    fn test_full_text_and_memo() {
        let (ct, parser) = fixed(vec![
            ParsedSentence { tokens: vec![word("Halló"), Token::new(TokenKind::Punctuation, ".")], ..Default::default() },
            ParsedSentence { tokens: vec![word("Bless"), Token::new(TokenKind::Punctuation, "!")], ..Default::default() },
        ]);
        assert_eq!(ct.parser_transcribe("Halló. Bless!", true), "<p><s>Halló.</s> <s>Bless!</s></p>");
        assert_eq!(ct.parser_transcribe("Halló. Bless!", true), "<p><s>Halló.</s> <s>Bless!</s></p>");
        assert_eq!(parser.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ct.parser_transcribe("Halló. Bless!", false), "Halló. Bless!");
        assert_eq!(parser.calls.load(Ordering::SeqCst), 2);
        assert_eq!(ct.parser_transcribe("", true), "");
    }

    #[test]
    fn test_shallow_parser() {
        let ct = ContextTranscriber::shallow(Transcriber::default());
        let out = ct.parser_transcribe("Ég fæddist 25. janúar 1999. Síminn er 581-2345.", true);
        assert!(out.starts_with("<p><s>"), "got: {}", out);
        assert_eq!(out.matches("<s>").count(), 2, "got: {}", out);
        assert!(out.contains("tuttugasta og fimmta janúar"), "got: {}", out);
        assert!(!out.chars().any(|c| c.is_ascii_digit()), "got: {}", out);
    }
}

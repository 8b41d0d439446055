//! Tokenizer: classifies spans of Icelandic text.
//!
//! [`RegexTokenizer`] runs a single leftmost-first alternation over the input.
//! The order of the alternatives matters: longer and more specific token
//! kinds (URLs, dates, amounts) come before the generic number, word and
//! punctuation patterns, so that "25. janúar" is a date and not an ordinal
//! followed by a word.

use std::sync::Arc;

use fancy_regex::{Captures, Regex};
use once_cell::sync::Lazy;

use crate::lexicon::{BuiltinLexicon, Lexicon};
use crate::grammar::Gender;
use crate::transcribe::month_number;
use crate::units;

/// Kind of a token, with the structured value where one is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Punctuation,
    Number,
    /// Ordinal such as "14."
    Ordinal,
    Year(i64),
    Time {
        hour: u32,
        minute: u32,
        second: Option<u32>,
    },
    Date {
        year: Option<i64>,
        month: u32,
        day: Option<u32>,
    },
    /// Date followed by a time of day.
    Timestamp,
    Telno,
    Email,
    Domain,
    Url,
    Hashtag,
    Username,
    /// Bare currency code, e.g. "ISK".
    Currency { code: String },
    /// Number with a currency, `code` is always an ISO code.
    Amount { value: String, code: String },
    Company,
    Percent { value: String },
    Measurement { value: String, unit: String },
    Molecule,
    NumWLetter { number: String, letter: String },
    /// Icelandic kennitala.
    Ssn,
    SerialNumber,
    Person,
    Entity,
}

/// A classified span of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }
}

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Patterns
// ─────────────────────────────────────────────────────────────────────────────

/// Icelandic number: "1.234.567", "12,5", "42".
const NUM: &str = r"(?:[0-9]{1,3}(?:\.[0-9]{3})+|[0-9]+)(?:,[0-9]+)?";

const MONTHS: &str = concat!(
    "janúar|febrúar|mars|apríl|maí|júní|júlí|ágúst|september|október|nóvember|desember|",
    r"jan\.|feb\.|mar\.|apr\.|jún\.|júl\.|ágú\.|sep\.|okt\.|nóv\.|des\."
);

const TOP_LEVEL_DOMAINS: &str = "is|com|org|net|edu|gov|io|eu|dk|no|se|uk|de|fo|info";

const COMPANY_SUFFIXES: &str = "ehf|hf|ohf|sf|ses|slf";

fn alternation<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    items.into_iter().map(regex::escape).collect::<Vec<_>>().join("|")
}

static RE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    let codes = alternation(units::currency_codes());
    let units = alternation(units::unit_symbols());
    let alternatives = [
        ("url", r#"(?:https?|ftp)://[^\s<>"]*[^\s<>".,;:!?)']"#.to_string()),
        ("email", r"(?<![\w.+-])[\w.+-]+@[\w-]+(?:\.[\w-]+)*\.\p{L}{2,}(?!\w)".to_string()),
        (
            "timestamp",
            r"(?<![\w.,])[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}[ T][0-9]{1,2}:[0-9][0-9](?::[0-9][0-9])?(?!\w)".to_string(),
        ),
        (
            "date_iso",
            r"(?<![\w.,])(?P<iy>[0-9]{4})-(?P<im>0?[1-9]|1[0-2])-(?P<id>0?[1-9]|[12][0-9]|3[01])(?![\w-])".to_string(),
        ),
        (
            "date_slash",
            r"(?<![\w.,/])(?P<sd>0?[1-9]|[12][0-9]|3[01])/(?P<sm>0?[1-9]|1[0-2])/(?P<sy>[0-9]{4})(?![\w/])".to_string(),
        ),
        (
            "date_text",
            format!(r"(?<![\w.,])(?P<td>[0-9]{{1,2}})\. (?P<tm>{})(?: (?P<ty>[0-9]{{4}}))?(?!\w)", MONTHS),
        ),
        (
            "time",
            r"(?<![\w.,:])(?P<hh>[01]?[0-9]|2[0-3]):(?P<mm>[0-5][0-9])(?::(?P<ss>[0-5][0-9]))?(?!\w|:[0-9])".to_string(),
        ),
        ("ssn", r"(?<![\w.,-])[0-3][0-9][01][0-9][0-9][0-9]-[0-9]{4}(?![\w-])".to_string()),
        ("telno", r"(?<![\w+.,])(?:\+354 ?)?[0-9]{3}[ -]?[0-9]{4}(?!\w|[.,][0-9])".to_string()),
        ("serial", r"(?<![\w.,-])[0-9]+(?:-[0-9]+){2,}(?![\w-])".to_string()),
        (
            "amount",
            format!(
                r"(?<![\w.,])(?:(?P<amt_sym>[$€£¥]) ?(?P<amt_val1>{num})|(?P<amt_val2>{num}) ?(?P<amt_code>{codes}|kr\.?|[$€£¥]))(?!\w)",
                num = NUM,
                codes = codes
            ),
        ),
        (
            "percent",
            format!(r"(?<![\w.,])(?P<pct_val>-?{}) ?(?:%|‰|prósent\w*)(?!\w)", NUM),
        ),
        (
            "measurement",
            format!(
                r"(?<![\w.,])(?P<meas_val>-?{}) ?(?P<meas_unit>{})(?![\w²³]|\.\w)",
                NUM, units
            ),
        ),
        (
            "molecule",
            r"(?<!\w)(?=[A-Za-z]*[0-9])(?:[A-Z][a-z]?[0-9]{0,3}){2,}(?!\w)".to_string(),
        ),
        ("numwletter", r"(?<![\w.,])(?P<nwl_num>[0-9]+)(?P<nwl_letter>\p{L})(?!\w)".to_string()),
        ("ordinal", r"(?<![\w.,])[0-9]+\.(?= \p{Ll}| ?[,)\-])".to_string()),
        ("year", r"(?<![\w.,])(?:1[1-9]|2[01])[0-9][0-9](?!\w|[.,][0-9])".to_string()),
        ("number", format!(r"(?<![\w.,])-?{}(?!\w)", NUM)),
        ("currency", format!(r"(?<!\w)(?:{})(?!\w)", codes)),
        ("hashtag", r"(?<![\w#])#\w+".to_string()),
        ("username", r"(?<![\w@])@\w+(?:\.\w+)*".to_string()),
        (
            "domain",
            format!(r"(?<![\w@./-])(?:[\w-]+\.)+(?:{})(?!\w|\.\w)", TOP_LEVEL_DOMAINS),
        ),
        (
            "company",
            format!(
                r"(?<!\w)\p{{Lu}}[\w&-]*(?: \p{{Lu}}[\w&-]*)* (?:{})\.?(?!\w)",
                COMPANY_SUFFIXES
            ),
        ),
        (
            "names",
            r"(?<!\w)\p{Lu}\p{Ll}+(?: (?:\p{Lu}\p{Ll}{0,5}\.(?= \p{Lu})|\p{Lu}\p{Ll}+|[IVXLCDM]+(?!\w)))+".to_string(),
        ),
        ("entity", r"(?<!\w)\p{Lu}[\p{Lu}&]*\p{Lu}(?!\w)".to_string()),
        ("word", r"\w+(?:[.'’-]\w+)*\.?".to_string()),
        ("punct", r"[^\w\s]".to_string()),
    ];
    let pattern = alternatives
        .iter()
        .map(|(name, re)| format!("(?P<{}>{})", name, re))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&pattern).unwrap()
});

fn group<'t>(caps: &Captures<'t>, name: &str) -> Option<&'t str> {
    caps.name(name).map(|m| m.as_str())
}

// ─────────────────────────────────────────────────────────────────────────────
// RegexTokenizer
// ─────────────────────────────────────────────────────────────────────────────

/// Pattern-based tokenizer backed by a [`Lexicon`] for abbreviations and names.
#[derive(Clone)]
pub struct RegexTokenizer {
    lexicon: Arc<dyn Lexicon>,
}

impl Default for RegexTokenizer {
    fn default() -> Self {
        Self::new(Arc::new(BuiltinLexicon))
    }
}

impl RegexTokenizer {
    pub fn new(lexicon: Arc<dyn Lexicon>) -> Self {
        Self { lexicon }
    }

    /// A word, with a sentence-final period split off unless the whole thing
    /// is a known abbreviation ("kl.", "t.d.").
    fn push_word(&self, out: &mut Vec<Token>, word: &str) {
        match word.strip_suffix('.') {
            Some(stem) if !stem.is_empty() && !self.lexicon.is_abbreviation(word) => {
                out.push(Token::new(TokenKind::Word, stem));
                out.push(Token::new(TokenKind::Punctuation, "."));
            }
            _ => out.push(Token::new(TokenKind::Word, word)),
        }
    }

    fn classify(&self, caps: &Captures, out: &mut Vec<Token>) {
        let Some(whole) = caps.get(0) else {
            return;
        };
        let text = whole.as_str();
        let parse_u32 = |name: &str| group(caps, name).and_then(|v| v.parse::<u32>().ok());
        let is = |name: &str| caps.name(name).is_some();

        let kind = if is("url") {
            TokenKind::Url
        } else if is("email") {
            TokenKind::Email
        } else if is("timestamp") {
            TokenKind::Timestamp
        } else if is("date_iso") {
            TokenKind::Date {
                year: group(caps, "iy").and_then(|y| y.parse().ok()),
                month: parse_u32("im").unwrap_or(1),
                day: parse_u32("id"),
            }
        } else if is("date_slash") {
            TokenKind::Date {
                year: group(caps, "sy").and_then(|y| y.parse().ok()),
                month: parse_u32("sm").unwrap_or(1),
                day: parse_u32("sd"),
            }
        } else if is("date_text") {
            TokenKind::Date {
                year: group(caps, "ty").and_then(|y| y.parse().ok()),
                month: group(caps, "tm").and_then(month_number).unwrap_or(1),
                day: parse_u32("td"),
            }
        } else if is("time") {
            TokenKind::Time {
                hour: parse_u32("hh").unwrap_or(0),
                minute: parse_u32("mm").unwrap_or(0),
                second: parse_u32("ss"),
            }
        } else if is("ssn") {
            TokenKind::Ssn
        } else if is("telno") {
            TokenKind::Telno
        } else if is("serial") {
            TokenKind::SerialNumber
        } else if is("amount") {
            let value = group(caps, "amt_val1").or_else(|| group(caps, "amt_val2")).unwrap_or_default();
            let symbol = group(caps, "amt_sym").or_else(|| group(caps, "amt_code")).unwrap_or_default();
            TokenKind::Amount {
                value: value.to_string(),
                code: units::currency_code(symbol).to_string(),
            }
        } else if is("percent") {
            TokenKind::Percent { value: group(caps, "pct_val").unwrap_or_default().to_string() }
        } else if is("measurement") {
            TokenKind::Measurement {
                value: group(caps, "meas_val").unwrap_or_default().to_string(),
                unit: group(caps, "meas_unit").unwrap_or_default().to_string(),
            }
        } else if is("molecule") {
            TokenKind::Molecule
        } else if is("numwletter") {
            TokenKind::NumWLetter {
                number: group(caps, "nwl_num").unwrap_or_default().to_string(),
                letter: group(caps, "nwl_letter").unwrap_or_default().to_string(),
            }
        } else if is("ordinal") {
            TokenKind::Ordinal
        } else if is("year") {
            match text.parse() {
                Ok(y) => TokenKind::Year(y),
                Err(_) => TokenKind::Number,
            }
        } else if is("number") {
            TokenKind::Number
        } else if is("currency") {
            TokenKind::Currency { code: text.to_string() }
        } else if is("hashtag") {
            TokenKind::Hashtag
        } else if is("username") {
            TokenKind::Username
        } else if is("domain") {
            TokenKind::Domain
        } else if is("company") {
            TokenKind::Company
        } else if is("names") {
            if self.lexicon.name_gender(text) != Gender::Neuter {
                TokenKind::Person
            } else {
                // Capitalized words that aren't a name
                for part in text.split(' ') {
                    self.push_word(out, part);
                }
                return;
            }
        } else if is("entity") {
            TokenKind::Entity
        } else if is("word") {
            self.push_word(out, text);
            return;
        } else {
            TokenKind::Punctuation
        };
        out.push(Token::new(kind, text));
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut last_end = 0;
        for caps in RE_TOKEN.captures_iter(text) {
            match caps {
                Ok(caps) => {
                    last_end = caps.get(0).map_or(last_end, |m| m.end());
                    self.classify(&caps, &mut tokens);
                }
                Err(e) => {
                    log::warn!("Tokenizer gave up at byte {}: {}", last_end, e);
                    tokens.extend(
                        text[last_end..]
                            .split_whitespace()
                            .map(|w| Token::new(TokenKind::Word, w)),
                    );
                    break;
                }
            }
        }
        log::trace!("Tokenized {:?} into {} tokens", text, tokens.len());
        tokens
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Detokenization
// ─────────────────────────────────────────────────────────────────────────────

const NO_SPACE_BEFORE: &[&str] = &[".", ",", ";", ":", "!", "?", ")", "]", "}", "»", "“", "”", "…"];
const NO_SPACE_AFTER: &[&str] = &["(", "[", "{", "«", "„"];

/// Join tokens back into text.
///
/// Tokens are separated by single spaces, except before closing punctuation
/// and after opening brackets and quotes. Empty tokens are dropped.
pub fn detokenize(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut prev: Option<&Token> = None;
    for token in tokens.iter().filter(|t| !t.text.is_empty()) {
        if let Some(p) = prev {
            let glue = (token.kind == TokenKind::Punctuation && NO_SPACE_BEFORE.contains(&token.text.as_str()))
                || (p.kind == TokenKind::Punctuation && NO_SPACE_AFTER.contains(&p.text.as_str()));
            if !glue {
                out.push(' ');
            }
        }
        out.push_str(&token.text);
        prev = Some(token);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<(TokenKind, String)> {
        RegexTokenizer::default()
            .tokenize(text)
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    fn find(text: &str, pred: impl Fn(&TokenKind) -> bool) -> Token {
        RegexTokenizer::default()
            .tokenize(text)
            .into_iter()
            .find(|t| pred(&t.kind))
            .unwrap_or_else(|| panic!("no matching token in {:?}", text))
    }

    #[test]
    fn test_words_and_punctuation() {
        let toks = kinds("Halló, heimur!");
        assert_eq!(
            toks,
            vec![
                (TokenKind::Word, "Halló".to_string()),
                (TokenKind::Punctuation, ",".to_string()),
                (TokenKind::Word, "heimur".to_string()),
                (TokenKind::Punctuation, "!".to_string()),
            ]
        );
    }

    #[test]
    fn test_abbreviation_keeps_period() {
        let toks = kinds("Hann kom t.d. í gær.");
        assert!(toks.contains(&(TokenKind::Word, "t.d.".to_string())), "got: {:?}", toks);
        assert_eq!(toks.last(), Some(&(TokenKind::Punctuation, ".".to_string())));
    }

    #[test]
    fn test_time_and_date() {
        let text = "Fundurinn er kl. 14:30 þann 25. janúar 2021.";
        let toks = kinds(text);
        assert!(toks.contains(&(TokenKind::Word, "kl.".to_string())), "got: {:?}", toks);
        let time = find(text, |k| matches!(k, TokenKind::Time { .. }));
        assert_eq!(time.kind, TokenKind::Time { hour: 14, minute: 30, second: None });
        let date = find(text, |k| matches!(k, TokenKind::Date { .. }));
        assert_eq!(date.text, "25. janúar 2021");
        assert_eq!(date.kind, TokenKind::Date { year: Some(2021), month: 1, day: Some(25) });
        let iso = find("Dagsetning: 1986-03-07", |k| matches!(k, TokenKind::Date { .. }));
        assert_eq!(iso.kind, TokenKind::Date { year: Some(1986), month: 3, day: Some(7) });
        let stamp = find("Kl. 2021-03-07 14:30 hófst", |k| *k == TokenKind::Timestamp);
        assert_eq!(stamp.text, "2021-03-07 14:30");
    }

    #[test]
    fn test_numbers_ordinals_years() {
        let toks = kinds("Hann lenti í 2. sæti árið 1999 með 42 stig");
        assert!(toks.contains(&(TokenKind::Ordinal, "2.".to_string())), "got: {:?}", toks);
        assert!(toks.contains(&(TokenKind::Year(1999), "1999".to_string())), "got: {:?}", toks);
        assert!(toks.contains(&(TokenKind::Number, "42".to_string())), "got: {:?}", toks);
        let score = kinds("Leikurinn fór 1-5");
        assert_eq!(
            &score[2..],
            &[
                (TokenKind::Number, "1".to_string()),
                (TokenKind::Punctuation, "-".to_string()),
                (TokenKind::Number, "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_amounts_and_measurements() {
        let amount = find("Verðið er 1.500 kr. í dag", |k| matches!(k, TokenKind::Amount { .. }));
        assert_eq!(amount.kind, TokenKind::Amount { value: "1.500".into(), code: "ISK".into() });
        let dollars = find("Það kostar $20", |k| matches!(k, TokenKind::Amount { .. }));
        assert_eq!(dollars.kind, TokenKind::Amount { value: "20".into(), code: "USD".into() });
        let percent = find("Hækkunin var 3,5% í ár", |k| matches!(k, TokenKind::Percent { .. }));
        assert_eq!(percent.kind, TokenKind::Percent { value: "3,5".into() });
        let dist = find("Hann hljóp 12,5 km í dag", |k| matches!(k, TokenKind::Measurement { .. }));
        assert_eq!(dist.kind, TokenKind::Measurement { value: "12,5".into(), unit: "km".into() });
        let currency = find("Gengi ISK lækkaði", |k| matches!(k, TokenKind::Currency { .. }));
        assert_eq!(currency.text, "ISK");
    }

    #[test]
    fn test_internet_tokens() {
        assert_eq!(find("Sendu á jon@example.com núna", |k| *k == TokenKind::Email).text, "jon@example.com");
        assert_eq!(find("Sjá https://mbl.is/frettir í dag", |k| *k == TokenKind::Url).text, "https://mbl.is/frettir");
        assert_eq!(find("Lestu mbl.is í dag", |k| *k == TokenKind::Domain).text, "mbl.is");
        assert_eq!(find("Merkt #tala í dag", |k| *k == TokenKind::Hashtag).text, "#tala");
        assert_eq!(find("Spurðu @notandi um það", |k| *k == TokenKind::Username).text, "@notandi");
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(find("Kennitalan er 010130-2989.", |k| *k == TokenKind::Ssn).text, "010130-2989");
        assert_eq!(find("Hringdu í 581-2345 núna", |k| *k == TokenKind::Telno).text, "581-2345");
        assert_eq!(find("Raðnúmer 12-345-678 fannst", |k| *k == TokenKind::SerialNumber).text, "12-345-678");
        assert_eq!(find("Vatn er H2O", |k| *k == TokenKind::Molecule).text, "H2O");
        let nwl = find("Hann býr í íbúð 14a núna", |k| matches!(k, TokenKind::NumWLetter { .. }));
        assert_eq!(nwl.kind, TokenKind::NumWLetter { number: "14".into(), letter: "a".into() });
    }

    #[test]
    fn test_names() {
        let person = find("Í gær kom Vigdís Finnbogadóttir í heimsókn", |k| *k == TokenKind::Person);
        assert_eq!(person.text, "Vigdís Finnbogadóttir");
        let abbreviated = find("Þar var Jón Jak. Jónsson", |k| *k == TokenKind::Person);
        assert_eq!(abbreviated.text, "Jón Jak. Jónsson");
        assert_eq!(find("Fréttir frá RÚV í dag", |k| *k == TokenKind::Entity).text, "RÚV");
        assert_eq!(find("Í fyrra græddi Eimskip hf. mikið",|k| *k == TokenKind::Company).text, "Eimskip hf.");
        // Capitalized words that aren't a name stay separate words
        let toks = kinds("Háskóli Íslands");
        assert_eq!(toks.len(), 2, "got: {:?}", toks);
        assert!(toks.iter().all(|(k, _)| *k == TokenKind::Word));
    }

    #[test]
    fn test_detokenize() {
        for text in ["Halló, heimur (já)!", "Hann kom t.d. í gær.", "Leikurinn fór 1 - 5"] {
            let tokens = RegexTokenizer::default().tokenize(text);
            assert_eq!(detokenize(&tokens), text);
        }
    }
}

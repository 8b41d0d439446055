//! Token Normalizer: fast, context-free transcription of running text.
//!
//! Tokenizes the input, rewrites every token whose kind is enabled in
//! [`TranscriptionOptions`] and joins the tokens back together. Without a
//! syntax parse there is no way to tell which case a number is in, so numbers
//! default to nominative neuter.

use serde::{Deserialize, Serialize};

use crate::grammar::{Case, Gender, Number};
use crate::num;
use crate::tokenize::{detokenize, RegexTokenizer, Token, TokenKind, Tokenizer};
use crate::transcribe::{date_to_text, time_to_text, Transcriber};
use crate::units;

/// Which token kinds [`Transcriber::token_transcribe`] rewrites.
///
/// Numbers and ordinals are off by default: without sentence context they
/// are as likely to come out in the wrong case as not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionOptions {
    pub emails: bool,
    pub dates: bool,
    pub years: bool,
    pub domains: bool,
    pub urls: bool,
    pub amounts: bool,
    pub measurements: bool,
    pub percentages: bool,
    pub numbers: bool,
    pub ordinals: bool,
}

impl Default for TranscriptionOptions {
    fn default() -> Self {
        Self {
            emails: true,
            dates: true,
            years: true,
            domains: true,
            urls: true,
            amounts: true,
            measurements: true,
            percentages: true,
            numbers: false,
            ordinals: false,
        }
    }
}

/// Abbreviations that are ordinary words when written without a period.
const IGNORED_ABBREVS: &[&str] = &["mið", "fim", "bandar", "mao", "próf", "tom", "mar"];

/// Periods in written numbers group thousands ("5.000").
fn plain(value: &str) -> String {
    value.replace('.', "")
}

fn number_for(value: &str) -> Number {
    if num::is_plural(value) {
        Number::Plural
    } else {
        Number::Singular
    }
}

impl Transcriber {
    /// Quick transcription of Icelandic text for speech synthesis.
    pub fn token_transcribe(&self, text: &str, options: &TranscriptionOptions) -> String {
        let tokenizer = RegexTokenizer::new(self.lexicon_handle());
        let mut tokens = tokenizer.tokenize(text);
        for token in &mut tokens {
            if let Some(spoken) = self.transcribe_token(token, options) {
                token.text = spoken;
            }
        }
        detokenize(&tokens)
    }

    /// Spoken form of one token, `None` to leave it as written.
    fn transcribe_token(&self, token: &Token, opt: &TranscriptionOptions) -> Option<String> {
        let txt = token.text.as_str();
        match &token.kind {
            TokenKind::Word => {
                let meaning = self.lexicon().abbreviation_meanings(txt).first()?;
                (!meaning.foreign && !IGNORED_ABBREVS.contains(&txt)).then(|| meaning.expansion.clone())
            }
            TokenKind::Person | TokenKind::Entity => None,
            TokenKind::Punctuation => (txt == "-").then(|| "bandstrik".to_string()),

            // Numbers and ordinals
            TokenKind::Number if opt.numbers => {
                self.float(&plain(txt), Case::Nominative, Gender::Neuter, false, false).ok()
            }
            TokenKind::Ordinal if opt.ordinals => {
                self.ordinal(txt, Case::Accusative, Gender::Masculine, Number::Singular).ok()
            }

            // Dates and times
            TokenKind::Time { hour, minute, second } => Some(time_to_text(*hour, *minute, *second)),
            // Accusative is the most common case for dates in running text
            TokenKind::Date { year, month, day } if opt.dates => {
                Some(date_to_text(*year, *month, *day, Case::Accusative))
            }
            TokenKind::Year(year) if opt.years => Some(num::year_to_text(*year)),
            TokenKind::Timestamp if opt.dates => Some(self.time(&self.date(txt, Case::Accusative))),

            // Communication and internet
            TokenKind::Telno => Some(self.phone(txt)),
            TokenKind::Email if opt.emails => Some(self.email(txt)),
            TokenKind::Domain if opt.domains => Some(self.domain(txt)),
            TokenKind::Url if opt.urls => {
                let (protocol, domain) = txt.split_once("://")?;
                (!domain.is_empty()).then(|| format!("{}{}", self.spell(protocol, None, false), self.domain(domain)))
            }
            TokenKind::Hashtag => Some(format!("myllumerki {}", txt.trim_start_matches('#'))),
            TokenKind::Username => Some(self.username(txt)),

            // Currency and business
            TokenKind::Currency { code } => Some(self.currency(code, Number::Plural)),
            TokenKind::Amount { value, code } if opt.amounts => {
                let amount = self
                    .float(&plain(value), Case::Nominative, units::currency_gender(code), false, false)
                    .ok()?;
                Some(format!("{} {}", amount, self.currency(code, number_for(value))))
            }
            TokenKind::Company => Some(self.entity(txt)),

            // Science
            TokenKind::Percent { value } if opt.percentages => {
                let spoken = |suffix: &str| {
                    self.float(&plain(value), Case::Nominative, Gender::Neuter, false, false)
                        .ok()
                        .map(|n| format!("{} {}", n, suffix))
                };
                if txt.contains('%') {
                    spoken("prósent")
                } else if txt.contains('‰') {
                    spoken("prómill")
                } else {
                    // Written out, e.g. "3,5 prósent"
                    Some(self.floats(txt, Case::Nominative, Gender::Neuter, false, false))
                }
            }
            TokenKind::Measurement { value, unit } if opt.measurements => {
                let amount = self
                    .float(&plain(value), Case::Nominative, units::unit_gender(unit), false, false)
                    .ok()?;
                Some(format!("{} {}", amount, self.unit(unit, number_for(value))))
            }
            TokenKind::Molecule => Some(self.molecule(txt)),

            // Misc
            TokenKind::NumWLetter { number, letter } => Some(format!(
                "{} {}",
                self.number(number, Case::Nominative, Gender::Neuter, false).ok()?,
                self.spell(letter, None, false)
            )),
            TokenKind::Ssn | TokenKind::SerialNumber => Some(self.digits(txt)),

            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(text: &str) -> String {
        Transcriber::default().token_transcribe(text, &TranscriptionOptions::default())
    }

    #[test]
    fn test_default_options() {
        let opt = TranscriptionOptions::default();
        assert!(opt.emails && opt.dates && opt.years && opt.domains && opt.urls);
        assert!(opt.amounts && opt.measurements && opt.percentages);
        assert!(!opt.numbers && !opt.ordinals);
        let parsed: TranscriptionOptions = serde_json::from_str(r#"{"numbers": true}"#).unwrap();
        assert!(parsed.numbers && parsed.emails);
    }

    #[test]
    fn test_abbreviations_expanded() {
        assert_eq!(norm("Hann kom t.d. í gær."), "Hann kom til dæmis í gær.");
        // Period-less look-alikes are left alone
        assert_eq!(norm("Þetta er mið svæðið"), "Þetta er mið svæðið");
    }

    #[test]
    fn test_times_and_dates() {
        let out = norm("Fundurinn er kl. 14:30 þann 25. janúar 2021.");
        assert_eq!(
            out,
            "Fundurinn er klukkan fjórtán þrjátíu þann tuttugasta og fimmta janúar tvö þúsund tuttugu og eitt."
        );
        assert_eq!(norm("Opið til 00:00"), "Opið til tólf á miðnætti");
        assert_eq!(norm("Árið 1999 var gott"), "Árið nítján hundruð níutíu og níu var gott");
    }

    #[test]
    fn test_numbers_off_by_default() {
        assert_eq!(norm("Hann á 42 kindur"), "Hann á 42 kindur");
        let opt = TranscriptionOptions { numbers: true, ordinals: true, ..Default::default() };
        let t = Transcriber::default();
        assert_eq!(t.token_transcribe("Hann á 42 kindur", &opt), "Hann á fjörutíu og tvö kindur");
        assert_eq!(t.token_transcribe("Hann lenti í 2. sæti", &opt), "Hann lenti í annan sæti");
    }

    #[test]
    fn test_amounts_use_currency_gender_and_number() {
        assert_eq!(norm("Það kostar 21 kr. í dag"), "Það kostar tuttugu og ein króna í dag");
        assert_eq!(norm("Það kostar 2 kr"), "Það kostar tvær krónur");
        assert_eq!(norm("Það kostar $11"), "Það kostar ellefu bandaríkjadalir");
        assert_eq!(norm("Verðið er 5.000 kr"), "Verðið er fimm þúsund krónur");
    }

    #[test]
    fn test_measurements_and_percentages() {
        assert_eq!(norm("Hann hljóp 1 km í dag"), "Hann hljóp einn kílómetri í dag");
        assert_eq!(norm("Hann hljóp 12,5 km"), "Hann hljóp tólf komma fimm kílómetrar");
        assert_eq!(norm("Hækkunin var 3,5%"), "Hækkunin var þrjú komma fimm prósent");
        let disabled = TranscriptionOptions { percentages: false, ..Default::default() };
        assert_eq!(Transcriber::default().token_transcribe("Hækkunin var 3%", &disabled), "Hækkunin var 3%");
    }

    #[test]
    fn test_internet_and_identifiers() {
        let out = norm("Skrifaðu á jon@gmail.com");
        assert!(out.contains(" att gjé meil punktur komm"), "got: {}", out);
        assert_eq!(norm("Merkt #tala"), "Merkt myllumerki tala");
        assert_eq!(norm("Hringdu í 581-2345"), "Hringdu í fimm átta einn-tveir þrír fjórir fimm");
        let out = norm("Leikurinn fór 1-5");
        assert_eq!(out, "Leikurinn fór 1 bandstrik 5");
    }

    #[test]
    fn test_non_ascii_digits_pass_through() {
        let out = norm("Hringdu í ٥٥٥-١٢٣٤ núna");
        assert!(out.contains("٥٥٥-١٢٣٤"), "got: {}", out);
        let opt = TranscriptionOptions { numbers: true, ordinals: true, ..Default::default() };
        let out = Transcriber::default().token_transcribe("Númer ١٢٣ og 7", &opt);
        assert!(out.contains("١٢٣") && out.ends_with("sjö"), "got: {}", out);
    }

    #[test]
    fn test_no_digits_with_everything_enabled() {
        let opt = TranscriptionOptions { numbers: true, ordinals: true, ..Default::default() };
        let t = Transcriber::default();
        let out = t.token_transcribe("Klukkan 13:04 þann 1986-03-07 voru 5.000 kr. og 12 km eftir.", &opt);
        assert!(!out.chars().any(|c| c.is_ascii_digit()), "got: {}", out);
    }
}

//! Transcription functions turning data into text meant to be read aloud.
//!
//! [`Transcriber`] holds one method per supported markup `type`. Every method
//! returns an empty string for empty input and logs its input and output at
//! trace level.

use std::sync::Arc;

use fancy_regex::{Captures, Regex};
use once_cell::sync::Lazy;

use crate::error::{Error, Result};
use crate::grammar::{Case, Gender, Number};
use crate::lexicon::{BuiltinLexicon, Lexicon};
use crate::num::{self, Integer};
use crate::pronunciation::{punctuation_name, PronunciationTables, ENTITY_SPELL};
use crate::units;

/// Remove HTML/SSML tags from a string.
pub fn strip_markup(text: &str) -> String {
    static RE_TAG: Lazy<regex::Regex> = Lazy::new(|| regex::Regex::new(r"<.*?>").unwrap());
    RE_TAG.replace_all(text, "").into_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Dates and times
// ─────────────────────────────────────────────────────────────────────────────

pub const MONTH_NAMES: [&str; 12] = [
    "janúar", "febrúar", "mars", "apríl", "maí", "júní", "júlí", "ágúst", "september", "október",
    "nóvember", "desember",
];

const MONTH_ABBREVS: [&str; 12] = ["jan", "feb", "mar", "apr", "maí", "jún", "júl", "ágú", "sep", "okt", "nóv", "des"];

// "klukkan 14:30", "kl. 2:23:31", "02:15"
static RE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)((?P<klukkan>(kl\.|klukkan)) )?(?P<hour>[0-9]{1,2}):(?P<minute>[0-9][0-9])(:(?P<second>[0-9][0-9]))?").unwrap()
});

// "1986-03-07", "1/4/2001", "25. janúar 1999", "25 des."
static RE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)(?P<year1>[0-9]{1,4})-(?P<month1>[0-9]{1,2})-(?P<day1>[0-9]{1,2})",
        r"|(?P<day2>[0-9]{1,2})/(?P<month2>[0-9]{1,2})/(?P<year2>[0-9]{1,4})",
        r"|(?P<day3>[0-9]{1,2})\.? ?",
        r"(?P<month3>(jan(úar|\.)?|feb(rúar|\.)?|mar(s|\.)?|",
        r"apr(íl|\.)?|maí\.?|jún(í|\.)?|",
        r"júl(í|\.)?|ágú(st|\.)?|sept?(ember|\.)?|",
        r"okt(óber|\.)?|nóv(ember|\.)?|des(ember|\.)?))",
        r"( (?P<year3>[0-9]{1,4}))?",
    ))
    .unwrap()
});

/// Month number for a month name or its three-letter abbreviation.
pub(crate) fn month_number(name: &str) -> Option<u32> {
    let abbrev: String = name.to_lowercase().chars().take(3).collect();
    MONTH_ABBREVS.iter().position(|m| *m == abbrev).map(|i| i as u32 + 1)
}

/// Spoken date: day ordinal, month name and optional year.
pub fn date_to_text(year: Option<i64>, month: u32, day: Option<u32>, case: Case) -> String {
    let mut out = String::new();
    if let Some(day) = day.filter(|&d| d > 0) {
        out.push_str(&num::number_to_ordinal(day, case, Gender::Masculine, Number::Singular));
        out.push(' ');
    }
    // Month names don't inflect here
    let idx = (month.clamp(1, 12) - 1) as usize;
    out.push_str(MONTH_NAMES[idx]);
    if let Some(year) = year.filter(|&y| y != 0) {
        out.push(' ');
        out.push_str(&num::year_to_text(year));
    }
    out
}

/// Spoken time of day.
///
/// 00:00 is "tólf á miðnætti", 12:00 "tólf á hádegi" and anything from
/// 00:01 to 05:59 gets "um nótt" appended.
pub fn time_to_text(hour: u32, minute: u32, second: Option<u32>) -> String {
    let mut hour = hour;
    let mut suffix = None;
    if hour == 0 && minute == 0 {
        hour = 12;
        suffix = Some("á miðnætti");
    } else if hour <= 5 {
        suffix = Some("um nótt");
    } else if hour == 12 && minute == 0 {
        suffix = Some("á hádegi");
    }

    let mut t = vec![num::number_to_text(hour, Case::Nominative, Gender::Neuter, false)];
    for part in [Some(minute), second].into_iter().flatten().filter(|&v| v > 0) {
        if part < 10 {
            // "þrettán núll fjögur"
            t.push("núll".to_string());
        }
        t.push(num::number_to_text(part, Case::Nominative, Gender::Neuter, false));
    }
    if let Some(suffix) = suffix {
        t.push(suffix.to_string());
    }
    t.join(" ")
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Split text into runs of letters, digits and everything else.
///
/// `"hello world,123"` gives `["hello", " ", "world", ",", "123"]`.
pub(crate) fn split_substring_types(t: &str) -> Vec<&str> {
    fn kind(c: char) -> u8 {
        u8::from(c.is_alphabetic()) + 2 * u8::from(c.is_ascii_digit())
    }
    let mut parts = Vec::new();
    let mut start = 0;
    let mut current: Option<u8> = None;
    for (i, c) in t.char_indices() {
        let k = kind(c);
        if current.map_or(false, |cur| cur != k) {
            parts.push(&t[start..i]);
            start = i;
        }
        current = Some(k);
    }
    if start < t.len() {
        parts.push(&t[start..]);
    }
    parts
}

fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_alpha(s: &str) -> bool {
    !s.is_empty() && s.chars().all(char::is_alphabetic)
}

/// Has cased characters and all of them are lowercase.
pub(crate) fn is_lower(s: &str) -> bool {
    s.chars().any(char::is_lowercase) && !s.chars().any(char::is_uppercase)
}

/// Has cased characters and all of them are uppercase.
pub(crate) fn is_upper(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

const VBREAK_STRENGTHS: [&str; 6] = ["none", "x-weak", "weak", "medium", "strong", "x-strong"];

/// `&`, `<` and `>` break speech synthesis engines.
const DANGER_SYMBOLS: [(&str, &str); 5] = [
    ("&", " og "),
    ("<=", " minna eða jafnt og "),
    ("<", " minna en "),
    (">=", " stærra eða jafnt og "),
    (">", " stærra en "),
];

// ─────────────────────────────────────────────────────────────────────────────
// Transcriber
// ─────────────────────────────────────────────────────────────────────────────

/// Phonetic transcription functions for Icelandic speech synthesis.
///
/// Cheap to clone; voice variants differ only in their
/// [`PronunciationTables`].
#[derive(Clone)]
pub struct Transcriber {
    tables: Arc<PronunciationTables>,
    lexicon: Arc<dyn Lexicon>,
}

impl Default for Transcriber {
    fn default() -> Self {
        Self::new(Arc::new(PronunciationTables::default()), Arc::new(BuiltinLexicon))
    }
}

impl std::fmt::Debug for Transcriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transcriber").field("tables", &self.tables).finish_non_exhaustive()
    }
}

impl Transcriber {
    pub fn new(tables: Arc<PronunciationTables>, lexicon: Arc<dyn Lexicon>) -> Self {
        Self { tables, lexicon }
    }

    /// Same lexicon, different pronunciation tables.
    pub fn with_tables(&self, tables: Arc<PronunciationTables>) -> Self {
        Self { tables, lexicon: Arc::clone(&self.lexicon) }
    }

    pub fn tables(&self) -> &PronunciationTables {
        &self.tables
    }

    pub fn lexicon(&self) -> &dyn Lexicon {
        self.lexicon.as_ref()
    }

    pub(crate) fn lexicon_handle(&self) -> Arc<dyn Lexicon> {
        Arc::clone(&self.lexicon)
    }

    fn traced(&self, method: &str, txt: &str, f: impl FnOnce(&str) -> String) -> String {
        log::trace!("Input to {}, txt: {:?}", method, txt);
        let out = if txt.is_empty() { String::new() } else { f(txt) };
        log::trace!("Output from {}, txt: {:?}", method, out);
        out
    }

    fn try_traced(&self, method: &str, txt: &str, f: impl FnOnce(&str) -> Result<String>) -> Result<String> {
        log::trace!("Input to {}, txt: {:?}", method, txt);
        let out = if txt.is_empty() { String::new() } else { f(txt)? };
        log::trace!("Output from {}, txt: {:?}", method, out);
        Ok(out)
    }

    /// Cardinal for a run of ASCII digits.
    fn cardinal(&self, digits: &str, case: Case, gender: Gender) -> String {
        match digits.parse::<Integer>() {
            Ok(n) => num::number_to_text(n, case, gender, false),
            Err(_) => digits.to_string(),
        }
    }

    // ── Symbols ──────────────────────────────────────────────────────────────

    /// Replace symbols that cause issues for speech synthesis engines.
    ///
    /// Character references such as `&amp;` must be decoded first.
    pub fn danger_symbols(&self, txt: &str) -> String {
        self.traced("danger_symbols", txt, |txt| {
            DANGER_SYMBOLS
                .iter()
                .fold(txt.to_string(), |acc, (symbol, spoken)| acc.replace(symbol, spoken))
        })
    }

    // ── Numbers ──────────────────────────────────────────────────────────────

    /// Voicify a number.
    pub fn number(&self, txt: &str, case: Case, gender: Gender, one_hundred: bool) -> Result<String> {
        self.try_traced("number", txt, |txt| {
            let n: Integer = txt.parse()?;
            Ok(num::number_to_text(n, case, gender, one_hundred))
        })
    }

    /// Voicify text containing multiple numbers.
    pub fn numbers(&self, txt: &str, case: Case, gender: Gender, one_hundred: bool) -> String {
        self.traced("numbers", txt, |txt| num::numbers_to_text(txt, case, gender, one_hundred))
    }

    /// Voicify a decimal number.
    pub fn float(&self, txt: &str, case: Case, gender: Gender, one_hundred: bool, comma_null: bool) -> Result<String> {
        self.try_traced("float", txt, |txt| num::float_to_text(txt, case, gender, one_hundred, comma_null))
    }

    /// Voicify text containing multiple decimal numbers.
    pub fn floats(&self, txt: &str, case: Case, gender: Gender, one_hundred: bool, comma_null: bool) -> String {
        self.traced("floats", txt, |txt| {
            num::floats_to_text(txt, case, gender, one_hundred, comma_null)
        })
    }

    /// Voicify an ordinal such as `"14."`.
    pub fn ordinal(&self, txt: &str, case: Case, gender: Gender, number: Number) -> Result<String> {
        self.try_traced("ordinal", txt, |txt| num::str_to_ordinal(txt, case, gender, number))
    }

    /// Voicify text containing multiple ordinals.
    pub fn ordinals(&self, txt: &str, case: Case, gender: Gender, number: Number) -> String {
        self.traced("ordinals", txt, |txt| num::numbers_to_ordinal(txt, case, gender, number))
    }

    /// Spell out digits.
    pub fn digits(&self, txt: &str) -> String {
        self.traced("digits", txt, num::digits_to_text)
    }

    /// Spell out a phone number.
    pub fn phone(&self, txt: &str) -> String {
        self.traced("phone", txt, |txt| self.digits(txt).replace('+', "plús "))
    }

    // ── Dates and times ──────────────────────────────────────────────────────

    /// Voicify every time of day in `txt`.
    pub fn time(&self, txt: &str) -> String {
        self.traced("time", txt, |txt| {
            RE_TIME
                .replace_all(txt, |caps: &Captures| {
                    let value = |name: &str| caps.name(name).and_then(|m| m.as_str().parse::<u32>().ok());
                    let spoken = time_to_text(
                        value("hour").unwrap_or(0),
                        value("minute").unwrap_or(0),
                        value("second"),
                    );
                    if caps.name("klukkan").is_some() {
                        format!("klukkan {}", spoken)
                    } else {
                        spoken
                    }
                })
                .into_owned()
        })
    }

    /// Voicify the first date found in `txt`, leaving the rest intact.
    pub fn date(&self, txt: &str, case: Case) -> String {
        self.traced("date", txt, |txt| {
            let Ok(Some(caps)) = RE_DATE.captures(txt) else {
                return txt.to_string();
            };
            let first = |prefix: &str| {
                (1..=3).find_map(|i| caps.name(&format!("{}{}", prefix, i)).map(|m| m.as_str()))
            };
            let (Some(day), Some(month)) = (first("day"), first("month")) else {
                return txt.to_string();
            };
            let month = if is_decimal(month) { month.parse::<u32>().ok() } else { month_number(month) };
            let Some(month) = month.filter(|m| (1..=12).contains(m)) else {
                return txt.to_string();
            };
            let year = first("year").and_then(|y| y.parse::<i64>().ok());
            let day = day.parse::<u32>().ok();
            let Some(whole) = caps.get(0) else {
                return txt.to_string();
            };
            format!(
                "{}{}{}",
                &txt[..whole.start()],
                date_to_text(year, month, day, case),
                &txt[whole.end()..]
            )
        })
    }

    /// Voicify a year.
    pub fn year(&self, txt: &str) -> Result<String> {
        self.try_traced("year", txt, |txt| {
            let y: i64 = txt.trim().parse().map_err(|_| Error::InvalidNumber(txt.to_string()))?;
            Ok(num::year_to_text(y))
        })
    }

    /// Voicify text containing multiple years.
    pub fn years(&self, txt: &str) -> String {
        self.traced("years", txt, num::years_to_text)
    }

    // ── Spelling ─────────────────────────────────────────────────────────────

    /// Spell out a sequence of characters.
    ///
    /// With `literal`, spaces and punctuation are named too.
    pub fn spell(&self, txt: &str, pause_length: Option<&str>, literal: bool) -> String {
        self.traced("spell", txt, |txt| {
            let name = |c: char| -> String {
                let lower = c.to_lowercase().next().unwrap_or(c);
                if let Some(s) = self.tables.chars.get(&lower) {
                    return s.clone();
                }
                if literal {
                    punctuation_name(c).map_or_else(|| c.to_string(), str::to_string)
                } else if c.is_whitespace() {
                    String::new()
                } else {
                    c.to_string()
                }
            };
            let parts: Vec<String> = txt.chars().map(name).collect();
            let pause = vbreak_time(pause_length.unwrap_or("20ms"));
            format!(
                "{}{}{}",
                vbreak_time("10ms"),
                parts.join(&pause),
                vbreak_time(if parts.len() > 1 { "20ms" } else { "10ms" })
            )
        })
    }

    /// Expand an abbreviation, or spell it out if it has uppercase letters.
    pub fn abbrev(&self, txt: &str) -> String {
        self.traced("abbrev", txt, |txt| {
            let meaning = self.lexicon.abbreviation_meanings(txt).iter().find(|m| !m.foreign);
            if let Some(meaning) = meaning {
                return format!("{}{}{}", vbreak_time("10ms"), meaning.expansion, vbreak_time("50ms"));
            }
            if !is_lower(txt) {
                // "MSc"
                return self.spell(&txt.replace('.', ""), None, false);
            }
            // All lowercase, e.g. "cand.med."
            txt.to_string()
        })
    }

    // ── Currency and units ───────────────────────────────────────────────────

    /// Name of a currency, spelled out when the code is unknown.
    pub fn currency(&self, txt: &str, number: Number) -> String {
        self.traced("currency", txt, |txt| match units::currency_name(txt, number) {
            Some(name) => name.to_string(),
            None => self.spell(txt, None, false),
        })
    }

    /// Name of a unit of measurement, unchanged when unknown.
    pub fn unit(&self, txt: &str, number: Number) -> String {
        self.traced("unit", txt, |txt| {
            units::unit_name(txt, number).map_or_else(|| txt.to_string(), str::to_string)
        })
    }

    // ── Alphanumerics ────────────────────────────────────────────────────────

    /// Voicify the name of a molecule, e.g. "H2SO4".
    pub fn molecule(&self, txt: &str) -> String {
        self.traced("molecule", txt, |txt| {
            split_substring_types(txt)
                .into_iter()
                .map(|x| {
                    if is_decimal(x) {
                        self.cardinal(x, Case::Nominative, Gender::Masculine)
                    } else {
                        self.spell(x, None, true)
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
    }

    /// Voicify an alphanumeric string, spelling each character.
    pub fn numalpha(&self, txt: &str) -> String {
        self.traced("numalpha", txt, |txt| {
            split_substring_types(txt)
                .into_iter()
                .map(|x| if is_decimal(x) { self.digits(x) } else { self.spell(x, None, false) })
                .collect::<Vec<_>>()
                .join(" ")
        })
    }

    /// Numbers of more than two digits are read digit by digit.
    fn short_number_or_digits(&self, x: &str) -> String {
        if x.len() > 2 {
            self.digits(x)
        } else {
            self.cardinal(x, Case::Nominative, Gender::Neuter)
        }
    }

    /// Voicify a username.
    pub fn username(&self, txt: &str) -> String {
        self.traced("username", txt, |txt| {
            let mut out: Vec<String> = Vec::new();
            let txt = match txt.strip_prefix('@') {
                Some(rest) => {
                    out.push("att".to_string());
                    rest
                }
                None => txt,
            };
            for x in split_substring_types(txt) {
                if is_decimal(x) {
                    out.push(self.short_number_or_digits(x));
                } else if is_alpha(x) && x.chars().count() > 2 {
                    // Pronounce as is
                    out.push(x.to_string());
                } else {
                    out.push(self.spell(x, None, true));
                }
            }
            out.join(" ")
        })
    }

    /// Voicify a domain name.
    pub fn domain(&self, txt: &str) -> String {
        self.traced("domain", txt, |txt| {
            split_substring_types(txt)
                .into_iter()
                .map(|x| {
                    if let Some(spoken) = self.tables.domains.get(x) {
                        spoken.clone()
                    } else if is_decimal(x) {
                        self.short_number_or_digits(x)
                    } else if is_alpha(x) && x.chars().count() > 2 {
                        x.to_string()
                    } else if x == "." {
                        "punktur".to_string()
                    } else {
                        self.spell(x, None, true)
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
    }

    /// Voicify an email address.
    pub fn email(&self, txt: &str) -> String {
        self.traced("email", txt, |txt| match txt.split_once('@') {
            Some((user, domain)) => format!("{} att {}", self.username(user), self.domain(domain)),
            None => self.username(txt),
        })
    }

    // ── Names ────────────────────────────────────────────────────────────────

    /// Voicify an entity name.
    pub fn entity(&self, txt: &str) -> String {
        self.traced("entity", txt, |txt| {
            txt.split_whitespace()
                .map(|p| {
                    if let Some(spoken) = self.tables.entities.get(p) {
                        return spoken.clone();
                    }
                    if is_decimal(p) {
                        return self.cardinal(p, Case::Nominative, Gender::Neuter);
                    }
                    let nodots = p.replace('.', "");
                    if ENTITY_SPELL.contains(&nodots.as_str()) {
                        return self.spell(&nodots, None, false);
                    }
                    if is_upper(&nodots) {
                        if self.lexicon.is_known_word(&nodots) {
                            // Uppercased ordinary word
                            return capitalize(&nodots);
                        }
                        return self.spell(&nodots, None, false);
                    }
                    p.to_string()
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
    }

    /// Voicify the name of a person.
    ///
    /// Abbreviated name parts are expanded when the lexicon knows them, a
    /// trailing roman numeral becomes an ordinal ("Kristján X" ->
    /// "Kristján tíundi").
    pub fn person(&self, txt: &str) -> String {
        self.traced("person", txt, |txt| {
            let gender = self.lexicon.name_gender(txt);
            let mut parts: Vec<String> = txt.split_whitespace().map(str::to_string).collect();
            let len = parts.len();
            for i in 0..len {
                if let Some(spoken) = self.tables.persons.get(&parts[i]) {
                    parts[i] = spoken.clone();
                    continue;
                }
                if parts[i].contains('.') {
                    // "Jak." or "Ólafsd."
                    let p = parts[i].clone();
                    let expanded = self.lexicon.abbreviation_meanings(&p).iter().find(|m| {
                        m.gender == gender
                            && !m.foreign
                            && m.expansion.chars().next().map_or(false, char::is_uppercase)
                            && m.expansion.chars().count() > p.chars().count()
                    });
                    parts[i] = match expanded {
                        Some(m) => m.expansion.clone(),
                        None => self.spell(&p.replace('.', ""), None, false),
                    };
                }
                if i + 2 >= len && num::is_roman_numeral(&parts[i]) {
                    parts[i] = num::roman_numeral_to_ordinal(&parts[i], Case::Nominative, gender, Number::Singular);
                }
            }
            parts.join(" ")
        })
    }

    // ── Synthesis markup ─────────────────────────────────────────────────────

    /// A break in the synthesized speech.
    pub fn vbreak(&self, time: Option<&str>, strength: Option<&str>) -> Result<String> {
        if let Some(time) = time.filter(|t| !t.is_empty()) {
            return Ok(vbreak_time(time));
        }
        if let Some(strength) = strength.filter(|s| !s.is_empty()) {
            if !VBREAK_STRENGTHS.contains(&strength) {
                return Err(Error::InvalidBreakStrength(strength.to_string()));
            }
            return Ok(format!("<break strength=\"{}\" />", strength));
        }
        Ok("<break />".to_string())
    }

    /// Paragraph delimiter for speech synthesis.
    pub fn paragraph(&self, txt: &str) -> String {
        self.traced("paragraph", txt, |txt| format!("<p>{}</p>", txt))
    }

    /// Sentence delimiter for speech synthesis.
    pub fn sentence(&self, txt: &str) -> String {
        self.traced("sentence", txt, |txt| format!("<s>{}</s>", txt))
    }
}

fn vbreak_time(time: &str) -> String {
    format!("<break time=\"{}\" />", time)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn tr() -> Transcriber {
        Transcriber::default()
    }

    #[test]
    fn test_time_special_cases() {
        let t = tr();
        assert_eq!(t.time("00:00"), "tólf á miðnætti");
        assert_eq!(t.time("12:00"), "tólf á hádegi");
        assert_eq!(t.time("13:04"), "þrettán núll fjögur");
        assert_eq!(t.time("kl. 14:30"), "klukkan fjórtán þrjátíu");
        assert_eq!(t.time("13:04:06"), "þrettán núll fjögur núll sex");
    }

    #[test]
    fn test_night_times() {
        let t = tr();
        for h in 0..=5 {
            for m in 0..60 {
                if h == 0 && m == 0 {
                    continue;
                }
                let out = t.time(&format!("{:02}:{:02}", h, m));
                assert!(out.contains("um nótt"), "got: {}", out);
                assert!(!out.chars().any(|c| c.is_ascii_digit()), "got: {}", out);
            }
        }
    }

    #[test]
    fn test_dates() {
        let t = tr();
        assert_eq!(t.date("1986-03-07", Case::Nominative), "sjöundi mars nítján hundruð áttatíu og sex");
        assert_eq!(t.date("Þann 25. janúar 1999", Case::Accusative), "Þann tuttugasta og fimmta janúar nítján hundruð níutíu og níu");
        assert_eq!(t.date("1/4/2001", Case::Nominative), "fyrsti apríl tvö þúsund og eitt");
        assert_eq!(t.date("25 des.", Case::Nominative), "tuttugasti og fimmti desember");
        assert_eq!(t.date("engin dagsetning", Case::Nominative), "engin dagsetning");
    }

    #[test]
    fn test_spell() {
        let t = tr();
        let out = t.spell("ab", None, false);
        assert_eq!(
            out,
            "<break time=\"10ms\" />a<break time=\"20ms\" />bé<break time=\"20ms\" />"
        );
        let literal = t.spell("a-", None, true);
        assert!(literal.contains("bandstrik"), "got: {}", literal);
        assert_eq!(t.spell("", None, false), "");
    }

    #[test]
    fn test_abbrev() {
        let t = tr();
        let out = t.abbrev("t.d.");
        assert!(out.contains("til dæmis"), "got: {}", out);
        let msc = t.abbrev("MSc");
        assert!(msc.contains("emm") && msc.contains("ess") && msc.contains("sé"), "got: {}", msc);
        assert_eq!(t.abbrev("cand.med."), "cand.med.");
    }

    #[test]
    fn test_currency_and_unit() {
        let t = tr();
        assert_eq!(t.currency("ISK", Number::Plural), "krónur");
        assert_eq!(t.currency("USD", Number::Singular), "bandaríkjadalur");
        assert!(t.currency("XYZ", Number::Plural).contains("ex"));
        assert_eq!(t.unit("km", Number::Plural), "kílómetrar");
        assert_eq!(t.unit("furlong", Number::Plural), "furlong");
    }

    #[test]
    fn test_molecule_and_numalpha() {
        let t = tr();
        let out = t.molecule("H2O");
        assert!(out.starts_with("<break time=\"10ms\" />há"), "got: {}", out);
        assert!(out.contains(" tveir "), "got: {}", out);
        let na = t.numalpha("A4");
        assert!(na.contains("fjórir"), "got: {}", na);
    }

    #[test]
    fn test_email_and_domain() {
        let t = tr();
        let out = t.email("jon.jonsson@gmail.com");
        assert!(out.contains(" att "), "got: {}", out);
        assert!(out.contains("gjé meil punktur komm"), "got: {}", out);
        assert_eq!(t.domain("visir.is"), "visir punktur is");
        let short = t.domain("ru.is");
        assert!(short.contains("err") && short.ends_with(" punktur is"), "got: {}", short);
    }

    #[test]
    fn test_username() {
        let t = tr();
        let out = t.username("@notandi123");
        assert!(out.starts_with("att notandi einn tveir þrír"), "got: {}", out);
    }

    #[test]
    fn test_entity() {
        let t = tr();
        assert_eq!(t.entity("NATO"), "NATO");
        assert_eq!(t.entity("RANNÍS"), "Rannís");
        let spelled = t.entity("Eimskip hf.");
        assert!(spelled.starts_with("Eimskip "), "got: {}", spelled);
        assert!(spelled.contains("há"), "got: {}", spelled);
    }

    #[test]
    fn test_person() {
        let t = tr();
        assert_eq!(t.person("Kristján X"), "Kristján tíundi");
        assert_eq!(t.person("Jón Jak. Jónsson"), "Jón Jakob Jónsson");
        assert_eq!(t.person("Martin Luther King Jr."), "Martin Luther King djúníor");
        let azure = t.with_tables(Arc::new(PronunciationTables::azure()));
        assert_eq!(azure.person("Joe Biden"), "Djó Bæden");
    }

    #[test]
    fn test_vbreak() {
        let t = tr();
        assert_eq!(t.vbreak(Some("1s"), None).unwrap(), "<break time=\"1s\" />");
        assert_eq!(t.vbreak(None, Some("strong")).unwrap(), "<break strength=\"strong\" />");
        assert_eq!(t.vbreak(None, None).unwrap(), "<break />");
        assert!(matches!(t.vbreak(None, Some("loud")), Err(Error::InvalidBreakStrength(_))));
    }

    #[test]
    fn test_danger_symbols() {
        let t = tr();
        assert_eq!(t.danger_symbols("a & b"), "a  og  b");
        assert_eq!(t.danger_symbols("1<=2"), "1 minna eða jafnt og 2");
    }

    #[test]
    fn test_split_substring_types() {
        assert_eq!(split_substring_types("hello world,123"), vec!["hello", " ", "world", ",", "123"]);
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("<s>Halló <break time=\"1s\" />heimur</s>"), "Halló heimur");
    }
}

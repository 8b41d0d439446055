//! Icelandic numerals.
//!
//! Converts integers, decimals, years and ordinals into spoken Icelandic in a
//! requested case, gender and number. Integers are held as decimal digit
//! strings so that the long-scale names up to "oktilljón" (10^48) work for any
//! input length; splitting off a power of ten is then just slicing.

use std::fmt;
use std::str::FromStr;

use fancy_regex::{Captures, Regex as FancyRegex};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::grammar::{Case, Gender, Number};

// ─────────────────────────────────────────────────────────────────────────────
// Integer
// ─────────────────────────────────────────────────────────────────────────────

/// A signed integer of arbitrary size in canonical decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Integer {
    negative: bool,
    /// No leading zeros; zero is `"0"`.
    digits: String,
}

impl Integer {
    fn from_digits(negative: bool, digits: &str) -> Self {
        let digits = digits.trim_start_matches('0');
        let digits = if digits.is_empty() { "0" } else { digits };
        Self {
            negative: negative && digits != "0",
            digits: digits.to_string(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.digits == "0"
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Absolute value as decimal digits.
    pub fn digits(&self) -> &str {
        &self.digits
    }
}

impl FromStr for Integer {
    type Err = Error;

    /// Accepts an optional sign and Icelandic thousand separators (`1.234.567`).
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let digits: String = body.chars().filter(|&c| c != '.').collect();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidNumber(s.to_string()));
        }
        Ok(Self::from_digits(negative, &digits))
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str(&self.digits)
    }
}

macro_rules! integer_from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for Integer {
            fn from(n: $t) -> Self {
                Self::from_digits(n < 0, &n.unsigned_abs().to_string())
            }
        }
    )*};
}

macro_rules! integer_from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for Integer {
            fn from(n: $t) -> Self {
                Self::from_digits(false, &n.to_string())
            }
        }
    )*};
}

integer_from_signed!(i32, i64, i128);
integer_from_unsigned!(u8, u32, u64, u128, usize);

impl From<&Integer> for Integer {
    fn from(n: &Integer) -> Self {
        n.clone()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Word tables
// ─────────────────────────────────────────────────────────────────────────────

const SUB_20_NEUTRAL: [&str; 20] = [
    "", "eitt", "tvö", "þrjú", "fjögur", "fimm", "sex", "sjö", "átta", "níu", "tíu",
    "ellefu", "tólf", "þrettán", "fjórtán", "fimmtán", "sextán", "sautján", "átján", "nítján",
];

const TENS_NEUTRAL: [&str; 10] = [
    "", "", "tuttugu", "þrjátíu", "fjörutíu", "fimmtíu", "sextíu", "sjötíu", "áttatíu", "níutíu",
];

/// Declined forms of 1–4, indexed `[gender][case]`.
type DeclensionTable = [[&'static str; 4]; 3];

const DECLENSIONS: [(&str, DeclensionTable); 4] = [
    (
        "eitt",
        [
            ["einn", "einn", "einum", "eins"],
            ["ein", "eina", "einni", "einnar"],
            ["eitt", "eitt", "einu", "eins"],
        ],
    ),
    (
        "tvö",
        [
            ["tveir", "tvo", "tveimur", "tveggja"],
            ["tvær", "tvær", "tveimur", "tveggja"],
            ["tvö", "tvö", "tveimur", "tveggja"],
        ],
    ),
    (
        "þrjú",
        [
            ["þrír", "þrjá", "þremur", "þriggja"],
            ["þrjár", "þrjár", "þremur", "þriggja"],
            ["þrjú", "þrjú", "þremur", "þriggja"],
        ],
    ),
    (
        "fjögur",
        [
            ["fjórir", "fjóra", "fjórum", "fjögurra"],
            ["fjórar", "fjórar", "fjórum", "fjögurra"],
            ["fjögur", "fjögur", "fjórum", "fjögurra"],
        ],
    ),
];

fn decline(word: &str, gender: Gender, case: Case) -> Option<&'static str> {
    DECLENSIONS
        .iter()
        .find(|(neutral, _)| *neutral == word)
        .map(|(_, table)| table[gender.index()][case.index()])
}

/// Long-scale names as (power of ten, stem, gender), largest first.
const LARGE_NUMBERS: [(usize, &str, Gender); 12] = [
    (48, "oktilljón", Gender::Feminine),
    (42, "septilljón", Gender::Feminine),
    (36, "sextilljón", Gender::Feminine),
    (30, "kvintilljón", Gender::Feminine),
    (27, "kvaðrilljarð", Gender::Masculine),
    (24, "kvaðrilljón", Gender::Feminine),
    (21, "trilljarð", Gender::Masculine),
    (18, "trilljón", Gender::Feminine),
    (15, "billjarð", Gender::Masculine),
    (12, "billjón", Gender::Feminine),
    (9, "milljarð", Gender::Masculine),
    (6, "milljón", Gender::Feminine),
];

// "milljónir milljarðar" -> "milljónir milljarða"
static RE_SCALE_GENITIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\S*(jónir|jarð[au]r?)) (\S*(jarð|jón))[ia]r").unwrap());

// ─────────────────────────────────────────────────────────────────────────────
// Cardinals
// ─────────────────────────────────────────────────────────────────────────────

/// Whether "og" goes in front of the remainder `digits`.
fn should_prepend_og(digits: &str) -> bool {
    let significant = digits.trim_end_matches('0');
    !significant.is_empty()
        && significant.len() <= 2
        && significant.parse::<u32>().map_or(false, |v| v < 20)
}

fn neutral_words(digits: &str, one_hundred: bool) -> Vec<String> {
    let mut text: Vec<String> = Vec::new();
    let mut rest = digits.trim_start_matches('0');

    while rest.len() > 6 {
        let Some(&(exp, stem, gender)) = LARGE_NUMBERS.iter().find(|(exp, _, _)| *exp < rest.len())
        else {
            break;
        };
        let (count, tail) = rest.split_at(rest.len() - exp);
        text.extend(neutral_words(count, true));

        let last = text.last().cloned().unwrap_or_default();
        let mut name = stem.to_string();
        match gender {
            Gender::Masculine => name.push_str(if last == "eitt" { "ur" } else { "ar" }),
            Gender::Feminine if last != "eitt" => name.push_str("ir"),
            _ => {}
        }
        if let (Some(form), Some(slot)) = (decline(&last, gender, Case::Nominative), text.last_mut()) {
            *slot = form.to_string();
        }
        text.push(name);

        rest = tail.trim_start_matches('0');
        if should_prepend_og(rest) {
            text.push("og".to_string());
        }
    }

    // At most six digits left
    let mut n: u32 = rest.parse().unwrap_or(0);

    if (1000..1_000_000).contains(&n) {
        let thousands = n / 1000;
        n %= 1000;
        if thousands > 1 {
            text.extend(neutral_words(&thousands.to_string(), true));
        } else {
            text.push("eitt".to_string());
        }
        // Singular and plural of "þúsund" coincide
        text.push("þúsund".to_string());
        if should_prepend_og(&n.to_string()) && !(110..200).step_by(10).any(|v| v == n) {
            text.push("og".to_string());
        }
    }

    if (100..1000).contains(&n) {
        let hundreds = n / 100;
        n %= 100;
        if hundreds > 1 {
            text.push(SUB_20_NEUTRAL[hundreds as usize].to_string());
            text.push("hundruð".to_string());
        } else {
            if !text.is_empty() || one_hundred {
                text.push("eitt".to_string());
            }
            text.push("hundrað".to_string());
        }
        if should_prepend_og(&n.to_string()) {
            text.push("og".to_string());
        }
    }

    if (20..100).contains(&n) {
        text.push(TENS_NEUTRAL[(n / 10) as usize].to_string());
        if n % 10 != 0 {
            text.push("og".to_string());
            text.push(SUB_20_NEUTRAL[(n % 10) as usize].to_string());
        }
        n = 0;
    }

    if (1..20).contains(&n) {
        text.push(SUB_20_NEUTRAL[n as usize].to_string());
    }

    text
}

/// Write an integer out as neuter Icelandic text.
///
/// `one_hundred` adds "eitt" in front of a leading "hundrað".
///
/// `number_to_neutral(1337, false)` is "eitt þúsund þrjú hundruð þrjátíu og sjö".
pub fn number_to_neutral<N: Into<Integer>>(n: N, one_hundred: bool) -> String {
    let n = n.into();
    if n.is_zero() {
        return "núll".to_string();
    }
    let joined = neutral_words(n.digits(), one_hundred).join(" ");
    let fixed = RE_SCALE_GENITIVE.replace_all(&joined, "${1} ${3}a");
    if n.is_negative() {
        format!("mínus {}", fixed)
    } else {
        fixed.into_owned()
    }
}

/// Write an integer out in the given case and gender.
///
/// Only a trailing 1–4 inflects; scale nouns keep their own gender.
pub fn number_to_text<N: Into<Integer>>(n: N, case: Case, gender: Gender, one_hundred: bool) -> String {
    let neutral = number_to_neutral(n, one_hundred);
    let mut words: Vec<&str> = neutral.split(' ').collect();
    if let Some(last) = words.last_mut() {
        if let Some(form) = decline(last, gender, case) {
            *last = form;
        }
    }
    words.join(" ")
}

// Matches "15" and "-15", but "1-5" as "1" and "5"
static RE_NUMBERS: Lazy<FancyRegex> = Lazy::new(|| FancyRegex::new(r"((?<![0-9])-)?\b[0-9]+\b").unwrap());

/// Write out every integer found in `text`.
pub fn numbers_to_text(text: &str, case: Case, gender: Gender, one_hundred: bool) -> String {
    RE_NUMBERS
        .replace_all(text, |caps: &Captures| {
            let m = &caps[0];
            match m.parse::<Integer>() {
                Ok(n) => number_to_text(n, case, gender, one_hundred),
                Err(_) => m.to_string(),
            }
        })
        .into_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Decimals
// ─────────────────────────────────────────────────────────────────────────────

/// A decimal split into its integer and fractional digit strings.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Decimal {
    negative: bool,
    whole: Integer,
    /// Trailing zeros stripped; `"0"` when there is no fractional part.
    fraction: String,
}

impl FromStr for Decimal {
    type Err = Error;

    /// Accepts `"14.022,14"`, `"0,42"` and `"3.5"`. With both separators
    /// present the periods group thousands; otherwise a lone period is the
    /// decimal point.
    fn from_str(s: &str) -> Result<Self> {
        let mut text = s.trim().to_string();
        if text.contains(',') && text.contains('.') {
            text = text.replace('.', "");
        }
        let text = text.replace(',', ".");
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(&text)),
        };
        let (whole, fraction) = body.split_once('.').unwrap_or((body, ""));
        let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
            return Err(Error::InvalidNumber(s.to_string()));
        }
        let fraction = fraction.trim_end_matches('0');
        let fraction = if fraction.is_empty() { "0" } else { fraction };
        let negative = negative && !(whole.bytes().all(|b| b == b'0') && fraction == "0");
        Ok(Self {
            negative,
            whole: Integer::from_digits(false, whole),
            fraction: fraction.to_string(),
        })
    }
}

/// Write a decimal number out in the given case and gender.
///
/// One or two significant fraction digits are read as a number
/// ("tveimur komma fjörutíu og einum"), longer fractions digit by digit.
/// A zero fraction is only spoken ("komma núll") when `comma_null` is set.
pub fn float_to_text(
    f: &str,
    case: Case,
    gender: Gender,
    one_hundred: bool,
    comma_null: bool,
) -> Result<String> {
    let d: Decimal = f.parse()?;
    Ok(decimal_to_text(&d, case, gender, one_hundred, comma_null))
}

fn decimal_to_text(d: &Decimal, case: Case, gender: Gender, one_hundred: bool, comma_null: bool) -> String {
    let mut out = String::new();
    if d.negative {
        out.push_str("mínus ");
    }
    out.push_str(&number_to_text(&d.whole, case, gender, one_hundred));

    let mut second = d.fraction.as_str();
    if !comma_null && second == "0" {
        return out;
    }
    out.push_str(" komma ");

    if second.trim_start_matches('0').len() <= 2 {
        // 1,03 -> "einn komma núll þrír"
        while let Some(rest) = second.strip_prefix('0') {
            out.push_str("núll ");
            second = rest;
        }
        if !second.is_empty() {
            out.push_str(&number_to_text(Integer::from_digits(false, second), case, gender, false));
        }
    } else {
        // Only two digits after the point decline, longer tails are nominative
        for digit in second.chars() {
            let idx = digit.to_digit(10).unwrap_or(0) as usize;
            if idx == 0 {
                out.push_str("núll");
            } else {
                let word = SUB_20_NEUTRAL[idx];
                out.push_str(decline(word, gender, Case::Nominative).unwrap_or(word));
            }
            out.push(' ');
        }
    }

    out.trim_end().to_string()
}

static RE_FLOATS: Lazy<FancyRegex> =
    Lazy::new(|| FancyRegex::new(r"((?<![0-9])-)?\b([0-9]{1,3}\.)*[0-9]+(,[0-9]+)?\b").unwrap());

/// Write out every decimal number of the form `14.022,14` or `0,42` in `text`.
pub fn floats_to_text(text: &str, case: Case, gender: Gender, one_hundred: bool, comma_null: bool) -> String {
    RE_FLOATS
        .replace_all(text, |caps: &Captures| {
            let m = &caps[0];
            let plain = m.replace('.', "").replace(',', ".");
            float_to_text(&plain, case, gender, one_hundred, comma_null).unwrap_or_else(|_| m.to_string())
        })
        .into_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Years
// ─────────────────────────────────────────────────────────────────────────────

/// Write a year out as spoken Icelandic.
///
/// 1100–1999 are read in hundreds ("nítján hundruð níutíu og níu"); negative
/// years get "fyrir okkar tímatal" appended.
pub fn year_to_text(year: i64) -> String {
    let suffix = if year < 0 { " fyrir okkar tímatal" } else { "" };
    let year = year.unsigned_abs();

    let text = if (1100..2000).contains(&year) {
        let hundreds = (year / 100) as usize;
        let rest = year % 100;
        let mut words = vec![SUB_20_NEUTRAL[hundreds].to_string(), "hundruð".to_string()];
        if rest > 0 {
            if rest < 20 || rest % 10 == 0 {
                words.push("og".to_string());
            }
            words.push(number_to_neutral(rest, false));
        }
        words.join(" ")
    } else {
        number_to_neutral(year, false)
    };

    text + suffix
}

static RE_YEARS: Lazy<FancyRegex> = Lazy::new(|| FancyRegex::new(r"\b[0-9]{4}(?![\.,][0-9])\b").unwrap());

/// Write out four-digit numbers in `text` as years.
///
/// Numbers outside (850, 2200) are not taken to be years.
pub fn years_to_text(text: &str) -> String {
    RE_YEARS
        .replace_all(text, |caps: &Captures| {
            let m = &caps[0];
            match m.parse::<i64>() {
                Ok(n) if 850 < n && n < 2200 => year_to_text(n),
                _ => m.to_string(),
            }
        })
        .into_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Ordinals
// ─────────────────────────────────────────────────────────────────────────────

/// Ordinal stems for the neutral words 1–19, except "tvö".
const SUB_20_NEUT_TO_ORDINAL: [(&str, &str); 18] = [
    ("eitt", "fyrst"),
    ("þrjú", "þriðj"),
    ("fjögur", "fjórð"),
    ("fimm", "fimmt"),
    ("sex", "sjött"),
    ("sjö", "sjöund"),
    ("átta", "áttund"),
    ("níu", "níund"),
    ("tíu", "tíund"),
    ("ellefu", "elleft"),
    ("tólf", "tólft"),
    ("þrettán", "þrettánd"),
    ("fjórtán", "fjórtánd"),
    ("fimmtán", "fimmtánd"),
    ("sextán", "sextánd"),
    ("sautján", "sautjánd"),
    ("átján", "átjánd"),
    ("nítján", "nítjánd"),
];

const TENS_NEUT_TO_ORDINAL: [(&str, &str); 8] = [
    ("tuttugu", "tuttug"),
    ("þrjátíu", "þrítug"),
    ("fjörutíu", "fertug"),
    ("fimmtíu", "fimmtug"),
    ("sextíu", "sextug"),
    ("sjötíu", "sjötug"),
    ("áttatíu", "átttug"),
    ("níutíu", "nítug"),
];

/// "annar", indexed `[number][gender][case]`.
const ANNAR_TABLE: [DeclensionTable; 2] = [
    [
        ["annar", "annan", "öðrum", "annars"],
        ["önnur", "aðra", "annarri", "annarrar"],
        ["annað", "annað", "öðru", "annars"],
    ],
    [
        ["aðrir", "aðra", "öðrum", "annarra"],
        ["aðrar", "aðrar", "öðrum", "annarra"],
        ["önnur", "önnur", "öðrum", "annarra"],
    ],
];

const SUB_20_ORDINAL_SUFFIX: DeclensionTable = [["i", "a", "a", "a"], ["a", "u", "u", "u"], ["a", "a", "a", "a"]];

const LARGE_ORDINAL_SUFFIX: DeclensionTable = [
    ["asti", "asta", "asta", "asta"],
    ["asta", "ustu", "ustu", "ustu"],
    ["asta", "asta", "asta", "asta"],
];

fn lookup(table: &[(&'static str, &'static str)], word: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == word).map(|(_, v)| *v)
}

/// Turn one word of a written number into its ordinal form.
fn word_to_ordinal(word: &str, case: Case, gender: Gender, number: Number) -> String {
    let (g, c) = (gender.index(), case.index());
    let plural = number == Number::Plural;
    // Feminine oblique forms of the large ordinals share the plural ending
    let ustu = plural || (gender == Gender::Feminine && case != Case::Nominative);

    if word == "núll" {
        return format!("núllt{}", SUB_20_ORDINAL_SUFFIX[g][c]);
    }
    if word == "tvö" {
        return ANNAR_TABLE[plural as usize][g][c].to_string();
    }
    if let Some(stem) = lookup(&SUB_20_NEUT_TO_ORDINAL, word) {
        let suffix = if plural { "u" } else { SUB_20_ORDINAL_SUFFIX[g][c] };
        return format!("{}{}", stem, suffix);
    }
    if let Some(stem) = lookup(&TENS_NEUT_TO_ORDINAL, word) {
        let suffix = if plural { "ustu" } else { LARGE_ORDINAL_SUFFIX[g][c] };
        return format!("{}{}", stem, suffix);
    }
    if word.starts_with("hundr") {
        return if ustu {
            "hundruðustu".to_string()
        } else {
            format!("hundrað{}", LARGE_ORDINAL_SUFFIX[g][c])
        };
    }
    if word == "þúsund" {
        return if ustu {
            "þúsundustu".to_string()
        } else {
            format!("þúsund{}", LARGE_ORDINAL_SUFFIX[g][c])
        };
    }
    if let Some(pos) = word.rfind("jón") {
        let stem = &word[..pos + "jón".len()];
        let suffix = if plural { "ustu" } else { LARGE_ORDINAL_SUFFIX[g][c] };
        return format!("{}{}", stem, suffix);
    }
    if let Some(pos) = word.rfind("jarð") {
        return if ustu {
            format!("{}jörðustu", &word[..pos])
        } else {
            format!("{}{}", &word[..pos + "jarð".len()], LARGE_ORDINAL_SUFFIX[g][c])
        };
    }
    word.to_string()
}

static RE_LARGE_ORDINAL_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[au]st[iau]$").unwrap());
static RE_LEADING_ONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(einn?|eitt) ((\S*)([au]st[iau]))").unwrap());

/// Turn a written neuter number into an ordinal.
///
/// "tvö þúsund og eitt" becomes "tvö þúsundasti og fyrsti".
pub fn neutral_text_to_ordinal(s: &str, case: Case, gender: Gender, number: Number) -> String {
    let mut words: Vec<String> = s.split_whitespace().map(str::to_string).collect();
    let n = words.len();
    if n == 0 {
        return s.to_string();
    }
    words[n - 1] = word_to_ordinal(&words[n - 1], case, gender, number);

    if n >= 3 && words[n - 2] == "og" && !RE_LARGE_ORDINAL_END.is_match(&words[n - 1]) {
        words[n - 3] = word_to_ordinal(&words[n - 3], case, gender, number);
    }

    // "eitt hundraðasti" -> "hundraðasti"
    RE_LEADING_ONE.replace(&words.join(" "), "${2}").into_owned()
}

/// Write an integer out as an ordinal.
pub fn number_to_ordinal<N: Into<Integer>>(n: N, case: Case, gender: Gender, number: Number) -> String {
    neutral_text_to_ordinal(&number_to_neutral(n, false), case, gender, number)
}

/// Like [`number_to_ordinal`] but for text such as `"14."`.
pub fn str_to_ordinal(s: &str, case: Case, gender: Gender, number: Number) -> Result<String> {
    let n: Integer = s.trim().trim_end_matches('.').parse()?;
    Ok(number_to_ordinal(n, case, gender, number))
}

// Ordinals of the form "2.", "101."
static RE_ORDINALS: Lazy<FancyRegex> =
    Lazy::new(|| FancyRegex::new(r"((?<![0-9]\.)-)?\b[0-9]+\.(?=[ ,)-])").unwrap());

/// Write out every ordinal such as `"2."` found in `text`.
pub fn numbers_to_ordinal(text: &str, case: Case, gender: Gender, number: Number) -> String {
    RE_ORDINALS
        .replace_all(text, |caps: &Captures| {
            let m = &caps[0];
            str_to_ordinal(m, case, gender, number).unwrap_or_else(|_| m.to_string())
        })
        .into_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Digits and roman numerals
// ─────────────────────────────────────────────────────────────────────────────

const DIGITS_TO_KK: [&str; 10] = ["núll", "einn", "tveir", "þrír", "fjórir", "fimm", "sex", "sjö", "átta", "níu"];

static RE_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[0-9]+").unwrap());

/// Read digits one by one, e.g. for phone numbers.
///
/// `"581-2345"` becomes "fimm átta einn-tveir þrír fjórir fimm".
pub fn digits_to_text(text: &str) -> String {
    RE_DIGITS
        .replace_all(text, |caps: &regex::Captures| {
            caps[0]
                .chars()
                .filter_map(|c| c.to_digit(10))
                .map(|d| DIGITS_TO_KK[d as usize])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .into_owned()
}

fn roman_value(c: char) -> Option<u32> {
    Some(match c {
        'I' => 1,
        'V' => 5,
        'X' => 10,
        'L' => 50,
        'C' => 100,
        'D' => 500,
        'M' => 1000,
        _ => return None,
    })
}

/// Whether `s` consists only of uppercase roman numeral letters.
pub fn is_roman_numeral(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| roman_value(c).is_some())
}

/// Value of a well-formed roman numeral; other characters are ignored.
pub fn roman_numeral_to_int(s: &str) -> u32 {
    let nums: Vec<u32> = s.to_uppercase().chars().filter_map(roman_value).collect();
    let mut total: i64 = 0;
    for (i, &val) in nums.iter().enumerate() {
        let next = nums[(i + 1).min(nums.len() - 1)];
        if val >= next {
            total += i64::from(val);
        } else {
            total -= i64::from(val);
        }
    }
    total.max(0) as u32
}

/// `"III"` becomes "þriðji", `"MMXXII"` "tvö þúsund tuttugasti og annar".
pub fn roman_numeral_to_ordinal(s: &str, case: Case, gender: Gender, number: Number) -> String {
    number_to_ordinal(roman_numeral_to_int(s), case, gender, number)
}

/// Whether a word following the number written `s` should be plural.
///
/// Singular only when `s` ends in 1 but not in 11: "21 maður", "11 menn".
pub fn is_plural(s: &str) -> bool {
    !(s.ends_with('1') && !s.ends_with("11"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: i64) -> String {
        number_to_text(v, Case::Nominative, Gender::Neuter, false)
    }

    #[test]
    fn test_small_numbers() {
        assert_eq!(n(0), "núll");
        assert_eq!(n(1), "eitt");
        assert_eq!(n(14), "fjórtán");
        assert_eq!(n(20), "tuttugu");
        assert_eq!(n(42), "fjörutíu og tvö");
        assert_eq!(n(100), "hundrað");
        assert_eq!(n(-15), "mínus fimmtán");
    }

    #[test]
    fn test_hundreds_and_thousands() {
        assert_eq!(n(1100), "eitt þúsund og eitt hundrað");
        assert_eq!(n(1337), "eitt þúsund þrjú hundruð þrjátíu og sjö");
        assert_eq!(n(2100), "tvö þúsund og eitt hundrað");
        assert_eq!(n(1120), "eitt þúsund eitt hundrað og tuttugu");
        assert_eq!(n(1200), "eitt þúsund og tvö hundruð");
        assert_eq!(n(101_000), "eitt hundrað og eitt þúsund");
        assert_eq!(
            number_to_text(101, Case::Nominative, Gender::Masculine, false),
            "hundrað og einn"
        );
        assert_eq!(
            number_to_text(100, Case::Nominative, Gender::Neuter, true),
            "eitt hundrað"
        );
        assert_eq!(
            number_to_text(302, Case::Nominative, Gender::Feminine, false),
            "þrjú hundruð og tvær"
        );
        assert_eq!(
            number_to_text(2, Case::Dative, Gender::Masculine, false),
            "tveimur"
        );
    }

    #[test]
    fn test_large_numbers() {
        assert_eq!(n(1_000_000), "ein milljón");
        assert_eq!(n(2_000_000), "tvær milljónir");
        assert_eq!(n(1_000_000_000), "einn milljarður");
        assert_eq!(n(3_000_000_000), "þrír milljarðar");
        assert_eq!(n(1_000_001), "ein milljón og eitt");
        assert_eq!(n(1_000_000_000_000), "ein billjón");
        assert_eq!(n(2_000_000_000_000_000), "tveir billjarðar");
        let big: Integer = "1000000000000000000000000000000000000000000000000".parse().unwrap();
        assert_eq!(number_to_neutral(big, false), "ein oktilljón");
        let huge: Integer = format!("2{}", "0".repeat(54)).parse().unwrap();
        assert_eq!(number_to_neutral(huge, false), "tvær milljónir oktilljóna");
    }

    #[test]
    fn test_no_digits_in_output() {
        for v in (0..3000).chain((1_000_000..1_000_200).step_by(7)) {
            for &case in &Case::ALL {
                for &gender in &Gender::ALL {
                    let out = number_to_text(v, case, gender, false);
                    assert!(!out.chars().any(|c| c.is_ascii_digit()), "got: {}", out);
                }
            }
        }
    }

    #[test]
    fn test_thousand_separators() {
        let v: Integer = "1.234.567".parse().unwrap();
        assert_eq!(v.digits(), "1234567");
        assert!("12a".parse::<Integer>().is_err());
        assert!("".parse::<Integer>().is_err());
    }

    #[test]
    fn test_numbers_in_text() {
        assert_eq!(
            numbers_to_text("Leikurinn fór 1-5 og -15 stig", Case::Nominative, Gender::Neuter, false),
            "Leikurinn fór eitt-fimm og mínus fimmtán stig"
        );
    }

    #[test]
    fn test_floats() {
        let f = |s: &str, g: Gender| float_to_text(s, Case::Nominative, g, false, false).unwrap();
        assert_eq!(f("-0,02", Gender::Masculine), "mínus núll komma núll tveir");
        assert_eq!(f("2,41", Gender::Neuter), "tvö komma fjörutíu og eitt");
        assert_eq!(f("1,03", Gender::Masculine), "einn komma núll þrír");
        assert_eq!(f("3,0", Gender::Neuter), "þrjú");
        assert_eq!(f("14.022,14", Gender::Neuter), "fjórtán þúsund tuttugu og tvö komma fjórtán");
        assert_eq!(f("0,123", Gender::Feminine), "núll komma ein tvær þrjár");
        assert_eq!(
            float_to_text("3", Case::Nominative, Gender::Neuter, false, true).unwrap(),
            "þrjú komma núll"
        );
        assert_eq!(
            float_to_text("2,41", Case::Dative, Gender::Masculine, false, false).unwrap(),
            "tveimur komma fjörutíu og einum"
        );
        assert!(float_to_text("abc", Case::Nominative, Gender::Neuter, false, false).is_err());
    }

    #[test]
    fn test_floats_in_text() {
        let out = floats_to_text("Hitinn var 14,5 stig", Case::Nominative, Gender::Neuter, false, false);
        assert_eq!(out, "Hitinn var fjórtán komma fimm stig");
    }

    #[test]
    fn test_years() {
        assert_eq!(year_to_text(1999), "nítján hundruð níutíu og níu");
        assert_eq!(year_to_text(2004), "tvö þúsund og fjögur");
        assert_eq!(year_to_text(1910), "nítján hundruð og tíu");
        assert_eq!(year_to_text(1905), "nítján hundruð og fimm");
        assert!(year_to_text(-501).ends_with(" fyrir okkar tímatal"));
        assert_eq!(years_to_text("Árið 1999 og 2500"), "Árið nítján hundruð níutíu og níu og 2500");
        assert_eq!(years_to_text("1999,5"), "1999,5");
    }

    #[test]
    fn test_ordinals() {
        let o = |v: i64, c: Case, g: Gender, num: Number| number_to_ordinal(v, c, g, num);
        assert_eq!(o(1, Case::Nominative, Gender::Masculine, Number::Singular), "fyrsti");
        assert_eq!(o(2, Case::Accusative, Gender::Feminine, Number::Plural), "aðrar");
        assert_eq!(o(3, Case::Nominative, Gender::Masculine, Number::Singular), "þriðji");
        assert_eq!(o(100, Case::Nominative, Gender::Masculine, Number::Singular), "hundraðasti");
        assert_eq!(o(20, Case::Dative, Gender::Feminine, Number::Singular), "tuttugustu");
        assert_eq!(o(2001, Case::Nominative, Gender::Masculine, Number::Singular), "tvö þúsundasti og fyrsti");
        assert_eq!(o(1_000_000, Case::Nominative, Gender::Feminine, Number::Singular), "milljónasta");
        assert_eq!(o(0, Case::Nominative, Gender::Masculine, Number::Singular), "núllti");
        assert_eq!(
            str_to_ordinal("14.", Case::Nominative, Gender::Masculine, Number::Singular).unwrap(),
            "fjórtándi"
        );
    }

    #[test]
    fn test_neutral_ordinal_blank_input() {
        let o = |s: &str| neutral_text_to_ordinal(s, Case::Nominative, Gender::Masculine, Number::Singular);
        assert_eq!(o(""), "");
        assert_eq!(o("   "), "   ");
        assert_eq!(o(" tvö "), "annar");
    }

    #[test]
    fn test_ordinals_in_text() {
        let out = numbers_to_ordinal("Hann lenti í 2. sæti", Case::Dative, Gender::Neuter, Number::Singular);
        assert_eq!(out, "Hann lenti í öðru sæti");
    }

    #[test]
    fn test_digits() {
        assert_eq!(digits_to_text("5885522"), "fimm átta átta fimm fimm tveir tveir");
        assert_eq!(
            digits_to_text("Síminn minn er 581-2345"),
            "Síminn minn er fimm átta einn-tveir þrír fjórir fimm"
        );
    }

    #[test]
    fn test_digits_leave_non_ascii_digits() {
        assert_eq!(digits_to_text("٣"), "٣");
        assert_eq!(digits_to_text("١٢٣٤"), "١٢٣٤");
        assert_eq!(digits_to_text("٥٥٥-12"), "٥٥٥-einn tveir");
        assert_eq!(digits_to_text(""), "");
    }

    #[test]
    fn test_roman_numerals() {
        assert_eq!(roman_numeral_to_int("XIV"), 14);
        assert_eq!(roman_numeral_to_int("MMXXII"), 2022);
        assert_eq!(
            roman_numeral_to_ordinal("III", Case::Nominative, Gender::Masculine, Number::Singular),
            "þriðji"
        );
        assert_eq!(
            roman_numeral_to_ordinal("MMXXII", Case::Nominative, Gender::Masculine, Number::Singular),
            "tvö þúsund tuttugasti og annar"
        );
        assert!(is_roman_numeral("VIII"));
        assert!(!is_roman_numeral("Jón"));
    }

    #[test]
    fn test_plural_rule() {
        for s in ["1", "21", "101", "1,1", "31"] {
            assert!(!is_plural(s), "{} should take singular", s);
        }
        for s in ["11", "111", "2", "0", "1,5", "20"] {
            assert!(is_plural(s), "{} should take plural", s);
        }
    }
}

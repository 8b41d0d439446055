//! Abbreviation dictionary and word database.
//!
//! The transcriber only needs three questions answered about the language:
//! what an abbreviation stands for, whether an uppercased token is really an
//! ordinary word, and which gender a person's name has. [`Lexicon`] is that
//! seam; [`BuiltinLexicon`] answers from small embedded tables.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use crate::grammar::Gender;

/// One possible expansion of an abbreviation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbbrevMeaning {
    pub expansion: String,
    pub gender: Gender,
    /// Foreign-language abbreviation (e.g. "PhD"), never expanded in Icelandic.
    pub foreign: bool,
}

pub trait Lexicon: Send + Sync {
    /// Known meanings of `word`, most common first.
    fn abbreviation_meanings(&self, word: &str) -> &[AbbrevMeaning];

    /// Whether `word` (any casing) is an ordinary Icelandic word.
    fn is_known_word(&self, word: &str) -> bool;

    /// Gender of a person's full name; neuter when unknown.
    fn name_gender(&self, name: &str) -> Gender;

    fn is_abbreviation(&self, word: &str) -> bool {
        !self.abbreviation_meanings(word).is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Embedded tables
// ─────────────────────────────────────────────────────────────────────────────

use crate::grammar::Gender::{Feminine as Kvk, Masculine as Kk, Neuter as Hk};

/// (abbreviation, expansion, gender, foreign)
const ABBREVIATIONS: &[(&str, &str, Gender, bool)] = &[
    ("t.d.", "til dæmis", Hk, false),
    ("m.a.", "meðal annars", Hk, false),
    ("o.s.frv.", "og svo framvegis", Hk, false),
    ("o.fl.", "og fleira", Hk, false),
    ("þ.e.", "það er", Hk, false),
    ("þ.e.a.s.", "það er að segja", Hk, false),
    ("u.þ.b.", "um það bil", Hk, false),
    ("þ.á m.", "þar á meðal", Hk, false),
    ("m.t.t.", "með tilliti til", Hk, false),
    ("skv.", "samkvæmt", Hk, false),
    ("sbr.", "samanber", Hk, false),
    ("ath.", "athugið", Hk, false),
    ("nk.", "næstkomandi", Kk, false),
    ("sl.", "síðastliðinn", Kk, false),
    ("kl.", "klukkan", Kvk, false),
    ("nr.", "númer", Hk, false),
    ("bls.", "blaðsíða", Kvk, false),
    ("f.h.", "fyrir hönd", Kvk, false),
    ("e.h.", "eftir hádegi", Hk, false),
    ("f.Kr.", "fyrir Krist", Kk, false),
    ("e.Kr.", "eftir Krist", Kk, false),
    ("dr.", "doktor", Kk, false),
    ("próf.", "prófessor", Kk, false),
    ("frh.", "framhald", Hk, false),
    ("millj.", "milljónir", Kvk, false),
    ("ma.", "milljarðar", Kk, false),
    ("hf.", "hlutafélag", Hk, false),
    ("ehf.", "einkahlutafélag", Hk, false),
    ("ohf.", "opinbert hlutafélag", Hk, false),
    ("mán.", "mánudagur", Kk, false),
    ("þri.", "þriðjudagur", Kk, false),
    ("mið.", "miðvikudagur", Kk, false),
    ("fim.", "fimmtudagur", Kk, false),
    ("fös.", "föstudagur", Kk, false),
    ("lau.", "laugardagur", Kk, false),
    ("sun.", "sunnudagur", Kk, false),
    ("mar.", "mars", Kk, false),
    ("bandar.", "bandarískur", Kk, false),
    ("fv.", "fyrrverandi", Kk, false),
    ("hr.", "herra", Kk, false),
    ("frk.", "fröken", Kvk, false),
    // Name parts
    ("Jak.", "Jakob", Kk, false),
    ("Sig.", "Sigurður", Kk, false),
    ("Guðm.", "Guðmundur", Kk, false),
    ("Kr.", "Kristján", Kk, false),
    ("Ól.", "Ólafur", Kk, false),
    ("Th.", "Th.", Kk, false),
    ("Ólafsd.", "Ólafsdóttir", Kvk, false),
    ("Jónsd.", "Jónsdóttir", Kvk, false),
    ("Sigurðard.", "Sigurðardóttir", Kvk, false),
    // Foreign
    ("MSc", "Master of Science", Hk, true),
    ("BSc", "Bachelor of Science", Hk, true),
    ("PhD", "Doctor of Philosophy", Hk, true),
    ("Ph.D.", "Doctor of Philosophy", Hk, true),
    ("e.g.", "exempli gratia", Hk, true),
    ("i.e.", "id est", Hk, true),
];

/// Ordinary words that also appear written in all caps.
const KNOWN_WORDS: &[&str] = &[
    "nasa", "rannís", "ísland", "alþingi", "strætó", "landsbanki", "háskóli", "veður", "frétt",
    "fréttir", "lögregla", "sjóður", "banki", "hús", "ríki", "borg", "stofa", "félag",
];

const MALE_NAMES: &[&str] = &[
    "Jón", "Guðmundur", "Sigurður", "Gunnar", "Ólafur", "Einar", "Kristján", "Magnús", "Stefán",
    "Jóhann", "Björn", "Árni", "Bjarni", "Helgi", "Halldór", "Páll", "Pétur", "Ragnar", "Þórður",
    "Karl", "Jakob", "Joe", "Friðrik",
];

const FEMALE_NAMES: &[&str] = &[
    "Guðrún", "Anna", "Sigríður", "Kristín", "Margrét", "Helga", "Sigrún", "Ingibjörg", "María",
    "Jóhanna", "Katrín", "Ásta", "Elín", "Hildur", "Ragnheiður", "Guðný", "Vigdís", "Dóra",
];

static ABBREV_INDEX: Lazy<HashMap<&'static str, Vec<AbbrevMeaning>>> = Lazy::new(|| {
    let mut index: HashMap<&'static str, Vec<AbbrevMeaning>> = HashMap::new();
    for &(abbrev, expansion, gender, foreign) in ABBREVIATIONS {
        index.entry(abbrev).or_default().push(AbbrevMeaning {
            expansion: expansion.to_string(),
            gender,
            foreign,
        });
    }
    index
});

static KNOWN_WORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| KNOWN_WORDS.iter().copied().collect());

/// The default lexicon, backed by compiled-in tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinLexicon;

impl Lexicon for BuiltinLexicon {
    fn abbreviation_meanings(&self, word: &str) -> &[AbbrevMeaning] {
        // Period-less forms ("mið", "próf") resolve to their dotted entry
        let found = ABBREV_INDEX.get(word).or_else(|| {
            if word.ends_with('.') {
                None
            } else {
                ABBREV_INDEX.get(format!("{}.", word).as_str())
            }
        });
        found.map(Vec::as_slice).unwrap_or(&[])
    }

    fn is_known_word(&self, word: &str) -> bool {
        KNOWN_WORD_SET.contains(word.to_lowercase().as_str())
    }

    fn name_gender(&self, name: &str) -> Gender {
        let parts: Vec<&str> = name.split_whitespace().collect();
        if let Some(first) = parts.first() {
            if MALE_NAMES.contains(first) {
                return Gender::Masculine;
            }
            if FEMALE_NAMES.contains(first) {
                return Gender::Feminine;
            }
        }
        // Patronymics and matronymics
        for part in parts.iter().rev() {
            let part = part.trim_end_matches('.');
            if part.ends_with("dóttir") || part.ends_with("sd") {
                return Gender::Feminine;
            }
            if part.ends_with("son") {
                return Gender::Masculine;
            }
        }
        Gender::Neuter
    }
}

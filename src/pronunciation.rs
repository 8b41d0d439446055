//! Pronunciation tables, with per-voice overrides.
//!
//! A voice variant starts from a copy of [`PronunciationTables::default`] and
//! replaces individual entries; the transcription logic itself is shared.

use std::collections::HashMap;

/// Lookup tables consulted while spelling and voicing names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PronunciationTables {
    /// How each letter is named when spelled out.
    pub chars: HashMap<char, String>,
    /// Hardcoded pronunciations of all-caps entity names.
    pub entities: HashMap<String, String>,
    /// Hardcoded pronunciations of parts of person names.
    pub persons: HashMap<String, String>,
    /// Pronunciations of common domain name parts.
    pub domains: HashMap<String, String>,
}

const CHAR_PRONUNCIATION: &[(char, &str)] = &[
    ('a', "a"),
    ('á', "á"),
    ('b', "bé"),
    ('c', "sé"),
    ('d', "dé"),
    ('ð', "eð"),
    ('e', "e"),
    ('é', "é"),
    ('f', "eff"),
    ('g', "gé"),
    ('h', "há"),
    ('i', "i"),
    ('í', "í"),
    ('j', "joð"),
    ('k', "ká"),
    ('l', "ell"),
    ('m', "emm"),
    ('n', "enn"),
    ('o', "o"),
    ('ó', "ó"),
    ('p', "pé"),
    ('q', "kú"),
    ('r', "err"),
    ('s', "ess"),
    ('t', "té"),
    ('u', "u"),
    ('ú', "ú"),
    ('v', "vaff"),
    ('w', "tvöfaltvaff"),
    ('x', "ex"),
    ('y', "ufsilon"),
    ('ý', "ufsilon í"),
    ('þ', "þoddn"),
    ('æ', "æ"),
    ('ö', "ö"),
    ('z', "seta"),
];

const ENTITY_PRONUNCIATIONS: &[&str] = &[
    "ABBA", "BOYS", "BUGL", "BYKO", "CAVA", "CERN", "CERT", "EFTA", "ELKO", "NATO", "NEW", "NOVA",
    "PLAY", "PLUS", "RARIK", "RIFF", "RÚV", "SAAB", "SAAS", "SHAH", "SIRI", "UENO", "YVES",
];

const PERSON_PRONUNCIATION: &[(&str, &str)] = &[("Jr", "djúníor"), ("Jr.", "djúníor")];

const DOMAIN_PRONUNCIATIONS: &[(&str, &str)] = &[
    ("is", "is"),
    ("org", "org"),
    ("net", "net"),
    ("com", "komm"),
    ("gmail", "gjé meil"),
    ("hotmail", "hott meil"),
    ("yahoo", "ja húú"),
    ("outlook", "átlúkk"),
];

/// How punctuation symbols are named when spelling literally.
const PUNCTUATION_NAMES: &[(char, &str)] = &[
    (' ', "bil"),
    ('~', "tilda"),
    ('`', "broddur"),
    ('!', "upphrópunarmerki"),
    ('@', "att merki"),
    ('#', "myllumerki"),
    ('$', "dollaramerki"),
    ('%', "prósentumerki"),
    ('^', "tvíbroddur"),
    ('&', "og merki"),
    ('*', "stjarna"),
    ('(', "vinstri svigi"),
    (')', "hægri svigi"),
    ('-', "bandstrik"),
    ('_', "niðurstrik"),
    ('=', "jafnt og merki"),
    ('+', "plús"),
    ('[', "vinstri hornklofi"),
    ('{', "vinstri slaufusvigi"),
    (']', "hægri hornklofi"),
    ('}', "hægri slaufusvigi"),
    ('\\', "bakstrik"),
    ('|', "pípumerki"),
    (';', "semíkomma"),
    (':', "tvípunktur"),
    ('\'', "úrfellingarkomma"),
    ('"', "tvöföld gæsalöpp"),
    (',', "komma"),
    ('<', "vinstri oddklofi"),
    ('.', "punktur"),
    ('>', "hægri oddklofi"),
    ('/', "skástrik"),
    ('?', "spurningarmerki"),
    ('°', "gráðumerki"),
    ('±', "plús-mínus merki"),
    ('—', "þankastrik"),
    ('…', "úrfellingarpunktar"),
    ('™', "vörumerki"),
    ('®', "skrásett vörumerki"),
    ('©', "höfundarréttarmerki"),
];

/// Spoken name of a punctuation symbol.
pub fn punctuation_name(c: char) -> Option<&'static str> {
    PUNCTUATION_NAMES.iter().find(|(p, _)| *p == c).map(|&(_, name)| name)
}

/// Entity name parts that are always spelled out, whatever their casing.
pub const ENTITY_SPELL: &[&str] = &[
    "GmbH", "USS", "Ltd", "bs", "ehf", "h/f", "hf", "hses", "hsf", "ohf", "s/f", "ses", "sf", "slf",
    "slhf", "svf", "vlf", "vmf",
];

fn owned_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|&(k, v)| (k.to_string(), v.to_string())).collect()
}

impl Default for PronunciationTables {
    fn default() -> Self {
        Self {
            chars: CHAR_PRONUNCIATION.iter().map(|&(c, s)| (c, s.to_string())).collect(),
            entities: ENTITY_PRONUNCIATIONS.iter().map(|&e| (e.to_string(), e.to_string())).collect(),
            persons: owned_map(PERSON_PRONUNCIATION),
            domains: owned_map(DOMAIN_PRONUNCIATIONS),
        }
    }
}

impl PronunciationTables {
    /// Overrides tuned for the neural Azure voices, which mispronounce many
    /// letter names and acronyms.
    pub fn azure() -> Self {
        let mut tables = Self::default();
        tables.chars.extend(
            [
                ('b', "bjé"),
                ('c', "sjé"),
                ('d', "djé"),
                ('ð', "eeð"),
                ('e', "eeh"),
                ('é', "jé"),
                ('g', "gjéé"),
                ('i', "ii"),
                ('j', "íoð"),
                ('o', "úa"),
                ('ó', "oú"),
                ('u', "uu"),
                ('r', "errr"),
                ('t', "tjéé"),
                ('ú', "úúu"),
                ('ý', "ufsilon íí"),
                ('þ', "þodn"),
                ('æ', "æí"),
                ('ö', "öö"),
            ]
            .map(|(c, s)| (c, s.to_string())),
        );
        tables.entities.extend(owned_map(&[
            ("BYKO", "Býkó"),
            ("ELKO", "Elkó"),
            ("FIDE", "fídeh"),
            ("FIFA", "fííffah"),
            ("GIRL", "görl"),
            ("LEGO", "llegó"),
            ("MIT", "emm æí tíí"),
            ("NEW", "njúú"),
            ("NOVA", "Nóva"),
            ("PLUS", "plöss"),
            ("SHAH", "Sjah"),
            ("TIME", "tæm"),
            ("UEFA", "júei fa"),
            ("UENO", "júeenó"),
            ("UKIP", "júkipp"),
            ("VISA", "vísa"),
            ("XBOX", "ex box"),
        ]));
        // Replaces the default person table
        tables.persons = owned_map(&[("Joe", "Djó"), ("Biden", "Bæden")]);
        tables
    }
}

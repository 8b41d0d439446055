//! Grammatical categories used to pick inflected word forms.
//!
//! Each category parses from and prints as the short Icelandic code used in
//! markup attributes (`nf`, `kvk`, `ft`, …).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Grammatical case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Case {
    #[default]
    #[serde(rename = "nf")]
    Nominative,
    #[serde(rename = "þf")]
    Accusative,
    #[serde(rename = "þgf")]
    Dative,
    #[serde(rename = "ef")]
    Genitive,
}

/// Grammatical gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "kk")]
    Masculine,
    #[serde(rename = "kvk")]
    Feminine,
    #[default]
    #[serde(rename = "hk")]
    Neuter,
}

/// Grammatical number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Number {
    #[default]
    #[serde(rename = "et")]
    Singular,
    #[serde(rename = "ft")]
    Plural,
}

impl Case {
    pub const ALL: [Case; 4] = [Case::Nominative, Case::Accusative, Case::Dative, Case::Genitive];

    pub fn code(self) -> &'static str {
        match self {
            Case::Nominative => "nf",
            Case::Accusative => "þf",
            Case::Dative => "þgf",
            Case::Genitive => "ef",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Masculine, Gender::Feminine, Gender::Neuter];

    pub fn code(self) -> &'static str {
        match self {
            Gender::Masculine => "kk",
            Gender::Feminine => "kvk",
            Gender::Neuter => "hk",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl Number {
    pub const ALL: [Number; 2] = [Number::Singular, Number::Plural];

    pub fn code(self) -> &'static str {
        match self {
            Number::Singular => "et",
            Number::Plural => "ft",
        }
    }
}

/// Returned when a grammatical code is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCode(pub String);

impl fmt::Display for UnknownCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown grammatical code {:?}", self.0)
    }
}

impl std::error::Error for UnknownCode {}

macro_rules! code_enum_impls {
    ($ty:ty) => {
        impl FromStr for $ty {
            type Err = UnknownCode;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .into_iter()
                    .find(|v| v.code() == s)
                    .ok_or_else(|| UnknownCode(s.to_string()))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

code_enum_impls!(Case);
code_enum_impls!(Gender);
code_enum_impls!(Number);

/// One grammatical variant a syntax term may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Case(Case),
    Gender(Gender),
    Number(Number),
}

impl FromStr for Variant {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse()
            .map(Variant::Case)
            .or_else(|_| s.parse().map(Variant::Gender))
            .or_else(|_| s.parse().map(Variant::Number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(Case::default(), Case::Nominative);
        assert_eq!(Gender::default(), Gender::Neuter);
        assert_eq!(Number::default(), Number::Singular);
    }

    #[test]
    fn test_codes_parse() {
        assert_eq!("þgf".parse::<Case>(), Ok(Case::Dative));
        assert_eq!("kvk".parse::<Gender>(), Ok(Gender::Feminine));
        assert_eq!("ft".parse::<Number>(), Ok(Number::Plural));
        assert!("xx".parse::<Case>().is_err());
        assert_eq!("kk".parse::<Variant>(), Ok(Variant::Gender(Gender::Masculine)));
        assert_eq!(Case::Genitive.to_string(), "ef");
    }
}

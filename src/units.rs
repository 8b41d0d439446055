//! Currency and unit-of-measurement names.
//!
//! Names are stored in nominative singular and plural only; the number in
//! front of them is what gets declined.

use crate::grammar::{Gender, Number};

/// ISO code, singular name, plural name.
const CURRENCY_NAMES: &[(&str, &str, &str)] = &[
    ("ISK", "króna", "krónur"),
    ("DKK", "dönsk króna", "danskar krónur"),
    ("NOK", "norsk króna", "norskar krónur"),
    ("SEK", "sænsk króna", "sænskar krónur"),
    ("GBP", "sterlingspund", "sterlingspund"),
    ("USD", "bandaríkjadalur", "bandaríkjadalir"),
    ("EUR", "evra", "evrur"),
    ("CAD", "kanadískur dalur", "kanadískir dalir"),
    ("AUD", "ástralskur dalur", "ástralskir dalir"),
    ("CHF", "svissneskur franki", "svissneskir frankar"),
    ("JPY", "japanskt jen", "japönsk jen"),
    ("PLN", "pólskt slot", "pólsk slot"),
    ("RUB", "rússnesk rúbla", "rússneskar rúblur"),
    ("CZK", "tékknesk króna", "tékkneskar krónur"),
    ("INR", "indversk rúpía", "indverskar rúpíur"),
    ("IDR", "indónesísk rúpía", "indónesískar rúpíur"),
    ("CNY", "kínverskt júan", "kínversk júan"),
    ("RMB", "kínverskt júan", "kínversk júan"),
    ("HKD", "Hong Kong dalur", "Hong Kong dalir"),
    ("NZD", "nýsjálenskur dalur", "nýsjálenskir dalir"),
    ("SGD", "singapúrskur dalur", "singapúrskir dalir"),
    ("MXN", "mexíkóskt pesó", "mexíkósk pesó"),
    ("ZAR", "suður-afrískt rand", "suður-afrísk rand"),
];

/// Currency symbols and abbreviations recognised in running text.
pub const CURRENCY_SYMBOLS: &[(&str, &str)] = &[
    ("$", "USD"),
    ("€", "EUR"),
    ("£", "GBP"),
    ("¥", "JPY"),
    ("kr.", "ISK"),
    ("kr", "ISK"),
];

/// Unit symbol, singular name, plural name.
const SI_UNIT_NAMES: &[(&str, &str, &str)] = &[
    // Distance
    ("m", "metri", "metrar"),
    ("mm", "millimetri", "millimetrar"),
    ("μm", "míkrómetri", "míkrómetrar"),
    ("cm", "sentimetri", "sentimetrar"),
    ("sm", "sentimetri", "sentimetrar"),
    ("km", "kílómetri", "kílómetrar"),
    ("ft", "fet", "fet"),
    ("mi", "míla", "mílur"),
    // Area
    ("m²", "fermetri", "fermetrar"),
    ("fm", "fermetri", "fermetrar"),
    ("km²", "ferkílómetri", "ferkílómetrar"),
    ("cm²", "fersentimetri", "fersentimetrar"),
    ("ha", "hektari", "hektarar"),
    // Volume
    ("m³", "rúmmetri", "rúmmetrar"),
    ("cm³", "rúmsentimetri", "rúmsentimetrar"),
    ("km³", "rúmkílómetri", "rúmkílómetrar"),
    ("l", "lítri", "lítrar"),
    ("ltr", "lítri", "lítrar"),
    ("dl", "desilítri", "desilítrar"),
    ("cl", "sentilítri", "sentilítrar"),
    ("ml", "millilítri", "millilítrar"),
    ("gal", "gallon", "gallon"),
    ("bbl", "tunna", "tunnur"),
    // Temperature
    ("K", "kelvíngráða", "kelvíngráður"),
    ("°K", "kelvíngráða", "kelvíngráður"),
    ("°C", "gráða á selsíus", "gráður á selsíus"),
    ("°F", "Fahrenheit-gráða", "Fahrenheit-gráður"),
    // Mass
    ("g", "gramm", "grömm"),
    ("gr", "gramm", "grömm"),
    ("kg", "kílógramm", "kílógrömm"),
    ("t", "tonn", "tonn"),
    ("mg", "milligramm", "milligrömm"),
    ("μg", "míkrógramm", "míkrógrömm"),
    ("tn", "tonn", "tonn"),
    ("lb", "pund", "pund"),
    // Duration
    ("s", "sekúnda", "sekúndur"),
    ("ms", "millisekúnda", "millisekúndur"),
    ("μs", "míkrósekúnda", "míkrósekúndur"),
    ("klst", "klukkustund", "klukkustundir"),
    ("mín", "mínúta", "mínútur"),
    // Force
    ("N", "njúton", "njúton"),
    ("kN", "kílónjúton", "kílónjúton"),
    // Energy
    ("J", "júl", "júl"),
    ("kJ", "kílójúl", "kílójúl"),
    ("MJ", "megajúl", "megajúl"),
    ("GJ", "gígajúl", "gígajúl"),
    ("TJ", "terajúl", "terajúl"),
    ("kWh", "kílóvattstund", "kílóvattstundir"),
    ("MWh", "megavattstund", "megavattstundir"),
    ("kWst", "kílóvattstund", "kílóvattstundir"),
    ("MWst", "megavattstund", "megavattstundir"),
    ("kcal", "kílókaloría", "kílókaloríur"),
    ("cal", "kaloría", "kaloríur"),
    // Power
    ("W", "vatt", "vött"),
    ("mW", "millivatt", "millivött"),
    ("kW", "kílóvatt", "kílóvött"),
    ("MW", "megavatt", "megavött"),
    ("GW", "gígavatt", "gígavött"),
    ("TW", "teravatt", "teravött"),
    // Electric potential and current
    ("V", "volt", "volt"),
    ("mV", "millivolt", "millivolt"),
    ("kV", "kílóvolt", "kílóvolt"),
    ("A", "amper", "amper"),
    ("mA", "milliamper", "milliamper"),
    // Frequency
    ("Hz", "herts", "herts"),
    ("kHz", "kílóherts", "kílóherts"),
    ("MHz", "megaherts", "megaherts"),
    ("GHz", "gígaherts", "gígaherts"),
    // Pressure
    ("Pa", "paskal", "pasköl"),
    ("kPa", "kílópaskal", "kílópasköl"),
    ("hPa", "hektópaskal", "hektópasköl"),
    // Angle
    ("°", "gráða", "gráður"),
    // Percentage and permille
    ("%", "prósenta", "prósentur"),
    ("‰", "prómill", "prómill"),
    // Velocity
    ("m/s", "metri á sekúndu", "metrar á sekúndu"),
    ("km/klst", "kílómetri á klukkustund", "kílómetrar á klukkustund"),
];

const KK_UNITS: &[&str] = &[
    "m", "mm", "μm", "cm", "sm", "km", "m²", "fm", "km²", "cm²", "ha", "m³", "cm³", "km³", "l",
    "ltr", "dl", "cl", "ml", "m/s", "km/klst",
];

const KVK_UNITS: &[&str] = &[
    "mi", "bbl", "K", "°K", "°C", "°F", "s", "ms", "μs", "klst", "mín", "kWh", "MWh", "kWst",
    "MWst", "kcal", "cal", "°", "%",
];

fn pick(sg: &'static str, pl: &'static str, number: Number) -> &'static str {
    match number {
        Number::Singular => sg,
        Number::Plural => pl,
    }
}

/// Name of the currency with ISO code `code`.
pub fn currency_name(code: &str, number: Number) -> Option<&'static str> {
    CURRENCY_NAMES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|&(_, sg, pl)| pick(sg, pl, number))
}

/// Grammatical gender of a currency name; most are feminine.
pub fn currency_gender(code: &str) -> Gender {
    match code {
        "USD" | "CHF" | "CAD" => Gender::Masculine,
        "GBP" | "JPY" | "PLN" | "CNY" | "RMB" | "ZAR" => Gender::Neuter,
        _ => Gender::Feminine,
    }
}

/// ISO code for a currency symbol such as `$` or `kr.`; codes map to themselves.
pub fn currency_code(symbol: &str) -> &str {
    CURRENCY_SYMBOLS
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|&(_, code)| code)
        .unwrap_or(symbol)
}

/// All known ISO currency codes.
pub fn currency_codes() -> impl Iterator<Item = &'static str> {
    CURRENCY_NAMES.iter().map(|&(code, _, _)| code)
}

/// Name of the unit `unit`.
pub fn unit_name(unit: &str, number: Number) -> Option<&'static str> {
    SI_UNIT_NAMES
        .iter()
        .find(|(u, _, _)| *u == unit)
        .map(|&(_, sg, pl)| pick(sg, pl, number))
}

pub fn unit_gender(unit: &str) -> Gender {
    if KK_UNITS.contains(&unit) {
        Gender::Masculine
    } else if KVK_UNITS.contains(&unit) {
        Gender::Feminine
    } else {
        Gender::Neuter
    }
}

/// All known unit symbols, longest first so that alternations prefer `km²` over `km`.
pub fn unit_symbols() -> Vec<&'static str> {
    let mut units: Vec<&'static str> = SI_UNIT_NAMES
        .iter()
        .map(|&(u, _, _)| u)
        .filter(|u| !matches!(*u, "%" | "‰"))
        .collect();
    units.sort_by_key(|u| std::cmp::Reverse(u.chars().count()));
    units
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_lookup() {
        assert_eq!(currency_name("ISK", Number::Plural), Some("krónur"));
        assert_eq!(currency_name("USD", Number::Singular), Some("bandaríkjadalur"));
        assert_eq!(currency_name("XYZ", Number::Plural), None);
        assert_eq!(currency_gender("USD"), Gender::Masculine);
        assert_eq!(currency_gender("ISK"), Gender::Feminine);
        assert_eq!(currency_code("€"), "EUR");
        assert_eq!(currency_code("SEK"), "SEK");
    }

    #[test]
    fn test_unit_lookup() {
        assert_eq!(unit_name("km", Number::Singular), Some("kílómetri"));
        assert_eq!(unit_gender("km"), Gender::Masculine);
        assert_eq!(unit_gender("klst"), Gender::Feminine);
        assert_eq!(unit_gender("kg"), Gender::Neuter);
        let symbols = unit_symbols();
        let pos = |s: &str| symbols.iter().position(|u| *u == s).unwrap();
        assert!(pos("km²") < pos("km"));
        assert!(!symbols.contains(&"%"));
    }
}

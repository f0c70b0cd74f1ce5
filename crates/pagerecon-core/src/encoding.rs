//! Standard simple-font encodings and the standard glyph list.
//!
//! Encodings map a one-byte code to a glyph name; the glyph list maps glyph
//! names to Unicode. Keeping the two steps apart lets substitution tables key
//! by glyph name before any Unicode guess is made.

use std::collections::HashMap;
use std::sync::OnceLock;

/// A named standard encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StandardEncoding {
    /// Adobe StandardEncoding.
    Standard,
    /// WinAnsiEncoding (code page 1252).
    WinAnsi,
    /// MacRomanEncoding.
    MacRoman,
    /// PDFDocEncoding.
    PdfDoc,
    /// Built-in encoding of the Symbol font.
    Symbol,
}

impl StandardEncoding {
    /// Parse a PDF encoding name such as `WinAnsiEncoding`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim_start_matches('/') {
            "StandardEncoding" => Some(StandardEncoding::Standard),
            "WinAnsiEncoding" => Some(StandardEncoding::WinAnsi),
            "MacRomanEncoding" => Some(StandardEncoding::MacRoman),
            "PDFDocEncoding" => Some(StandardEncoding::PdfDoc),
            "SymbolEncoding" | "Symbol" => Some(StandardEncoding::Symbol),
            _ => None,
        }
    }

    /// Latin encodings whose printable ASCII range is the identity.
    pub fn is_alphabetic(&self) -> bool {
        !matches!(self, StandardEncoding::Symbol)
    }

    /// Glyph name assigned to `code`, if any.
    pub fn glyph_name(&self, code: u8) -> Option<&'static str> {
        match self {
            StandardEncoding::Standard => match code {
                0x27 => Some("quoteright"),
                0x60 => Some("quoteleft"),
                0x20..=0x7E => ascii_name(code),
                _ => lookup_sparse(STANDARD_HIGH, code),
            },
            StandardEncoding::WinAnsi => match code {
                0x20..=0x7E => ascii_name(code),
                0x7F => Some("bullet"),
                0x80..=0x9F => lookup_sparse(WIN_ANSI_C1, code),
                0xA0 => Some("space"),
                0xA1..=0xFF => latin1_name(code),
                _ => None,
            },
            StandardEncoding::MacRoman => match code {
                0x20..=0x7E => ascii_name(code),
                0x80..=0xFF => MAC_ROMAN_HIGH.get(usize::from(code - 0x80)).copied(),
                _ => None,
            },
            StandardEncoding::PdfDoc => match code {
                0x18..=0x1F => PDF_DOC_ACCENTS.get(usize::from(code - 0x18)).copied(),
                0x20..=0x7E => ascii_name(code),
                0x80..=0x9E => PDF_DOC_C1.get(usize::from(code - 0x80)).copied(),
                0xA0 => Some("Euro"),
                0xA1..=0xFF => latin1_name(code),
                _ => None,
            },
            StandardEncoding::Symbol => lookup_sparse(SYMBOL, code),
        }
    }

    /// Unicode value of `code` through the standard glyph list.
    pub fn decode(&self, code: u8) -> Option<char> {
        self.glyph_name(code).and_then(glyph_name_to_char)
    }
}

/// A simple-font encoding: an optional base plus a Differences overlay.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontEncoding {
    pub base: Option<StandardEncoding>,
    /// Code → glyph name overrides.
    pub differences: HashMap<u8, String>,
}

impl FontEncoding {
    pub fn standard(base: StandardEncoding) -> Self {
        Self {
            base: Some(base),
            differences: HashMap::new(),
        }
    }

    /// Apply a Differences array given as runs of `(first_code, names)`.
    pub fn with_differences<S: AsRef<str>>(mut self, runs: &[(u8, Vec<S>)]) -> Self {
        for (first, names) in runs {
            for (offset, name) in names.iter().enumerate() {
                let Ok(offset) = u8::try_from(offset) else {
                    break;
                };
                let Some(code) = first.checked_add(offset) else {
                    break;
                };
                self.differences.insert(code, name.as_ref().to_string());
            }
        }
        self
    }

    /// The encoding is one of the named standard encodings, unmodified.
    pub fn is_standard(&self) -> bool {
        self.base.is_some() && self.differences.is_empty()
    }

    pub fn glyph_name(&self, code: u8) -> Option<&str> {
        if let Some(name) = self.differences.get(&code) {
            return Some(name.as_str());
        }
        self.base.and_then(|b| b.glyph_name(code))
    }
}

/// Resolve a glyph name to Unicode.
///
/// Handles `uniXXXX`, `uXXXX`..`uXXXXXX`, names with a `.suffix` variant
/// and the standard glyph list.
pub fn glyph_name_to_char(name: &str) -> Option<char> {
    let base = match name.split_once('.') {
        Some((base, _)) if !base.is_empty() => base,
        _ => name,
    };
    if let Some(ch) = glyph_list().get(base) {
        return Some(*ch);
    }
    if let Some(hex) = base.strip_prefix("uni") {
        if hex.len() == 4 {
            return parse_hex_char(hex);
        }
    }
    if let Some(hex) = base.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) {
            return parse_hex_char(hex);
        }
    }
    let mut chars = base.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c),
        _ => None,
    }
}

fn parse_hex_char(hex: &str) -> Option<char> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

fn lookup_sparse(table: &[(u8, &'static str)], code: u8) -> Option<&'static str> {
    table.iter().find(|(c, _)| *c == code).map(|(_, n)| *n)
}

fn ascii_name(code: u8) -> Option<&'static str> {
    ASCII_NAMES.get(usize::from(code.checked_sub(0x20)?)).copied()
}

fn latin1_name(code: u8) -> Option<&'static str> {
    LATIN1_HIGH.get(usize::from(code.checked_sub(0xA1)?)).copied()
}

fn glyph_list() -> &'static HashMap<&'static str, char> {
    static LIST: OnceLock<HashMap<&'static str, char>> = OnceLock::new();
    LIST.get_or_init(|| {
        let mut map: HashMap<&'static str, char> = GLYPH_LIST.iter().copied().collect();
        for (i, name) in ASCII_NAMES.iter().enumerate() {
            if let Some(ch) = char::from_u32(0x20 + i as u32) {
                map.entry(name).or_insert(ch);
            }
        }
        for (i, name) in LATIN1_HIGH.iter().enumerate() {
            if let Some(ch) = char::from_u32(0xA1 + i as u32) {
                map.entry(name).or_insert(ch);
            }
        }
        map
    })
}

/// Names for 0x20..=0x7E shared by the Latin encodings.
const ASCII_NAMES: [&str; 95] = [
    "space", "exclam", "quotedbl", "numbersign", "dollar", "percent", "ampersand", "quotesingle",
    "parenleft", "parenright", "asterisk", "plus", "comma", "hyphen", "period", "slash", "zero",
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "colon", "semicolon",
    "less", "equal", "greater", "question", "at", "A", "B", "C", "D", "E", "F", "G", "H", "I", "J",
    "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z", "bracketleft",
    "backslash", "bracketright", "asciicircum", "underscore", "grave", "a", "b", "c", "d", "e",
    "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r", "s", "t", "u", "v", "w", "x",
    "y", "z", "braceleft", "bar", "braceright", "asciitilde",
];

/// Names for 0xA1..=0xFF, identical to ISO 8859-1.
const LATIN1_HIGH: [&str; 95] = [
    "exclamdown", "cent", "sterling", "currency", "yen", "brokenbar", "section", "dieresis",
    "copyright", "ordfeminine", "guillemotleft", "logicalnot", "hyphen", "registered", "macron",
    "degree", "plusminus", "twosuperior", "threesuperior", "acute", "mu", "paragraph",
    "periodcentered", "cedilla", "onesuperior", "ordmasculine", "guillemotright", "onequarter",
    "onehalf", "threequarters", "questiondown", "Agrave", "Aacute", "Acircumflex", "Atilde",
    "Adieresis", "Aring", "AE", "Ccedilla", "Egrave", "Eacute", "Ecircumflex", "Edieresis",
    "Igrave", "Iacute", "Icircumflex", "Idieresis", "Eth", "Ntilde", "Ograve", "Oacute",
    "Ocircumflex", "Otilde", "Odieresis", "multiply", "Oslash", "Ugrave", "Uacute", "Ucircumflex",
    "Udieresis", "Yacute", "Thorn", "germandbls", "agrave", "aacute", "acircumflex", "atilde",
    "adieresis", "aring", "ae", "ccedilla", "egrave", "eacute", "ecircumflex", "edieresis",
    "igrave", "iacute", "icircumflex", "idieresis", "eth", "ntilde", "ograve", "oacute",
    "ocircumflex", "otilde", "odieresis", "divide", "oslash", "ugrave", "uacute", "ucircumflex",
    "udieresis", "yacute", "thorn", "ydieresis",
];

const WIN_ANSI_C1: &[(u8, &str)] = &[
    (0x80, "Euro"),
    (0x82, "quotesinglbase"),
    (0x83, "florin"),
    (0x84, "quotedblbase"),
    (0x85, "ellipsis"),
    (0x86, "dagger"),
    (0x87, "daggerdbl"),
    (0x88, "circumflex"),
    (0x89, "perthousand"),
    (0x8A, "Scaron"),
    (0x8B, "guilsinglleft"),
    (0x8C, "OE"),
    (0x8E, "Zcaron"),
    (0x91, "quoteleft"),
    (0x92, "quoteright"),
    (0x93, "quotedblleft"),
    (0x94, "quotedblright"),
    (0x95, "bullet"),
    (0x96, "endash"),
    (0x97, "emdash"),
    (0x98, "tilde"),
    (0x99, "trademark"),
    (0x9A, "scaron"),
    (0x9B, "guilsinglright"),
    (0x9C, "oe"),
    (0x9E, "zcaron"),
    (0x9F, "Ydieresis"),
];

const STANDARD_HIGH: &[(u8, &str)] = &[
    (0xA1, "exclamdown"),
    (0xA2, "cent"),
    (0xA3, "sterling"),
    (0xA4, "fraction"),
    (0xA5, "yen"),
    (0xA6, "florin"),
    (0xA7, "section"),
    (0xA8, "currency"),
    (0xA9, "quotesingle"),
    (0xAA, "quotedblleft"),
    (0xAB, "guillemotleft"),
    (0xAC, "guilsinglleft"),
    (0xAD, "guilsinglright"),
    (0xAE, "fi"),
    (0xAF, "fl"),
    (0xB1, "endash"),
    (0xB2, "dagger"),
    (0xB3, "daggerdbl"),
    (0xB4, "periodcentered"),
    (0xB6, "paragraph"),
    (0xB7, "bullet"),
    (0xB8, "quotesinglbase"),
    (0xB9, "quotedblbase"),
    (0xBA, "quotedblright"),
    (0xBB, "guillemotright"),
    (0xBC, "ellipsis"),
    (0xBD, "perthousand"),
    (0xBF, "questiondown"),
    (0xC1, "grave"),
    (0xC2, "acute"),
    (0xC3, "circumflex"),
    (0xC4, "tilde"),
    (0xC5, "macron"),
    (0xC6, "breve"),
    (0xC7, "dotaccent"),
    (0xC8, "dieresis"),
    (0xCA, "ring"),
    (0xCB, "cedilla"),
    (0xCD, "hungarumlaut"),
    (0xCE, "ogonek"),
    (0xCF, "caron"),
    (0xD0, "emdash"),
    (0xE1, "AE"),
    (0xE3, "ordfeminine"),
    (0xE8, "Lslash"),
    (0xE9, "Oslash"),
    (0xEA, "OE"),
    (0xEB, "ordmasculine"),
    (0xF1, "ae"),
    (0xF5, "dotlessi"),
    (0xF8, "lslash"),
    (0xF9, "oslash"),
    (0xFA, "oe"),
    (0xFB, "germandbls"),
];

const MAC_ROMAN_HIGH: [&str; 128] = [
    "Adieresis", "Aring", "Ccedilla", "Eacute", "Ntilde", "Odieresis", "Udieresis", "aacute",
    "agrave", "acircumflex", "adieresis", "atilde", "aring", "ccedilla", "eacute", "egrave",
    "ecircumflex", "edieresis", "iacute", "igrave", "icircumflex", "idieresis", "ntilde", "oacute",
    "ograve", "ocircumflex", "odieresis", "otilde", "uacute", "ugrave", "ucircumflex", "udieresis",
    "dagger", "degree", "cent", "sterling", "section", "bullet", "paragraph", "germandbls",
    "registered", "copyright", "trademark", "acute", "dieresis", "notequal", "AE", "Oslash",
    "infinity", "plusminus", "lessequal", "greaterequal", "yen", "mu", "partialdiff", "summation",
    "product", "pi", "integral", "ordfeminine", "ordmasculine", "Omega", "ae", "oslash",
    "questiondown", "exclamdown", "logicalnot", "radical", "florin", "approxequal", "Delta",
    "guillemotleft", "guillemotright", "ellipsis", "space", "Agrave", "Atilde", "Otilde", "OE",
    "oe", "endash", "emdash", "quotedblleft", "quotedblright", "quoteleft", "quoteright", "divide",
    "lozenge", "ydieresis", "Ydieresis", "fraction", "currency", "guilsinglleft",
    "guilsinglright", "fi", "fl", "daggerdbl", "periodcentered", "quotesinglbase", "quotedblbase",
    "perthousand", "Acircumflex", "Ecircumflex", "Aacute", "Edieresis", "Egrave", "Iacute",
    "Icircumflex", "Idieresis", "Igrave", "Oacute", "Ocircumflex", "apple", "Ograve", "Uacute",
    "Ucircumflex", "Ugrave", "dotlessi", "circumflex", "tilde", "macron", "breve", "dotaccent",
    "ring", "cedilla", "hungarumlaut", "ogonek", "caron",
];

const PDF_DOC_ACCENTS: [&str; 8] = [
    "breve", "caron", "circumflex", "dotaccent", "hungarumlaut", "ogonek", "ring", "tilde",
];

const PDF_DOC_C1: [&str; 31] = [
    "bullet", "dagger", "daggerdbl", "ellipsis", "emdash", "endash", "florin", "fraction",
    "guilsinglleft", "guilsinglright", "minus", "perthousand", "quotedblbase", "quotedblleft",
    "quotedblright", "quoteleft", "quoteright", "quotesinglbase", "trademark", "fi", "fl",
    "Lslash", "OE", "Scaron", "Ydieresis", "Zcaron", "dotlessi", "lslash", "oe", "scaron",
    "zcaron",
];

const SYMBOL: &[(u8, &str)] = &[
    (0x20, "space"),
    (0x21, "exclam"),
    (0x22, "universal"),
    (0x23, "numbersign"),
    (0x24, "existential"),
    (0x25, "percent"),
    (0x26, "ampersand"),
    (0x27, "suchthat"),
    (0x28, "parenleft"),
    (0x29, "parenright"),
    (0x2A, "asteriskmath"),
    (0x2B, "plus"),
    (0x2C, "comma"),
    (0x2D, "minus"),
    (0x2E, "period"),
    (0x2F, "slash"),
    (0x30, "zero"),
    (0x31, "one"),
    (0x32, "two"),
    (0x33, "three"),
    (0x34, "four"),
    (0x35, "five"),
    (0x36, "six"),
    (0x37, "seven"),
    (0x38, "eight"),
    (0x39, "nine"),
    (0x3A, "colon"),
    (0x3B, "semicolon"),
    (0x3C, "less"),
    (0x3D, "equal"),
    (0x3E, "greater"),
    (0x3F, "question"),
    (0x40, "congruent"),
    (0x41, "Alpha"),
    (0x42, "Beta"),
    (0x43, "Chi"),
    (0x44, "Delta"),
    (0x45, "Epsilon"),
    (0x46, "Phi"),
    (0x47, "Gamma"),
    (0x48, "Eta"),
    (0x49, "Iota"),
    (0x4A, "theta1"),
    (0x4B, "Kappa"),
    (0x4C, "Lambda"),
    (0x4D, "Mu"),
    (0x4E, "Nu"),
    (0x4F, "Omicron"),
    (0x50, "Pi"),
    (0x51, "Theta"),
    (0x52, "Rho"),
    (0x53, "Sigma"),
    (0x54, "Tau"),
    (0x55, "Upsilon"),
    (0x56, "sigma1"),
    (0x57, "Omega"),
    (0x58, "Xi"),
    (0x59, "Psi"),
    (0x5A, "Zeta"),
    (0x5B, "bracketleft"),
    (0x5C, "therefore"),
    (0x5D, "bracketright"),
    (0x5E, "perpendicular"),
    (0x5F, "underscore"),
    (0x61, "alpha"),
    (0x62, "beta"),
    (0x63, "chi"),
    (0x64, "delta"),
    (0x65, "epsilon"),
    (0x66, "phi"),
    (0x67, "gamma"),
    (0x68, "eta"),
    (0x69, "iota"),
    (0x6A, "phi1"),
    (0x6B, "kappa"),
    (0x6C, "lambda"),
    (0x6D, "mu"),
    (0x6E, "nu"),
    (0x6F, "omicron"),
    (0x70, "pi"),
    (0x71, "theta"),
    (0x72, "rho"),
    (0x73, "sigma"),
    (0x74, "tau"),
    (0x75, "upsilon"),
    (0x76, "omega1"),
    (0x77, "omega"),
    (0x78, "xi"),
    (0x79, "psi"),
    (0x7A, "zeta"),
    (0x7B, "braceleft"),
    (0x7C, "bar"),
    (0x7D, "braceright"),
    (0x7E, "similar"),
    (0xA3, "lessequal"),
    (0xA5, "infinity"),
    (0xB0, "degree"),
    (0xB1, "plusminus"),
    (0xB3, "greaterequal"),
    (0xB4, "multiply"),
    (0xB7, "bullet"),
    (0xB8, "divide"),
    (0xB9, "notequal"),
    (0xBB, "approxequal"),
    (0xBC, "ellipsis"),
    (0xD6, "radical"),
];

/// Glyph names whose Unicode value is not the ASCII or Latin-1 position of
/// their name in the tables above.
const GLYPH_LIST: &[(&str, char)] = &[
    ("quoteright", '\u{2019}'),
    ("quoteleft", '\u{2018}'),
    ("quotesinglbase", '\u{201A}'),
    ("quotedblleft", '\u{201C}'),
    ("quotedblright", '\u{201D}'),
    ("quotedblbase", '\u{201E}'),
    ("guilsinglleft", '\u{2039}'),
    ("guilsinglright", '\u{203A}'),
    ("Euro", '\u{20AC}'),
    ("florin", '\u{0192}'),
    ("ellipsis", '\u{2026}'),
    ("dagger", '\u{2020}'),
    ("daggerdbl", '\u{2021}'),
    ("circumflex", '\u{02C6}'),
    ("tilde", '\u{02DC}'),
    ("perthousand", '\u{2030}'),
    ("Scaron", '\u{0160}'),
    ("scaron", '\u{0161}'),
    ("Zcaron", '\u{017D}'),
    ("zcaron", '\u{017E}'),
    ("OE", '\u{0152}'),
    ("oe", '\u{0153}'),
    ("Ydieresis", '\u{0178}'),
    ("Lslash", '\u{0141}'),
    ("lslash", '\u{0142}'),
    ("dotlessi", '\u{0131}'),
    ("bullet", '\u{2022}'),
    ("endash", '\u{2013}'),
    ("emdash", '\u{2014}'),
    ("trademark", '\u{2122}'),
    ("fraction", '\u{2044}'),
    ("fi", '\u{FB01}'),
    ("fl", '\u{FB02}'),
    ("ff", '\u{FB00}'),
    ("ffi", '\u{FB03}'),
    ("ffl", '\u{FB04}'),
    ("minus", '\u{2212}'),
    ("breve", '\u{02D8}'),
    ("caron", '\u{02C7}'),
    ("dotaccent", '\u{02D9}'),
    ("hungarumlaut", '\u{02DD}'),
    ("ogonek", '\u{02DB}'),
    ("ring", '\u{02DA}'),
    ("nbspace", '\u{00A0}'),
    ("nonbreakingspace", '\u{00A0}'),
    ("sfthyphen", '\u{00AD}'),
    ("notequal", '\u{2260}'),
    ("infinity", '\u{221E}'),
    ("lessequal", '\u{2264}'),
    ("greaterequal", '\u{2265}'),
    ("partialdiff", '\u{2202}'),
    ("summation", '\u{2211}'),
    ("product", '\u{220F}'),
    ("integral", '\u{222B}'),
    ("radical", '\u{221A}'),
    ("approxequal", '\u{2248}'),
    ("lozenge", '\u{25CA}'),
    ("apple", '\u{F8FF}'),
    ("universal", '\u{2200}'),
    ("existential", '\u{2203}'),
    ("suchthat", '\u{220B}'),
    ("asteriskmath", '\u{2217}'),
    ("congruent", '\u{2245}'),
    ("therefore", '\u{2234}'),
    ("perpendicular", '\u{22A5}'),
    ("similar", '\u{223C}'),
    ("Alpha", '\u{0391}'),
    ("Beta", '\u{0392}'),
    ("Gamma", '\u{0393}'),
    ("Delta", '\u{2206}'),
    ("Epsilon", '\u{0395}'),
    ("Zeta", '\u{0396}'),
    ("Eta", '\u{0397}'),
    ("Theta", '\u{0398}'),
    ("Iota", '\u{0399}'),
    ("Kappa", '\u{039A}'),
    ("Lambda", '\u{039B}'),
    ("Mu", '\u{039C}'),
    ("Nu", '\u{039D}'),
    ("Xi", '\u{039E}'),
    ("Omicron", '\u{039F}'),
    ("Pi", '\u{03A0}'),
    ("Rho", '\u{03A1}'),
    ("Sigma", '\u{03A3}'),
    ("Tau", '\u{03A4}'),
    ("Upsilon", '\u{03A5}'),
    ("Phi", '\u{03A6}'),
    ("Chi", '\u{03A7}'),
    ("Psi", '\u{03A8}'),
    ("Omega", '\u{2126}'),
    ("alpha", '\u{03B1}'),
    ("beta", '\u{03B2}'),
    ("gamma", '\u{03B3}'),
    ("delta", '\u{03B4}'),
    ("epsilon", '\u{03B5}'),
    ("zeta", '\u{03B6}'),
    ("eta", '\u{03B7}'),
    ("theta", '\u{03B8}'),
    ("theta1", '\u{03D1}'),
    ("iota", '\u{03B9}'),
    ("kappa", '\u{03BA}'),
    ("lambda", '\u{03BB}'),
    ("mu", '\u{00B5}'),
    ("nu", '\u{03BD}'),
    ("xi", '\u{03BE}'),
    ("omicron", '\u{03BF}'),
    ("pi", '\u{03C0}'),
    ("rho", '\u{03C1}'),
    ("sigma", '\u{03C3}'),
    ("sigma1", '\u{03C2}'),
    ("tau", '\u{03C4}'),
    ("upsilon", '\u{03C5}'),
    ("phi", '\u{03C6}'),
    ("phi1", '\u{03D5}'),
    ("chi", '\u{03C7}'),
    ("psi", '\u{03C8}'),
    ("omega", '\u{03C9}'),
    ("omega1", '\u{03D6}'),
];

//! Font substitution map: configured remap tables and font-name matching.
//!
//! The map is loaded once from JSON, validated, and then shared read-only
//! (typically behind an `Arc`) by every document processed with it.
//!
//! ```json
//! {
//!   "fonts": [
//!     { "pattern": "Wingdings", "family": "Wingdings", "tables": ["dings"] },
//!     { "pattern": "^Fnt\\d+$", "regex": true, "bold": true, "tables": ["custom"],
//!       "hash": "9f86d081884c7d65..." }
//!   ],
//!   "tables": {
//!     "dings": { "a": 9824, "0041": 9827 },
//!     "custom": { "g12": 65 }
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::FontMapError;

#[derive(Debug, Deserialize)]
struct FontMapFile {
    #[serde(default)]
    fonts: Vec<FontEntryConfig>,
    #[serde(default)]
    tables: HashMap<String, HashMap<String, u32>>,
}

#[derive(Debug, Deserialize)]
struct FontEntryConfig {
    pattern: String,
    #[serde(default)]
    regex: bool,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    italic: bool,
    family: Option<String>,
    #[serde(default)]
    tables: Vec<String>,
    hash: Option<String>,
}

#[derive(Debug, Clone)]
enum Matcher {
    /// Lowercased literal, matched as a substring.
    Substring(String),
    Regex(Regex),
}

/// A configured substitution entry.
#[derive(Debug, Clone)]
pub struct FontMapEntry {
    pub pattern: String,
    matcher: Matcher,
    pub bold: bool,
    pub italic: bool,
    /// Substitution family reported for matching fonts.
    pub family: String,
    /// Indices into the map's entity tables, in lookup order.
    pub tables: Vec<usize>,
    /// Hex SHA-256 of the code → glyph-index table this entry was made for.
    pub hash: Option<String>,
}

impl FontMapEntry {
    pub fn is_regex(&self) -> bool {
        matches!(self.matcher, Matcher::Regex(_))
    }

    fn matches(&self, cleaned: &str, system_font: bool) -> bool {
        match &self.matcher {
            Matcher::Substring(needle) => cleaned.to_lowercase().contains(needle.as_str()),
            // Recognized system font names never go through regex entries.
            Matcher::Regex(re) => !system_font && re.is_match(cleaned),
        }
    }
}

/// A named entity table: glyph name or hex code key → code point.
#[derive(Debug, Clone, Default)]
pub struct EntityTable {
    pub name: String,
    entries: HashMap<String, char>,
}

impl EntityTable {
    pub fn get(&self, key: &str) -> Option<char> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of matching a font name against the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontMatch {
    /// A configured entry matched. `duplicate` is set when the name matched
    /// but the glyph-table hash did not.
    Mapped { entry: usize, duplicate: bool },
    /// No entry matched but the name is a common system font.
    System { family: String },
    /// Nothing matched; the font needs follow-up.
    Unknown,
}

impl FontMatch {
    pub fn entry(&self) -> Option<usize> {
        match self {
            FontMatch::Mapped { entry, .. } => Some(*entry),
            _ => None,
        }
    }
}

/// A font name with its subset tag and style suffixes removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedName {
    pub name: String,
    pub bold: bool,
    pub italic: bool,
}

/// Immutable font substitution configuration.
#[derive(Debug, Clone, Default)]
pub struct FontMap {
    entries: Vec<FontMapEntry>,
    tables: Vec<EntityTable>,
}

impl FontMap {
    /// A map with no entries: every font falls through to system or unknown.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON font map.
    pub fn from_json_str(json: &str) -> Result<Self, FontMapError> {
        let file: FontMapFile = serde_json::from_str(json)?;
        Self::from_file(file)
    }

    /// Read, parse and validate a JSON font map from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FontMapError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    fn from_file(file: FontMapFile) -> Result<Self, FontMapError> {
        let mut names: Vec<&String> = file.tables.keys().collect();
        names.sort();
        let mut tables = Vec::with_capacity(names.len());
        let mut index = HashMap::new();
        for name in names {
            let mut entries = HashMap::new();
            for (key, &value) in &file.tables[name] {
                let ch = char::from_u32(value).ok_or_else(|| FontMapError::InvalidCodePoint {
                    table: name.clone(),
                    key: key.clone(),
                    value,
                })?;
                entries.insert(key.clone(), ch);
            }
            index.insert(name.clone(), tables.len());
            tables.push(EntityTable {
                name: name.clone(),
                entries,
            });
        }

        let mut entries = Vec::with_capacity(file.fonts.len());
        for cfg in file.fonts {
            let matcher = if cfg.regex {
                let re = Regex::new(&cfg.pattern).map_err(|source| FontMapError::Regex {
                    pattern: cfg.pattern.clone(),
                    source,
                })?;
                Matcher::Regex(re)
            } else {
                Matcher::Substring(cfg.pattern.to_lowercase())
            };
            let mut table_ids = Vec::with_capacity(cfg.tables.len());
            for table in &cfg.tables {
                let id = index
                    .get(table)
                    .copied()
                    .ok_or_else(|| FontMapError::UnknownTable {
                        pattern: cfg.pattern.clone(),
                        table: table.clone(),
                    })?;
                table_ids.push(id);
            }
            entries.push(FontMapEntry {
                family: cfg.family.unwrap_or_else(|| cfg.pattern.clone()),
                pattern: cfg.pattern,
                matcher,
                bold: cfg.bold,
                italic: cfg.italic,
                tables: table_ids,
                hash: cfg.hash.map(|h| h.to_ascii_lowercase()),
            });
        }
        Ok(Self { entries, tables })
    }

    pub fn entries(&self) -> &[FontMapEntry] {
        &self.entries
    }

    pub fn entry(&self, idx: usize) -> Option<&FontMapEntry> {
        self.entries.get(idx)
    }

    pub fn table(&self, name: &str) -> Option<&EntityTable> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Look `key` up in the entry's tables, in order.
    pub fn lookup(&self, entry: usize, key: &str) -> Option<char> {
        let entry = self.entries.get(entry)?;
        entry
            .tables
            .iter()
            .filter_map(|&t| self.tables.get(t))
            .find_map(|t| t.get(key))
    }

    /// Match a raw font name, with the hash of its code → glyph-index table
    /// when the font has one.
    ///
    /// The first entry whose name matches and whose hash is absent or equal
    /// wins. If every name match carries a different hash, the first one is
    /// still used but flagged as a possible duplicate mapping.
    pub fn match_font(&self, raw_name: &str, glyph_hash: Option<&str>) -> FontMatch {
        let cleaned = clean_font_name(raw_name);
        let system = system_family(&cleaned.name);
        let mut first_mismatch = None;
        for (idx, entry) in self.entries.iter().enumerate() {
            if !entry.matches(&cleaned.name, system.is_some()) {
                continue;
            }
            let hash_ok = match (entry.hash.as_deref(), glyph_hash) {
                (Some(expected), Some(actual)) => expected.eq_ignore_ascii_case(actual),
                _ => true,
            };
            if hash_ok {
                return FontMatch::Mapped {
                    entry: idx,
                    duplicate: false,
                };
            }
            first_mismatch.get_or_insert(idx);
        }
        if let Some(entry) = first_mismatch {
            return FontMatch::Mapped {
                entry,
                duplicate: true,
            };
        }
        match system {
            Some(family) => FontMatch::System {
                family: family.to_string(),
            },
            None => FontMatch::Unknown,
        }
    }
}

fn subset_prefix() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]{6}\+").ok()).as_ref()
}

fn style_suffix() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)[-_,\s]*(bolditalic|boldoblique|semibold|demibold|bold|italic|oblique|black|heavy|regular)$",
        )
        .ok()
    })
    .as_ref()
}

fn vendor_suffix() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-_,\s]*(PSMT|MT|PS)$").ok()).as_ref()
}

/// Strip a `ABCDEF+` subset tag and trailing style or vendor suffixes,
/// noting the style they carried.
pub fn clean_font_name(raw: &str) -> CleanedName {
    let raw = raw.trim();
    let mut name = match subset_prefix() {
        Some(re) => re.replace(raw, "").into_owned(),
        None => raw.to_string(),
    };
    let mut bold = false;
    let mut italic = false;
    loop {
        if let Some(caps) = style_suffix().and_then(|re| re.captures(&name)) {
            let (Some(whole), Some(word)) = (caps.get(0), caps.get(1)) else {
                break;
            };
            if whole.start() == 0 {
                break;
            }
            let word = word.as_str().to_ascii_lowercase();
            bold |= word.contains("bold") || word == "black" || word == "heavy";
            italic |= word.contains("italic") || word.contains("oblique");
            name.truncate(whole.start());
            continue;
        }
        if let Some(m) = vendor_suffix().and_then(|re| re.find(&name)) {
            if m.start() == 0 {
                break;
            }
            name.truncate(m.start());
            continue;
        }
        break;
    }
    CleanedName {
        name: name.trim().to_string(),
        bold,
        italic,
    }
}

/// Common system and bundled fonts, keyed by a lowercase alphanumeric prefix.
const SYSTEM_FONTS: &[(&str, &str)] = &[
    ("timesnewroman", "Times New Roman"),
    ("times", "Times New Roman"),
    ("arial", "Arial"),
    ("helvetica", "Helvetica"),
    ("couriernew", "Courier New"),
    ("courier", "Courier New"),
    ("calibri", "Calibri"),
    ("cambria", "Cambria"),
    ("georgia", "Georgia"),
    ("verdana", "Verdana"),
    ("tahoma", "Tahoma"),
    ("trebuchet", "Trebuchet MS"),
    ("garamond", "Garamond"),
    ("palatino", "Palatino"),
    ("bookantiqua", "Book Antiqua"),
    ("centurygothic", "Century Gothic"),
    ("segoeui", "Segoe UI"),
    ("dejavusans", "DejaVu Sans"),
    ("dejavuserif", "DejaVu Serif"),
    ("liberationsans", "Liberation Sans"),
    ("liberationserif", "Liberation Serif"),
    ("symbol", "Symbol"),
    ("zapfdingbats", "ZapfDingbats"),
];

/// Family of a recognized system font. Matching ignores case, spaces and
/// punctuation, and accepts trailing text after the known name.
pub fn system_family(cleaned: &str) -> Option<&'static str> {
    let key: String = cleaned
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if key.is_empty() {
        return None;
    }
    SYSTEM_FONTS
        .iter()
        .find(|(prefix, _)| key.starts_with(prefix))
        .map(|(_, family)| *family)
}

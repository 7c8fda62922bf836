//! File name normalization
//!
//! Turns a raw journal file name into the lower-cased, diacritic-free scoring
//! string and its tokens. Expected layout:
//!
//! `arbeitsjournal-<last name>-<first name>-<YYYY>-<WW>.docx`

use crate::models::journal::JOURNAL_KEYWORD;
use std::path::Path;

/// Characters accepted as token separators
pub const DELIMITERS: [char; 8] = ['-', '_', ' ', '/', '\\', '|', '.', ','];

/// Number of fixed token slots (keyword, last name, first name, year, week)
pub const SLOT_COUNT: usize = 5;

pub const MSG_SPECIAL_CHARS: &str = "file name may only contain alphanumeric characters and hyphens";
pub const MSG_SEPARATORS: &str = "only hyphens are allowed as separators";
pub const MSG_KEYWORD_TYPO: &str = "journal keyword \"arbeitsjournal\" is misspelled";

/// Accented letters and their ASCII replacement, case preserved
#[rustfmt::skip]
const FOLD_TABLE: &[(char, &str)] = &[
    ('é', "e"), ('è', "e"), ('ê', "e"), ('ë', "e"),
    ('á', "a"), ('à', "a"), ('â', "a"), ('ä', "ae"), ('ã', "a"), ('æ', "ae"),
    ('í', "i"), ('ì', "i"), ('î', "i"), ('ï', "i"),
    ('ó', "o"), ('ò', "o"), ('ô', "o"), ('ö', "oe"), ('õ', "o"), ('œ', "oe"),
    ('ú', "u"), ('ù', "u"), ('û', "u"), ('ü', "ue"),
    ('É', "E"), ('È', "E"), ('Ê', "E"), ('Ë', "E"),
    ('Á', "A"), ('À', "A"), ('Â', "A"), ('Ä', "Ae"), ('Ã', "A"), ('Æ', "Ae"),
    ('Í', "I"), ('Ì', "I"), ('Î', "I"), ('Ï', "I"),
    ('Ó', "O"), ('Ò', "O"), ('Ô', "O"), ('Ö', "Oe"), ('Õ', "O"), ('Œ', "Oe"),
    ('Ú', "U"), ('Ù', "U"), ('Û', "U"), ('Ü', "Ue"),
    ('ç', "c"), ('Ç', "C"), ('ñ', "n"), ('Ñ', "N"), ('ß', "ss"),
];

/// Replace accented Latin letters with ASCII equivalents (`ä` → `ae`, `é` → `e`)
pub fn fold_special_chars(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.chars() {
        match FOLD_TABLE.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => folded.push_str(to),
            None => folded.push(c),
        }
    }
    folded
}

/// Lower-case and fold a name for comparison against file name tokens
pub fn normalize_name(name: &str) -> String {
    fold_special_chars(&name.to_lowercase())
}

/// Result of normalizing one file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedName {
    /// Folded, lower-cased file name without extension
    pub scoring: String,
    /// Tokens split on every delimiter, padded to at least `SLOT_COUNT`
    pub tokens: Vec<String>,
    /// Accented letters were replaced
    pub has_special_chars: bool,
    /// Separators other than `-` were used
    pub inconsistent_separators: bool,
}

impl NormalizedName {
    /// Normalize the file name of `path`
    ///
    /// The name is cut at its first `.`, so every dotted suffix is dropped.
    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = file_name.split('.').next().unwrap_or_default();
        Self::from_stem(stem)
    }

    /// Normalize a file name whose extensions were already removed
    pub fn from_stem(stem: &str) -> Self {
        let folded = fold_special_chars(stem);
        let has_special_chars = folded != stem;
        let scoring = folded.to_lowercase();

        let mut tokens: Vec<String> = scoring.split(&DELIMITERS[..]).map(str::to_string).collect();
        let inconsistent_separators = !tokens.iter().map(String::as_str).eq(scoring.split('-'));

        if tokens.len() < SLOT_COUNT {
            tokens.resize(SLOT_COUNT, String::new());
        }

        Self {
            scoring,
            tokens,
            has_special_chars,
            inconsistent_separators,
        }
    }

    /// Token at fixed slot `index` (0..`SLOT_COUNT`)
    pub fn slot(&self, index: usize) -> &str {
        self.tokens.get(index).map(String::as_str).unwrap_or_default()
    }

    pub fn keyword(&self) -> &str {
        self.slot(0)
    }

    pub fn last_name(&self) -> &str {
        self.slot(1)
    }

    pub fn first_name(&self) -> &str {
        self.slot(2)
    }

    pub fn year(&self) -> &str {
        self.slot(3)
    }

    pub fn week(&self) -> &str {
        self.slot(4)
    }

    pub fn has_keyword_typo(&self) -> bool {
        self.keyword() != JOURNAL_KEYWORD
    }

    /// Naming problems as warning diagnostics, in check order
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if self.has_special_chars {
            warnings.push(MSG_SPECIAL_CHARS);
        }
        if self.inconsistent_separators {
            warnings.push(MSG_SEPARATORS);
        }
        if self.has_keyword_typo() {
            warnings.push(MSG_KEYWORD_TYPO);
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_special_chars() {
        assert_eq!(fold_special_chars("Müller"), "Mueller");
        assert_eq!(fold_special_chars("Ärger"), "Aerger");
        assert_eq!(fold_special_chars("Strauß"), "Strauss");
        assert_eq!(fold_special_chars("Gérard Où"), "Gerard Ou");
        assert_eq!(fold_special_chars("plain"), "plain");
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("MÜLLER"), "mueller");
        assert_eq!(normalize_name("Zoë"), "zoe");
    }

    #[test]
    fn test_well_formed_name() {
        let name = NormalizedName::from_path(Path::new("arbeitsjournal-mueller-hans-2023-05.docx"));
        assert_eq!(name.scoring, "arbeitsjournal-mueller-hans-2023-05");
        assert_eq!(name.last_name(), "mueller");
        assert_eq!(name.first_name(), "hans");
        assert_eq!(name.year(), "2023");
        assert_eq!(name.week(), "05");
        assert!(name.warnings().is_empty());
    }

    #[test]
    fn test_name_cut_at_first_dot() {
        let name =
            NormalizedName::from_path(Path::new("arbeitsjournal-mueller-hans-2023-05.final.docx"));
        assert_eq!(name.scoring, "arbeitsjournal-mueller-hans-2023-05");
        assert_eq!(name.week(), "05");
        assert!(name.warnings().is_empty());

        let name = NormalizedName::from_path(Path::new("arbeitsjournal-meier-anna-2023.05.docx"));
        assert_eq!(name.scoring, "arbeitsjournal-meier-anna-2023");
        assert_eq!(name.week(), "");
        assert!(!name.inconsistent_separators);
    }

    #[test]
    fn test_underscores_flagged() {
        let name = NormalizedName::from_stem("ArbeitsJournal_mueller_hans_2023_05");
        assert_eq!(name.keyword(), "arbeitsjournal");
        assert!(name.inconsistent_separators);
        assert!(!name.has_special_chars);
        assert_eq!(name.warnings(), vec![MSG_SEPARATORS]);
    }

    #[test]
    fn test_special_chars_flagged() {
        let name = NormalizedName::from_stem("arbeitsjournal-müller-hans-2023-05");
        assert!(name.has_special_chars);
        assert_eq!(name.last_name(), "mueller");
        assert_eq!(name.warnings(), vec![MSG_SPECIAL_CHARS]);
    }

    #[test]
    fn test_short_name_padded() {
        let name = NormalizedName::from_stem("journal");
        assert_eq!(name.tokens.len(), SLOT_COUNT);
        assert_eq!(name.keyword(), "journal");
        assert_eq!(name.week(), "");
        assert!(name.has_keyword_typo());
    }

    #[test]
    fn test_extra_tokens_kept() {
        let name = NormalizedName::from_stem("arbeitsjournal-meier-anna-2023-05-v2");
        assert_eq!(name.tokens.len(), 6);
        assert_eq!(name.week(), "05");
        assert!(!name.inconsistent_separators);
    }
}

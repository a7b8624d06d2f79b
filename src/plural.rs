//! Plural category resolution.
//!
//! Languages are grouped into rule families the way Qt Linguist's numerus
//! table groups them; each family lists its categories in form-slot order
//! using CLDR names.

use std::fmt;

use crate::error::UnsupportedLanguageError;

/// CLDR-style plural category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule family shared by a set of languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralFamily {
    /// No plural distinction.
    Japanese,
    English,
    /// 0 and 1 are singular.
    French,
    Icelandic,
    Macedonian,
    Latvian,
    Irish,
    /// Czech and Slovak.
    Slovak,
    Lithuanian,
    /// Russian, Ukrainian, Belarusian, Serbo-Croatian.
    Russian,
    Polish,
    Romanian,
    Slovenian,
    Maltese,
    Welsh,
    Arabic,
}

use PluralCategory::{
    Few,
    Many,
    One,
    Other,
    Two,
    Zero,
};

const JAPANESE: &[&str] = &[
    "bi", "bo", "dz", "fa", "fj", "gn", "hu", "id", "ja", "jv", "ko", "ms", "my", "na", "om", "su",
    "th", "tr", "tt", "vi", "yo", "za", "zh",
];

const ENGLISH: &[&str] = &[
    "aa", "ab", "af", "am", "as", "ay", "az", "ba", "bg", "bh", "bn", "ca", "co", "da", "de", "el",
    "en", "eo", "es", "et", "eu", "fi", "fo", "fur", "fy", "gl", "ha", "he", "hi", "ia", "ie", "it",
    "ka", "kk", "kl", "kn", "ks", "ku", "kw", "ky", "la", "lb", "lo", "mg", "ml", "mn", "mr", "nb",
    "ne", "nl", "nn", "no", "or", "pa", "ps", "pt", "qu", "rm", "rn", "rw", "sa", "sd", "si", "sn",
    "so", "sq", "sv", "sw", "ta", "te", "tg", "ti", "tk", "to", "ts", "tw", "ug", "ur", "uz", "vo",
    "wa", "wo", "xh", "yi", "zu",
];

const FRENCH: &[&str] = &["br", "fil", "fr", "hy", "ln", "oc", "tl"];

const RUSSIAN: &[&str] = &["be", "bs", "hr", "ru", "sh", "sr", "uk"];

impl PluralFamily {
    /// Looks up the family for a locale tag such as `tr`, `pt_BR` or `sr-Latn-RS`.
    ///
    /// # Errors
    /// Returns [`UnsupportedLanguageError`] if the primary language is unknown.
    pub fn for_language(tag: &str) -> Result<Self, UnsupportedLanguageError> {
        let mut parts = tag.split(['_', '-']);
        let primary = parts.next().unwrap_or_default().to_ascii_lowercase();
        let region = parts.find(|p| p.len() == 2).map(str::to_ascii_uppercase);

        let family = match primary.as_str() {
            // Brazilian Portuguese treats 0 as singular.
            "pt" if region.as_deref() == Some("BR") => Self::French,
            "is" => Self::Icelandic,
            "mk" => Self::Macedonian,
            "lv" => Self::Latvian,
            "ga" => Self::Irish,
            "cs" | "sk" => Self::Slovak,
            "lt" => Self::Lithuanian,
            "pl" => Self::Polish,
            "ro" | "mo" => Self::Romanian,
            "sl" => Self::Slovenian,
            "mt" => Self::Maltese,
            "cy" => Self::Welsh,
            "ar" => Self::Arabic,
            p if JAPANESE.contains(&p) => Self::Japanese,
            p if ENGLISH.contains(&p) => Self::English,
            p if FRENCH.contains(&p) => Self::French,
            p if RUSSIAN.contains(&p) => Self::Russian,
            _ => return Err(UnsupportedLanguageError(tag.to_string())),
        };
        Ok(family)
    }

    /// Categories in form-slot order.
    #[must_use]
    pub const fn categories(self) -> &'static [PluralCategory] {
        match self {
            Self::Japanese => &[Other],
            Self::English | Self::French | Self::Icelandic | Self::Macedonian => &[One, Other],
            Self::Latvian => &[One, Other, Zero],
            Self::Irish => &[One, Two, Other],
            Self::Slovak | Self::Lithuanian | Self::Romanian => &[One, Few, Other],
            Self::Russian | Self::Polish => &[One, Few, Many],
            Self::Slovenian => &[One, Two, Few, Other],
            Self::Maltese => &[One, Few, Many, Other],
            Self::Welsh => &[One, Two, Many, Other],
            Self::Arabic => &[Zero, One, Two, Few, Many, Other],
        }
    }

    /// Form-slot index for the quantity `n`.
    #[must_use]
    pub const fn form_index(self, n: u64) -> usize {
        let n10 = n % 10;
        let n100 = n % 100;
        match self {
            Self::Japanese => 0,
            Self::English => {
                if n == 1 {
                    0
                } else {
                    1
                }
            }
            Self::French => {
                if n <= 1 {
                    0
                } else {
                    1
                }
            }
            Self::Icelandic | Self::Macedonian => {
                if n10 == 1 && n100 != 11 {
                    0
                } else {
                    1
                }
            }
            Self::Latvian => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if n != 0 {
                    1
                } else {
                    2
                }
            }
            Self::Irish => match n {
                1 => 0,
                2 => 1,
                _ => 2,
            },
            Self::Slovak => match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            },
            Self::Lithuanian => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if n10 >= 2 && (n100 < 10 || n100 >= 20) {
                    1
                } else {
                    2
                }
            }
            Self::Russian => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if n10 >= 2 && n10 <= 4 && (n100 < 10 || n100 >= 20) {
                    1
                } else {
                    2
                }
            }
            Self::Polish => {
                if n == 1 {
                    0
                } else if n10 >= 2 && n10 <= 4 && (n100 < 10 || n100 >= 20) {
                    1
                } else {
                    2
                }
            }
            Self::Romanian => {
                if n == 1 {
                    0
                } else if n == 0 || (n100 >= 1 && n100 <= 19) {
                    1
                } else {
                    2
                }
            }
            Self::Slovenian => match n100 {
                1 => 0,
                2 => 1,
                3 | 4 => 2,
                _ => 3,
            },
            Self::Maltese => {
                if n == 1 {
                    0
                } else if n == 0 || (n100 >= 1 && n100 <= 10) {
                    1
                } else if n100 >= 11 && n100 <= 19 {
                    2
                } else {
                    3
                }
            }
            Self::Welsh => match n {
                1 => 0,
                2 => 1,
                8 | 11 => 2,
                _ => 3,
            },
            Self::Arabic => {
                if n == 0 {
                    0
                } else if n == 1 {
                    1
                } else if n == 2 {
                    2
                } else if n100 >= 3 && n100 <= 10 {
                    3
                } else if n100 >= 11 {
                    4
                } else {
                    5
                }
            }
        }
    }
}

/// Plural rules resolved for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluralRules {
    family: PluralFamily,
}

impl PluralRules {
    /// # Errors
    /// Returns [`UnsupportedLanguageError`] for an unknown tag.
    pub fn for_language(tag: &str) -> Result<Self, UnsupportedLanguageError> {
        PluralFamily::for_language(tag).map(|family| Self { family })
    }

    /// Rules for an unknown language: a single `other` category.
    #[must_use]
    pub const fn single() -> Self {
        Self { family: PluralFamily::Japanese }
    }

    /// Rules for `tag`, or [`PluralRules::single`] when the tag is unknown.
    #[must_use]
    pub fn for_language_or_single(tag: &str) -> Self {
        Self::for_language(tag).unwrap_or_else(|err| {
            tracing::debug!("{err}; using a single plural form");
            Self::single()
        })
    }

    #[must_use]
    pub const fn family(&self) -> PluralFamily {
        self.family
    }

    #[must_use]
    pub const fn categories(&self) -> &'static [PluralCategory] {
        self.family.categories()
    }

    /// Number of form slots a numerus translation needs.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.family.categories().len()
    }

    #[must_use]
    pub const fn form_index(&self, n: u64) -> usize {
        self.family.form_index(n)
    }

    #[must_use]
    pub fn category(&self, n: u64) -> PluralCategory {
        self.categories().get(self.form_index(n)).copied().unwrap_or(Other)
    }
}

/// Ordered plural categories required by `tag`.
///
/// # Errors
/// Returns [`UnsupportedLanguageError`] for an unknown tag.
pub fn categories_for(tag: &str) -> Result<&'static [PluralCategory], UnsupportedLanguageError> {
    PluralFamily::for_language(tag).map(PluralFamily::categories)
}

/// Form-slot index to select for quantity `n` in language `tag`.
///
/// # Errors
/// Returns [`UnsupportedLanguageError`] for an unknown tag.
pub fn form_index(tag: &str, n: u64) -> Result<usize, UnsupportedLanguageError> {
    PluralFamily::for_language(tag).map(|family| family.form_index(n))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    // Form counts observed in shipped catalogs.
    #[rstest]
    #[case("ar", 6)]
    #[case("bg_BG", 2)]
    #[case("ca", 2)]
    #[case("ca_VA", 2)]
    #[case("fa_IR", 1)]
    #[case("hr_HR", 3)]
    #[case("hu_HU", 1)]
    #[case("id_ID", 1)]
    #[case("it_IT", 2)]
    #[case("ka_GE", 2)]
    #[case("ko", 1)]
    #[case("lt_LT", 3)]
    #[case("pt_BR", 2)]
    #[case("sk_SK", 3)]
    #[case("sl_SI", 4)]
    #[case("tr", 1)]
    fn test_category_count(#[case] tag: &str, #[case] expected: usize) {
        assert_that!(categories_for(tag).unwrap().len(), eq(expected));
    }

    #[rstest]
    #[case("tr", 0)]
    #[case("tr", 1)]
    #[case("tr", 5)]
    #[case("tr", 1_000_000)]
    fn test_single_category_always_zero(#[case] tag: &str, #[case] n: u64) {
        assert_that!(form_index(tag, n).unwrap(), eq(0));
    }

    #[rstest]
    #[case::english_one("en", 1, 0)]
    #[case::english_zero("en", 0, 1)]
    #[case::french_zero("fr", 0, 0)]
    #[case::brazilian_zero("pt_BR", 0, 0)]
    #[case::portuguese_zero("pt_PT", 0, 1)]
    #[case::russian_one("ru", 21, 0)]
    #[case::russian_eleven("ru", 11, 2)]
    #[case::russian_few("ru", 23, 1)]
    #[case::russian_teen("ru", 13, 2)]
    #[case::polish_one("pl", 1, 0)]
    #[case::polish_twenty_one("pl", 21, 2)]
    #[case::polish_few("pl", 22, 1)]
    #[case::czech_few("cs", 4, 1)]
    #[case::czech_many("cs", 5, 2)]
    #[case::slovenian_101("sl", 101, 0)]
    #[case::slovenian_two("sl", 102, 1)]
    #[case::slovenian_few("sl", 3, 2)]
    #[case::slovenian_other("sl", 5, 3)]
    #[case::arabic_zero("ar", 0, 0)]
    #[case::arabic_few("ar", 103, 3)]
    #[case::arabic_many("ar", 111, 4)]
    #[case::arabic_other("ar", 100, 5)]
    #[case::latvian_zero("lv", 0, 2)]
    #[case::lithuanian_few("lt", 22, 1)]
    fn test_form_index(#[case] tag: &str, #[case] n: u64, #[case] expected: usize) {
        assert_that!(form_index(tag, n).unwrap(), eq(expected));
    }

    #[rstest]
    #[case("xx")]
    #[case("")]
    #[case("klingon")]
    fn test_unsupported_language(#[case] tag: &str) {
        assert_eq!(form_index(tag, 1), Err(UnsupportedLanguageError(tag.to_string())));
    }

    #[rstest]
    fn test_fallback_is_single_category() {
        let rules = PluralRules::for_language_or_single("xx");

        assert_that!(rules.count(), eq(1));
        assert_that!(rules.category(42), eq(PluralCategory::Other));
    }

    #[rstest]
    fn test_tag_normalisation() {
        assert_eq!(PluralFamily::for_language("TR-tr"), Ok(PluralFamily::Japanese));
        assert_eq!(PluralFamily::for_language("pt-br"), Ok(PluralFamily::French));
        assert_eq!(PluralFamily::for_language("sr-Latn-RS"), Ok(PluralFamily::Russian));
    }

    #[rstest]
    fn test_category_names() {
        let rules = PluralRules::for_language("ru").unwrap();

        assert_that!(rules.category(1), eq(PluralCategory::One));
        assert_that!(rules.category(3), eq(PluralCategory::Few));
        assert_that!(rules.category(7).as_str(), eq("many"));
    }
}

//! Qt numerus form selection.
//!
//! A numerus message carries one `<numerusform>` per plural form of the catalog
//! language, in the order Qt Linguist lists them.

/// Plural rule families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralRule {
    /// One form (`ja`, `zh`, `ko`, ...).
    Single,
    /// `n == 1` is singular (`en`, `de`, `es`, `it`, European `pt`, ...).
    OneOther,
    /// `n <= 1` is singular (`fr`, `pt_BR`).
    ZeroOneOther,
    /// Three forms, Slavic endings (`ru`, `uk`, `be`, `sr`, `hr`, `bs`).
    Slavic,
    /// Three forms, Polish.
    Polish,
    /// Three forms, `1`, `2..=4`, rest (`cs`, `sk`).
    Czech,
}

impl PluralRule {
    /// Rule for a locale code (`pt_BR`, `pt-BR`, `de`...).
    ///
    /// Unknown languages use [`PluralRule::OneOther`].
    #[must_use]
    pub fn for_language(language: &str) -> Self {
        let canonical = crate::input::catalog::canonical_locale(language);
        if canonical == "pt_BR" {
            return Self::ZeroOneOther;
        }

        let base = canonical.split('_').next().unwrap_or_default();
        match base {
            "ja" | "zh" | "ko" | "vi" | "th" | "id" | "ms" => Self::Single,
            "fr" => Self::ZeroOneOther,
            "ru" | "uk" | "be" | "sr" | "hr" | "bs" => Self::Slavic,
            "pl" => Self::Polish,
            "cs" | "sk" => Self::Czech,
            _ => Self::OneOther,
        }
    }

    /// Number of numerus forms.
    #[must_use]
    pub const fn form_count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::OneOther | Self::ZeroOneOther => 2,
            Self::Slavic | Self::Polish | Self::Czech => 3,
        }
    }

    /// Index of the form to use for `n`.
    #[must_use]
    pub fn form_index(self, n: i64) -> usize {
        let n = n.unsigned_abs();
        let (last, tens) = (n % 10, n % 100);
        match self {
            Self::Single => 0,
            Self::OneOther => usize::from(n != 1),
            Self::ZeroOneOther => usize::from(n > 1),
            Self::Slavic => {
                if last == 1 && tens != 11 {
                    0
                } else if (2..=4).contains(&last) && !(12..=14).contains(&tens) {
                    1
                } else {
                    2
                }
            }
            Self::Polish => {
                if n == 1 {
                    0
                } else if (2..=4).contains(&last) && !(12..=14).contains(&tens) {
                    1
                } else {
                    2
                }
            }
            Self::Czech => match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("pt_BR", PluralRule::ZeroOneOther)]
    #[case("pt-br", PluralRule::ZeroOneOther)]
    #[case("pt", PluralRule::OneOther)]
    #[case("pt_PT", PluralRule::OneOther)]
    #[case("en_US", PluralRule::OneOther)]
    #[case("ja_JP", PluralRule::Single)]
    #[case("ru", PluralRule::Slavic)]
    #[case("pl_PL", PluralRule::Polish)]
    #[case("unknown", PluralRule::OneOther)]
    fn test_for_language(#[case] language: &str, #[case] expected: PluralRule) {
        assert_eq!(PluralRule::for_language(language), expected);
    }

    #[rstest]
    #[case(PluralRule::OneOther, 0, 1)]
    #[case(PluralRule::OneOther, 1, 0)]
    #[case(PluralRule::OneOther, 2, 1)]
    #[case(PluralRule::ZeroOneOther, 0, 0)]
    #[case(PluralRule::ZeroOneOther, 1, 0)]
    #[case(PluralRule::ZeroOneOther, 2, 1)]
    #[case(PluralRule::Single, 5, 0)]
    #[case(PluralRule::Slavic, 1, 0)]
    #[case(PluralRule::Slavic, 11, 2)]
    #[case(PluralRule::Slavic, 21, 0)]
    #[case(PluralRule::Slavic, 3, 1)]
    #[case(PluralRule::Slavic, 13, 2)]
    #[case(PluralRule::Slavic, 25, 2)]
    #[case(PluralRule::Polish, 1, 0)]
    #[case(PluralRule::Polish, 21, 2)]
    #[case(PluralRule::Polish, 22, 1)]
    #[case(PluralRule::Czech, 4, 1)]
    #[case(PluralRule::Czech, 5, 2)]
    #[case(PluralRule::OneOther, -1, 0)]
    fn test_form_index(#[case] rule: PluralRule, #[case] n: i64, #[case] expected: usize) {
        assert_eq!(rule.form_index(n), expected);
        assert!(expected < rule.form_count());
    }
}

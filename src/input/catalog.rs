//! Catalog file input definitions

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use crate::db::CatalogDatabase;
use crate::syntax::CatalogError;

/// Known locale codes, grouped by language (`language region...`).
///
/// Based on the RFC 5646 subset Qt ships translations for.
const LOCALE_TABLE: &str = "
    af ZA
    ar AE BH DZ EG IQ JO KW LB LY MA OM QA SA SY TN YE
    az AZ
    be BY
    bg BG
    bs BA
    ca ES
    cs CZ
    cy GB
    da DK
    de AT CH DE LI LU
    el GR
    en AU BZ CA GB IE JM NZ PH TT US ZA ZW
    eo
    es AR BO CL CO CR DO EC ES GT HN MX NI PA PE PR PY SV UY VE
    et EE
    eu ES
    fa IR
    fi FI
    fo FO
    fr BE CA CH FR LU MC
    gl ES
    gu IN
    he IL
    hi IN
    hr BA HR
    hu HU
    hy AM
    id ID
    is IS
    it CH IT
    ja JP
    ka GE
    kk KZ
    kn IN
    ko KR
    lt LT
    lv LV
    mk MK
    mn MN
    mr IN
    ms BN MY
    mt MT
    nb NO
    nl BE NL
    nn NO
    pa IN
    pl PL
    pt BR PT
    ro RO
    ru RU
    sk SK
    sl SI
    sq AL
    sr BA RS
    sv FI SE
    sw KE
    ta IN
    te IN
    th TH
    tr TR
    uk UA
    ur PK
    uz UZ
    vi VN
    zh CN HK MO SG TW
";

/// Lowercased `ll` and `ll_cc` codes.
static LOCALE_CODES: LazyLock<HashSet<String>> = LazyLock::new(|| {
    LOCALE_TABLE
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let language = parts.next()?;
            Some(
                std::iter::once(language.to_string())
                    .chain(parts.map(move |region| format!("{language}_{}", region.to_lowercase())))
                    .collect::<Vec<_>>(),
            )
        })
        .flatten()
        .collect()
});

/// Canonical Qt form of a locale code (`pt-br` → `pt_BR`).
#[must_use]
pub fn canonical_locale(code: &str) -> String {
    let mut parts = code.split(['-', '_']).filter(|part| !part.is_empty());
    let Some(language) = parts.next() else {
        return String::new();
    };

    let mut canonical = language.to_lowercase();
    for part in parts {
        canonical.push('_');
        if part.len() == 4 {
            // Script subtag (e.g. `Cyrl`)
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                canonical.extend(first.to_uppercase());
                canonical.push_str(&chars.as_str().to_lowercase());
            }
        } else {
            canonical.push_str(&part.to_uppercase());
        }
    }
    canonical
}

/// Checks if `code` is a known locale code (case and separator insensitive).
#[must_use]
pub fn is_known_locale(code: &str) -> bool {
    !code.is_empty() && LOCALE_CODES.contains(&canonical_locale(code).to_lowercase())
}

/// Locale fallback chain, most specific first (`pt_BR` → `["pt_BR", "pt"]`).
#[must_use]
pub fn locale_fallbacks(locale: &str) -> Vec<String> {
    let canonical = canonical_locale(locale);
    let mut chain = Vec::new();
    let mut current = canonical.as_str();
    while !current.is_empty() {
        chain.push(current.to_string());
        match current.rfind('_') {
            Some(index) => current = current.get(..index).unwrap_or_default(),
            None => break,
        }
    }
    chain
}

/// Detect the catalog locale from its file path.
///
/// Qt names catalogs `<prefix>_<locale>.ts`. When the file name carries no
/// locale, directory names are searched from the innermost outwards.
///
/// # Examples
/// - `share/translations/app_pt_BR.ts` → `pt_BR`
/// - `share/translations/app_de.ts` → `de`
/// - `translations/pt-BR/app.ts` → `pt_BR`
#[must_use]
pub fn detect_language_from_path(file_path: &Path) -> String {
    if let Some(stem) = file_path.file_stem().map(|stem| stem.to_string_lossy()) {
        let parts: Vec<&str> = stem.split('_').collect();
        // The prefix itself may contain `_`, so try the longest locale suffix first
        for start in 0..parts.len() {
            let candidate = parts.get(start..).map(|rest| rest.join("_")).unwrap_or_default();
            if is_known_locale(&candidate) {
                return canonical_locale(&candidate);
            }
        }
    }

    let directories = file_path.parent().into_iter().flat_map(Path::components).rev();
    for component in directories {
        let name = component.as_os_str().to_string_lossy();
        if is_known_locale(&name) {
            return canonical_locale(&name);
        }
    }

    "unknown".to_string()
}

/// Salsa input representing one `.ts` catalog file.
#[salsa::input(debug)]
pub struct CatalogFile {
    #[returns(ref)]
    pub path: String,

    /// Locale inferred from the file path.
    #[returns(ref)]
    pub language: String,

    #[returns(ref)]
    pub text: String,

    /// Why the file could not be read (its `text` is then empty).
    #[returns(ref)]
    pub read_error: Option<CatalogError>,
}

impl CatalogFile {
    /// Create a catalog input from already loaded text.
    pub fn from_text(db: &dyn CatalogDatabase, file_path: &Path, text: String) -> Self {
        let language = detect_language_from_path(file_path);
        Self::new(db, file_path.to_string_lossy().to_string(), language, text, None)
    }

    /// Create an input for a catalog that exists but could not be read.
    ///
    /// It stays visible to checks and updates; parsing it returns `error`.
    pub fn unreadable(db: &dyn CatalogDatabase, file_path: &Path, error: CatalogError) -> Self {
        let language = detect_language_from_path(file_path);
        Self::new(db, file_path.to_string_lossy().to_string(), language, String::new(), Some(error))
    }
}

/// Load a catalog file and create a `CatalogFile` input.
///
/// # Errors
/// Returns error if the file cannot be read.
pub fn load_catalog_file(
    db: &dyn CatalogDatabase,
    file_path: &Path,
) -> Result<CatalogFile, CatalogError> {
    let text = std::fs::read_to_string(file_path)
        .map_err(|e| CatalogError::Read(format!("{}: {e}", file_path.display())))?;
    Ok(CatalogFile::from_text(db, file_path, text))
}

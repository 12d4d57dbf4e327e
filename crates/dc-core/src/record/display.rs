//! Human readable names for coded values

use std::borrow::Cow;

const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("en", "English"),
    ("zh", "Chinese"),
    ("chn", "Chinese"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
    ("multiple", "Multiple"),
];

const SPDX_IDS: &[(&str, &str)] = &[
    (
        "Creative Commons Attribution Share Alike 4.0 International",
        "CC-BY-SA-4.0",
    ),
    ("Creative Commons Attribution 4.0 International", "CC-BY-4.0"),
    ("GNU General Public License v3.0", "GPL-3.0"),
    ("Apache 2.0", "Apache-2.0"),
    ("MIT License", "MIT"),
    ("SNT Non Commercial LICENSE V.2", "SNT-NC-2.0"),
];

/// Display name for a language code, e.g. `en` -> `English`.
///
/// Unknown codes are returned with their first letter capitalised.
pub fn language_name(code: &str) -> Cow<'_, str> {
    let code = code.trim();
    let lower = code.to_lowercase();
    if let Some((_, name)) = LANGUAGE_NAMES.iter().find(|(c, _)| *c == lower) {
        return Cow::Borrowed(name);
    }

    let mut chars = code.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => {
            Cow::Owned(first.to_uppercase().chain(chars).collect())
        }
        _ => Cow::Borrowed(code),
    }
}

/// Short SPDX identifier for a licence, or the licence text unchanged.
pub fn license_spdx(license: &str) -> &str {
    let license = license.trim();
    SPDX_IDS
        .iter()
        .find(|(name, _)| *name == license)
        .map(|(_, id)| *id)
        .unwrap_or(license)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_names() {
        assert_eq!(language_name("en"), "English");
        assert_eq!(language_name(" ZH "), "Chinese");
        assert_eq!(language_name("sw"), "Sw");
        assert_eq!(language_name("Klingon"), "Klingon");
    }

    #[test]
    fn test_license_spdx() {
        assert_eq!(license_spdx("MIT License"), "MIT");
        assert_eq!(
            license_spdx("Creative Commons Attribution 4.0 International"),
            "CC-BY-4.0"
        );
        assert_eq!(license_spdx("Proprietary"), "Proprietary");
    }
}

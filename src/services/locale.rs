//! Locale selection for Mollie Components.
//!
//! Components only ship translations for a fixed set of locales, so the
//! storefront locale is narrowed to that set before it reaches the script.

/// Locale used when the storefront locale is missing or unsupported
pub const FALLBACK_LOCALE: &str = "en_US";

/// Locales Mollie Components can render.
pub const AVAILABLE_LOCALES: [&str; 19] = [
    "en_US", "nl_NL", "fr_FR", "it_IT", "de_DE", "de_AT", "de_CH", "es_ES", "ca_ES", "nb_NO",
    "pt_PT", "sv_SE", "fi_FI", "da_DK", "is_IS", "hu_HU", "pl_PL", "lv_LV", "lt_LT",
];

/// Returns `code` if Mollie Components supports it, otherwise [`FALLBACK_LOCALE`].
///
/// Matching is exact: `de-DE` or `DE_de` fall back as well.
pub fn resolve_locale(code: Option<&str>) -> &'static str {
    code.and_then(|code| AVAILABLE_LOCALES.iter().copied().find(|locale| *locale == code))
        .unwrap_or(FALLBACK_LOCALE)
}

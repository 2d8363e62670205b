//! Field validation helpers
//!
//! Shared validation used by the services: required fields, length caps,
//! slug shape, email shape, and http(s) URLs. Helpers return the failure
//! message so each service can wrap it in its own validation error variant.

use once_cell::sync::Lazy;
use regex::Regex;

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:[-_][a-z0-9]+)*$").expect("valid slug regex"));

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Maximum length for URL fields
pub const URL_MAX: usize = 255;

/// Check that a required text field is non-empty (after trimming) and within
/// its length cap.
pub fn require_text(field: &str, value: &str, max: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} cannot be empty", field));
    }
    if value.chars().count() > max {
        return Err(format!("{} exceeds maximum length of {}", field, max));
    }
    Ok(())
}

/// Check slug shape: lowercase alphanumerics separated by single hyphens or
/// underscores, within the length cap.
pub fn require_slug(field: &str, value: &str, max: usize) -> Result<(), String> {
    require_text(field, value, max)?;
    if !SLUG_RE.is_match(value) {
        return Err(format!(
            "{} must be lowercase letters, digits, hyphens or underscores",
            field
        ));
    }
    Ok(())
}

/// Check email shape
pub fn require_email(field: &str, value: &str) -> Result<(), String> {
    if !EMAIL_RE.is_match(value) {
        return Err(format!("{} is not a valid email address", field));
    }
    Ok(())
}

/// Check that a URL is http(s) and within the length cap
pub fn require_url(field: &str, value: &str) -> Result<(), String> {
    if value.chars().count() > URL_MAX {
        return Err(format!("{} exceeds maximum length of {}", field, URL_MAX));
    }
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(rest) if !rest.is_empty() && !rest.contains(char::is_whitespace) => Ok(()),
        _ => Err(format!("{} is not a valid http(s) URL", field)),
    }
}

/// Derive a slug from a human-readable name: lowercase, alphanumerics kept,
/// every other run of characters collapsed to a single hyphen, truncated to
/// `max` without leaving a trailing hyphen.
pub fn slugify(name: &str, max: usize) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }
    let slug = slug.trim_end_matches('-');
    let truncated: String = slug.chars().take(max).collect();
    truncated.trim_end_matches('-').to_string()
}

/// Derive a slug from a human-readable name, failing when the name has no
/// ASCII alphanumerics to build one from.
pub fn derive_slug(name: &str, max: usize) -> Result<String, String> {
    let slug = slugify(name, max);
    if slug.is_empty() {
        return Err(format!("cannot derive a slug from {:?}", name));
    }
    Ok(slug)
}

//! Shared-secret authentication for pipeline callers

use crate::error::{PipelineError, Result};

/// Header carrying the secret directly
pub const SECRET_HEADER: &str = "x-cron-secret";

/// Trim and strip one pair of matching surrounding quotes
pub fn normalize_secret(raw: &str) -> &str {
    let trimmed = raw.trim();
    for quote in ['"', '\''] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return trimmed[1..trimmed.len() - 1].trim();
        }
    }
    trimmed
}

/// Secret presented by the caller
///
/// The dedicated header wins; otherwise an `Authorization: Bearer <secret>` header.
pub fn presented_secret<'a>(header: Option<&'a str>, authorization: Option<&'a str>) -> Option<&'a str> {
    if let Some(value) = header.filter(|v| !v.trim().is_empty()) {
        return Some(value);
    }

    let (scheme, token) = authorization?.trim().split_once(char::is_whitespace)?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then_some(token)
        .filter(|t| !t.trim().is_empty())
}

/// Check a presented secret against the configured one
///
/// An unconfigured secret fails closed as a configuration error.
pub fn authorize(configured: Option<&str>, presented: Option<&str>) -> Result<()> {
    let expected = configured
        .map(normalize_secret)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| PipelineError::Configuration("CRON_SECRET is not configured".to_string()))?;

    match presented.map(normalize_secret) {
        Some(provided) if provided == expected => Ok(()),
        _ => Err(PipelineError::Unauthorized),
    }
}

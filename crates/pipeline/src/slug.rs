//! Article slugs
//!
//! `{prefix-}{subject-}{YYYY-MM-DD}-{HHMMSS}-{8 hex chars}`, all in UTC.
//! The random suffix makes slugs unique in practice without a lookup.

use chrono::{DateTime, Utc};
use uuid::Uuid;

const SUFFIX_LEN: usize = 8;

/// Lowercase, collapse runs of anything outside `[a-z0-9]` to one hyphen, trim hyphens
pub fn normalize(subject: &str) -> String {
    let mut out = String::with_capacity(subject.len());
    let mut pending_hyphen = false;

    for c in subject.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    out
}

/// Build a slug for an article published at `now`
pub fn article_slug(prefix: Option<&str>, subject: Option<&str>, now: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string();

    let mut parts: Vec<String> = Vec::with_capacity(5);
    parts.extend(prefix.map(normalize).filter(|p| !p.is_empty()));
    parts.extend(subject.map(normalize).filter(|s| !s.is_empty()));
    parts.push(now.format("%Y-%m-%d").to_string());
    parts.push(now.format("%H%M%S").to_string());
    parts.push(random[..SUFFIX_LEN].to_string());
    parts.join("-")
}

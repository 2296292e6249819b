//! Default value functions for configuration.
//!
//! Used as `#[serde(default = "crate::defaults::...")]` attributes on
//! `Config` fields so partially written config files stay loadable.

// ── Remote API ─────────────────────────────────────────────────────────────

pub fn api_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

pub fn request_timeout_secs() -> u64 {
    30
}

/// 10 MiB; structure payloads carry full PDB files.
pub fn max_response_bytes() -> u64 {
    10 * 1024 * 1024
}

// ── Tabs ───────────────────────────────────────────────────────────────────

pub fn tab_name_prefix() -> String {
    "Search".to_string()
}

pub fn bool_true() -> bool {
    true
}

// ── Chat ───────────────────────────────────────────────────────────────────

pub fn identity_questions() -> Vec<String> {
    [
        "who are you",
        "who made you",
        "what are you",
        "who created you",
        "who developed you",
    ]
    .iter()
    .map(|q| q.to_string())
    .collect()
}

pub fn identity_response() -> String {
    "I'm an open-source research assistant for exploring proteins, their structures \
     and their drug associations."
        .to_string()
}

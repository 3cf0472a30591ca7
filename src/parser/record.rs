use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::warn;

use super::ExtractError;

static ALPHA2_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").unwrap());
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// One row of the output list. Field order is the JSON key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRecord {
    pub alpha2: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag_url: Option<String>,
}

/// Builds `<base><alpha2>.<extension>` flag URLs.
#[derive(Debug, Clone)]
pub struct FlagUrlTemplate {
    base: String,
    extension: String,
}

impl FlagUrlTemplate {
    pub fn new(base: impl Into<String>, extension: &str) -> Self {
        let base = base.into();
        if !base.ends_with('/') {
            warn!(
                "Flag base URL {:?} has no trailing slash; URLs will be {}XX.{}",
                base, base, extension
            );
        }
        FlagUrlTemplate {
            base,
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn url_for(&self, alpha2: &str) -> String {
        format!("{}{}.{}", self.base, alpha2, self.extension)
    }
}

/// Trim the raw `id` attribute and require exactly two uppercase ASCII letters.
pub fn validate_alpha2(raw: &str, row: usize) -> Result<String, ExtractError> {
    let code = raw.trim();
    if ALPHA2_RE.is_match(code) {
        Ok(code.to_string())
    } else {
        Err(ExtractError::InvalidCode {
            row,
            code: raw.to_string(),
        })
    }
}

/// Collapse whitespace runs (including source newlines) to single spaces.
pub fn normalize_name(raw: &str) -> String {
    WS_RE.replace_all(raw.trim(), " ").into_owned()
}

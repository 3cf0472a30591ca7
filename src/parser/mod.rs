pub mod record;
pub mod table;

use std::collections::HashSet;

use scraper::Html;
use thiserror::Error;
use tracing::{debug, info};

use record::{normalize_name, validate_alpha2, CountryRecord, FlagUrlTemplate};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no table matches selector `{selector}`")]
    TableNotFound { selector: String },
    #[error("invalid table selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
    #[error("row {row}: `{code}` is not a two-letter uppercase code")]
    InvalidCode { row: usize, code: String },
    #[error("row {row}: duplicate code {code}")]
    DuplicateCode { row: usize, code: String },
    #[error("row {row}: no country name for {code}")]
    MissingName { row: usize, code: String },
    #[error("table contains no country rows")]
    NoRecords,
}

/// Two-pass extraction: HTML → raw rows → validated records, in table order.
pub fn extract_countries(
    html: &str,
    selector: &str,
    flags: Option<&FlagUrlTemplate>,
) -> Result<Vec<CountryRecord>, ExtractError> {
    let document = Html::parse_document(html);
    let table = table::find_table(&document, selector)?;
    let raw_rows = table::rows(table);
    debug!("Table has {} rows", raw_rows.len());

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(raw_rows.len());

    for row in raw_rows {
        // header and spacer rows carry no id
        let Some(raw_code) = row.code else {
            continue;
        };
        let alpha2 = validate_alpha2(&raw_code, row.position)?;
        if !seen.insert(alpha2.clone()) {
            return Err(ExtractError::DuplicateCode {
                row: row.position,
                code: alpha2,
            });
        }

        let name = row.name.as_deref().map(normalize_name).unwrap_or_default();
        if name.is_empty() {
            return Err(ExtractError::MissingName {
                row: row.position,
                code: alpha2,
            });
        }

        let flag_url = flags.map(|t| t.url_for(&alpha2));
        records.push(CountryRecord {
            alpha2,
            name,
            flag_url,
        });
    }

    if records.is_empty() {
        return Err(ExtractError::NoRecords);
    }
    info!("Extracted {} countries", records.len());
    Ok(records)
}

// ── Tests ──

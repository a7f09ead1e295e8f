//! Recipient table loading.
//!
//! The table is a headed CSV with the columns `name, role, company,
//! telegram_id` and an optional `variant`. Structural problems are fatal;
//! bad variant codes are repaired to [`Variant::A`] before records are
//! handed out.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Serialize;

use crate::error::RecipientError;
use crate::funnel::Variant;

pub const REQUIRED_COLUMNS: [&str; 4] = ["name", "role", "company", "telegram_id"];
pub const VARIANT_COLUMN: &str = "variant";

/// One row of the recipient table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipient {
    pub name: String,
    pub role: String,
    pub company: String,
    pub telegram_id: i64,
    pub variant: Variant,
}

/// Read and parse the recipient table at `path`.
///
/// # Errors
///
/// Returns [`RecipientError`] if the file cannot be read, is not valid CSV,
/// lacks a required column, or holds a non-numeric identifier.
pub fn load_recipients(path: &Path) -> Result<Vec<Recipient>, RecipientError> {
    let content = std::fs::read_to_string(path).map_err(|e| RecipientError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let recipients = parse_recipients(&content)?;
    tracing::info!(
        path = %path.display(),
        count = recipients.len(),
        "loaded recipients"
    );
    Ok(recipients)
}

/// Parse recipient CSV text.
///
/// # Errors
///
/// See [`load_recipients`].
pub fn parse_recipients(content: &str) -> Result<Vec<Recipient>, RecipientError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| column(c).is_none())
        .map(|c| (*c).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(RecipientError::MissingFields(missing));
    }
    let [name_col, role_col, company_col, id_col] =
        REQUIRED_COLUMNS.map(|c| column(c).unwrap_or_default());

    let variant_col = column(VARIANT_COLUMN);
    if variant_col.is_none() {
        tracing::warn!("recipient table has no variant column; assigning 'a' to everyone");
    }

    let mut recipients = Vec::new();
    let mut invalid_variants = BTreeSet::new();

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row = index + 1;
        let field = |col: usize| record.get(col).unwrap_or_default().to_string();

        let raw_id = field(id_col);
        let telegram_id = raw_id
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| RecipientError::InvalidIdentifier {
                row,
                value: raw_id.clone(),
            })?;

        let variant = match variant_col.map(&field) {
            None => Variant::default(),
            Some(raw) if raw.is_empty() => Variant::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                invalid_variants.insert(raw);
                Variant::default()
            }),
        };

        recipients.push(Recipient {
            name: field(name_col),
            role: field(role_col),
            company: field(company_col),
            telegram_id,
            variant,
        });
    }

    if !invalid_variants.is_empty() {
        let values: Vec<&str> = invalid_variants.iter().map(String::as_str).collect();
        tracing::warn!(
            values = %values.join(", "),
            "invalid variant codes replaced with 'a'"
        );
    }

    if !recipients.is_empty() {
        let counts = variant_distribution(&recipients);
        tracing::info!(
            a = counts.get(&Variant::A).copied().unwrap_or(0),
            b = counts.get(&Variant::B).copied().unwrap_or(0),
            c = counts.get(&Variant::C).copied().unwrap_or(0),
            "variant distribution"
        );
    }

    Ok(recipients)
}

/// Number of recipients assigned to each variant.
#[must_use]
pub fn variant_distribution(recipients: &[Recipient]) -> BTreeMap<Variant, usize> {
    let mut counts = BTreeMap::new();
    for r in recipients {
        *counts.entry(r.variant).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
#[path = "recipients_test.rs"]
mod tests;

//! Program catalog models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Error, Result};

/// A single program as seen in the catalog.
///
/// `id` is the only field used for change detection; the display fields can
/// change between cycles without the program being reported as new.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub participant_count: u64,
}

impl ProgramRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, participant_count: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            participant_count,
        }
    }
}

// Airtable-shaped record returned by the upstream catalog API.
#[derive(Debug, Deserialize)]
struct UpstreamProgram {
    id: String,
    fields: UpstreamFields,
}

#[derive(Debug, Deserialize)]
struct UpstreamFields {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Unweighted–Total", default)]
    unweighted_total: Option<f64>,
}

impl TryFrom<UpstreamProgram> for ProgramRecord {
    type Error = String;

    fn try_from(program: UpstreamProgram) -> std::result::Result<Self, Self::Error> {
        let id = program.id.trim();
        if id.is_empty() {
            return Err("empty id".to_string());
        }

        let participant_count = match program.fields.unweighted_total {
            None => 0,
            Some(total) if total.is_finite() && total >= 0.0 => total.round() as u64,
            Some(total) => {
                return Err(format!("invalid participant count {total} for '{id}'"));
            }
        };

        Ok(ProgramRecord {
            id: id.to_string(),
            name: program.fields.name,
            participant_count,
        })
    }
}

/// Validates an upstream catalog document into program records.
///
/// The document must be a JSON array; anything else fails the whole fetch.
/// Individual entries that don't match the expected shape are skipped and
/// logged, so one bad row upstream does not stall notifications. A non-empty
/// array with no usable entry at all fails the fetch.
pub fn parse_catalog(document: Value) -> Result<Vec<ProgramRecord>> {
    let Value::Array(items) = document else {
        return Err(Error::Catalog(
            "Expected the catalog response to be a JSON array".to_string(),
        ));
    };

    let total = items.len();
    let mut records = Vec::with_capacity(total);
    for (index, item) in items.into_iter().enumerate() {
        let parsed = serde_json::from_value::<UpstreamProgram>(item)
            .map_err(|e| e.to_string())
            .and_then(ProgramRecord::try_from);
        match parsed {
            Ok(record) => records.push(record),
            Err(reason) => log::warn!("Skipping malformed catalog entry #{}: {}", index, reason),
        }
    }

    if total > 0 && records.is_empty() {
        return Err(Error::Catalog(format!(
            "None of the {} catalog entries could be parsed",
            total
        )));
    }

    if records.len() < total {
        log::warn!(
            "Catalog contained {} malformed entries out of {}",
            total - records.len(),
            total
        );
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_airtable_shaped_records_in_order() {
        let document = json!([
            { "id": "rec1", "fields": { "Name": "Sprig", "Unweighted–Total": 120 } },
            { "id": "rec2", "fields": { "Name": "OnBoard", "Unweighted–Total": 45.0 } },
        ]);

        let records = parse_catalog(document).unwrap();

        assert_eq!(
            records,
            vec![
                ProgramRecord::new("rec1", "Sprig", 120),
                ProgramRecord::new("rec2", "OnBoard", 45),
            ]
        );
    }

    #[test]
    fn missing_participant_count_defaults_to_zero() {
        let document = json!([{ "id": "rec1", "fields": { "Name": "Arcade" } }]);

        let records = parse_catalog(document).unwrap();

        assert_eq!(records[0].participant_count, 0);
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let document = json!([
            { "id": "rec1", "fields": { "Name": "Sprig" } },
            { "fields": { "Name": "No id" } },
            { "id": "rec3", "fields": {} },
            { "id": "  ", "fields": { "Name": "Blank id" } },
            { "id": "rec5", "fields": { "Name": "Negative", "Unweighted–Total": -3 } },
            "not an object",
            { "id": "rec7", "fields": { "Name": "Highway" } },
        ]);

        let records = parse_catalog(document).unwrap();

        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["rec1", "rec7"]);
    }

    #[test]
    fn all_entries_malformed_fails_the_fetch() {
        let document = json!([
            { "fields": { "Name": "No id" } },
            { "id": "rec2", "fields": {} },
        ]);

        let err = parse_catalog(document).unwrap_err();

        assert!(matches!(err, Error::Catalog(_)));
    }

    #[test]
    fn empty_array_is_an_empty_catalog() {
        assert!(parse_catalog(json!([])).unwrap().is_empty());
    }

    #[test]
    fn non_array_document_fails_the_fetch() {
        let err = parse_catalog(json!({ "error": "rate limited" })).unwrap_err();
        assert!(matches!(err, Error::Catalog(_)));
    }

    #[test]
    fn snapshot_json_uses_camel_case() {
        let value = serde_json::to_value(ProgramRecord::new("a", "Sprig", 3)).unwrap();
        assert_eq!(value, json!({ "id": "a", "name": "Sprig", "participantCount": 3 }));
    }
}

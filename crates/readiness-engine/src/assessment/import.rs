//! Answer sets exported from other tools.
//!
//! CSV exports carry a `Question ID,Answer` header. Cells are typed on the
//! way in so imported answers compare like ones captured in the wizard.

use super::answers::{AnswerSet, AnswerValue};
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

const LIST_SEPARATOR: char = ';';

#[derive(Debug, thiserror::Error)]
pub enum AnswerImportError {
    #[error("failed to read answers from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid answer CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid answer JSON data: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct AnswerRow {
    #[serde(rename = "Question ID")]
    question_id: String,
    #[serde(rename = "Answer", default, deserialize_with = "empty_string_as_none")]
    answer: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

pub fn answers_from_csv<R: Read>(reader: R) -> Result<AnswerSet, AnswerImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut answers = AnswerSet::new();

    for record in csv_reader.deserialize::<AnswerRow>() {
        let row = record?;
        if row.question_id.is_empty() {
            continue;
        }
        if let Some(cell) = row.answer {
            answers.insert(row.question_id, parse_cell(&cell));
        }
    }

    Ok(answers)
}

pub fn answers_from_json<R: Read>(reader: R) -> Result<AnswerSet, AnswerImportError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Reads an answer file, choosing the format from its extension. Anything
/// other than `.csv` is treated as a JSON object of answers.
pub fn load_answers(path: impl AsRef<Path>) -> Result<AnswerSet, AnswerImportError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| AnswerImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if is_csv {
        answers_from_csv(reader)
    } else {
        answers_from_json(reader)
    }
}

fn parse_cell(cell: &str) -> AnswerValue {
    if cell.contains(LIST_SEPARATOR) {
        return AnswerValue::List(
            cell.split(LIST_SEPARATOR)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
        );
    }
    if cell.eq_ignore_ascii_case("true") {
        return AnswerValue::Boolean(true);
    }
    if cell.eq_ignore_ascii_case("false") {
        return AnswerValue::Boolean(false);
    }
    match cell.parse::<f64>() {
        Ok(number) if number.is_finite() => AnswerValue::Number(number),
        _ => AnswerValue::text(cell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_cells_and_drops_blanks() {
        let csv = "\
Question ID,Answer
company_size, enterprise
cloud_maturity,8
executive_sponsorship,TRUE
integration_capabilities,api; etl
industry,
";

        let answers = answers_from_csv(csv.as_bytes()).expect("csv parses");
        assert_eq!(answers.len(), 4);
        assert_eq!(answers.get("company_size"), Some(&AnswerValue::text("enterprise")));
        assert_eq!(answers.get("cloud_maturity"), Some(&AnswerValue::Number(8.0)));
        assert_eq!(
            answers.get("executive_sponsorship"),
            Some(&AnswerValue::Boolean(true))
        );
        assert_eq!(
            answers.get("integration_capabilities"),
            Some(&AnswerValue::list(["api", "etl"]))
        );
        assert!(answers.get("industry").is_none());
    }

    #[test]
    fn json_nulls_are_dropped() {
        let json = r#"{ "company_size": "smb", "industry": null, "cloud_maturity": 6 }"#;
        let answers = answers_from_json(json.as_bytes()).expect("json parses");
        assert_eq!(answers.len(), 2);
        assert!(!answers.is_answered("industry"));
    }

    #[test]
    fn rejects_csv_without_expected_headers() {
        let csv = "id,value\ncompany_size,smb\n";
        match answers_from_csv(csv.as_bytes()) {
            Err(AnswerImportError::Csv(_)) => {}
            other => panic!("expected csv error, got {other:?}"),
        }
    }
}

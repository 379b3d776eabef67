use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single answer captured by the wizard.
///
/// Values deserialize untagged, so `"enterprise"`, `7`, `true` and
/// `["sso", "mfa"]` map onto the four variants directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Boolean(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl AnswerValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Numeric parse used by comparison operators and scoring functions.
    ///
    /// Anything that does not parse yields `NaN`, which compares false against
    /// every number.
    pub fn as_number(&self) -> f64 {
        match self {
            Self::Number(value) => *value,
            Self::Text(value) => value.trim().parse::<f64>().unwrap_or(f64::NAN),
            Self::Boolean(_) | Self::List(_) => f64::NAN,
        }
    }

    /// String form of a scalar; lists join their items with `,`.
    pub fn render(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Number(value) => render_number(*value),
            Self::Boolean(value) => value.to_string(),
            Self::List(items) => items.join(","),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(value) => value.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Number(_) | Self::Boolean(_) => false,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for AnswerValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

pub(crate) fn render_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Answers keyed by question id. Owned by the wizard session; the engine only
/// reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Option<AnswerValue>>",
    into = "BTreeMap<String, AnswerValue>"
)]
pub struct AnswerSet {
    values: BTreeMap<String, AnswerValue>,
}

impl From<AnswerSet> for BTreeMap<String, AnswerValue> {
    fn from(answers: AnswerSet) -> Self {
        answers.values
    }
}

impl From<BTreeMap<String, Option<AnswerValue>>> for AnswerSet {
    fn from(raw: BTreeMap<String, Option<AnswerValue>>) -> Self {
        let values = raw
            .into_iter()
            .filter_map(|(key, value)| value.map(|value| (key, value)))
            .collect();
        Self { values }
    }
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, question_id: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.insert(question_id, value);
        self
    }

    pub fn insert(&mut self, question_id: impl Into<String>, value: impl Into<AnswerValue>) {
        self.values.insert(question_id.into(), value.into());
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.values.get(question_id)
    }

    /// True when the question has a non-empty answer; multi-selects need at
    /// least one selected item.
    pub fn is_answered(&self, question_id: &str) -> bool {
        self.get(question_id)
            .map(|value| !value.is_empty())
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.values.iter()
    }
}

impl FromIterator<(String, AnswerValue)> for AnswerSet {
    fn from_iter<T: IntoIterator<Item = (String, AnswerValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_each_answer_kind_and_drops_nulls() {
        let answers: AnswerSet = serde_json::from_str(
            r#"{"size":"enterprise","budget":12.5,"sso":true,"tools":["copilot"],"skipped":null}"#,
        )
        .expect("answers parse");

        assert_eq!(answers.get("size"), Some(&AnswerValue::text("enterprise")));
        assert_eq!(answers.get("budget"), Some(&AnswerValue::Number(12.5)));
        assert_eq!(answers.get("sso"), Some(&AnswerValue::Boolean(true)));
        assert_eq!(
            answers.get("tools"),
            Some(&AnswerValue::list(["copilot"]))
        );
        assert!(answers.get("skipped").is_none());
        assert_eq!(answers.len(), 4);
    }

    #[test]
    fn numeric_parse_is_permissive() {
        assert_eq!(AnswerValue::text(" 42 ").as_number(), 42.0);
        assert!(AnswerValue::text("many").as_number().is_nan());
        assert!(AnswerValue::Boolean(true).as_number().is_nan());
        assert!(AnswerValue::list(["1"]).as_number().is_nan());
    }

    #[test]
    fn integral_numbers_render_without_fraction() {
        assert_eq!(AnswerValue::Number(8.0).render(), "8");
        assert_eq!(AnswerValue::Number(2.5).render(), "2.5");
    }

    #[test]
    fn empty_text_and_lists_are_unanswered() {
        let answers = AnswerSet::new()
            .with("name", "")
            .with("tools", AnswerValue::List(Vec::new()))
            .with("count", 0_i64);

        assert!(!answers.is_answered("name"));
        assert!(!answers.is_answered("tools"));
        assert!(!answers.is_answered("missing"));
        assert!(answers.is_answered("count"));
    }
}

//! Comparison rules and boolean condition groups.
//!
//! Every visibility and navigation decision in the wizard funnels through
//! [`evaluate_rule`] and [`evaluate_group`]. Both are pure and total: malformed
//! rules evaluate to `false` and emit a configuration warning instead of
//! failing.

use super::answers::{AnswerSet, AnswerValue};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Contains,
    NotContains,
    In,
    NotIn,
    IsEmpty,
    IsNotEmpty,
    #[serde(other)]
    Unknown,
}

impl ComparisonOperator {
    /// `is_empty`/`is_not_empty` are the only operators that ignore `value`.
    pub const fn requires_value(self) -> bool {
        !matches!(self, Self::IsEmpty | Self::IsNotEmpty | Self::Unknown)
    }

    pub const fn requires_list_value(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOperator {
    And,
    Or,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRule {
    pub question_id: String,
    pub operator: ComparisonOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<AnswerValue>,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl ComparisonRule {
    pub fn new(
        question_id: impl Into<String>,
        operator: ComparisonOperator,
        value: impl Into<AnswerValue>,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            operator,
            value: Some(value.into()),
            case_sensitive: false,
        }
    }

    pub fn presence(question_id: impl Into<String>, operator: ComparisonOperator) -> Self {
        Self {
            question_id: question_id.into(),
            operator,
            value: None,
            case_sensitive: false,
        }
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }
}

/// Recursive AND/OR expression over comparison rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalGroup {
    pub operator: LogicalOperator,
    #[serde(default)]
    pub rules: Vec<ComparisonRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<ConditionalGroup>,
}

impl ConditionalGroup {
    pub fn all(rules: Vec<ComparisonRule>) -> Self {
        Self {
            operator: LogicalOperator::And,
            rules,
            groups: Vec::new(),
        }
    }

    pub fn any(rules: Vec<ComparisonRule>) -> Self {
        Self {
            operator: LogicalOperator::Or,
            rules,
            groups: Vec::new(),
        }
    }

    pub fn single(rule: ComparisonRule) -> Self {
        Self::all(vec![rule])
    }

    pub fn with_group(mut self, group: ConditionalGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Nesting depth, counting this group as 1.
    pub fn depth(&self) -> usize {
        1 + self
            .groups
            .iter()
            .map(ConditionalGroup::depth)
            .max()
            .unwrap_or(0)
    }

    /// Every rule in this group and its sub-groups, depth first.
    pub fn rules_recursive(&self) -> Vec<&ComparisonRule> {
        let mut collected: Vec<&ComparisonRule> = self.rules.iter().collect();
        for group in &self.groups {
            collected.extend(group.rules_recursive());
        }
        collected
    }
}

pub fn evaluate_group(group: &ConditionalGroup, answers: &AnswerSet) -> bool {
    if group.operator == LogicalOperator::Unknown {
        warn!("conditional group uses an unknown logical operator; evaluating to false");
        return false;
    }

    let mut results = group
        .rules
        .iter()
        .map(|rule| evaluate_rule(rule, answers))
        .chain(
            group
                .groups
                .iter()
                .map(|nested| evaluate_group(nested, answers)),
        )
        .peekable();

    // An unconfigured group must never block the wizard.
    if results.peek().is_none() {
        return true;
    }

    match group.operator {
        LogicalOperator::And => results.all(|passed| passed),
        LogicalOperator::Or => results.any(|passed| passed),
        LogicalOperator::Unknown => false,
    }
}

pub fn evaluate_rule(rule: &ComparisonRule, answers: &AnswerSet) -> bool {
    let answer = answers.get(&rule.question_id);
    let fold = Fold(!rule.case_sensitive);

    match rule.operator {
        ComparisonOperator::IsEmpty => return is_empty(answer),
        ComparisonOperator::IsNotEmpty => return !is_empty(answer),
        ComparisonOperator::Unknown => {
            warn!(
                question_id = %rule.question_id,
                "comparison rule uses an unknown operator; evaluating to false"
            );
            return false;
        }
        _ => {}
    }

    let Some(expected) = rule.value.as_ref() else {
        warn!(
            question_id = %rule.question_id,
            operator = ?rule.operator,
            "comparison rule is missing a value; evaluating to false"
        );
        return false;
    };

    match rule.operator {
        ComparisonOperator::Equals => equals(answer, expected, fold),
        ComparisonOperator::NotEquals => !equals(answer, expected, fold),
        ComparisonOperator::GreaterThan => compare_numbers(answer, expected, |a, b| a > b),
        ComparisonOperator::LessThan => compare_numbers(answer, expected, |a, b| a < b),
        ComparisonOperator::GreaterThanOrEqual => {
            compare_numbers(answer, expected, |a, b| a >= b)
        }
        ComparisonOperator::LessThanOrEqual => compare_numbers(answer, expected, |a, b| a <= b),
        ComparisonOperator::Contains => contains(answer, expected, fold),
        ComparisonOperator::NotContains => !contains(answer, expected, fold),
        ComparisonOperator::In => match expected.as_list() {
            Some(options) => is_member(answer, options, fold),
            None => non_list_membership(rule),
        },
        ComparisonOperator::NotIn => match expected.as_list() {
            Some(options) => !is_member(answer, options, fold),
            None => non_list_membership(rule),
        },
        ComparisonOperator::IsEmpty
        | ComparisonOperator::IsNotEmpty
        | ComparisonOperator::Unknown => false,
    }
}

/// Case folding policy for a single rule.
#[derive(Clone, Copy)]
struct Fold(bool);

impl Fold {
    fn apply(self, value: &str) -> String {
        if self.0 {
            value.to_lowercase()
        } else {
            value.to_string()
        }
    }
}

fn is_empty(answer: Option<&AnswerValue>) -> bool {
    answer.map(AnswerValue::is_empty).unwrap_or(true)
}

fn equals(answer: Option<&AnswerValue>, expected: &AnswerValue, fold: Fold) -> bool {
    let Some(answer) = answer else {
        return false;
    };

    match (answer, expected) {
        (AnswerValue::Number(a), AnswerValue::Number(b)) => a == b,
        (AnswerValue::Boolean(a), AnswerValue::Boolean(b)) => a == b,
        (AnswerValue::List(a), AnswerValue::List(b)) => {
            a.len() == b.len()
                && a.iter()
                    .zip(b.iter())
                    .all(|(left, right)| fold.apply(left) == fold.apply(right))
        }
        (AnswerValue::List(_), _) | (_, AnswerValue::List(_)) => false,
        (answer, expected) => fold.apply(&answer.render()) == fold.apply(&expected.render()),
    }
}

fn compare_numbers(
    answer: Option<&AnswerValue>,
    expected: &AnswerValue,
    predicate: impl Fn(f64, f64) -> bool,
) -> bool {
    let left = answer.map(AnswerValue::as_number).unwrap_or(f64::NAN);
    let right = expected.as_number();
    // NaN on either side makes every comparison false.
    predicate(left, right)
}

fn contains(answer: Option<&AnswerValue>, expected: &AnswerValue, fold: Fold) -> bool {
    let Some(answer) = answer else {
        return false;
    };
    let needle = fold.apply(&expected.render());

    match answer {
        AnswerValue::List(items) => items.iter().any(|item| fold.apply(item) == needle),
        scalar => fold.apply(&scalar.render()).contains(&needle),
    }
}

fn is_member(answer: Option<&AnswerValue>, options: &[String], fold: Fold) -> bool {
    let Some(answer) = answer else {
        return false;
    };
    let options: Vec<String> = options.iter().map(|option| fold.apply(option)).collect();

    match answer {
        AnswerValue::List(items) => items
            .iter()
            .any(|item| options.contains(&fold.apply(item))),
        scalar => options.contains(&fold.apply(&scalar.render())),
    }
}

fn non_list_membership(rule: &ComparisonRule) -> bool {
    warn!(
        question_id = %rule.question_id,
        operator = ?rule.operator,
        "membership rule value is not a list; evaluating to false"
    );
    false
}

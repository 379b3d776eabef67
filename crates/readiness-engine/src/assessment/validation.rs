//! Load-time checks for wizard definitions.
//!
//! The evaluators never reject configuration at runtime; this is where bad
//! definitions are caught. Condition depth is bounded here so the recursive
//! evaluators can stay unguarded.

use super::conditions::{ComparisonOperator, ConditionalGroup, LogicalOperator};
use super::definition::AssessmentDefinition;
use super::steps::WizardStep;
use crate::scoring::config::{ScoringConfig, ScoringFunction};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

pub const DEFAULT_MAX_CONDITION_DEPTH: usize = 8;
const WEIGHT_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Warning,
    Error,
}

impl IssueSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigIssue {
    pub severity: IssueSeverity,
    pub location: String,
    pub message: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.severity.label(),
            self.location,
            self.message
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ConfigIssue>,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::Warning)
    }

    fn error(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.push(IssueSeverity::Error, location.into(), message.into());
    }

    fn warning(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.push(IssueSeverity::Warning, location.into(), message.into());
    }

    fn push(&mut self, severity: IssueSeverity, location: String, message: String) {
        self.issues.push(ConfigIssue {
            severity,
            location,
            message,
        });
    }
}

pub fn validate_definition(
    definition: &AssessmentDefinition,
    max_condition_depth: usize,
) -> ValidationReport {
    let mut report = ValidationReport::default();
    let question_ids = check_steps(&definition.steps, &mut report);

    for step in &definition.steps {
        if let Some(logic) = &step.conditional_logic {
            for (name, group) in [("skipIf", &logic.skip_if), ("showIf", &logic.show_if)] {
                if let Some(group) = group {
                    let location = format!("step {}.{}", step.id, name);
                    check_group(group, &location, &question_ids, max_condition_depth, &mut report);
                }
            }
        }

        for question in &step.questions {
            if let Some(logic) = &question.enhanced_conditional_logic {
                for (name, group) in logic.groups() {
                    let location = format!("question {}.{}", question.id, name);
                    check_group(group, &location, &question_ids, max_condition_depth, &mut report);
                }
            }
            if let Some(condition) = question
                .conditional_logic
                .as_ref()
                .and_then(|logic| logic.show_if.as_ref())
            {
                if !question_ids.contains(condition.question_id.as_str()) {
                    report.warning(
                        format!("question {}.conditionalLogic", question.id),
                        format!("references unknown question '{}'", condition.question_id),
                    );
                }
            }
            if let Some(scoring) = &question.scoring {
                match definition.scoring.pillar(&scoring.pillar) {
                    None => report.warning(
                        format!("question {}.scoring", question.id),
                        format!(
                            "pillar '{}' is not present in scoring config {}",
                            scoring.pillar, definition.scoring.version
                        ),
                    ),
                    Some(pillar) if !pillar.questions.contains_key(&question.id) => {
                        report.warning(
                            format!("question {}.scoring", question.id),
                            format!(
                                "pillar '{}' does not configure this question",
                                scoring.pillar
                            ),
                        );
                    }
                    Some(_) => {}
                }
            }
        }
    }

    let step_ids: HashSet<&str> = definition.steps.iter().map(|step| step.id.as_str()).collect();
    for (step_id, rules) in definition.navigation.iter() {
        if !step_ids.contains(step_id.as_str()) {
            report.error(
                format!("navigation {step_id}"),
                "rules registered for an unknown step",
            );
        }
        for (index, rule) in rules.iter().enumerate() {
            let location = format!("navigation {step_id}[{index}]");
            if let Some(target) = &rule.target_step {
                if !step_ids.contains(target.as_str()) {
                    report.error(location.clone(), format!("targets unknown step '{target}'"));
                }
            }
            check_group(
                &rule.condition,
                &location,
                &question_ids,
                max_condition_depth,
                &mut report,
            );
        }
    }

    check_scoring(&definition.scoring, &question_ids, &mut report);
    report
}

fn check_steps<'a>(steps: &'a [WizardStep], report: &mut ValidationReport) -> HashSet<&'a str> {
    let mut orders = BTreeSet::new();
    for step in steps {
        if !orders.insert(step.order) {
            report.error(
                format!("step {}", step.id),
                format!("duplicate step order {}", step.order),
            );
        }
    }
    let contiguous = orders.iter().copied().eq(1..=orders.len() as u32);
    if !steps.is_empty() && !contiguous {
        report.error("steps", "step orders must be contiguous and start at 1");
    }

    let mut question_ids = HashSet::new();
    for step in steps {
        for question in &step.questions {
            if !question_ids.insert(question.id.as_str()) {
                report.error(
                    format!("question {}", question.id),
                    "duplicate question id",
                );
            }
            if question.step_id != step.id {
                report.error(
                    format!("question {}", question.id),
                    format!(
                        "declares step '{}' but is listed under '{}'",
                        question.step_id, step.id
                    ),
                );
            }
        }
    }
    question_ids
}

fn check_group(
    group: &ConditionalGroup,
    location: &str,
    question_ids: &HashSet<&str>,
    max_depth: usize,
    report: &mut ValidationReport,
) {
    let depth = group.depth();
    if depth > max_depth {
        report.error(
            location,
            format!("condition nesting depth {depth} exceeds limit {max_depth}"),
        );
    }
    check_operators(group, location, report);

    for rule in group.rules_recursive() {
        if rule.operator == ComparisonOperator::Unknown {
            report.error(
                location,
                format!("rule on '{}' uses an unknown operator", rule.question_id),
            );
            continue;
        }
        if rule.operator.requires_value() && rule.value.is_none() {
            report.error(
                location,
                format!("rule on '{}' is missing a value", rule.question_id),
            );
        }
        if rule.operator.requires_list_value()
            && rule.value.as_ref().and_then(|value| value.as_list()).is_none()
        {
            report.error(
                location,
                format!("rule on '{}' needs a list value", rule.question_id),
            );
        }
        if !question_ids.contains(rule.question_id.as_str()) {
            report.warning(
                location,
                format!("references unknown question '{}'", rule.question_id),
            );
        }
    }
}

fn check_operators(group: &ConditionalGroup, location: &str, report: &mut ValidationReport) {
    if group.operator == LogicalOperator::Unknown {
        report.error(location, "group uses an unknown logical operator");
    }
    for nested in &group.groups {
        check_operators(nested, location, report);
    }
}

fn check_scoring(
    scoring: &ScoringConfig,
    question_ids: &HashSet<&str>,
    report: &mut ValidationReport,
) {
    let pillar_total: f64 = scoring.pillars.values().map(|pillar| pillar.weight).sum();
    if !scoring.pillars.is_empty() && (pillar_total - 1.0).abs() > WEIGHT_TOLERANCE {
        report.warning(
            format!("scoring {}", scoring.version),
            format!("pillar weights sum to {pillar_total:.3}, expected 1.0"),
        );
    }

    for (name, pillar) in &scoring.pillars {
        let question_total: f64 = pillar.questions.values().map(|question| question.weight).sum();
        if !pillar.questions.is_empty() && (question_total - 1.0).abs() > WEIGHT_TOLERANCE {
            report.warning(
                format!("pillar {name}"),
                format!("question weights sum to {question_total:.3}, expected 1.0"),
            );
        }

        for (key, question) in &pillar.questions {
            let location = format!("pillar {name}.{key}");
            if !question_ids.contains(key.as_str()) {
                report.warning(location.clone(), "scored question is not defined in any step");
            }
            match question.scoring_function {
                ScoringFunction::Unknown => {
                    report.error(location.clone(), "unknown scoring function");
                }
                ScoringFunction::Threshold => match &question.threshold_config {
                    None => report.error(location.clone(), "threshold scoring without thresholds"),
                    Some(config) if config.thresholds.is_empty() => {
                        report.error(location.clone(), "threshold list is empty")
                    }
                    Some(config) => {
                        for bucket in &config.thresholds {
                            if bucket.min > bucket.max {
                                report.error(
                                    location.clone(),
                                    format!("bucket min {} exceeds max {}", bucket.min, bucket.max),
                                );
                            }
                            if bucket.score < 0.0 || bucket.score > question.max_score {
                                report.warning(
                                    location.clone(),
                                    format!(
                                        "bucket score {} lies outside 0..={}",
                                        bucket.score, question.max_score
                                    ),
                                );
                            }
                        }
                    }
                },
                ScoringFunction::Linear
                | ScoringFunction::Exponential
                | ScoringFunction::Weighted => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::blueprint::AssessmentBlueprint;
    use crate::assessment::conditions::ComparisonRule;
    use crate::assessment::navigation::{NavigationAction, NavigationRule};
    use crate::scoring::config::{PillarConfig, QuestionScoringConfig, ThresholdConfig};
    use crate::scoring::ScoringProfile;

    fn standard() -> AssessmentDefinition {
        let (steps, navigation) = AssessmentBlueprint::standard().into_parts();
        AssessmentDefinition {
            steps,
            navigation,
            scoring: ScoringProfile::Standard.config(),
        }
    }

    fn nested(depth: usize) -> ConditionalGroup {
        let mut group = ConditionalGroup::single(ComparisonRule::presence(
            "industry",
            ComparisonOperator::IsNotEmpty,
        ));
        for _ in 1..depth {
            group = ConditionalGroup::all(Vec::new()).with_group(group);
        }
        group
    }

    #[test]
    fn standard_blueprint_is_clean() {
        let report = validate_definition(&standard(), DEFAULT_MAX_CONDITION_DEPTH);
        assert!(report.issues.is_empty(), "{:?}", report.issues);
    }

    #[test]
    fn flags_gaps_in_step_order() {
        let mut definition = standard();
        definition.steps[1].order = 9;
        let report = validate_definition(&definition, DEFAULT_MAX_CONDITION_DEPTH);
        assert!(report.has_errors());
        assert!(report
            .errors()
            .any(|issue| issue.message.contains("contiguous")));
    }

    #[test]
    fn flags_conditions_nested_past_the_limit() {
        let mut definition = standard();
        definition.navigation.register(
            "strategy",
            NavigationRule::new(NavigationAction::Suggest, nested(4)),
        );

        assert!(!validate_definition(&definition, 4).has_errors());
        let report = validate_definition(&definition, 3);
        assert!(report
            .errors()
            .any(|issue| issue.message.contains("nesting depth 4")));
    }

    #[test]
    fn flags_unknown_navigation_targets_and_missing_values() {
        let mut definition = standard();
        definition.navigation.register(
            "company_profile",
            NavigationRule::new(
                NavigationAction::Skip,
                ConditionalGroup::single(ComparisonRule::presence(
                    "uses_ai",
                    ComparisonOperator::Equals,
                )),
            )
            .targeting("nowhere"),
        );

        let report = validate_definition(&definition, DEFAULT_MAX_CONDITION_DEPTH);
        let messages: Vec<&str> = report.errors().map(|issue| issue.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("unknown step 'nowhere'")));
        assert!(messages.iter().any(|m| m.contains("missing a value")));
    }

    #[test]
    fn weight_drift_and_bad_buckets_are_reported() {
        let mut definition = standard();
        definition.scoring = definition.scoring.with_pillar(
            "extra",
            PillarConfig::new(0.5).with_question(
                "cloud_maturity",
                QuestionScoringConfig::new(ScoringFunction::Threshold, 1.0, 10.0)
                    .with_thresholds(ThresholdConfig::buckets(&[(5.0, 1.0, 3.0)])),
            ),
        );

        let report = validate_definition(&definition, DEFAULT_MAX_CONDITION_DEPTH);
        assert!(report
            .warnings()
            .any(|issue| issue.message.contains("pillar weights sum to 1.500")));
        assert!(report
            .errors()
            .any(|issue| issue.message.contains("bucket min 5 exceeds max 1")));
    }

    #[test]
    fn declared_pillar_must_configure_the_question() {
        let mut definition = standard();
        if let Some(pillar) = definition.scoring.pillars.get_mut("technical") {
            pillar.questions.remove("data_quality");
        }

        let report = validate_definition(&definition, DEFAULT_MAX_CONDITION_DEPTH);
        assert!(report.warnings().any(|issue| {
            issue.location == "question data_quality.scoring"
                && issue.message == "pillar 'technical' does not configure this question"
        }));
    }
}

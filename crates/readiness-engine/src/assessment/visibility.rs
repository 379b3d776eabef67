//! Per-question show/hide and enable/disable decisions.

use super::answers::{AnswerSet, AnswerValue};
use super::conditions::evaluate_group;
use super::questions::{EnhancedConditionalLogic, LegacyCondition, Question};
use super::steps::WizardStep;

/// The visibility policy attached to a question. Enhanced logic wins over the
/// legacy single-predicate form whenever it declares `showIf` or `hideIf`.
#[derive(Debug, Clone, Copy)]
pub enum VisibilityRule<'a> {
    Legacy(&'a LegacyCondition),
    Enhanced(&'a EnhancedConditionalLogic),
}

impl<'a> VisibilityRule<'a> {
    pub fn for_question(question: &'a Question) -> Option<Self> {
        if let Some(enhanced) = question
            .enhanced_conditional_logic
            .as_ref()
            .filter(|logic| logic.has_visibility())
        {
            return Some(Self::Enhanced(enhanced));
        }

        question
            .conditional_logic
            .as_ref()
            .and_then(|legacy| legacy.show_if.as_ref())
            .map(Self::Legacy)
    }

    pub fn is_visible(self, answers: &AnswerSet) -> bool {
        match self {
            Self::Enhanced(logic) => {
                if let Some(hide_if) = &logic.hide_if {
                    if evaluate_group(hide_if, answers) {
                        return false;
                    }
                }
                logic
                    .show_if
                    .as_ref()
                    .map(|show_if| evaluate_group(show_if, answers))
                    .unwrap_or(true)
            }
            Self::Legacy(condition) => legacy_matches(condition, answers),
        }
    }
}

pub fn should_show_question(question: &Question, answers: &AnswerSet) -> bool {
    VisibilityRule::for_question(question)
        .map(|rule| rule.is_visible(answers))
        .unwrap_or(true)
}

pub fn should_enable_question(question: &Question, answers: &AnswerSet) -> bool {
    let Some(logic) = question
        .enhanced_conditional_logic
        .as_ref()
        .filter(|logic| logic.has_enablement())
    else {
        return true;
    };

    if let Some(disable_if) = &logic.disable_if {
        if evaluate_group(disable_if, answers) {
            return false;
        }
    }

    logic
        .enable_if
        .as_ref()
        .map(|enable_if| evaluate_group(enable_if, answers))
        .unwrap_or(true)
}

/// Questions of `step` that are currently shown. Completion and scoring only
/// ever look at this subset.
pub fn visible_questions<'a>(step: &'a WizardStep, answers: &AnswerSet) -> Vec<&'a Question> {
    step.questions
        .iter()
        .filter(|question| should_show_question(question, answers))
        .collect()
}

/// Ids of visible, required questions that still lack an answer.
pub fn missing_required_questions(step: &WizardStep, answers: &AnswerSet) -> Vec<String> {
    visible_questions(step, answers)
        .into_iter()
        .filter(|question| question.required && !answers.is_answered(&question.id))
        .map(|question| question.id.clone())
        .collect()
}

fn legacy_matches(condition: &LegacyCondition, answers: &AnswerSet) -> bool {
    let Some(answer) = answers.get(&condition.question_id) else {
        return false;
    };

    match &condition.value {
        AnswerValue::List(expected) => match answer {
            AnswerValue::List(selected) => selected.iter().any(|item| expected.contains(item)),
            scalar => expected.contains(&scalar.render()),
        },
        expected => match (answer, expected) {
            (AnswerValue::Number(a), AnswerValue::Number(b)) => a == b,
            (AnswerValue::List(_), _) => false,
            (answer, expected) => answer.render() == expected.render(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::conditions::{ComparisonOperator, ComparisonRule, ConditionalGroup};
    use crate::assessment::questions::QuestionType;

    fn equals(question_id: &str, value: &str) -> ConditionalGroup {
        ConditionalGroup::single(ComparisonRule::new(
            question_id,
            ComparisonOperator::Equals,
            value,
        ))
    }

    #[test]
    fn questions_without_logic_are_visible_and_enabled() {
        let question = Question::new("industry", "profile", QuestionType::Text, "Industry");
        assert!(should_show_question(&question, &AnswerSet::new()));
        assert!(should_enable_question(&question, &AnswerSet::new()));
    }

    #[test]
    fn hide_takes_precedence_over_show() {
        let question = Question::new("gpu", "tech", QuestionType::Boolean, "GPUs?").with_logic(
            EnhancedConditionalLogic {
                show_if: Some(equals("uses_ai", "yes")),
                hide_if: Some(equals("uses_ai", "yes")),
                ..EnhancedConditionalLogic::default()
            },
        );

        assert!(!should_show_question(
            &question,
            &AnswerSet::new().with("uses_ai", "yes")
        ));
    }

    #[test]
    fn show_if_controls_visibility_when_hide_does_not_match() {
        let question = Question::new("gpu", "tech", QuestionType::Boolean, "GPUs?").with_logic(
            EnhancedConditionalLogic {
                show_if: Some(equals("uses_ai", "yes")),
                hide_if: Some(equals("company_size", "startup")),
                ..EnhancedConditionalLogic::default()
            },
        );

        assert!(should_show_question(
            &question,
            &AnswerSet::new().with("uses_ai", "Yes")
        ));
        assert!(!should_show_question(
            &question,
            &AnswerSet::new().with("uses_ai", "no")
        ));
    }

    #[test]
    fn legacy_list_condition_matches_on_overlap() {
        let question = Question::new("sector_detail", "profile", QuestionType::Text, "Detail")
            .show_when("sectors", AnswerValue::list(["finance", "health"]));

        assert!(should_show_question(
            &question,
            &AnswerSet::new().with("sectors", AnswerValue::list(["retail", "health"]))
        ));
        assert!(should_show_question(
            &question,
            &AnswerSet::new().with("sectors", "finance")
        ));
        assert!(!should_show_question(
            &question,
            &AnswerSet::new().with("sectors", "retail")
        ));
        assert!(!should_show_question(&question, &AnswerSet::new()));
    }

    #[test]
    fn legacy_scalar_condition_requires_exact_equality() {
        let question = Question::new("gpu_count", "tech", QuestionType::Number, "GPUs")
            .show_when("uses_ai", "yes");

        assert!(should_show_question(
            &question,
            &AnswerSet::new().with("uses_ai", "yes")
        ));
        assert!(!should_show_question(
            &question,
            &AnswerSet::new().with("uses_ai", "YES")
        ));
    }

    #[test]
    fn enhanced_logic_without_visibility_falls_back_to_legacy() {
        let question = Question::new("gpu_count", "tech", QuestionType::Number, "GPUs")
            .show_when("uses_ai", "yes")
            .with_logic(EnhancedConditionalLogic {
                disable_if: Some(equals("locked", "true")),
                ..EnhancedConditionalLogic::default()
            });

        let answers = AnswerSet::new().with("uses_ai", "no").with("locked", true);
        assert!(!should_show_question(&question, &answers));
        assert!(!should_enable_question(&question, &answers));
    }

    #[test]
    fn enable_if_gates_enablement() {
        let question = Question::new("budget", "strategy", QuestionType::Number, "Budget")
            .with_logic(EnhancedConditionalLogic {
                enable_if: Some(equals("has_budget", "yes")),
                ..EnhancedConditionalLogic::default()
            });

        assert!(should_enable_question(
            &question,
            &AnswerSet::new().with("has_budget", "yes")
        ));
        assert!(!should_enable_question(&question, &AnswerSet::new()));
    }

    #[test]
    fn missing_required_ignores_hidden_questions() {
        let step = WizardStep::new("tech", 2, "Technology")
            .with_question(
                Question::new("cloud", "tech", QuestionType::Scale, "Cloud").required(),
            )
            .with_question(
                Question::new("gpu_count", "tech", QuestionType::Number, "GPUs")
                    .required()
                    .show_when("uses_ai", "yes"),
            );

        let answers = AnswerSet::new().with("uses_ai", "no");
        assert_eq!(visible_questions(&step, &answers).len(), 1);
        assert_eq!(missing_required_questions(&step, &answers), vec!["cloud"]);

        let answers = answers.with("cloud", 7_i64);
        assert!(missing_required_questions(&step, &answers).is_empty());
    }
}

use super::conditions::ConditionalGroup;
use super::questions::Question;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepConditionalLogic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_if: Option<ConditionalGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_if: Option<ConditionalGroup>,
}

/// An ordered page of the wizard. `order` is 1-based and defines the natural
/// traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardStep {
    pub id: String,
    pub order: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_logic: Option<StepConditionalLogic>,
}

impl WizardStep {
    pub fn new(id: &str, order: u32, title: &str) -> Self {
        Self {
            id: id.to_string(),
            order,
            title: title.to_string(),
            questions: Vec::new(),
            conditional_logic: None,
        }
    }

    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    pub fn skip_when(mut self, group: ConditionalGroup) -> Self {
        self.conditional_logic
            .get_or_insert_with(StepConditionalLogic::default)
            .skip_if = Some(group);
        self
    }

    pub fn show_when(mut self, group: ConditionalGroup) -> Self {
        self.conditional_logic
            .get_or_insert_with(StepConditionalLogic::default)
            .show_if = Some(group);
        self
    }
}

pub(crate) fn find_step<'a>(steps: &'a [WizardStep], step_id: &str) -> Option<&'a WizardStep> {
    steps.iter().find(|step| step.id == step_id)
}

/// Steps sorted by `order`, borrowing from the caller's slice.
pub(crate) fn ordered_steps(steps: &[WizardStep]) -> Vec<&WizardStep> {
    let mut ordered: Vec<&WizardStep> = steps.iter().collect();
    ordered.sort_by_key(|step| step.order);
    ordered
}

use super::answers::AnswerValue;
use super::conditions::ConditionalGroup;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Text,
    Textarea,
    Number,
    Scale,
    SingleSelect,
    MultiSelect,
    Boolean,
}

impl QuestionType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Text => "Short Text",
            Self::Textarea => "Long Text",
            Self::Number => "Number",
            Self::Scale => "Scale",
            Self::SingleSelect => "Single Select",
            Self::MultiSelect => "Multi Select",
            Self::Boolean => "Yes / No",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl QuestionOption {
    pub fn weighted(value: &str, label: &str, weight: f64) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            weight: Some(weight),
        }
    }
}

/// Declared input bounds; scale and number questions use `min`/`max` for
/// linear scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

/// Scoring metadata carried on the question itself. The authoritative weights
/// live in the scoring config; this only names the pillar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionScoring {
    pub pillar: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring_function: Option<String>,
}

fn default_weight() -> f64 {
    1.0
}

/// Single-predicate visibility used by older wizard definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyCondition {
    pub question_id: String,
    pub value: AnswerValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyConditionalLogic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_if: Option<LegacyCondition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedConditionalLogic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_if: Option<ConditionalGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_if: Option<ConditionalGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_if: Option<ConditionalGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_if: Option<ConditionalGroup>,
}

impl EnhancedConditionalLogic {
    pub fn has_visibility(&self) -> bool {
        self.show_if.is_some() || self.hide_if.is_some()
    }

    pub fn has_enablement(&self) -> bool {
        self.enable_if.is_some() || self.disable_if.is_some()
    }

    pub fn groups(&self) -> impl Iterator<Item = (&'static str, &ConditionalGroup)> {
        [
            ("showIf", self.show_if.as_ref()),
            ("hideIf", self.hide_if.as_ref()),
            ("enableIf", self.enable_if.as_ref()),
            ("disableIf", self.disable_if.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, group)| group.map(|group| (name, group)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub step_id: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuestionOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<QuestionValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<QuestionScoring>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_logic: Option<LegacyConditionalLogic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced_conditional_logic: Option<EnhancedConditionalLogic>,
}

impl Question {
    pub fn new(id: &str, step_id: &str, kind: QuestionType, title: &str) -> Self {
        Self {
            id: id.to_string(),
            step_id: step_id.to_string(),
            kind,
            title: title.to_string(),
            required: false,
            options: Vec::new(),
            validation: None,
            scoring: None,
            conditional_logic: None,
            enhanced_conditional_logic: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options(mut self, options: Vec<QuestionOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        let validation = self.validation.get_or_insert_with(QuestionValidation::default);
        validation.min = Some(min);
        validation.max = Some(max);
        self
    }

    pub fn scored_in(mut self, pillar: &str) -> Self {
        self.scoring = Some(QuestionScoring {
            pillar: pillar.to_string(),
            weight: default_weight(),
            scoring_function: None,
        });
        self
    }

    pub fn show_when(mut self, question_id: &str, value: impl Into<AnswerValue>) -> Self {
        self.conditional_logic = Some(LegacyConditionalLogic {
            show_if: Some(LegacyCondition {
                question_id: question_id.to_string(),
                value: value.into(),
            }),
        });
        self
    }

    pub fn with_logic(mut self, logic: EnhancedConditionalLogic) -> Self {
        self.enhanced_conditional_logic = Some(logic);
        self
    }

    pub fn option(&self, value: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|option| option.value == value)
    }
}

use super::answers::AnswerValue;
use super::conditions::{ComparisonOperator, ComparisonRule, ConditionalGroup};
use super::navigation::{NavigationAction, NavigationRegistry, NavigationRule};
use super::questions::{EnhancedConditionalLogic, Question, QuestionOption, QuestionType};
use super::steps::WizardStep;

pub const COMPANY_PROFILE: &str = "company_profile";
pub const TECHNICAL_INFRASTRUCTURE: &str = "technical_infrastructure";
pub const SECURITY_COMPLIANCE: &str = "security_compliance";
pub const AI_USAGE: &str = "ai_usage";
pub const OPERATIONAL_READINESS: &str = "operational_readiness";
pub const STRATEGY: &str = "strategy";

/// Steps plus the navigation rules registered against them.
#[derive(Debug, Clone)]
pub struct AssessmentBlueprint {
    steps: Vec<WizardStep>,
    navigation: NavigationRegistry,
}

impl AssessmentBlueprint {
    pub fn new(steps: Vec<WizardStep>, navigation: NavigationRegistry) -> Self {
        Self { steps, navigation }
    }

    /// The reference AI readiness wizard.
    pub fn standard() -> Self {
        Self {
            steps: standard_steps(),
            navigation: standard_navigation(),
        }
    }

    pub fn steps(&self) -> &[WizardStep] {
        &self.steps
    }

    pub fn navigation(&self) -> &NavigationRegistry {
        &self.navigation
    }

    pub fn into_parts(self) -> (Vec<WizardStep>, NavigationRegistry) {
        (self.steps, self.navigation)
    }
}

fn equals(question_id: &str, value: &str) -> ComparisonRule {
    ComparisonRule::new(question_id, ComparisonOperator::Equals, value)
}

fn options(values: &[(&str, &str, f64)]) -> Vec<QuestionOption> {
    values
        .iter()
        .map(|&(value, label, weight)| QuestionOption::weighted(value, label, weight))
        .collect()
}

fn standard_steps() -> Vec<WizardStep> {
    vec![
        WizardStep::new(COMPANY_PROFILE, 1, "Company Profile")
            .with_question(
                Question::new(
                    "company_size",
                    COMPANY_PROFILE,
                    QuestionType::SingleSelect,
                    "How large is your organisation?",
                )
                .required()
                .with_options(options(&[
                    ("startup", "Startup (under 50 people)", 0.0),
                    ("smb", "Small or mid-sized business", 0.0),
                    ("enterprise", "Enterprise (1000+ people)", 0.0),
                ])),
            )
            .with_question(
                Question::new(
                    "industry",
                    COMPANY_PROFILE,
                    QuestionType::Text,
                    "Which industry do you operate in?",
                )
                .required(),
            )
            .with_question(
                Question::new(
                    "uses_ai",
                    COMPANY_PROFILE,
                    QuestionType::SingleSelect,
                    "Does your organisation use AI today?",
                )
                .required()
                .with_options(options(&[
                    ("yes", "Yes, in production", 0.0),
                    ("planning", "Piloting or planning", 0.0),
                    ("no", "Not yet", 0.0),
                ])),
            ),
        WizardStep::new(TECHNICAL_INFRASTRUCTURE, 2, "Technical Infrastructure")
            .with_question(
                Question::new(
                    "cloud_maturity",
                    TECHNICAL_INFRASTRUCTURE,
                    QuestionType::Scale,
                    "How mature is your cloud platform?",
                )
                .required()
                .with_range(1.0, 10.0)
                .scored_in("technical"),
            )
            .with_question(
                Question::new(
                    "data_quality",
                    TECHNICAL_INFRASTRUCTURE,
                    QuestionType::Scale,
                    "How would you rate the quality of your operational data?",
                )
                .required()
                .with_range(1.0, 10.0)
                .scored_in("technical"),
            )
            .with_question(
                Question::new(
                    "integration_capabilities",
                    TECHNICAL_INFRASTRUCTURE,
                    QuestionType::MultiSelect,
                    "Which integration capabilities are available?",
                )
                .with_options(options(&[
                    ("api", "Documented internal APIs", 3.0),
                    ("event_streaming", "Event streaming", 2.0),
                    ("etl", "Batch ETL pipelines", 2.0),
                    ("none", "None of these", 0.0),
                ]))
                .scored_in("technical"),
            ),
        WizardStep::new(SECURITY_COMPLIANCE, 3, "Security & Compliance")
            .with_question(
                Question::new(
                    "security_framework",
                    SECURITY_COMPLIANCE,
                    QuestionType::SingleSelect,
                    "Which security framework do you follow?",
                )
                .required()
                .with_options(options(&[
                    ("none", "None", 0.0),
                    ("in_progress", "Certification in progress", 2.0),
                    ("soc2", "SOC 2", 4.0),
                    ("iso27001", "ISO 27001", 5.0),
                ]))
                .scored_in("security"),
            )
            .with_question(
                Question::new(
                    "data_governance",
                    SECURITY_COMPLIANCE,
                    QuestionType::Scale,
                    "How well governed is access to sensitive data?",
                )
                .required()
                .with_range(1.0, 10.0)
                .scored_in("security"),
            )
            .with_question(
                Question::new(
                    "compliance_requirements",
                    SECURITY_COMPLIANCE,
                    QuestionType::MultiSelect,
                    "Which regulations apply to you?",
                )
                .with_options(options(&[
                    ("gdpr", "GDPR", 0.0),
                    ("hipaa", "HIPAA", 0.0),
                    ("pci_dss", "PCI DSS", 0.0),
                    ("eu_ai_act", "EU AI Act", 0.0),
                ]))
                .with_logic(EnhancedConditionalLogic {
                    show_if: Some(ConditionalGroup::all(vec![ComparisonRule::new(
                        "company_size",
                        ComparisonOperator::In,
                        AnswerValue::list(["smb", "enterprise"]),
                    )])),
                    ..EnhancedConditionalLogic::default()
                }),
            )
            .with_question(
                Question::new(
                    "enterprise_audit_cadence",
                    SECURITY_COMPLIANCE,
                    QuestionType::Number,
                    "How many security audits do you run per year?",
                )
                .required()
                .with_range(0.0, 52.0)
                .show_when("company_size", "enterprise")
                .scored_in("security"),
            ),
        WizardStep::new(AI_USAGE, 4, "AI Usage")
            .with_question(
                Question::new(
                    "ai_maturity_level",
                    AI_USAGE,
                    QuestionType::Number,
                    "How mature is your AI usage (0 = none, 5 = AI-native)?",
                )
                .required()
                .with_range(0.0, 5.0)
                .scored_in("ai_adoption"),
            )
            .with_question(
                Question::new(
                    "ai_use_cases",
                    AI_USAGE,
                    QuestionType::MultiSelect,
                    "Where is AI used today?",
                )
                .with_options(options(&[
                    ("customer_support", "Customer support", 2.0),
                    ("analytics", "Analytics and forecasting", 3.0),
                    ("code_generation", "Code generation", 2.0),
                    ("content", "Content creation", 1.0),
                ]))
                .with_logic(EnhancedConditionalLogic {
                    hide_if: Some(ConditionalGroup::single(ComparisonRule::new(
                        "ai_maturity_level",
                        ComparisonOperator::LessThan,
                        1_i64,
                    ))),
                    ..EnhancedConditionalLogic::default()
                })
                .scored_in("ai_adoption"),
            ),
        WizardStep::new(OPERATIONAL_READINESS, 5, "Operational Readiness")
            .with_question(
                Question::new(
                    "team_ai_skills",
                    OPERATIONAL_READINESS,
                    QuestionType::Scale,
                    "How strong are your team's AI skills?",
                )
                .required()
                .with_range(1.0, 10.0)
                .scored_in("operational"),
            )
            .with_question(
                Question::new(
                    "change_management",
                    OPERATIONAL_READINESS,
                    QuestionType::SingleSelect,
                    "How is change management handled?",
                )
                .required()
                .with_options(options(&[
                    ("none", "No formal process", 0.0),
                    ("ad_hoc", "Ad hoc", 1.0),
                    ("defined", "Defined process", 3.0),
                    ("embedded", "Embedded in delivery", 4.0),
                ]))
                .scored_in("operational"),
            )
            .with_question(
                Question::new(
                    "trained_staff_percentage",
                    OPERATIONAL_READINESS,
                    QuestionType::Number,
                    "What share of staff has completed AI training (%)?",
                )
                .with_range(0.0, 100.0)
                .scored_in("operational"),
            ),
        WizardStep::new(STRATEGY, 6, "Strategy & Investment")
            .with_question(
                Question::new(
                    "executive_sponsorship",
                    STRATEGY,
                    QuestionType::Boolean,
                    "Is there an executive sponsor for AI initiatives?",
                )
                .required()
                .with_options(options(&[("true", "Yes", 1.0), ("false", "No", 0.0)]))
                .scored_in("strategic"),
            )
            .with_question(
                Question::new(
                    "ai_budget_percentage",
                    STRATEGY,
                    QuestionType::Number,
                    "What share of the IT budget is allocated to AI (%)?",
                )
                .with_range(0.0, 100.0)
                .scored_in("strategic"),
            )
            .with_question(
                Question::new(
                    "roadmap_horizon",
                    STRATEGY,
                    QuestionType::SingleSelect,
                    "How far ahead does your AI roadmap plan?",
                )
                .with_options(options(&[
                    ("none", "No roadmap", 0.0),
                    ("6_months", "Six months", 2.0),
                    ("12_months", "Twelve months", 3.0),
                    ("24_months", "Two years or more", 4.0),
                ]))
                .scored_in("strategic"),
            ),
    ]
}

fn standard_navigation() -> NavigationRegistry {
    NavigationRegistry::new()
        .with(
            COMPANY_PROFILE,
            NavigationRule::new(
                NavigationAction::Suggest,
                ConditionalGroup::single(equals("company_size", "enterprise")),
            )
            .targeting(SECURITY_COMPLIANCE)
            .with_message("Enterprise organisations should review compliance early"),
        )
        .with(
            TECHNICAL_INFRASTRUCTURE,
            NavigationRule::new(NavigationAction::Require, ConditionalGroup::all(Vec::new()))
                .with_message("Technical infrastructure answers are needed for scoring"),
        )
        .with(
            SECURITY_COMPLIANCE,
            NavigationRule::new(
                NavigationAction::Skip,
                ConditionalGroup::single(equals("uses_ai", "no")),
            )
            .targeting(OPERATIONAL_READINESS)
            .with_message("No AI usage reported; skipping the AI usage questions"),
        )
        .with(
            STRATEGY,
            NavigationRule::new(
                NavigationAction::Block,
                ConditionalGroup::single(ComparisonRule::new(
                    "ai_budget_percentage",
                    ComparisonOperator::GreaterThan,
                    100_i64,
                )),
            )
            .with_message("AI budget share cannot exceed 100%"),
        )
}

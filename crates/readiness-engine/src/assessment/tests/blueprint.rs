use super::common::{company_profile, standard};
use crate::assessment::answers::AnswerSet;
use crate::assessment::blueprint::{AI_USAGE, SECURITY_COMPLIANCE};
use crate::assessment::steps::{find_step, WizardStep};
use crate::assessment::visibility::visible_questions;

fn visible_ids(steps: &[WizardStep], step_id: &str, answers: &AnswerSet) -> Vec<String> {
    let step = find_step(steps, step_id).expect("blueprint step exists");
    visible_questions(step, answers)
        .into_iter()
        .map(|question| question.id.clone())
        .collect()
}

#[test]
fn blueprint_has_six_ordered_steps() {
    let (steps, _) = standard();
    let orders: Vec<u32> = steps.iter().map(|step| step.order).collect();
    assert_eq!(orders, vec![1, 2, 3, 4, 5, 6]);
    for step in &steps {
        for question in &step.questions {
            assert_eq!(question.step_id, step.id, "{} misfiled", question.id);
        }
    }
}

#[test]
fn compliance_questions_follow_company_size() {
    let (steps, _) = standard();

    let startup = visible_ids(&steps, SECURITY_COMPLIANCE, &company_profile("startup", "yes"));
    assert_eq!(startup, vec!["security_framework", "data_governance"]);

    let smb = visible_ids(&steps, SECURITY_COMPLIANCE, &company_profile("SMB", "yes"));
    assert_eq!(
        smb,
        vec!["security_framework", "data_governance", "compliance_requirements"]
    );

    let enterprise = visible_ids(
        &steps,
        SECURITY_COMPLIANCE,
        &company_profile("enterprise", "yes"),
    );
    assert_eq!(
        enterprise,
        vec![
            "security_framework",
            "data_governance",
            "compliance_requirements",
            "enterprise_audit_cadence",
        ]
    );
}

#[test]
fn legacy_audit_condition_is_case_sensitive() {
    let (steps, _) = standard();
    let visible = visible_ids(&steps, SECURITY_COMPLIANCE, &company_profile("Enterprise", "yes"));
    assert!(!visible.contains(&"enterprise_audit_cadence".to_string()));
    assert!(visible.contains(&"compliance_requirements".to_string()));
}

#[test]
fn use_cases_hide_below_maturity_one() {
    let (steps, _) = standard();

    let unanswered = visible_ids(&steps, AI_USAGE, &AnswerSet::new());
    assert_eq!(unanswered, vec!["ai_maturity_level", "ai_use_cases"]);

    let novice = visible_ids(&steps, AI_USAGE, &AnswerSet::new().with("ai_maturity_level", 0_i64));
    assert_eq!(novice, vec!["ai_maturity_level"]);

    let practised = visible_ids(&steps, AI_USAGE, &AnswerSet::new().with("ai_maturity_level", "2"));
    assert_eq!(practised, vec!["ai_maturity_level", "ai_use_cases"]);
}

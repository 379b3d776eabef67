use readiness_engine::assessment::{
    load_answers, AnswerImportError, AnswerSet, AnswerValue, AssessmentDefinition, DefinitionError,
    IssueSeverity, DEFAULT_MAX_CONDITION_DEPTH,
};
use readiness_engine::scoring::ScoringProfile;
use std::fs;

const CUSTOM_WIZARD: &str = r#"{
    "steps": [
        {
            "id": "profile",
            "order": 1,
            "title": "Profile",
            "questions": [
                {
                    "id": "team_size",
                    "stepId": "profile",
                    "type": "number",
                    "title": "Team size",
                    "required": true
                },
                {
                    "id": "remote_policy",
                    "stepId": "profile",
                    "type": "single_select",
                    "title": "Remote policy",
                    "options": [
                        { "value": "office", "label": "Office", "weight": 1 },
                        { "value": "hybrid", "label": "Hybrid", "weight": 3 },
                        { "value": "remote", "label": "Remote", "weight": 2 }
                    ],
                    "enhancedConditionalLogic": {
                        "showIf": {
                            "operator": "and",
                            "rules": [
                                {
                                    "questionId": "team_size",
                                    "operator": "greater_than",
                                    "value": 5
                                }
                            ]
                        }
                    },
                    "scoring": { "pillar": "culture" }
                }
            ]
        },
        { "id": "closing", "order": 2, "title": "Closing", "questions": [] }
    ],
    "navigation": {
        "profile": [
            {
                "action": "block",
                "condition": {
                    "operator": "or",
                    "rules": [{ "questionId": "team_size", "operator": "less_than", "value": 1 }]
                },
                "message": "Team size must be positive"
            }
        ]
    },
    "scoring": {
        "version": "custom-1",
        "pillars": {
            "culture": {
                "weight": 1.0,
                "questions": {
                    "remote_policy": {
                        "weight": 1.0,
                        "scoringFunction": "weighted",
                        "maxScore": 10
                    }
                }
            }
        }
    }
}"#;

#[test]
fn loads_a_custom_definition_from_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("wizard.json");
    fs::write(&path, CUSTOM_WIZARD).expect("write definition");

    let definition =
        AssessmentDefinition::load(&path, DEFAULT_MAX_CONDITION_DEPTH).expect("definition loads");
    assert_eq!(definition.steps.len(), 2);
    assert_eq!(definition.scoring.version, "custom-1");

    let navigation = definition.navigation_engine().evaluate_navigation(
        "profile",
        &definition.steps,
        &AnswerSet::new().with("team_size", 0_i64),
    );
    assert!(!navigation.can_navigate_next);
    assert_eq!(
        navigation.block_message.as_deref(),
        Some("Team size must be positive")
    );

    let answers: AnswerSet = [
        ("team_size".to_string(), AnswerValue::Number(12.0)),
        ("remote_policy".to_string(), AnswerValue::text("hybrid")),
    ]
    .into_iter()
    .collect();
    let total = definition.scoring_engine().calculate_total_score(&answers);
    assert!((total.total_score - 100.0).abs() < 1e-9);
}

#[test]
fn custom_definition_can_be_rescored_with_a_profile() {
    let definition = AssessmentDefinition::from_reader(CUSTOM_WIZARD.as_bytes(), 8)
        .expect("definition parses")
        .with_profile(ScoringProfile::Startup);
    assert_eq!(definition.scoring.version, "2.0-startup");

    let report = definition.validate(8);
    assert!(!report.has_errors());
    assert!(report
        .warnings()
        .any(|issue| issue.message.contains("not defined in any step")));
}

#[test]
fn missing_files_surface_as_io_errors() {
    let dir = tempfile::tempdir().expect("temp dir");
    match AssessmentDefinition::load(dir.path().join("absent.json"), 8) {
        Err(DefinitionError::Io { path, .. }) => assert!(path.ends_with("absent.json")),
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn malformed_json_is_rejected() {
    match AssessmentDefinition::from_reader(&b"{ \"steps\": [ }"[..], 8) {
        Err(DefinitionError::Json(_)) => {}
        other => panic!("expected json error, got {other:?}"),
    }
}

#[test]
fn unknown_operators_fail_validation() {
    let broken = CUSTOM_WIZARD.replace("\"greater_than\"", "\"roughly\"");
    match AssessmentDefinition::from_reader(broken.as_bytes(), 8) {
        Err(DefinitionError::Invalid(issues)) => {
            assert!(issues
                .iter()
                .all(|issue| issue.severity == IssueSeverity::Error));
            assert!(issues
                .iter()
                .any(|issue| issue.message.contains("unknown operator")));
        }
        other => panic!("expected invalid definition, got {other:?}"),
    }
}

#[test]
fn depth_limit_is_applied_at_load_time() {
    let mut nested = String::from(
        r#"{ "operator": "and", "rules": [{ "questionId": "q", "operator": "is_not_empty" }] }"#,
    );
    for _ in 0..3 {
        nested = format!(r#"{{ "operator": "and", "rules": [], "groups": [{nested}] }}"#);
    }
    let json = format!(
        r#"{{
            "steps": [{{
                "id": "only",
                "order": 1,
                "questions": [
                    {{ "id": "q", "stepId": "only", "type": "text" }},
                    {{ "id": "r", "stepId": "only", "type": "text",
                       "enhancedConditionalLogic": {{ "showIf": {nested} }} }}
                ]
            }}]
        }}"#
    );

    assert!(AssessmentDefinition::from_reader(json.as_bytes(), 4).is_ok());
    match AssessmentDefinition::from_reader(json.as_bytes(), 3) {
        Err(DefinitionError::Invalid(issues)) => {
            assert!(issues[0].message.contains("depth 4 exceeds limit 3"));
        }
        other => panic!("expected depth error, got {other:?}"),
    }
}

#[test]
fn csv_answer_exports_are_typed() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("answers.CSV");
    fs::write(
        &path,
        "Question ID,Answer\n\
         company_size,enterprise\n\
         cloud_maturity,7\n\
         integration_capabilities,api;etl\n\
         industry,\n",
    )
    .expect("write csv");

    let answers = load_answers(&path).expect("csv loads");
    assert_eq!(answers.len(), 3);
    assert_eq!(answers.get("cloud_maturity"), Some(&AnswerValue::Number(7.0)));
    assert_eq!(
        answers.get("integration_capabilities"),
        Some(&AnswerValue::list(["api", "etl"]))
    );
}

#[test]
fn json_answer_files_are_accepted() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("answers.json");
    fs::write(
        &path,
        r#"{
            "company_size": "smb",
            "cloud_maturity": 6,
            "integration_capabilities": ["api"],
            "industry": null
        }"#,
    )
    .expect("write json");

    let answers = load_answers(&path).expect("json loads");
    assert_eq!(answers.len(), 3);
    assert!(answers.is_answered("integration_capabilities"));

    match load_answers(dir.path().join("missing.csv")) {
        Err(AnswerImportError::Io { .. }) => {}
        other => panic!("expected io error, got {other:?}"),
    }
}

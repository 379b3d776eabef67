use super::blueprint::AssessmentBlueprint;
use super::navigation::{NavigationEngine, NavigationRegistry};
use super::steps::WizardStep;
use super::validation::{validate_definition, ConfigIssue, ValidationReport};
use crate::scoring::{ScoringConfig, ScoringEngine, ScoringProfile};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("failed to read assessment definition {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("assessment definition is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("assessment definition rejected with {} error(s)", .0.len())]
    Invalid(Vec<ConfigIssue>),
}

/// A complete wizard: steps, the navigation rules registered against them and
/// the scoring config applied to their answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentDefinition {
    pub steps: Vec<WizardStep>,
    #[serde(default)]
    pub navigation: NavigationRegistry,
    #[serde(default = "standard_scoring")]
    pub scoring: ScoringConfig,
}

fn standard_scoring() -> ScoringConfig {
    ScoringProfile::Standard.config()
}

impl AssessmentDefinition {
    /// The built-in wizard scored with `profile`.
    pub fn standard(profile: ScoringProfile) -> Self {
        let (steps, navigation) = AssessmentBlueprint::standard().into_parts();
        Self {
            steps,
            navigation,
            scoring: profile.config(),
        }
    }

    pub fn load(
        path: impl AsRef<Path>,
        max_condition_depth: usize,
    ) -> Result<Self, DefinitionError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DefinitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let definition = Self::from_reader(BufReader::new(file), max_condition_depth)?;
        info!(
            path = %path.display(),
            steps = definition.steps.len(),
            scoring_version = %definition.scoring.version,
            "loaded assessment definition"
        );
        Ok(definition)
    }

    /// Parses and validates a definition. Warnings are logged; any
    /// error-severity issue rejects the whole definition.
    pub fn from_reader<R: Read>(
        reader: R,
        max_condition_depth: usize,
    ) -> Result<Self, DefinitionError> {
        let definition: Self = serde_json::from_reader(reader)?;
        definition.checked(max_condition_depth)
    }

    pub fn checked(self, max_condition_depth: usize) -> Result<Self, DefinitionError> {
        let report = self.validate(max_condition_depth);
        for issue in report.warnings() {
            warn!(location = %issue.location, "{}", issue.message);
        }
        if report.has_errors() {
            return Err(DefinitionError::Invalid(report.errors().cloned().collect()));
        }
        Ok(self)
    }

    pub fn validate(&self, max_condition_depth: usize) -> ValidationReport {
        validate_definition(self, max_condition_depth)
    }

    /// Swaps in the config produced by `profile`, keeping steps and rules.
    pub fn with_profile(mut self, profile: ScoringProfile) -> Self {
        self.scoring = profile.config();
        self
    }

    pub fn navigation_engine(&self) -> NavigationEngine {
        NavigationEngine::new(self.navigation.clone())
    }

    pub fn scoring_engine(&self) -> ScoringEngine {
        ScoringEngine::new(self.scoring.clone(), &self.steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_definition_defaults_navigation_and_scoring() {
        let json = r#"{
            "steps": [
                {
                    "id": "basics",
                    "order": 1,
                    "title": "Basics",
                    "questions": [
                        {
                            "id": "name",
                            "stepId": "basics",
                            "type": "text",
                            "title": "Name",
                            "required": true
                        }
                    ]
                }
            ]
        }"#;

        let definition =
            AssessmentDefinition::from_reader(json.as_bytes(), 8).expect("definition parses");
        assert_eq!(definition.steps.len(), 1);
        assert_eq!(definition.navigation.iter().count(), 0);
        assert_eq!(definition.scoring.version, "2.0-standard");
    }

    #[test]
    fn rejects_definitions_with_errors() {
        let json = r#"{
            "steps": [
                { "id": "one", "order": 1, "title": "One", "questions": [] },
                { "id": "two", "order": 3, "title": "Two", "questions": [] }
            ]
        }"#;

        match AssessmentDefinition::from_reader(json.as_bytes(), 8) {
            Err(DefinitionError::Invalid(issues)) => {
                assert!(issues.iter().any(|issue| issue.message.contains("contiguous")));
            }
            other => panic!("expected invalid definition, got {other:?}"),
        }
    }

    #[test]
    fn standard_definition_round_trips_through_json() {
        let definition = AssessmentDefinition::standard(ScoringProfile::Enterprise);
        let json = serde_json::to_string(&definition).expect("serialize");
        let parsed = AssessmentDefinition::from_reader(json.as_bytes(), 8).expect("parse");
        assert_eq!(parsed, definition);
    }
}

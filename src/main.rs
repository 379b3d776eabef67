use clap::{Args, Parser, Subcommand};
use readiness_engine::assessment::{load_answers, AnswerSet, AssessmentDefinition, ConfigIssue};
use readiness_engine::config::{AppConfig, AssessmentSettings};
use readiness_engine::error::AppError;
use readiness_engine::scoring::ScoringProfile;
use readiness_engine::telemetry;
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "readiness-audit",
    about = "Evaluate AI readiness wizard navigation and scoring from the command line",
    version
)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Default)]
struct SourceArgs {
    /// Wizard definition JSON (defaults to READINESS_DEFINITION_PATH, then the built-in wizard)
    #[arg(long, global = true)]
    definition: Option<PathBuf>,
    /// Answers as a JSON object or a `Question ID,Answer` CSV export
    #[arg(long, global = true)]
    answers: Option<PathBuf>,
    /// Scoring profile: standard, enterprise, startup or auto (picked from company_size)
    #[arg(long, global = true, value_parser = parse_profile)]
    profile: Option<ProfileChoice>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a wizard definition and list every configuration issue
    Validate,
    /// Evaluate navigation from one step
    Navigate {
        /// Step the user is currently on
        #[arg(long)]
        step: String,
    },
    /// Show the step sequence and progress implied by the answers
    Sequence,
    /// Calculate the total and per-pillar score
    Score,
    /// Preview the best reachable score from a step onwards
    Preview {
        /// Order of the step the user has reached
        #[arg(long)]
        step_order: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProfileChoice {
    Named(ScoringProfile),
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum DefinitionSource {
    File,
    BuiltIn,
}

#[derive(Debug, Serialize)]
struct ValidationResponse {
    definition_source: DefinitionSource,
    scoring_version: String,
    steps: usize,
    errors: usize,
    warnings: usize,
    issues: Vec<ConfigIssue>,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    info!(environment = ?config.environment, "readiness audit starting");

    let output = execute(cli, &config.assessment)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn parse_profile(raw: &str) -> Result<ProfileChoice, String> {
    if raw.trim().eq_ignore_ascii_case("auto") {
        return Ok(ProfileChoice::Auto);
    }
    raw.parse::<ScoringProfile>()
        .map(ProfileChoice::Named)
        .map_err(|err| err.to_string())
}

fn execute(cli: Cli, settings: &AssessmentSettings) -> Result<Value, AppError> {
    let Cli { source, command } = cli;

    let output = match command {
        Command::Validate => validate(&source, settings)?,
        Command::Navigate { step } => {
            let (definition, answers) = prepare(&source, settings)?;
            if !definition.steps.iter().any(|candidate| candidate.id == step) {
                return Err(AppError::UnknownStep(step));
            }
            let navigation = definition.navigation_engine().evaluate_navigation(
                &step,
                &definition.steps,
                &answers,
            );
            serde_json::to_value(navigation)?
        }
        Command::Sequence => {
            let (definition, answers) = prepare(&source, settings)?;
            let progress = definition
                .navigation_engine()
                .progress(&definition.steps, &answers);
            serde_json::to_value(progress)?
        }
        Command::Score => {
            let (definition, answers) = prepare(&source, settings)?;
            let total = definition.scoring_engine().calculate_total_score(&answers);
            serde_json::to_value(total)?
        }
        Command::Preview { step_order } => {
            let (definition, answers) = prepare(&source, settings)?;
            let preview = definition
                .scoring_engine()
                .generate_scoring_preview(&answers, step_order);
            serde_json::to_value(preview)?
        }
    };
    Ok(output)
}

/// Loads answers and the checked definition, then settles the scoring profile.
fn prepare(
    source: &SourceArgs,
    settings: &AssessmentSettings,
) -> Result<(AssessmentDefinition, AnswerSet), AppError> {
    let answers = match &source.answers {
        Some(path) => load_answers(path)?,
        None => AnswerSet::new(),
    };
    let (definition, origin) = load_definition(source, settings)?;
    let definition = apply_profile(definition, origin, source.profile, settings, &answers);
    info!(
        scoring_version = %definition.scoring.version,
        answered = answers.len(),
        "assessment ready"
    );
    Ok((definition, answers))
}

fn definition_path<'a>(
    source: &'a SourceArgs,
    settings: &'a AssessmentSettings,
) -> Option<&'a PathBuf> {
    source
        .definition
        .as_ref()
        .or(settings.definition_path.as_ref())
}

fn load_definition(
    source: &SourceArgs,
    settings: &AssessmentSettings,
) -> Result<(AssessmentDefinition, DefinitionSource), AppError> {
    match definition_path(source, settings) {
        Some(path) => Ok((
            AssessmentDefinition::load(path, settings.max_condition_depth)?,
            DefinitionSource::File,
        )),
        None => Ok((
            AssessmentDefinition::standard(settings.scoring_profile),
            DefinitionSource::BuiltIn,
        )),
    }
}

/// `--profile` always wins. Without it a definition file keeps its own
/// scoring and the built-in wizard uses the configured profile.
fn apply_profile(
    definition: AssessmentDefinition,
    origin: DefinitionSource,
    choice: Option<ProfileChoice>,
    settings: &AssessmentSettings,
    answers: &AnswerSet,
) -> AssessmentDefinition {
    match (choice, origin) {
        (Some(ProfileChoice::Named(profile)), _) => definition.with_profile(profile),
        (Some(ProfileChoice::Auto), _) => {
            definition.with_profile(ScoringProfile::for_answers(answers))
        }
        (None, DefinitionSource::BuiltIn) => definition.with_profile(settings.scoring_profile),
        (None, DefinitionSource::File) => definition,
    }
}

/// Reports every issue instead of failing on the first error-severity one.
fn validate(source: &SourceArgs, settings: &AssessmentSettings) -> Result<Value, AppError> {
    let (definition, origin) = match definition_path(source, settings) {
        Some(path) => {
            let file = File::open(path)?;
            let definition: AssessmentDefinition =
                serde_json::from_reader(BufReader::new(file))?;
            (definition, DefinitionSource::File)
        }
        None => (
            AssessmentDefinition::standard(settings.scoring_profile),
            DefinitionSource::BuiltIn,
        ),
    };

    let definition = apply_profile(definition, origin, source.profile, settings, &AnswerSet::new());
    let report = definition.validate(settings.max_condition_depth);
    let response = ValidationResponse {
        definition_source: origin,
        scoring_version: definition.scoring.version.clone(),
        steps: definition.steps.len(),
        errors: report.errors().count(),
        warnings: report.warnings().count(),
        issues: report.issues,
    };
    Ok(serde_json::to_value(response)?)
}

mod wizard;

use clap::{Parser, Subcommand, ValueEnum};
use quiz_relay::{
    DryRunRelay, HttpRelay, LeadRelay, QuizSession, RelayConfig, SessionError, SubmitOutcome,
};
use quiz_spec::{
    AnswersDocument, OptionCatalog, QuizError, QuizEvent, QuizMachine, Step, SubmissionPhase,
    ValidationResult, answers_schema, validate,
};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wizard::{Frontend, Verbosity, WizardPresenter, parse_choice};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const DEFAULT_PAGE: &str = "https://perma.studio/#lead-quiz";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Text-based lead quiz CLI",
    long_about = "Runs the branching lead quiz, validates answer documents and prints the catalog or answer schema"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RenderMode {
    Text,
    Json,
}

impl From<RenderMode> for Frontend {
    fn from(mode: RenderMode) -> Self {
        match mode {
            RenderMode::Text => Frontend::Text,
            RenderMode::Json => Frontend::Json,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Run the quiz interactively and submit the lead.
    Wizard {
        /// Optional catalog JSON replacing the bundled studio catalog.
        #[arg(long, value_name = "CATALOG")]
        catalog: Option<PathBuf>,
        /// Page address reported with the lead.
        #[arg(long, value_name = "URL", default_value = DEFAULT_PAGE)]
        page: String,
        /// Relay access key (defaults to QUIZ_RELAY_ACCESS_KEY).
        #[arg(long, value_name = "KEY")]
        access_key: Option<String>,
        /// Relay endpoint (defaults to QUIZ_RELAY_ENDPOINT or the public relay).
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,
        /// Log the form instead of posting it.
        #[arg(long)]
        dry_run: bool,
        #[arg(long, hide = true, default_value = "")]
        botcheck: String,
        /// Show verbose output (navigation state, answers JSON, info logs).
        #[arg(long, alias = "debug")]
        verbose: bool,
        /// Render output mode for each step.
        #[arg(long, value_enum, default_value_t = RenderMode::Text)]
        format: RenderMode,
    },
    /// Validate an answers document against the catalog.
    Validate {
        /// Path to the answers JSON file.
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
        #[arg(long, value_name = "CATALOG")]
        catalog: Option<PathBuf>,
    },
    /// Print the JSON schema of an answers document.
    Schema,
    /// Print the effective option catalog.
    Catalog {
        #[arg(long, value_name = "CATALOG")]
        catalog: Option<PathBuf>,
    },
}

struct WizardOptions {
    catalog: Option<PathBuf>,
    page: String,
    access_key: Option<String>,
    endpoint: Option<String>,
    dry_run: bool,
    botcheck: String,
    verbose: bool,
    format: RenderMode,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Wizard {
            catalog,
            page,
            access_key,
            endpoint,
            dry_run,
            botcheck,
            verbose,
            format,
        } => {
            init_tracing(verbose);
            run_wizard(WizardOptions {
                catalog,
                page,
                access_key,
                endpoint,
                dry_run,
                botcheck,
                verbose,
                format,
            })
        }
        Command::Validate { answers, catalog } => {
            init_tracing(false);
            run_validate(answers, catalog)
        }
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&answers_schema())?);
            Ok(())
        }
        Command::Catalog { catalog } => {
            let catalog = load_catalog(catalog)?;
            println!("{}", serde_json::to_string_pretty(&catalog)?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_catalog(path: Option<PathBuf>) -> CliResult<OptionCatalog> {
    let catalog = match path {
        Some(path) => OptionCatalog::from_path(&path)?,
        None => OptionCatalog::studio()?,
    };
    Ok(catalog)
}

fn relay_config(options: &WizardOptions) -> CliResult<RelayConfig> {
    let mut config = match &options.access_key {
        Some(key) => RelayConfig::new(key.clone())?,
        None if options.dry_run => RelayConfig::new("dry-run")?,
        None => RelayConfig::from_env()?,
    };
    if let Some(endpoint) = &options.endpoint {
        config = config.with_endpoint(endpoint)?;
    }
    Ok(config)
}

fn run_wizard(options: WizardOptions) -> CliResult<()> {
    let catalog = load_catalog(options.catalog.clone())?;
    let config = relay_config(&options)?;
    let machine = QuizMachine::new(catalog);
    info!(
        dry_run = options.dry_run,
        endpoint = %config.endpoint,
        page = %options.page,
        "starting lead quiz"
    );
    let mut presenter = WizardPresenter::new(
        Verbosity::from_verbose(options.verbose),
        options.format.into(),
    );

    if options.dry_run {
        let session = QuizSession::new(machine, DryRunRelay, config, options.page.clone());
        drive(session, &mut presenter, &options.botcheck)
    } else {
        let relay = HttpRelay::new(&config)?;
        let session = QuizSession::new(machine, relay, config, options.page.clone());
        drive(session, &mut presenter, &options.botcheck)
    }
}

fn drive<R: LeadRelay>(
    mut session: QuizSession<R>,
    presenter: &mut WizardPresenter,
    botcheck: &str,
) -> CliResult<()> {
    let runtime = Runtime::new()?;
    presenter.show_header();

    loop {
        let view = session.view();
        presenter.show_view(&view);

        let Some(input) = read_input()? else {
            return finish_on_close(&session);
        };
        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }

        let event = match trimmed.to_lowercase().as_str() {
            "exit" => return finish_on_close(&session),
            "next" => Some(QuizEvent::Advance),
            "back" => Some(QuizEvent::Retreat),
            "edit" => Some(QuizEvent::EditAfterSubmit),
            _ => None,
        };
        if let Some(event) = event {
            if let Err(err) = session.apply(event) {
                presenter.show_rejection(&err.to_string());
            }
            continue;
        }

        match view.step {
            Step::Contact => {
                if session.machine().phase() == SubmissionPhase::Sent {
                    presenter.show_rejection("already sent; type 'edit' to change it or 'exit'");
                    continue;
                }
                match runtime.block_on(session.submit(trimmed, botcheck)) {
                    Ok(SubmitOutcome::Sent) => {
                        let machine = session.machine();
                        presenter.show_completion(&machine.record().to_document(machine.catalog()));
                    }
                    Ok(SubmitOutcome::Failed(message)) | Ok(SubmitOutcome::Rejected(message)) => {
                        presenter.show_rejection(&message);
                    }
                    Err(SessionError::Quiz(err)) => presenter.show_rejection(&err.to_string()),
                    Err(err) => return Err(err.into()),
                }
            }
            step => {
                let Some(panel) = view.panel(step) else {
                    continue;
                };
                let label = match parse_choice(panel, trimmed) {
                    Ok(label) => label,
                    Err(err) => {
                        presenter.show_parse_error(&err);
                        continue;
                    }
                };
                let event = match step {
                    Step::Interest => QuizEvent::SelectInterest(label),
                    Step::Experience => QuizEvent::SelectExperience(label),
                    _ => QuizEvent::ToggleDetail(label),
                };
                if let Err(err) = session.apply(event) {
                    presenter.show_rejection(&err.to_string());
                }
            }
        }
    }
}

fn read_input() -> CliResult<Option<String>> {
    print!("> ");
    io::stdout().flush()?;
    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input))
}

fn finish_on_close<R: LeadRelay>(session: &QuizSession<R>) -> CliResult<()> {
    if session.machine().phase() == SubmissionPhase::Sent {
        Ok(())
    } else {
        Err(QuizError::NotSubmitted.to_string().into())
    }
}

fn run_validate(answers_path: PathBuf, catalog_path: Option<PathBuf>) -> CliResult<()> {
    let catalog = load_catalog(catalog_path)?;
    let answers_json = fs::read_to_string(answers_path)?;
    let answers: AnswersDocument = serde_json::from_str(&answers_json)?;

    let result = validate(&catalog, &answers);
    println!(
        "Validation result: {}",
        if result.valid { "valid" } else { "invalid" }
    );
    describe_validation(&result);

    if result.valid {
        Ok(())
    } else {
        Err("validation failed".into())
    }
}

fn describe_validation(result: &ValidationResult) {
    if !result.errors.is_empty() {
        println!("Errors:");
        for error in &result.errors {
            println!(
                "  {} - {}",
                error.path.as_deref().unwrap_or("<unknown>"),
                error.message
            );
        }
    }
    if !result.missing_required.is_empty() {
        println!(
            "Missing required answers: {}",
            result.missing_required.join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_cmd::Command;
    use assert_fs::prelude::*;
    use quiz_spec::build_view;

    fn studio_machine() -> QuizMachine {
        QuizMachine::new(OptionCatalog::studio().expect("catalog"))
    }

    #[test]
    fn parse_choice_accepts_number_and_label() {
        let machine = studio_machine();
        let view = build_view(&machine);
        let panel = view.panel(Step::Interest).expect("panel");
        assert_eq!(parse_choice(panel, "2").expect("number"), "Lips");
        assert_eq!(parse_choice(panel, "lash line").expect("label"), "Lash Line");
        assert!(parse_choice(panel, "0").is_err());
        assert!(parse_choice(panel, "9").is_err());
        let err = parse_choice(panel, "Tattoo").expect_err("unknown");
        assert_eq!(
            err.debug_message.as_deref(),
            Some("Brows, Lips, Lash Line, Courses")
        );
    }

    #[test]
    fn parse_choice_rejects_empty_panels() {
        let machine = studio_machine();
        let view = build_view(&machine);
        let panel = view.panel(Step::Experience).expect("panel");
        assert!(parse_choice(panel, "1").is_err());
    }

    #[test]
    fn dry_run_wizard_completes_lips_scenario() -> Result<(), Box<dyn std::error::Error>> {
        let mut cmd = Command::cargo_bin("lead-quiz")?;
        cmd.args(["wizard", "--dry-run", "--verbose"])
            .write_stdin("2\nnext\nNo\nnext\n6\n7\nnext\n+1 757 407 9859\nexit\n");
        let output = cmd.assert().success().get_output().stdout.clone();
        let stdout = String::from_utf8(output)?;
        assert!(stdout.contains("Step 2: Have you had PMU before?"));
        assert!(stdout.contains("[x] Soft baby tint"));
        assert!(stdout.contains("Done ✅"));
        assert!(stdout.contains("\"Even out contour\""));
        Ok(())
    }

    #[test]
    fn wizard_fails_when_input_ends_before_submission() -> Result<(), Box<dyn std::error::Error>>
    {
        let mut cmd = Command::cargo_bin("lead-quiz")?;
        cmd.args(["wizard", "--dry-run"]).write_stdin("4\nnext\n");
        cmd.assert().failure();
        Ok(())
    }

    #[test]
    fn validate_command_reports_result() -> Result<(), Box<dyn std::error::Error>> {
        let temp = assert_fs::TempDir::new()?;
        let valid = temp.child("valid.json");
        valid.write_str(
            r#"{
                "interest": "Courses",
                "experience": "Beginner (no procedures yet)",
                "details": ["Start taking paying clients"],
                "phone": "7574079859"
            }"#,
        )?;
        let invalid = temp.child("invalid.json");
        invalid.write_str(r#"{ "interest": "Lips", "phone": "abc" }"#)?;

        Command::cargo_bin("lead-quiz")?
            .args(["validate", "--answers"])
            .arg(valid.path())
            .assert()
            .success();

        let output = Command::cargo_bin("lead-quiz")?
            .args(["validate", "--answers"])
            .arg(invalid.path())
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        let stdout = String::from_utf8(output)?;
        assert!(stdout.contains("Validation result: invalid"));
        assert!(stdout.contains("Missing required answers: experience, details"));
        assert!(stdout.contains("/phone"));
        Ok(())
    }

    #[test]
    fn schema_command_prints_properties() -> Result<(), Box<dyn std::error::Error>> {
        let output = Command::cargo_bin("lead-quiz")?
            .arg("schema")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let schema: serde_json::Value = serde_json::from_slice(&output)?;
        assert!(schema["properties"]["details"].is_object());
        Ok(())
    }

    #[test]
    fn catalog_command_honors_custom_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("catalog.json");
        fs::write(
            &path,
            r#"{ "course_label": "Academy", "interests": ["Academy", "Freckles"] }"#,
        )?;
        let output = Command::cargo_bin("lead-quiz")?
            .args(["catalog", "--catalog"])
            .arg(&path)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let catalog: serde_json::Value = serde_json::from_slice(&output)?;
        assert_eq!(catalog["course_label"], "Academy");
        Ok(())
    }
}

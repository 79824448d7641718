//! StudyMate command-line entry point.
//!
//! # Responsibility
//! - Assemble configuration from flags and environment.
//! - Answer one message, or run an interactive session on stdin.

use clap::Parser;
use log::warn;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use studymate_core::config::{DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS};
use studymate_core::{
    default_log_level, init_logging, Assistant, AssistantConfig, ModelConfig, StoreConfig,
};

const EXIT_WORDS: &[&str] = &["exit", "quit"];

#[derive(Debug, Parser)]
#[command(name = "studymate", version, about = "Study assistant for plans, notes and questions")]
struct Cli {
    /// Directory holding notes.json and tasks.json.
    #[arg(long, env = "STUDYMATE_DATA_DIR", default_value = "memory")]
    data_dir: PathBuf,

    /// trace|debug|info|warn|error
    #[arg(long, env = "STUDYMATE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Defaults to <data-dir>/logs.
    #[arg(long, env = "STUDYMATE_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// OpenAI-compatible base URL; without it replies come from the offline echo model.
    #[arg(long, env = "STUDYMATE_MODEL_URL")]
    model_url: Option<String>,

    #[arg(long, env = "STUDYMATE_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    #[arg(long, env = "STUDYMATE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = "STUDYMATE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[arg(long, env = "STUDYMATE_TEMPERATURE", default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f64,

    /// Message to send. Omit to start an interactive session.
    message: Vec<String>,
}

impl Cli {
    fn to_config(&self) -> Result<AssistantConfig, String> {
        let store = StoreConfig::new(absolute(&self.data_dir)?).map_err(|err| err.to_string())?;
        let model = ModelConfig {
            base_url: self.model_url.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone(),
            timeout_secs: self.timeout_secs,
            temperature: self.temperature,
        };
        model.validate().map_err(|err| err.to_string())?;

        let level = self
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());
        let config = AssistantConfig::new(store, model, level);
        match self.log_dir.as_deref() {
            Some(dir) => config
                .with_log_dir(absolute(dir)?)
                .map_err(|err| err.to_string()),
            None => Ok(config),
        }
    }

    fn message_text(&self) -> Option<String> {
        let text = self.message.join(" ");
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf, String> {
    std::path::absolute(path)
        .map_err(|err| format!("cannot resolve path `{}`: {err}", path.display()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match cli.to_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let assistant = match Assistant::from_config(&config) {
        Ok(assistant) => assistant,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match cli.message_text() {
        Some(text) => match assistant.handle(&text) {
            Ok(response) => {
                println!("{response}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        },
        None => run_session(&assistant),
    }
}

fn run_session(assistant: &Assistant) -> ExitCode {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    println!("StudyMate is ready. Type `exit` to leave.");

    loop {
        print!("you> ");
        if stdout.flush().is_err() {
            return ExitCode::FAILURE;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => return ExitCode::SUCCESS,
            Ok(_) => {}
            Err(err) => {
                warn!("event=session_read module=cli status=error error={err}");
                eprintln!("error: failed to read input: {err}");
                return ExitCode::FAILURE;
            }
        }

        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if is_exit_word(text) {
            return ExitCode::SUCCESS;
        }
        println!("{}\n", assistant.reply(text));
    }
}

fn is_exit_word(text: &str) -> bool {
    EXIT_WORDS
        .iter()
        .any(|word| text.eq_ignore_ascii_case(word))
}

#[cfg(test)]
mod tests {
    use super::{is_exit_word, Cli};
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;
    use studymate_core::config::{DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS};

    /// Parses `args` after explicit values for the env-backed flags with
    /// defaults, so `STUDYMATE_*` variables cannot change what tests assert.
    fn parse_explicit(args: &[&str]) -> Cli {
        let mut argv = vec![
            "studymate",
            "--data-dir",
            "scratch",
            "--log-level",
            "info",
            "--model",
            "local-model",
            "--timeout-secs",
            "30",
            "--temperature",
            "0.5",
        ];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn message_words_are_joined() {
        let cli = parse_explicit(&["plan", "DBMS", "by", "Friday"]);
        assert_eq!(cli.message_text().as_deref(), Some("plan DBMS by Friday"));

        let empty = parse_explicit(&[]);
        assert_eq!(empty.message_text(), None);
    }

    #[test]
    fn relative_paths_resolve_to_absolute() {
        let cli = parse_explicit(&[
            "--log-dir",
            "scratch-logs",
            "--model-url",
            "http://127.0.0.1:11434/v1",
            "hi",
        ]);
        let config = cli.to_config().unwrap();
        assert!(config.store.root().is_absolute());
        assert!(config.store.root().ends_with("scratch"));
        assert!(config.log_dir.is_absolute());
        assert!(config.log_dir.ends_with("scratch-logs"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.model.base_url.as_deref(), Some("http://127.0.0.1:11434/v1"));
        assert_eq!(config.model.model, "local-model");
        assert_eq!(config.model.timeout_secs, 30);
        assert!(!config.model.is_offline());
    }

    #[test]
    fn unset_log_dir_and_model_url_use_store_logs_and_offline_model() {
        let cli = Cli {
            data_dir: PathBuf::from("scratch"),
            log_level: None,
            log_dir: None,
            model_url: None,
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: DEFAULT_TEMPERATURE,
            message: vec!["hi".to_string()],
        };
        let config = cli.to_config().unwrap();
        assert_eq!(config.log_dir, config.store.root().join("logs"));
        assert!(config.model.is_offline());
    }

    #[test]
    fn invalid_model_url_is_rejected() {
        let cli = parse_explicit(&["--model-url", "localhost", "hi"]);
        assert!(cli.to_config().unwrap_err().contains("http"));
    }

    #[test]
    fn exit_words_ignore_case() {
        assert!(is_exit_word("EXIT"));
        assert!(is_exit_word("quit"));
        assert!(!is_exit_word("exit now"));
    }
}

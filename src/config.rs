// Configuration loading and parsing (board.toml, credentials.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub chat: ChatConfig,
    pub rewards: RewardsConfig,
    pub credentials: CredentialsConfig,
    pub db_path: String,
}

// ---------------------------------------------------------------------------
// board.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire board.toml file.
#[derive(Debug, Clone, Deserialize)]
struct BoardFile {
    server: ServerConfig,
    chat: ChatConfig,
    rewards: RewardsConfig,
    #[serde(default)]
    database: DatabaseSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Origin allowed by the CORS layer (the browser frontend).
    pub allowed_origin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    /// How many trailing conversation messages are forwarded upstream.
    pub history_window: usize,
    /// The one user id whose replies are generated by the language model.
    pub persona_user_id: String,
    /// Override for the upstream API base URL (tests point this at a mock).
    #[serde(default)]
    pub api_base: Option<String>,
}

/// Token amounts awarded for each simulated action.
#[derive(Debug, Clone, Deserialize)]
pub struct RewardsConfig {
    pub daily_login: u32,
    pub post_creation: u32,
    pub comment: u32,
    pub review: u32,
    pub event_participation: u32,
    pub question_answer: u32,
    pub best_answer: u32,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct DatabaseSection {
    path: Option<String>,
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub openai_api_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/board.toml` and (optionally)
/// `config/credentials.toml`, both relative to the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- board.toml (required) ---
    let board_path = config_dir.join("board.toml");
    let board_text = read_file(&board_path)?;
    let board_file: BoardFile =
        toml::from_str(&board_text).map_err(|e| ConfigError::ParseError {
            path: board_path.clone(),
            source: e,
        })?;

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let db_path = resolve_db_path(board_file.database.path);

    let config = Config {
        server: board_file.server,
        chat: board_file.chat,
        rewards: board_file.rewards,
        credentials,
        db_path,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        // If config/ also doesn't exist, the app will fail to load config.
        // Return an error with a clear message about the missing defaults directory.
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        // Skip non-files and entries without a file name
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };

        // Skip .example template files
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // File already exists in config/, skip it
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

/// Resolve the database path: an explicit config value wins; otherwise the
/// platform data directory, falling back to the working directory.
fn resolve_db_path(configured: Option<String>) -> String {
    if let Some(path) = configured {
        return path;
    }
    match directories::ProjectDirs::from("", "", "campus-board") {
        Some(dirs) => dirs
            .data_dir()
            .join("campus-board.db")
            .to_string_lossy()
            .into_owned(),
        None => "campus-board.db".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError {
            field: "server.port".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.server.allowed_origin.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "server.allowed_origin".into(),
            message: "must not be empty".into(),
        });
    }

    if config.chat.max_tokens == 0 {
        return Err(ConfigError::ValidationError {
            field: "chat.max_tokens".into(),
            message: "must be greater than 0".into(),
        });
    }

    let temp = config.chat.temperature;
    if !(0.0..=2.0).contains(&temp) {
        return Err(ConfigError::ValidationError {
            field: "chat.temperature".into(),
            message: format!("must be between 0.0 and 2.0 inclusive, got {temp}"),
        });
    }

    if config.chat.history_window == 0 {
        return Err(ConfigError::ValidationError {
            field: "chat.history_window".into(),
            message: "must be at least 1".into(),
        });
    }

    if config.chat.persona_user_id.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "chat.persona_user_id".into(),
            message: "must not be empty".into(),
        });
    }

    if config.chat.model.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "chat.model".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const VALID_BOARD_TOML: &str = r#"
[server]
port = 8787
allowed_origin = "http://localhost:3000"

[chat]
model = "gpt-4.1-mini"
max_tokens = 500
temperature = 0.8
history_window = 10
persona_user_id = "2"

[database]
path = "test.db"

[rewards]
daily_login = 10
post_creation = 5
comment = 2
review = 8
event_participation = 15
question_answer = 20
best_answer = 50
"#;

    /// Create a temp base dir with a config/ subdir containing board.toml.
    fn temp_base(name: &str, board_toml: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(format!("campus_board_config_{name}"));
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config/board.toml"), board_toml).unwrap();
        tmp
    }

    #[test]
    fn load_valid_config() {
        let tmp = temp_base("valid", VALID_BOARD_TOML);

        let config = load_config_from(&tmp).expect("should load valid config");
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.server.allowed_origin, "http://localhost:3000");
        assert_eq!(config.chat.model, "gpt-4.1-mini");
        assert_eq!(config.chat.max_tokens, 500);
        assert!((config.chat.temperature - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.chat.history_window, 10);
        assert_eq!(config.chat.persona_user_id, "2");
        assert!(config.chat.api_base.is_none());
        assert_eq!(config.rewards.daily_login, 10);
        assert_eq!(config.rewards.best_answer, 50);
        assert_eq!(config.db_path, "test.db");
        assert!(config.credentials.openai_api_key.is_none());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_credentials_toml_is_ok() {
        let tmp = temp_base("no_creds", VALID_BOARD_TOML);
        let config = load_config_from(&tmp).expect("should load without credentials.toml");
        assert!(config.credentials.openai_api_key.is_none());
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn credentials_toml_with_api_key() {
        let tmp = temp_base("with_creds", VALID_BOARD_TOML);
        fs::write(
            tmp.join("config/credentials.toml"),
            "openai_api_key = \"sk-test-key\"\n",
        )
        .unwrap();

        let config = load_config_from(&tmp).expect("should load with credentials.toml");
        assert_eq!(config.credentials.openai_api_key.as_deref(), Some("sk-test-key"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_database_path_resolves_to_a_default() {
        let without_db = VALID_BOARD_TOML.replace("[database]\npath = \"test.db\"\n", "");
        let tmp = temp_base("no_db_path", &without_db);

        let config = load_config_from(&tmp).expect("should load without a database path");
        assert!(config.db_path.ends_with("campus-board.db"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_port_zero() {
        let bad = VALID_BOARD_TOML.replace("port = 8787", "port = 0");
        let tmp = temp_base("port_zero", &bad);

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "server.port"),
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_max_tokens() {
        let bad = VALID_BOARD_TOML.replace("max_tokens = 500", "max_tokens = 0");
        let tmp = temp_base("max_tokens_zero", &bad);

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "chat.max_tokens"),
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_temperature_out_of_range() {
        let bad = VALID_BOARD_TOML.replace("temperature = 0.8", "temperature = 2.5");
        let tmp = temp_base("temp_high", &bad);

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "chat.temperature"),
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_history_window() {
        let bad = VALID_BOARD_TOML.replace("history_window = 10", "history_window = 0");
        let tmp = temp_base("window_zero", &bad);

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "chat.history_window")
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_persona_user_id() {
        let bad = VALID_BOARD_TOML.replace("persona_user_id = \"2\"", "persona_user_id = \"\"");
        let tmp = temp_base("persona_empty", &bad);

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "chat.persona_user_id")
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_board_toml() {
        let tmp = std::env::temp_dir().join("campus_board_config_missing_board");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("board.toml")),
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = temp_base("invalid_toml", "this is not valid [[[ toml");

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with("board.toml")),
            other => panic!("expected ParseError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = std::env::temp_dir().join("campus_board_config_ensure_copies");
        let _ = fs::remove_dir_all(&tmp);

        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::write(defaults_dir.join("board.toml"), VALID_BOARD_TOML).unwrap();
        // Add an example file that should NOT be copied
        fs::write(
            defaults_dir.join("credentials.toml.example"),
            "openai_api_key = \"sk-...\"\n",
        )
        .unwrap();

        // No config/ dir exists yet
        assert!(!tmp.join("config").exists());

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);

        assert!(tmp.join("config/board.toml").exists());
        // example file should NOT have been copied
        assert!(!tmp.join("config/credentials.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = std::env::temp_dir().join("campus_board_config_ensure_skips");
        let _ = fs::remove_dir_all(&tmp);

        let defaults_dir = tmp.join("defaults");
        let config_dir = tmp.join("config");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::create_dir_all(&config_dir).unwrap();

        fs::write(defaults_dir.join("board.toml"), VALID_BOARD_TOML).unwrap();

        // Pre-create board.toml in config/ with custom content
        fs::write(config_dir.join("board.toml"), "# custom\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert!(copied.is_empty());

        // Original custom content should be preserved
        let content = fs::read_to_string(config_dir.join("board.toml")).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("campus_board_config_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let err = ensure_config_files(&tmp).unwrap_err();
        match &err {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}

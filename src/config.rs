//! Settings for cvtailor.
//!
//! Settings are read from `settings.toml` next to the executable. A default
//! file is written on first start.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// File name of the settings file inside the program directory.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Environment variable that overrides the program directory.
pub const HOME_ENV: &str = "CVTAILOR_HOME";

/// Written verbatim when no settings file exists.
pub const DEFAULT_SETTINGS: &str = r#"# cvtailor settings

[llm]
# Model identifier sent to the provider.
model = "gpt-5-mini"
# One of "openai", "anthropic" or "ollama".
provider = "openai"
# api_key = "..."            # prefer OPENAI_API_KEY / ANTHROPIC_API_KEY
# base_url = "..."           # override the provider endpoint
# temperature = 0.7
# max_tokens = 16000        # output limit; anthropic uses 4096 when unset
# timeout_secs = 120

[paths]
# Relative paths are resolved against the directory holding this file.
output_dir = "."
template_dir = "templates"

[files]
resume_out = "Tailored_resume.md"
cover_letter_out = "Tailored_cover_letter.md"
"#;

/// LLM provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAI,
    Anthropic,
    Ollama,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Ollama => "ollama",
        };
        f.write_str(name)
    }
}

/// Options for talking to the language model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LlmSettings {
    /// Model identifier.
    pub model: String,
    #[serde(default = "default_provider")]
    pub provider: Provider,
    /// API key; the provider's environment variable is used when absent.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Endpoint override, mostly for proxies and self-hosted servers.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Sampling temperature; the provider default when absent.
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Output token limit. OpenAI and Ollama fall back to the model's own
    /// limit when absent.
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider() -> Provider {
    Provider::OpenAI
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_template_dir() -> String {
    "templates".to_string()
}

#[derive(Debug, Deserialize)]
struct SettingsFile {
    llm: LlmSettings,
    paths: PathsSection,
    files: FilesSection,
}

#[derive(Debug, Deserialize)]
struct PathsSection {
    output_dir: String,
    #[serde(default = "default_template_dir")]
    template_dir: String,
}

#[derive(Debug, Deserialize)]
struct FilesSection {
    resume_out: String,
    cover_letter_out: String,
}

/// Whether the settings file existed or was just created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsOrigin {
    Existing,
    CreatedDefault,
}

/// Resolved, read-only settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Path of the settings file these values came from.
    pub path: PathBuf,
    pub llm: LlmSettings,
    pub output_dir: PathBuf,
    pub template_dir: PathBuf,
    pub resume_name: String,
    pub cover_letter_name: String,
}

/// Get the directory holding the executable, or `$CVTAILOR_HOME` when set.
pub fn program_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    let exe = std::env::current_exe().map_err(Error::ProgramDir)?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        Error::ProgramDir(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "executable has no parent directory",
        ))
    })
}

impl Settings {
    /// Load `settings.toml` from `dir`, writing the default file first if it
    /// does not exist.
    pub fn load_or_create(dir: &Path) -> Result<(Self, SettingsOrigin)> {
        let path = dir.join(SETTINGS_FILE);
        let origin = if path.exists() {
            SettingsOrigin::Existing
        } else {
            std::fs::create_dir_all(dir).map_err(|source| Error::WriteSettings {
                path: path.clone(),
                source,
            })?;
            std::fs::write(&path, DEFAULT_SETTINGS).map_err(|source| Error::WriteSettings {
                path: path.clone(),
                source,
            })?;
            SettingsOrigin::CreatedDefault
        };

        let settings = Self::load(&path)?;
        Ok((settings, origin))
    }

    /// Load and validate a settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::ReadSettings {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &contents)
    }

    fn parse(path: &Path, contents: &str) -> Result<Self> {
        let file: SettingsFile = toml::from_str(contents).map_err(|source| Error::ParseSettings {
            path: path.to_path_buf(),
            source,
        })?;

        if file.llm.model.trim().is_empty() {
            return Err(Error::InvalidSetting {
                key: "llm.model",
                reason: "must not be empty".to_string(),
            });
        }
        if file.llm.max_tokens == Some(0) {
            return Err(Error::InvalidSetting {
                key: "llm.max_tokens",
                reason: "must be greater than zero".to_string(),
            });
        }
        if file.llm.timeout_secs == 0 {
            return Err(Error::InvalidSetting {
                key: "llm.timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        check_file_name("files.resume_out", &file.files.resume_out)?;
        check_file_name("files.cover_letter_out", &file.files.cover_letter_out)?;
        if file.files.resume_out == file.files.cover_letter_out {
            return Err(Error::InvalidSetting {
                key: "files.cover_letter_out",
                reason: "must differ from files.resume_out".to_string(),
            });
        }

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(Self {
            path: path.to_path_buf(),
            llm: file.llm,
            output_dir: resolve(base, &file.paths.output_dir),
            template_dir: resolve(base, &file.paths.template_dir),
            resume_name: file.files.resume_out,
            cover_letter_name: file.files.cover_letter_out,
        })
    }
}

/// Output names must be bare file names so they land in `output_dir`.
fn check_file_name(key: &'static str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidSetting {
            key,
            reason: "must not be empty".to_string(),
        });
    }
    if Path::new(name).file_name().and_then(|n| n.to_str()) != Some(name) {
        return Err(Error::InvalidSetting {
            key,
            reason: format!("`{}` is not a plain file name", name),
        });
    }
    Ok(())
}

fn resolve(base: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else if value == "." {
        base.to_path_buf()
    } else {
        base.join(path)
    }
}

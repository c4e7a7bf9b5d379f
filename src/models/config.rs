//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Search query settings
    #[serde(default)]
    pub search: SearchConfig,

    /// HTTP and pagination behavior settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Mail delivery settings
    #[serde(default)]
    pub mail: MailConfig,

    /// Delivery history settings
    #[serde(default)]
    pub history: HistoryConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.search.query.trim().is_empty() {
            return Err(AppError::config("search.query is empty"));
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(AppError::config("fetch.user_agent is empty"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(AppError::config("fetch.timeout_secs must be > 0"));
        }
        if self.fetch.page_size == 0 {
            return Err(AppError::config("fetch.page_size must be > 0"));
        }
        if !self.mail.recipient.contains('@') {
            return Err(AppError::config("mail.recipient is not an address"));
        }
        if self.mail.smtp_host.trim().is_empty() {
            return Err(AppError::config("mail.smtp_host is empty"));
        }
        if self.mail.password_env.trim().is_empty() {
            return Err(AppError::config("mail.password_env is empty"));
        }
        Ok(())
    }
}

/// Search query settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Query string submitted to the source
    #[serde(default)]
    pub query: String,

    /// Lower bound on publication year (omitted from the request if unset)
    #[serde(default)]
    pub year_from: Option<u16>,

    /// Interface language code for the source
    #[serde(default = "defaults::language")]
    pub language: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            query: String::new(),
            year_from: None,
            language: defaults::language(),
        }
    }
}

/// HTTP client and pagination behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Results per page; also the pagination stride
    #[serde(default = "defaults::page_size")]
    pub page_size: usize,

    /// Mandatory pause between successive page requests, in milliseconds.
    /// The source rate-limits automated traffic; do not set this to zero
    /// against the real source.
    #[serde(default = "defaults::page_delay")]
    pub page_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            page_size: defaults::page_size(),
            page_delay_ms: defaults::page_delay(),
        }
    }
}

/// Mail delivery settings.
///
/// The SMTP password itself never appears in the file; `password_env` names
/// the environment variable holding it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Recipient address
    #[serde(default)]
    pub recipient: String,

    /// SMTP relay hostname
    #[serde(default = "defaults::smtp_host")]
    pub smtp_host: String,

    /// SMTP relay port (STARTTLS)
    #[serde(default = "defaults::smtp_port")]
    pub smtp_port: u16,

    /// Account to authenticate as; defaults to the recipient
    #[serde(default)]
    pub username: Option<String>,

    /// Name of the environment variable holding the SMTP password
    #[serde(default = "defaults::password_env")]
    pub password_env: String,
}

impl MailConfig {
    /// The account used for SMTP authentication and as the sender.
    pub fn sender(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.recipient)
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            recipient: String::new(),
            smtp_host: defaults::smtp_host(),
            smtp_port: defaults::smtp_port(),
            username: None,
            password_env: defaults::password_env(),
        }
    }
}

/// Delivery history settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Path of the sent-history file
    #[serde(default = "defaults::history_file")]
    pub file: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            file: defaults::history_file(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Search defaults
    pub fn language() -> String {
        "en".into()
    }

    // Fetch defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
            .into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn page_size() -> usize {
        10
    }
    pub fn page_delay() -> u64 {
        2000
    }

    // Mail defaults
    pub fn smtp_host() -> String {
        "smtp.gmail.com".into()
    }
    pub fn smtp_port() -> u16 {
        587
    }
    pub fn password_env() -> String {
        "GMAIL_PASSWORD".into()
    }

    // History defaults
    pub fn history_file() -> PathBuf {
        PathBuf::from("sent_list_scholar.txt")
    }
}

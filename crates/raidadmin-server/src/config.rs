//! Server configuration management

use crate::error::{ApiError, Result};
use raidadmin::page::DEFAULT_TAB_INDEX;
use serde::{Deserialize, Serialize};

/// A login allowed onto the admin page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub password: String,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Path the admin page is served from and posts back to
    pub script_path: String,

    pub administrator: Option<Account>,

    pub moderator: Option<Account>,

    /// Last tab index used by the page layout
    pub tab_index: u32,

    /// JSON file with raids loaded at startup
    pub seed_file: Option<String>,

    /// Whether to enable debug logging
    pub debug: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid PORT value".to_string()))?,
            script_path: std::env::var("SCRIPT_PATH").unwrap_or_else(|_| "/admin".to_string()),
            administrator: account_from_env("ADMIN_USERNAME", "ADMIN_PASSWORD"),
            moderator: account_from_env("MODERATOR_USERNAME", "MODERATOR_PASSWORD"),
            tab_index: std::env::var("TAB_INDEX")
                .unwrap_or_else(|_| DEFAULT_TAB_INDEX.to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid TAB_INDEX value".to_string()))?,
            seed_file: std::env::var("SEED_FILE").ok().filter(|s| !s.is_empty()),
            debug: std::env::var("DEBUG")
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(false),
        })
    }
}

fn account_from_env(user_var: &str, password_var: &str) -> Option<Account> {
    let username = std::env::var(user_var).ok().filter(|s| !s.is_empty())?;
    let password = std::env::var(password_var).unwrap_or_default();
    Some(Account { username, password })
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            script_path: "/admin".to_string(),
            administrator: None,
            moderator: None,
            tab_index: DEFAULT_TAB_INDEX,
            seed_file: None,
            debug: false,
        }
    }
}

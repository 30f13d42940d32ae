//! Viewer resolution from HTTP Basic credentials

use axum::http::{HeaderMap, header};
use base64::Engine;
use raidadmin::{Role, Viewer};
use tracing::debug;

use crate::config::{Account, ServerConfig};
use crate::error::{ApiError, Result};

/// Work out who is asking
///
/// Requests without Basic credentials are `Unauthorized` so browsers prompt
/// for a login. Credentials that match neither configured account resolve
/// to a participant, who is then refused by the page itself.
pub fn resolve_viewer(headers: &HeaderMap, config: &ServerConfig) -> Result<Viewer> {
    let (username, password) = basic_credentials(headers).ok_or(ApiError::Unauthorized)?;

    if matches_account(config.administrator.as_ref(), &username, &password) {
        return Ok(Viewer::new(username, Role::Administrator));
    }
    if matches_account(config.moderator.as_ref(), &username, &password) {
        return Ok(Viewer::new(username, Role::Moderator));
    }

    debug!("Credentials for {} match no admin account", username);
    Ok(Viewer::new(username, Role::Participant))
}

fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let auth_str = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = auth_str.strip_prefix("Basic ")?;
    let decoded_bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()?;
    let decoded = String::from_utf8(decoded_bytes).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

fn matches_account(account: Option<&Account>, username: &str, password: &str) -> bool {
    match account {
        Some(account) => {
            constant_time_eq(account.username.as_bytes(), username.as_bytes())
                & constant_time_eq(account.password.as_bytes(), password.as_bytes())
        }
        None => false,
    }
}

pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

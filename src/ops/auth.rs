//! Login, registration and session commands.

use crate::app::JournalApp;
use crate::errors::AppResult;
use tracing::info;

pub async fn login(app: &mut JournalApp, username: &str, password: &str) -> AppResult<String> {
    let session = app.login(username, password).await?;
    Ok(format!(
        "Logged in as {} <{}>",
        session.username, session.email
    ))
}

/// Creates a local account. Any username, email and password are accepted.
pub async fn register(
    app: &mut JournalApp,
    username: &str,
    email: &str,
    password: &str,
) -> AppResult<String> {
    let session = app.register(username, email, password).await?;
    info!("Registered user {}", session.id);
    Ok(format!(
        "Registered and logged in as {} <{}>",
        session.username, session.email
    ))
}

pub fn logout(app: &mut JournalApp) -> String {
    let username = app.current_user().map(|user| user.username.clone());
    app.logout();
    match username {
        Some(username) => format!("Logged out {}", username),
        None => "Not logged in".to_string(),
    }
}

pub fn whoami(app: &JournalApp) -> String {
    match app.current_user() {
        Some(user) => format!("{} <{}> (id {})", user.username, user.email, user.id),
        None => "Not logged in".to_string(),
    }
}

pub async fn change_password(app: &mut JournalApp, current: &str, new: &str) -> AppResult<String> {
    app.change_password(current, new).await?;
    Ok("Password changed".to_string())
}

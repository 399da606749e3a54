//! Login credentials and secure password storage.
//!
//! The resume server uses a cookie session established through its HTML
//! login form. Passwords are kept in the OS keyring, keyed by profile name.

use super::error::{ApiError, Result};

/// The keyring service name for resumedeck passwords.
const KEYRING_SERVICE: &str = "resumedeck";

/// Hidden form field carrying the login form's CSRF token.
const CSRF_FIELD: &str = "csrf_token";

/// Username and password for the login form.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// Load the password for a profile from the OS keyring.
    ///
    /// # Errors
    ///
    /// Returns an error if the password cannot be retrieved from the keyring.
    pub fn from_keyring(profile_name: &str, username: &str) -> Result<Self> {
        let password = get_password(profile_name)?;
        Ok(Self::new(username, &password))
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Form fields posted to the login endpoint.
    pub fn form_fields(&self, csrf_token: Option<&str>) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("username", self.username.clone()),
            ("password", self.password.clone()),
        ];
        if let Some(token) = csrf_token {
            fields.push((CSRF_FIELD, token.to_string()));
        }
        fields
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Pull the CSRF token out of the login page HTML, if the form has one.
pub fn extract_csrf_token(html: &str) -> Option<String> {
    let marker = format!("name=\"{}\"", CSRF_FIELD);
    let start = html.find(&marker)?;
    // The value attribute may come before or after the name attribute.
    let tag_start = html[..start].rfind('<')?;
    let tag_end = start + html[start..].find('>')?;
    let tag = &html[tag_start..tag_end];

    // Anchor on the preceding whitespace so `data-value="..."` is not matched.
    let value_start = tag
        .match_indices("value=\"")
        .find(|(i, _)| tag[..*i].ends_with(|c: char| c.is_ascii_whitespace()))
        .map(|(i, m)| i + m.len())?;
    let value_len = tag[value_start..].find('"')?;
    Some(tag[value_start..value_start + value_len].to_string())
}

/// Store a password in the OS keyring.
///
/// # Errors
///
/// Returns an error if the password cannot be stored in the keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<()> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, profile_name)
        .map_err(|e| ApiError::Keyring(format!("failed to create keyring entry: {}", e)))?;

    entry
        .set_password(password)
        .map_err(|e| ApiError::Keyring(format!("failed to store password: {}", e)))
}

/// Retrieve a password from the OS keyring.
///
/// # Errors
///
/// Returns an error if the password cannot be retrieved from the keyring.
pub fn get_password(profile_name: &str) -> Result<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, profile_name)
        .map_err(|e| ApiError::Keyring(format!("failed to access keyring: {}", e)))?;

    entry
        .get_password()
        .map_err(|e| ApiError::Keyring(format!("failed to retrieve password: {}", e)))
}

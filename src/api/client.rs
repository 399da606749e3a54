//! Resume server client implementation.
//!
//! This module provides the HTTP client for the resume endpoints. It handles
//! the login session, URL construction, and mapping of HTTP failures onto
//! [`ApiError`]. Failed requests are not retried; the caller decides what a
//! failure means for the current interaction.

use std::time::Duration;

use reqwest::{header, Client, Response};
use tracing::{debug, info, instrument, warn};

use super::auth::{extract_csrf_token, Credentials};
use super::error::{ApiError, Result};
use super::types::{ResumeId, ResumeSummary};
use crate::config::{Profile, Settings};
use crate::resume::Record;

/// Path of the login form, relative to the server root.
const LOGIN_PATH: &str = "login";

/// Form submission endpoint, relative to the resume endpoints.
const SAVE_PATH: &str = "save-resume";

/// Client for the resume endpoints of one server.
#[derive(Debug, Clone)]
pub struct ResumeClient {
    /// The HTTP client, holding the session cookie jar.
    client: Client,
    /// Server root URL, without trailing slash.
    server_url: String,
    /// Root of the resume endpoints, without trailing slash.
    base_url: String,
}

impl ResumeClient {
    /// Create a client for a profile without contacting the server.
    pub fn new(profile: &Profile, settings: &Settings) -> Result<Self> {
        Self::with_base(
            &profile.url,
            &settings.resumes_path,
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    /// Create a client for an explicit server URL and endpoint prefix.
    pub fn with_base(server_url: &str, resumes_path: &str, timeout: Duration) -> Result<Self> {
        if !server_url.starts_with("http://") && !server_url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(server_url.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(ApiError::Network)?;

        let server_url = normalize_base_url(server_url);
        let base_url = join_path(&server_url, resumes_path);

        Ok(Self {
            client,
            server_url,
            base_url,
        })
    }

    /// Create a client for a profile and log in if it has credentials.
    ///
    /// Profiles without a username, or without a password in the keyring,
    /// connect without logging in.
    #[instrument(skip(profile, settings), fields(profile_name = %profile.name))]
    pub async fn connect(profile: &Profile, settings: &Settings) -> Result<Self> {
        let client = Self::new(profile, settings)?;

        match &profile.username {
            Some(username) => match Credentials::from_keyring(&profile.name, username) {
                Ok(credentials) => client.login(&credentials).await?,
                Err(e) => warn!(error = %e, "No stored password, continuing without login"),
            },
            None => debug!("Profile has no username, skipping login"),
        }

        info!(base_url = %client.base_url, "Resume client ready");
        Ok(client)
    }

    /// Log in through the server's login form.
    ///
    /// The session cookie is kept in the client's cookie jar.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        let url = join_path(&self.server_url, LOGIN_PATH);

        let page = self.client.get(&url).send().await?;
        if !page.status().is_success() {
            let status = page.status();
            let body = page.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }
        let csrf_token = extract_csrf_token(&page.text().await?);

        let response = self
            .client
            .post(&url)
            .form(&credentials.form_fields(csrf_token.as_deref()))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        // A successful login redirects away from the form.
        if is_login_url(response.url()) {
            return Err(ApiError::LoginFailed("invalid credentials".to_string()));
        }

        info!("Logged in");
        Ok(())
    }

    /// Fetch the identifiers of all stored resumes.
    #[instrument(skip(self))]
    pub async fn list_resume_ids(&self) -> Result<Vec<ResumeSummary>> {
        let url = join_path(&self.base_url, "load-resume-ids");
        let response = self.send(self.client.get(&url)).await?;
        let list: Vec<ResumeSummary> = parse_json(response).await?;
        debug!(count = list.len(), "Fetched resume list");
        Ok(list)
    }

    /// Fetch the full record of one resume.
    #[instrument(skip(self), fields(resume_id = %id))]
    pub async fn load_resume(&self, id: &ResumeId) -> Result<Record> {
        let url = self.resume_url("load-resume", id);
        let response = self.send(self.client.get(&url)).await?;
        parse_json(response).await
    }

    /// Delete one resume, returning the server's acknowledgement text.
    #[instrument(skip(self), fields(resume_id = %id))]
    pub async fn delete_resume(&self, id: &ResumeId) -> Result<String> {
        let url = self.resume_url("delete-resume", id);
        let response = self.send(self.client.delete(&url)).await?;
        let ack = response.text().await?;
        info!("Resume deleted");
        Ok(ack)
    }

    /// Submit a filled resume form, storing it as a new resume.
    ///
    /// A stored form is answered with a redirect to the index page; a form the
    /// server rejects is answered in place with an error text.
    #[instrument(skip(self, fields), fields(field_count = fields.len()))]
    pub async fn save_resume(&self, fields: &[(String, String)]) -> Result<()> {
        let url = join_path(&self.base_url, SAVE_PATH);
        let response = self.send(self.client.post(&url).form(fields)).await?;

        if is_endpoint_url(response.url(), SAVE_PATH) {
            let body = response.text().await?;
            let text = if body.trim().is_empty() {
                "the server did not store the resume".to_string()
            } else {
                body.trim().to_string()
            };
            return Err(ApiError::Rejected(text));
        }

        info!("Resume saved");
        Ok(())
    }

    /// URL the browser is sent to for exporting a resume.
    pub fn export_url(&self, id: &ResumeId) -> String {
        self.resume_url("export-resume", id)
    }

    /// URL of a per-resume endpoint, with the id percent-encoded.
    pub fn resume_url(&self, endpoint: &str, id: &ResumeId) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            endpoint,
            urlencoding::encode(id.as_str())
        )
    }

    /// Get the base URL of the resume endpoints.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request and turn non-success responses into errors.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response> {
        let response = request
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(%status, "Error response body: {}", body);
            return Err(ApiError::from_status(status, &body));
        }

        // Unauthenticated requests are redirected to the login form.
        if is_login_url(response.url()) {
            return Err(ApiError::Unauthorized);
        }

        Ok(response)
    }
}

async fn parse_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
}

fn is_login_url(url: &reqwest::Url) -> bool {
    is_endpoint_url(url, LOGIN_PATH)
}

fn is_endpoint_url(url: &reqwest::Url, endpoint: &str) -> bool {
    url.path().trim_end_matches('/').ends_with(&format!("/{}", endpoint))
}

/// Normalize a base URL by removing trailing slashes.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim_end_matches('/');

    if !url.starts_with("https://") && !url.contains("localhost") && !url.contains("127.0.0.1") {
        warn!("URL does not use HTTPS: {}. Credentials are sent in clear text.", url);
    }

    url.to_string()
}

/// Join a URL and a relative path, tolerating stray slashes and empty paths.
fn join_path(base: &str, path: &str) -> String {
    let path = path.trim_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server::{ok, redirect, response, serve};

    const LOGIN_PAGE: &str = r#"<form method="post"><input id="csrf_token" name="csrf_token" type="hidden" value="tok-1"><input name="username"></form>"#;

    fn client(url: &str, path: &str) -> ResumeClient {
        ResumeClient::with_base(url, path, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_normalize_base_url_removes_trailing_slash() {
        assert_eq!(
            normalize_base_url("http://localhost:5000///"),
            "http://localhost:5000"
        );
    }

    #[test]
    fn test_base_url_with_resumes_path() {
        assert_eq!(
            client("http://localhost:5000/", "/resumes/").base_url(),
            "http://localhost:5000/resumes"
        );
    }

    #[test]
    fn test_base_url_without_prefix() {
        assert_eq!(
            client("http://localhost:5000", "").base_url(),
            "http://localhost:5000"
        );
    }

    #[test]
    fn test_export_url() {
        let c = client("http://localhost:5000", "resumes");
        assert_eq!(
            c.export_url(&ResumeId::new("42")),
            "http://localhost:5000/resumes/export-resume/42"
        );
    }

    #[test]
    fn test_resume_url_encodes_id() {
        let c = client("http://localhost:5000", "resumes");
        assert_eq!(
            c.resume_url("load-resume", &ResumeId::new("a b/c")),
            "http://localhost:5000/resumes/load-resume/a%20b%2Fc"
        );
    }

    #[test]
    fn test_invalid_url_rejected() {
        let result = ResumeClient::with_base("localhost:5000", "resumes", Duration::from_secs(5));
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_new_from_profile() {
        let profile = Profile::new(
            "local".to_string(),
            "http://localhost:5000".to_string(),
            None,
        );
        let c = ResumeClient::new(&profile, &Settings::default()).unwrap();
        assert_eq!(c.base_url(), "http://localhost:5000/resumes");
    }

    #[test]
    fn test_is_login_url() {
        let url = reqwest::Url::parse("http://localhost:5000/login?next=%2F").unwrap();
        assert!(is_login_url(&url));
        let url = reqwest::Url::parse("http://localhost:5000/resumes/load-resume-ids").unwrap();
        assert!(!is_login_url(&url));
    }

    #[test]
    fn test_connect_anonymous_profile() {
        let profile = Profile::new(
            "local".to_string(),
            "http://localhost:5000".to_string(),
            None,
        );
        let c = tokio_test::block_on(ResumeClient::connect(&profile, &Settings::default()))
            .unwrap();
        assert_eq!(c.base_url(), "http://localhost:5000/resumes");
    }

    #[tokio::test]
    async fn test_redirect_to_login_is_unauthorized() {
        let (url, server) = serve(vec![
            redirect("/login?next=%2Fresumes%2Fload-resume-ids"),
            ok("text/html", LOGIN_PAGE),
        ])
        .await;

        let result = client(&url, "resumes").list_resume_ids().await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));

        let requests = server.await.unwrap();
        assert_eq!(requests[0].request_line(), "GET /resumes/load-resume-ids HTTP/1.1");
        assert!(requests[1].request_line().starts_with("GET /login?next="));
    }

    #[tokio::test]
    async fn test_list_resume_ids() {
        let (url, server) = serve(vec![ok(
            "application/json",
            r#"[{"id": 1, "entry_date": "Mon, 01 Jan 2024 00:00:00 GMT"}, {"id": 2, "entry_date": null}]"#,
        )])
        .await;

        let list = client(&url, "resumes").list_resume_ids().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].id, ResumeId::new("2"));
        assert!(list[1].entry_date.is_none());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_login_posts_csrf_token_and_follows_redirect() {
        let (url, server) = serve(vec![
            ok("text/html", LOGIN_PAGE),
            response(
                "302 FOUND",
                &[("Location", "/"), ("Set-Cookie", "session=abc; Path=/")],
                "",
            ),
            ok("text/html", "<h1>Resumes</h1>"),
        ])
        .await;

        let c = client(&url, "resumes");
        c.login(&Credentials::new("ana", "pw")).await.unwrap();

        let requests = server.await.unwrap();
        assert_eq!(requests[0].request_line(), "GET /login HTTP/1.1");
        assert_eq!(requests[1].request_line(), "POST /login HTTP/1.1");
        assert!(requests[1].body.contains("username=ana"));
        assert!(requests[1].body.contains("password=pw"));
        assert!(requests[1].body.contains("csrf_token=tok-1"));
        // The session cookie is sent on the redirected request.
        assert!(requests[2].head.contains("session=abc"));
    }

    #[tokio::test]
    async fn test_login_staying_on_form_fails() {
        let (url, server) = serve(vec![
            ok("text/html", LOGIN_PAGE),
            ok("text/html", LOGIN_PAGE),
        ])
        .await;

        let result = client(&url, "resumes")
            .login(&Credentials::new("ana", "wrong"))
            .await;
        assert!(matches!(result, Err(ApiError::LoginFailed(_))));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_not_found_keeps_body() {
        let (url, server) = serve(vec![response(
            "404 NOT FOUND",
            &[("Content-Type", "text/html")],
            "Resume not found or not authorized to delete",
        )])
        .await;

        let err = client(&url, "resumes")
            .delete_resume(&ResumeId::new("9"))
            .await
            .unwrap_err();
        assert_eq!(
            err.response_text(),
            "Resume not found or not authorized to delete"
        );

        let requests = server.await.unwrap();
        assert_eq!(requests[0].request_line(), "DELETE /resumes/delete-resume/9 HTTP/1.1");
    }

    #[tokio::test]
    async fn test_save_resume_posts_form_fields() {
        let (url, server) = serve(vec![redirect("/"), ok("text/html", "<h1>Resumes</h1>")]).await;

        let fields = vec![
            ("first_name".to_string(), "Ana".to_string()),
            ("experiences-0-bullet_points".to_string(), "a\nb".to_string()),
        ];
        client(&url, "resumes").save_resume(&fields).await.unwrap();

        let requests = server.await.unwrap();
        assert_eq!(requests[0].request_line(), "POST /resumes/save-resume HTTP/1.1");
        assert!(requests[0]
            .head
            .to_ascii_lowercase()
            .contains("content-type: application/x-www-form-urlencoded"));
        assert_eq!(
            requests[0].body,
            "first_name=Ana&experiences-0-bullet_points=a%0Ab"
        );
    }

    #[tokio::test]
    async fn test_save_resume_rejected_in_place() {
        let (url, server) = serve(vec![ok(
            "text/html",
            "Error: Form validation failed. Check console for details.",
        )])
        .await;

        let err = client(&url, "resumes").save_resume(&[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected(_)));
        assert_eq!(
            err.response_text(),
            "Error: Form validation failed. Check console for details."
        );
        server.await.unwrap();
    }
}

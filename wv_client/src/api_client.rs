//! HTTP API client for the warranty backend.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use warranty_vault::Warranty;
use warranty_vault::upgrade::UpgradeForm;

/// API client for communicating with the warranty backend
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    access_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct RegisterRequest {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    access_token: String,
}

/// Authenticated account profile returned by the backend
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub email: String,
}

/// A new warranty staged for submission, with optional local attachment
/// paths uploaded as multipart file parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarrantyDraft {
    pub item_name: String,
    pub purchase_date: NaiveDate,
    /// Coverage duration in months. Always >= 1.
    pub duration: u32,
    pub notes: String,
    pub item_image: Option<PathBuf>,
    pub receipt: Option<PathBuf>,
}

/// Extract the backend's error message from a response body. Failures are
/// reported as JSON `{"message": ...}`; anything else passes through
/// verbatim.
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.to_string())
}

async fn file_part(path: &Path) -> Result<reqwest::multipart::Part> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read attachment {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("attachment")
        .to_string();
    Ok(reqwest::multipart::Part::bytes(bytes).file_name(file_name))
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
            access_token: None,
        }
    }

    /// Bearer token of the current session, if any.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Adopt a previously persisted bearer token.
    pub fn set_access_token(&mut self, token: String) {
        self.access_token = Some(token);
    }

    /// Drop the session token.
    pub fn clear_access_token(&mut self) {
        self.access_token = None;
    }

    fn bearer(&self) -> Result<&str> {
        self.access_token.as_deref().context("Not authenticated")
    }

    /// Login with email and password, storing the returned bearer token
    pub async fn login(&mut self, email: String, password: String) -> Result<()> {
        let request = LoginRequest {
            email: email.to_lowercase(),
            password,
        };

        let response = self
            .client
            .post(format!("{}/auth/login", self.base_url))
            .json(&request)
            .send()
            .await
            .context("Failed to send login request")?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
            anyhow::bail!("Login failed: {}", error_message(&error_text));
        }

        let auth_response: AuthResponse = response
            .json()
            .await
            .context("Failed to parse login response")?;

        self.access_token = Some(auth_response.access_token);
        log::debug!("logged in against {}", self.base_url);

        Ok(())
    }

    /// Register a new account. The backend issues no token here; callers
    /// log in afterwards.
    pub async fn register(&self, email: String, password: String) -> Result<()> {
        let request = RegisterRequest {
            email: email.to_lowercase(),
            password,
        };

        let response = self
            .client
            .post(format!("{}/auth/register", self.base_url))
            .json(&request)
            .send()
            .await
            .context("Failed to send register request")?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
            anyhow::bail!("Registration failed: {}", error_message(&error_text));
        }

        Ok(())
    }

    /// Fetch the authenticated account's profile
    pub async fn me(&self) -> Result<Profile> {
        let token = self.bearer()?;

        let response = self
            .client
            .get(format!("{}/users/me", self.base_url))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .context("Failed to send profile request")?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
            anyhow::bail!("Profile fetch failed: {}", error_message(&error_text));
        }

        let profile: Profile = response
            .json()
            .await
            .context("Failed to parse profile response")?;

        Ok(profile)
    }

    /// List all warranties of the authenticated account, in backend order
    pub async fn list_warranties(&self) -> Result<Vec<Warranty>> {
        let token = self.bearer()?;

        let response = self
            .client
            .get(format!("{}/warranties", self.base_url))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .context("Failed to fetch warranties")?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
            anyhow::bail!("Warranty fetch failed: {}", error_message(&error_text));
        }

        let warranties: Vec<Warranty> = response
            .json()
            .await
            .context("Failed to parse warranty list")?;
        log::debug!("fetched {} warranties", warranties.len());

        Ok(warranties)
    }

    /// Submit a new warranty as a multipart form, uploading the optional
    /// image and receipt attachments from disk
    pub async fn create_warranty(&self, draft: WarrantyDraft) -> Result<()> {
        let token = self.bearer()?;

        let mut form = reqwest::multipart::Form::new()
            .text("item_name", draft.item_name)
            .text(
                "purchase_date",
                draft.purchase_date.format("%Y-%m-%d").to_string(),
            )
            .text("duration", draft.duration.to_string())
            .text("notes", draft.notes);

        if let Some(path) = draft.item_image {
            form = form.part("item_image", file_part(&path).await?);
        }

        if let Some(path) = draft.receipt {
            form = form.part("receipt", file_part(&path).await?);
        }

        let response = self
            .client
            .post(format!("{}/warranties", self.base_url))
            .header("Authorization", format!("Bearer {}", token))
            .multipart(form)
            .send()
            .await
            .context("Failed to send warranty")?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
            anyhow::bail!("Failed to add warranty: {}", error_message(&error_text));
        }

        Ok(())
    }

    /// Request a premium payment charge for a validated upgrade form.
    ///
    /// The backend answers with a plain-text payment URL. Any 2xx body
    /// that is not an http(s) URL is a failure, never a redirect target.
    pub async fn create_charge(&self, form: &UpgradeForm) -> Result<String> {
        let token = self.bearer()?;

        let response = self
            .client
            .post(format!("{}/payments/create-charge", self.base_url))
            .header("Authorization", format!("Bearer {}", token))
            .json(form)
            .send()
            .await
            .context("Failed to send payment request")?;

        let status = response.status();
        let payment_url = response
            .text()
            .await
            .context("Failed to read payment response")?;

        if !status.is_success() {
            anyhow::bail!("Payment failed: {}", error_message(&payment_url));
        }

        if payment_url.starts_with("http://") || payment_url.starts_with("https://") {
            Ok(payment_url)
        } else {
            anyhow::bail!("Invalid payment URL received");
        }
    }
}

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use sha1::Sha1;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::config::TwitterCredentials;
use crate::constants::twitter;
use crate::points::ProfileCounters;

type HmacSha1 = Hmac<Sha1>;

/// Anything that can report an account's current profile counters
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self, username: &str) -> Result<ProfileCounters>;
}

/// Response from users/show, only the fields we sample
#[derive(Debug, Deserialize)]
struct UserShowResponse {
    screen_name: String,
    #[serde(flatten)]
    counters: ProfileCounters,
}

/// Twitter's error envelope for failed requests
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: i64,
    message: String,
}

/// Twitter API client signing requests with OAuth 1.0a user context
pub struct TwitterClient {
    http_client: Client,
    credentials: TwitterCredentials,
    users_show_url: String,
}

impl TwitterClient {
    pub fn new(credentials: TwitterCredentials) -> Self {
        Self::with_url(credentials, twitter::USERS_SHOW_URL)
    }

    /// Client for a users/show endpoint other than api.twitter.com
    pub fn with_url(credentials: TwitterCredentials, users_show_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            credentials,
            users_show_url: users_show_url.into(),
        }
    }

    /// Generate OAuth 1.0a authorization header
    fn generate_oauth_header(
        &self,
        method: &str,
        url: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<String> {
        let timestamp = Utc::now().timestamp().to_string();
        let nonce = uuid::Uuid::new_v4().simple().to_string();

        let mut oauth_params: BTreeMap<String, String> = BTreeMap::new();
        oauth_params.insert(
            "oauth_consumer_key".to_string(),
            self.credentials.api_key.clone(),
        );
        oauth_params.insert("oauth_nonce".to_string(), nonce);
        oauth_params.insert(
            "oauth_signature_method".to_string(),
            twitter::OAUTH_SIGNATURE_METHOD.to_string(),
        );
        oauth_params.insert("oauth_timestamp".to_string(), timestamp);
        oauth_params.insert(
            "oauth_token".to_string(),
            self.credentials.access_token.clone(),
        );
        oauth_params.insert(
            "oauth_version".to_string(),
            twitter::OAUTH_VERSION.to_string(),
        );

        // Request params take part in the signature but not the header
        let mut all_params = oauth_params.clone();
        for (k, v) in params {
            all_params.insert(k.clone(), v.clone());
        }

        let signature = sign(
            method,
            url,
            &all_params,
            &self.credentials.api_secret,
            &self.credentials.access_secret,
        )?;
        oauth_params.insert("oauth_signature".to_string(), signature);

        let header_params: String = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {}", header_params))
    }
}

#[async_trait]
impl ProfileSource for TwitterClient {
    async fn fetch_profile(&self, username: &str) -> Result<ProfileCounters> {
        let screen_name = username.trim_start_matches('@');
        let url = self.users_show_url.as_str();

        let mut params = BTreeMap::new();
        params.insert("screen_name".to_string(), screen_name.to_string());

        let auth_header = self.generate_oauth_header("GET", url, &params)?;

        let response = self
            .http_client
            .get(url)
            .header("Authorization", auth_header)
            .query(&params)
            .send()
            .await
            .context("Failed to send user lookup request")?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to read user lookup response body")?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "user lookup for @{} failed ({}): {}",
                screen_name,
                status,
                describe_error(&response_text)
            ));
        }

        let user = parse_user(&response_text)?;

        info!(
            username = %user.screen_name,
            followers = user.counters.followers_count,
            statuses = user.counters.statuses_count,
            "Fetched Twitter profile"
        );

        Ok(user.counters)
    }
}

fn parse_user(body: &str) -> Result<UserShowResponse> {
    serde_json::from_str(body).context("Failed to parse user lookup response")
}

/// Readable text for a failed response, falling back to the raw body
fn describe_error(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(envelope) if !envelope.errors.is_empty() => envelope
            .errors
            .iter()
            .map(|e| format!("{} (code {})", e.message, e.code))
            .collect::<Vec<_>>()
            .join("; "),
        _ => {
            debug!("Twitter error body was not an error envelope");
            body.to_string()
        }
    }
}

/// HMAC-SHA1 signature over the OAuth 1.0a signature base string
fn sign(
    method: &str,
    url: &str,
    params: &BTreeMap<String, String>,
    consumer_secret: &str,
    token_secret: &str,
) -> Result<String> {
    let param_string: String = params
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let signature_base = format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(url),
        percent_encode(&param_string)
    );

    let signing_key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );

    let mut mac =
        HmacSha1::new_from_slice(signing_key.as_bytes()).context("Failed to create HMAC")?;
    mac.update(signature_base.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Percent-encode a string according to RFC 3986
fn percent_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

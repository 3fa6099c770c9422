//! OAuth for the Google Docs publisher: installed-app consent on first use,
//! then a cached `token.json` that is refreshed when it expires.

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/drive",
    "https://www.googleapis.com/auth/documents",
];

pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";
pub const DEFAULT_TOKEN_FILE: &str = "token.json";

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are treated as expired.
const REFRESH_THRESHOLD_SECS: i64 = 225;

const PROVIDER: &str = "google auth";

/// `credentials.json` as downloaded from the Google Cloud console.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    #[serde(default)]
    installed: Option<OAuthClient>,
    #[serde(default)]
    web: Option<OAuthClient>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthClient {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ClientSecrets {
    pub fn client(self) -> Option<OAuthClient> {
        self.installed.or(self.web)
    }
}

/// Cached credentials. Field names match the `token.json` written by
/// Google's own client libraries so existing caches keep working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl StoredToken {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.token.is_empty() {
            return false;
        }
        match self.expiry {
            Some(expiry) => now + TimeDelta::seconds(REFRESH_THRESHOLD_SECS) < expiry,
            None => true,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    fn apply(&mut self, grant: TokenResponse) {
        self.token = grant.access_token;
        if grant.refresh_token.is_some() {
            self.refresh_token = grant.refresh_token;
        }
        self.expiry = grant.expires_in.map(|secs| Utc::now() + TimeDelta::seconds(secs));
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Hands out a usable bearer token, authorizing or refreshing as needed.
pub struct GoogleAuthorizer {
    client: Client,
    credentials_path: PathBuf,
    token_path: PathBuf,
    cached: Option<StoredToken>,
}

impl GoogleAuthorizer {
    pub fn new(credentials_path: impl Into<PathBuf>, token_path: impl Into<PathBuf>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            credentials_path: credentials_path.into(),
            token_path: token_path.into(),
            cached: None,
        })
    }

    pub async fn access_token(&mut self) -> Result<String> {
        if self.cached.is_none() {
            self.cached = self.read_token_file();
        }

        let token = match self.cached.take() {
            Some(token) if token.is_valid() => {
                let access = token.token.clone();
                self.cached = Some(token);
                return Ok(access);
            }
            Some(token) if token.refresh_token.is_some() => {
                info!("Google token expired, refreshing");
                self.refresh(token).await?
            }
            _ => self.authorize_interactively().await?,
        };

        self.write_token_file(&token)?;
        let access = token.token.clone();
        self.cached = Some(token);
        Ok(access)
    }

    fn read_token_file(&self) -> Option<StoredToken> {
        let content = match fs::read_to_string(&self.token_path) {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    warn!("Could not read {}: {}", self.token_path.display(), e);
                }
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(token) => Some(token),
            Err(e) => {
                warn!("Ignoring unreadable token cache {}: {}", self.token_path.display(), e);
                None
            }
        }
    }

    fn write_token_file(&self, token: &StoredToken) -> Result<()> {
        fs::write(&self.token_path, serde_json::to_string(token)?)?;
        debug!("Token cached to {}", self.token_path.display());
        Ok(())
    }

    async fn refresh(&self, mut token: StoredToken) -> Result<StoredToken> {
        let refresh_token = token.refresh_token.clone().unwrap_or_default();
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("client_id", token.client_id.as_str()),
            ("client_secret", token.client_secret.as_str()),
        ];
        let grant = self.request_token(&token.token_uri, &params).await?;
        token.apply(grant);
        Ok(token)
    }

    async fn authorize_interactively(&self) -> Result<StoredToken> {
        let content = fs::read_to_string(&self.credentials_path).map_err(|e| {
            Error::Config(format!("cannot read OAuth client file {}: {}", self.credentials_path.display(), e))
        })?;
        let client = serde_json::from_str::<ClientSecrets>(&content)?
            .client()
            .ok_or_else(|| Error::Config("OAuth client file has no \"installed\" or \"web\" section".to_string()))?;

        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let redirect_uri = format!("http://127.0.0.1:{}/", listener.local_addr()?.port());
        let scope = SCOPES.join(" ");

        let auth_url = format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&access_type=offline&prompt=consent",
            client.auth_uri,
            urlencoding::encode(&client.client_id),
            urlencoding::encode(&redirect_uri),
            urlencoding::encode(&scope),
        );
        println!("Please visit this URL to authorize this application: {}", auth_url);
        info!("Waiting for OAuth redirect on {}", redirect_uri);

        let code = receive_authorization_code(&listener).await?;

        let params = [
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("client_id", client.client_id.as_str()),
            ("client_secret", client.client_secret.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
        ];
        let grant = self.request_token(&client.token_uri, &params).await?;

        let mut token = StoredToken {
            token: String::new(),
            refresh_token: None,
            token_uri: client.token_uri,
            client_id: client.client_id,
            client_secret: client.client_secret,
            scopes: SCOPES.iter().map(|s| s.to_string()).collect(),
            expiry: None,
            extra: Map::new(),
        };
        token.apply(grant);
        Ok(token)
    }

    async fn request_token(&self, token_uri: &str, params: &[(&str, &str)]) -> Result<TokenResponse> {
        let response = self
            .client
            .post(token_uri)
            .form(params)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::provider(PROVIDER, format!("token endpoint returned {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("malformed token response: {}", e)))
    }
}

async fn receive_authorization_code(listener: &TcpListener) -> Result<String> {
    let (mut stream, peer) = listener.accept().await?;
    debug!("OAuth redirect from {}", peer);

    let mut buf = vec![0u8; 8192];
    let n = stream.read(&mut buf).await?;
    let request = String::from_utf8_lossy(&buf[..n]);
    let outcome = authorization_code_from_request(&request);

    let body = match &outcome {
        Ok(_) => "The authentication flow has completed. You may close this window.",
        Err(_) => "Authorization failed. You may close this window.",
    };
    let reply = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    stream.write_all(reply.as_bytes()).await?;
    stream.shutdown().await?;

    outcome
}

/// Pulls `code` out of the redirect's request line
/// (`GET /?code=...&scope=... HTTP/1.1`).
pub fn authorization_code_from_request(request: &str) -> Result<String> {
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .ok_or_else(|| Error::provider(PROVIDER, "empty redirect request"))?;
    let query = target.split_once('?').map(|(_, q)| q).unwrap_or_default();

    let mut code = None;
    let mut denied = None;
    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = urlencoding::decode(&value.replace('+', " "))
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| value.to_string());
        match key {
            "code" => code = Some(value),
            "error" => denied = Some(value),
            _ => {}
        }
    }

    match (code, denied) {
        (Some(code), _) if !code.is_empty() => Ok(code),
        (_, Some(reason)) => Err(Error::provider(PROVIDER, format!("authorization denied: {}", reason))),
        _ => Err(Error::provider(PROVIDER, "redirect carried no authorization code")),
    }
}

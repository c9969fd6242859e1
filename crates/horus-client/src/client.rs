//! HTTP client for the affiliate registry.

use std::time::Duration;

use rand::Rng;
use reqwest::StatusCode;
use tracing::{info, warn};

use crate::error::HorusError;
use crate::types::{
    parse_document, AffiliateRecord, LoginRequest, LoginResponse, LookupRow, LookupStatus,
};

pub const LOGIN_URL: &str = "https://backend.horus-health.com/api/auth/validar-usuario";
pub const LOOKUP_URL: &str = "https://backend.horus-health.com/api/afiliados/consultar-afiliado";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default pause between bulk requests, in milliseconds. The registry has
/// no documented rate limit; the back office has always paced it 2–3 s.
const DEFAULT_DELAY_MS: (u64, u64) = (2_000, 3_000);

pub struct HorusClient {
    http: reqwest::Client,
    login_url: String,
    lookup_url: String,
    token: Option<String>,
    delay_ms: (u64, u64),
}

impl HorusClient {
    pub fn new() -> Self {
        Self::with_endpoints(LOGIN_URL, LOOKUP_URL)
    }

    /// Point the client at different endpoints (tests, staging).
    pub fn with_endpoints(login_url: &str, lookup_url: &str) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("default reqwest client"),
            login_url: login_url.to_string(),
            lookup_url: lookup_url.trim_end_matches('/').to_string(),
            token: None,
            delay_ms: DEFAULT_DELAY_MS,
        }
    }

    /// Override the inter-request pause for bulk queries.
    pub fn set_delay_ms(&mut self, min: u64, max: u64) {
        self.delay_ms = (min, max.max(min));
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Exchange credentials for a bearer token.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), HorusError> {
        let response = self
            .http
            .post(&self.login_url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let body: LoginResponse = response.json().await?;

        match body.token.filter(|t| !t.is_empty()) {
            Some(token) => {
                self.token = Some(token);
                info!("login succeeded");
                Ok(())
            }
            None => {
                self.token = None;
                Err(HorusError::Auth("Invalid credentials".into()))
            }
        }
    }

    /// Query one document. Never fails the batch: every problem becomes a
    /// [`LookupStatus`] on the returned row.
    pub async fn lookup(&mut self, raw_document: &str) -> LookupRow {
        let document = raw_document.trim().to_string();

        let Some(token) = self.token.clone() else {
            return LookupRow {
                document,
                status: LookupStatus::NotLoggedIn,
            };
        };
        let Some(id) = parse_document(&document) else {
            return LookupRow {
                document,
                status: LookupStatus::InvalidFormat,
            };
        };

        let url = format!("{}/{}/{}", self.lookup_url, id.number, id.doc_type.type_id());
        let response = match self.http.get(&url).bearer_auth(&token).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(document, error = %e, "lookup failed");
                return LookupRow {
                    document,
                    status: LookupStatus::Failed(e.to_string()),
                };
            }
        };

        match response.status() {
            StatusCode::UNAUTHORIZED => {
                self.token = None;
                LookupRow {
                    document,
                    status: LookupStatus::Unauthorized,
                }
            }
            StatusCode::OK => match response.json::<AffiliateRecord>().await {
                Ok(record) => {
                    let name = record.full_name();
                    let name = if name.is_empty() {
                        "REVISAR (sin nombre)".to_string()
                    } else {
                        name
                    };
                    let status = record
                        .estado_afiliado
                        .and_then(|f| f.nombre)
                        .unwrap_or_else(|| "REVISAR".into());
                    let ips = record
                        .ips
                        .and_then(|f| f.nombre)
                        .unwrap_or_else(|| "REVISAR".into());
                    LookupRow {
                        document,
                        status: LookupStatus::Found { name, status, ips },
                    }
                }
                Err(e) => LookupRow {
                    document,
                    status: LookupStatus::Failed(e.to_string()),
                },
            },
            other => LookupRow {
                document,
                status: LookupStatus::Rejected(other.as_u16()),
            },
        }
    }

    /// Query a batch sequentially with a randomized pause between requests,
    /// reporting each finished row through `progress(done, total, row)`.
    pub async fn lookup_all(
        &mut self,
        documents: &[String],
        mut progress: impl FnMut(usize, usize, &LookupRow),
    ) -> Vec<LookupRow> {
        let total = documents.len();
        let mut rows = Vec::with_capacity(total);

        for (idx, document) in documents.iter().enumerate() {
            let row = self.lookup(document).await;
            progress(idx + 1, total, &row);
            rows.push(row);

            if idx + 1 < total {
                let ms = rand::thread_rng().gen_range(self.delay_ms.0..=self.delay_ms.1);
                tokio::time::sleep(Duration::from_millis(ms)).await;
            }
        }

        rows
    }
}

impl Default for HorusClient {
    fn default() -> Self {
        Self::new()
    }
}

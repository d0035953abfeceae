use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config::TranslatorConfig;
use crate::error::{Result, TranslateError};

const API_VERSION: &str = "3.0";

/// The remote text-translation capability. One request per call; tests
/// substitute deterministic implementations.
pub trait Translate {
    fn translate(&self, text: &str) -> Result<String>;
}

#[derive(Serialize)]
struct TranslateRequest {
    #[serde(rename = "Text")]
    text: String,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
struct Translation {
    text: String,
}

/// Client for the Microsoft Translator v3 endpoint
pub struct TranslatorClient {
    client: Client,
    url: String,
    key: String,
}

impl TranslatorClient {
    /// Build a client from settings. Fails before any network traffic when
    /// the subscription key or the target language is missing.
    pub fn new(config: &TranslatorConfig) -> Result<Self> {
        if config.key.is_empty() {
            return Err(TranslateError::Configuration(
                "missing subscription key".to_string(),
            ));
        }
        if config.to.is_empty() {
            return Err(TranslateError::Configuration(
                "missing target language".to_string(),
            ));
        }

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        let from = config.from.as_deref().filter(|s| !s.trim().is_empty());

        Ok(Self {
            client,
            url: request_url(&config.endpoint, from, &config.to),
            key: config.key.clone(),
        })
    }
}

fn request_url(endpoint: &str, from: Option<&str>, to: &str) -> String {
    let mut url = format!(
        "{}/translate?api-version={}",
        endpoint.trim_end_matches('/'),
        API_VERSION
    );
    if let Some(from) = from {
        url.push_str("&from=");
        url.push_str(from);
    }
    url.push_str("&to=");
    url.push_str(to);
    url
}

fn first_translation(payload: &str) -> Result<String> {
    let parsed: Vec<TranslateResponse> = serde_json::from_str(payload)
        .map_err(|e| TranslateError::MalformedResponse(format!("{}: {}", e, payload)))?;
    parsed
        .into_iter()
        .next()
        .and_then(|r| r.translations.into_iter().next())
        .map(|t| t.text)
        .ok_or_else(|| TranslateError::MalformedResponse(format!("no translation in: {}", payload)))
}

impl Translate for TranslatorClient {
    fn translate(&self, text: &str) -> Result<String> {
        let body = [TranslateRequest {
            text: text.to_string(),
        }];
        let response = self
            .client
            .post(&self.url)
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .json(&body)
            .send()?;

        let status = response.status();
        let payload = response.text()?;
        if !status.is_success() {
            return Err(TranslateError::Api {
                status: status.as_u16(),
                message: payload,
            });
        }

        first_translation(&payload)
    }
}

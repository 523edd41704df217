use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{Result, WordGameError};
use crate::meaning::MeaningLookup;

/// Public endpoint of the Turkish Language Association dictionary
pub const TDK_BASE_URL: &str = "https://sozluk.gov.tr";

/// TDK (sozluk.gov.tr) dictionary client
pub struct TdkDictionary {
    client: Client,
    base_url: String,
}

/// `/gts` answers with either a list of entries or `{"error": "..."}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GtsResponse {
    Entries(Vec<GtsEntry>),
    NotFound { error: String },
}

#[derive(Debug, Deserialize)]
struct GtsEntry {
    #[serde(default, rename = "anlamlarListe")]
    meanings: Vec<GtsMeaning>,
}

#[derive(Debug, Deserialize)]
struct GtsMeaning {
    #[serde(default, rename = "anlam")]
    text: String,
}

impl TdkDictionary {
    /// Create client against the public TDK endpoint
    pub fn new() -> Result<Self> {
        Self::with_base_url(TDK_BASE_URL)
    }

    /// Create client against another base URL (mirrors, tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn parse(body: &str) -> Result<Vec<String>> {
        let response: GtsResponse = serde_json::from_str(body)
            .map_err(|e| WordGameError::MeaningLookup(format!("Invalid JSON: {}", e)))?;

        Ok(match response {
            GtsResponse::Entries(entries) => entries
                .into_iter()
                .flat_map(|entry| entry.meanings)
                .map(|m| m.text.trim().to_string())
                .filter(|text| !text.is_empty())
                .collect(),
            GtsResponse::NotFound { error } => {
                tracing::debug!("TDK has no entry: {}", error);
                Vec::new()
            }
        })
    }
}

#[async_trait]
impl MeaningLookup for TdkDictionary {
    async fn search(&self, word: &str) -> Result<Vec<String>> {
        let url = format!("{}/gts?ara={}", self.base_url, urlencoding::encode(word.trim()));

        let response = self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| WordGameError::MeaningLookup(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(WordGameError::MeaningLookup(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| WordGameError::MeaningLookup(format!("Body read failed: {}", e)))?;

        Self::parse(&body)
    }

    fn name(&self) -> &str {
        "tdk"
    }
}

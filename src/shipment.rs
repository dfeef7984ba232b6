use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::models::{Shipment, ShipmentRequest, Transaction, TransactionRequest};

/// The three remote calls the label workflow makes. Split out as a trait so
/// tests can script responses instead of hitting the live API.
#[async_trait]
pub trait ShippingService: Send + Sync {
    async fn create_shipment(&self, request: &ShipmentRequest) -> Result<Shipment>;
    async fn create_transaction(&self, request: &TransactionRequest) -> Result<Transaction>;
    async fn get_transaction(&self, object_id: &str) -> Result<Transaction>;
}

pub struct ShipmentClient {
    config: Config,
    http_client: Client,
}

impl ShipmentClient {
    pub fn new(config: Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { config, http_client })
    }

    fn auth_header(&self) -> String {
        format!("ShippoToken {}", self.config.shippo_api_key)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
        what: &str,
    ) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Shippo {} call failed (status {}): {}",
                what,
                status,
                body
            );
        }

        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read Shippo {} response", what))?;

        serde_json::from_str(&text).with_context(|| {
            format!(
                "Failed to parse Shippo {} response: {}",
                what,
                truncate(&text, 500)
            )
        })
    }
}

#[async_trait]
impl ShippingService for ShipmentClient {
    async fn create_shipment(&self, request: &ShipmentRequest) -> Result<Shipment> {
        let url = format!("{}/shipments/", self.config.api_base_url);

        let response = self.http_client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(request)
            .send()
            .await
            .context("Failed to send shipment create request")?;

        Self::parse_response(response, "shipment create").await
    }

    async fn create_transaction(&self, request: &TransactionRequest) -> Result<Transaction> {
        let url = format!("{}/transactions/", self.config.api_base_url);

        let response = self.http_client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(request)
            .send()
            .await
            .context("Failed to send transaction create request")?;

        Self::parse_response(response, "transaction create").await
    }

    async fn get_transaction(&self, object_id: &str) -> Result<Transaction> {
        let url = format!("{}/transactions/{}", self.config.api_base_url, object_id);

        let response = self.http_client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await
            .context("Failed to send transaction fetch request")?;

        Self::parse_response(response, "transaction fetch").await
    }
}

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

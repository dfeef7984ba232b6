use anyhow::{Context, Result, anyhow, bail};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::download::LabelDownloader;
use crate::models::{
    Address, Parcel, ShipmentRequest, Transaction, TransactionRequest, TransactionStatus,
    cheapest_rate,
};
use crate::shipment::ShippingService;

/// Delay between transaction fetches while the label is still being generated.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// End-to-end label purchase: create a shipment, buy the cheapest rate, wait
/// for the label, download the PDF. One shipment per run.
pub struct LabelWorkflow {
    shipping: Arc<dyn ShippingService>,
    downloader: Arc<dyn LabelDownloader>,
    label_file_type: String,
    order_metadata: String,
    download_dir: PathBuf,
}

impl LabelWorkflow {
    pub fn new(
        shipping: Arc<dyn ShippingService>,
        downloader: Arc<dyn LabelDownloader>,
        config: &Config,
    ) -> Self {
        Self {
            shipping,
            downloader,
            label_file_type: config.label_file_type.clone(),
            order_metadata: config.order_metadata.clone(),
            download_dir: config.download_dir.clone(),
        }
    }

    /// Returns the path of the downloaded label, or `None` when the purchase
    /// ended in a terminal status other than SUCCESS.
    pub async fn run(
        &self,
        address_from: Address,
        address_to: Address,
        parcels: Vec<Parcel>,
    ) -> Result<Option<PathBuf>> {
        let shipment = self.shipping
            .create_shipment(&ShipmentRequest {
                address_from,
                address_to,
                parcels,
                async_rates: false,
            })
            .await?;

        println!("📦 Shipment ID {}", shipment.object_id);

        for rate in &shipment.rates {
            let eta = rate.estimated_days
                .map(|days| days.to_string())
                .unwrap_or_else(|| "?".to_string());

            println!(
                "🚚 {} {} {}, Arrives in {} days: {} {}",
                rate.object_id,
                rate.provider,
                rate.servicelevel.name,
                eta,
                rate.amount,
                rate.currency,
            );
        }

        let Some(rate) = cheapest_rate(&shipment.rates) else {
            bail!("Shipment {} returned no usable rates", shipment.object_id);
        };

        let transaction = self.shipping
            .create_transaction(&TransactionRequest {
                rate: rate.object_id.clone(),
                label_file_type: self.label_file_type.clone(),
                metadata: self.order_metadata.clone(),
            })
            .await?;

        println!("🧾 Transaction ID {}", transaction.object_id);

        let transaction = self.poll_until_terminal(transaction).await?;

        println!("📍 Status: {}", transaction.status);

        if transaction.status != TransactionStatus::Success {
            println!(
                "ℹ️  Transaction {} did not succeed, skipping label download",
                transaction.object_id
            );
            return Ok(None);
        }

        let label_url = transaction.label_url.as_deref().ok_or_else(|| {
            anyhow!(
                "Transaction {} succeeded without a label URL",
                transaction.object_id
            )
        })?;

        println!("🏷️  Label URL: {}", label_url);

        if let Some(tracking_url) = &transaction.tracking_url_provider {
            println!("🔎 Tracking URL: {}", tracking_url);
        }

        tokio::fs::create_dir_all(&self.download_dir)
            .await
            .with_context(|| {
                format!(
                    "Failed to create download directory {}",
                    self.download_dir.display()
                )
            })?;

        let dest = self.download_dir
            .join(format!("{}.pdf", transaction.object_id));

        let path = self.downloader
            .download(label_url, &dest)
            .await
            .with_context(|| {
                format!(
                    "Failed to download label for transaction {}",
                    transaction.object_id
                )
            })?;

        println!("✅ Label downloaded to {}", path.display());

        Ok(Some(path))
    }

    /// Re-fetches the transaction once per interval until it leaves QUEUED.
    /// Fetches are strictly sequential; there is no attempt bound.
    async fn poll_until_terminal(&self, mut transaction: Transaction) -> Result<Transaction> {
        while transaction.status.is_queued() {
            tokio::time::sleep(POLL_INTERVAL).await;
            transaction = self.shipping
                .get_transaction(&transaction.object_id)
                .await?;
        }

        Ok(transaction)
    }
}

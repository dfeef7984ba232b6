use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sender or recipient of a shipment. Input only, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct Address {
    pub name: String,
    pub street1: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
    pub email: String,
}

/// Distance unit tokens accepted by the Shippo API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Cm,
    In,
    Ft,
    Mm,
    M,
    Yd,
}

/// Mass unit tokens accepted by the Shippo API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MassUnit {
    G,
    Kg,
    Lb,
    Oz,
}

/// Parcel dimensions and weight. The API expects the numbers as strings.
#[derive(Debug, Clone, Serialize)]
pub struct Parcel {
    pub length: String,
    pub width: String,
    pub height: String,
    pub distance_unit: DistanceUnit,
    pub weight: String,
    pub mass_unit: MassUnit,
}

/// Shipment create payload. `async = false` asks the API to return rate
/// quotes synchronously in the creation response.
#[derive(Debug, Clone, Serialize)]
pub struct ShipmentRequest {
    pub address_from: Address,
    pub address_to: Address,
    pub parcels: Vec<Parcel>,
    #[serde(rename = "async")]
    pub async_rates: bool,
}

/// Shippo shipment resource (partial, only fields we need)
#[derive(Debug, Clone, Deserialize)]
pub struct Shipment {
    pub object_id: String,
    #[serde(default)]
    pub rates: Vec<Rate>,
}

/// A priced shipping option quoted for a shipment
#[derive(Debug, Clone, Deserialize)]
pub struct Rate {
    pub object_id: String,
    pub provider: String,
    pub servicelevel: ServiceLevel,
    #[serde(default)]
    pub estimated_days: Option<u32>,
    pub amount: String,
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceLevel {
    #[serde(default)]
    pub name: String,
}

impl Rate {
    /// Exact decimal view of the quoted amount. `None` when the API sends
    /// something that is not a decimal number.
    pub fn price(&self) -> Option<Decimal> {
        Decimal::from_str(self.amount.trim()).ok()
    }
}

/// Returns the rate with the lowest price, comparing amounts as exact
/// decimals rather than strings. Ties keep the first-encountered rate.
/// Rates with unparsable amounts are never selected.
pub fn cheapest_rate(rates: &[Rate]) -> Option<&Rate> {
    rates
        .iter()
        .filter_map(|rate| rate.price().map(|price| (price, rate)))
        .min_by_key(|entry| entry.0)
        .map(|(_, rate)| rate)
}

/// Transaction create payload: the billable label purchase.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRequest {
    pub rate: String,
    pub label_file_type: String,
    pub metadata: String,
}

/// Shippo transaction resource (partial, only fields we need).
/// `label_url` and `tracking_url_provider` are populated only once the
/// transaction reaches SUCCESS.
#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    pub object_id: String,
    pub status: TransactionStatus,
    #[serde(default)]
    pub label_url: Option<String>,
    #[serde(default)]
    pub tracking_url_provider: Option<String>,
}

/// Label purchase status. QUEUED is the only non-terminal state; a
/// transaction only ever moves from QUEUED toward SUCCESS, ERROR, or some
/// other terminal token we do not enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Queued,
    Success,
    Error,
    #[serde(other)]
    Unknown,
}

impl TransactionStatus {
    pub fn is_queued(&self) -> bool {
        matches!(self, TransactionStatus::Queued)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            TransactionStatus::Queued => "QUEUED",
            TransactionStatus::Success => "SUCCESS",
            TransactionStatus::Error => "ERROR",
            TransactionStatus::Unknown => "UNKNOWN",
        };
        f.write_str(token)
    }
}

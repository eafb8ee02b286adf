//! DTOs de transacciones de compra

use crate::models::transaction::Transaction;
use serde::{Deserialize, Serialize};

/// Request de demanda de compra
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseRequest {
    pub vehicle_id: uuid::Uuid,
}

/// Response de transacción para la API
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: String,
    pub vehicle_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub final_price: String,
    pub status: String,
    pub created_at: String,
    pub confirmed_at: Option<String>,
    pub updated_at: String,
}

impl From<Transaction> for TransactionResponse {
    fn from(trx: Transaction) -> Self {
        Self {
            id: trx.id.to_string(),
            vehicle_id: trx.vehicle_id.to_string(),
            buyer_id: trx.buyer_id.to_string(),
            seller_id: trx.seller_id.to_string(),
            final_price: trx.final_price.to_string(),
            status: trx.status,
            created_at: trx.created_at.to_rfc3339(),
            confirmed_at: trx.confirmed_at.map(|d| d.to_rfc3339()),
            updated_at: trx.updated_at.to_rfc3339(),
        }
    }
}

/// Response de demanda de compra: incluye si fue creada ahora
#[derive(Debug, Serialize)]
pub struct PurchaseRequestResponse {
    pub transaction: TransactionResponse,
    pub created: bool,
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{receipt_items::QuantityUnit, receipts::PaymentType};

/// API-facing user. The password hash never leaves the entity layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Receipt {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shop_name: String,
    pub payment_type: PaymentType,
    pub amount: Decimal,
    pub total: Decimal,
    pub change: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReceiptItem {
    pub id: Uuid,
    pub receipt_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub quantity: Decimal,
    pub quantity_unit: QuantityUnit,
    pub line_total: Decimal,
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::{receipt_items::QuantityUnit, receipts::PaymentType};
use crate::models::{Receipt, ReceiptItem};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProductInput {
    pub name: String,
    pub price: Decimal,
    pub quantity: Decimal,
    pub quantity_unit: QuantityUnit,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReceiptRequest {
    pub shop_name: String,
    pub payment_type: PaymentType,
    pub amount: Decimal,
    pub products: Vec<ProductInput>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReceiptWithItems {
    pub receipt: Receipt,
    pub items: Vec<ReceiptItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReceiptList {
    pub items: Vec<Receipt>,
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::entity::receipts::PaymentType;

/// Query string of `GET /receipts/`. All filters are optional and combine
/// with AND; results are always newest first.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReceiptListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub min_total: Option<Decimal>,
    pub max_total: Option<Decimal>,
    pub payment_type: Option<PaymentType>,
}

impl ReceiptListQuery {
    pub fn normalize_pagination(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

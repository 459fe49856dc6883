use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    calculator::{compute_totals, line_total},
    dto::receipts::{CreateReceiptRequest, ReceiptList, ReceiptWithItems},
    entity::{
        receipt_items::{
            ActiveModel as ItemActive, Column as ItemCol, Entity as ReceiptItems,
            Model as ItemModel,
        },
        receipts::{ActiveModel as ReceiptActive, Column as ReceiptCol, Entity as Receipts,
            Model as ReceiptModel},
    },
    error::{AppError, AppResult},
    formatter,
    middleware::auth::AuthUser,
    models::{Receipt, ReceiptItem},
    response::{ApiResponse, Meta},
    routes::params::ReceiptListQuery,
    state::AppState,
};

pub async fn create_receipt(
    state: &AppState,
    user: &AuthUser,
    payload: CreateReceiptRequest,
) -> AppResult<ApiResponse<ReceiptWithItems>> {
    for product in &payload.products {
        if product.name.trim().is_empty() {
            return Err(AppError::Validation(
                "product name must not be empty".into(),
            ));
        }
    }

    let totals = compute_totals(&payload.products, payload.payment_type, payload.amount)?;

    // Receipt and line items land in one transaction; a failed insert leaves
    // no partial receipt behind.
    let txn = state.orm.begin().await?;

    let receipt = ReceiptActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        shop_name: Set(payload.shop_name),
        payment_type: Set(payload.payment_type),
        amount: Set(payload.amount),
        total: Set(totals.total),
        change: Set(totals.change),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items: Vec<ReceiptItem> = Vec::new();
    for (position, product) in payload.products.into_iter().enumerate() {
        let item = ItemActive {
            id: Set(Uuid::new_v4()),
            receipt_id: Set(receipt.id),
            position: Set(position as i32),
            name: Set(product.name),
            price: Set(product.price),
            quantity: Set(product.quantity),
            quantity_unit: Set(product.quantity_unit),
        }
        .insert(&txn)
        .await?;

        items.push(item_from_entity(item));
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "receipt_created",
        Some("receipts"),
        Some(serde_json::json!({ "receipt_id": receipt.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Receipt created",
        ReceiptWithItems {
            receipt: receipt_from_entity(receipt),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_receipts(
    state: &AppState,
    user: &AuthUser,
    query: ReceiptListQuery,
) -> AppResult<ApiResponse<ReceiptList>> {
    let (page, per_page, offset) = query.normalize_pagination();

    let mut condition = Condition::all().add(ReceiptCol::UserId.eq(user.user_id));
    if let Some(from) = query.date_from {
        condition = condition.add(ReceiptCol::CreatedAt.gte(from));
    }
    if let Some(to) = query.date_to {
        condition = condition.add(ReceiptCol::CreatedAt.lte(to));
    }
    if let Some(min_total) = query.min_total {
        condition = condition.add(ReceiptCol::Total.gte(min_total));
    }
    if let Some(max_total) = query.max_total {
        condition = condition.add(ReceiptCol::Total.lte(max_total));
    }
    if let Some(payment_type) = query.payment_type {
        condition = condition.add(ReceiptCol::PaymentType.eq(payment_type));
    }

    let finder = Receipts::find()
        .filter(condition)
        .order_by_desc(ReceiptCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let receipts = finder
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(receipt_from_entity)
        .collect();

    let meta = Meta::new(page, per_page, total);
    Ok(ApiResponse::success(
        "Ok",
        ReceiptList { items: receipts },
        Some(meta),
    ))
}

pub async fn get_receipt(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<ReceiptWithItems>> {
    let (receipt, items) = load_owned_receipt(state, user, id).await?;

    Ok(ApiResponse::success(
        "Ok",
        ReceiptWithItems {
            receipt: receipt_from_entity(receipt),
            items: items.into_iter().map(item_from_entity).collect(),
        },
        Some(Meta::empty()),
    ))
}

/// Plain-text rendering of an owned receipt.
pub async fn render_receipt(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<String> {
    let (receipt, items) = load_owned_receipt(state, user, id).await?;

    let receipt = receipt_from_entity(receipt);
    let items: Vec<ReceiptItem> = items.into_iter().map(item_from_entity).collect();
    Ok(formatter::render(&receipt, &items))
}

pub async fn delete_receipt(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let (receipt, _) = load_owned_receipt(state, user, id).await?;

    // Line items go with the receipt (ON DELETE CASCADE).
    Receipts::delete_by_id(receipt.id).exec(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "receipt_deleted",
        Some("receipts"),
        Some(serde_json::json!({ "receipt_id": receipt.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Receipt deleted",
        serde_json::json!({ "receipt_id": receipt.id }),
        Some(Meta::empty()),
    ))
}

// Ownership policy: absent receipts are 404, receipts owned by someone else
// are 403. Ids are UUIDv4, so the distinction does not make foreign ids
// guessable.
async fn load_owned_receipt(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<(ReceiptModel, Vec<ItemModel>)> {
    let receipt = Receipts::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if receipt.user_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    let items = ReceiptItems::find()
        .filter(ItemCol::ReceiptId.eq(receipt.id))
        .order_by_asc(ItemCol::Position)
        .all(&state.orm)
        .await?;

    Ok((receipt, items))
}

fn receipt_from_entity(model: ReceiptModel) -> Receipt {
    Receipt {
        id: model.id,
        user_id: model.user_id,
        shop_name: model.shop_name,
        payment_type: model.payment_type,
        amount: model.amount,
        total: model.total,
        change: model.change,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn item_from_entity(model: ItemModel) -> ReceiptItem {
    ReceiptItem {
        id: model.id,
        receipt_id: model.receipt_id,
        name: model.name,
        price: model.price,
        quantity: model.quantity,
        quantity_unit: model.quantity_unit,
        line_total: line_total(model.price, model.quantity),
    }
}

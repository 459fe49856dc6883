use axum_receipts_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        auth::TokenRequest,
        receipts::{CreateReceiptRequest, ProductInput},
        users::RegisterRequest,
    },
    entity::{receipt_items::QuantityUnit, receipts::PaymentType},
    error::AppError,
    middleware::auth::AuthUser,
    models::User,
    routes::params::ReceiptListQuery,
    services::{auth_service, receipt_service, user_service},
    state::AppState,
    token::TokenCodec,
};
use jsonwebtoken::Algorithm;
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, Statement};

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn product(name: &str, price: &str, quantity: &str) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        price: d(price),
        quantity: d(quantity),
        quantity_unit: QuantityUnit::Pcs,
    }
}

// Integration flow: register -> login -> create receipts -> list/filter ->
// get -> render text -> ownership isolation -> delete.
#[tokio::test]
async fn receipt_lifecycle_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    // Register
    let alice = register(&state, "alice", "alice@example.com").await?;
    let bob = register(&state, "bob", "bob@example.com").await?;

    // Same email again fails with DuplicateUser.
    let dup = user_service::register_user(
        &state,
        RegisterRequest {
            username: "alice2".into(),
            email: "alice@example.com".into(),
            password: "secret".into(),
            full_name: "Alice Again".into(),
        },
    )
    .await;
    assert!(matches!(dup, Err(AppError::DuplicateUser(_))));

    // Login with the right password issues a verifiable token.
    let token = auth_service::login_user(
        &state,
        TokenRequest {
            username: "alice".into(),
            password: "secret".into(),
        },
    )
    .await?;
    assert_eq!(token.token_type, "bearer");
    assert_eq!(state.tokens.verify(&token.access_token)?, "alice");

    // Wrong password is rejected.
    let bad = auth_service::login_user(
        &state,
        TokenRequest {
            username: "alice".into(),
            password: "wrong".into(),
        },
    )
    .await;
    assert!(matches!(bad, Err(AppError::InvalidCredentials)));

    let auth_alice = auth_user(&alice);
    let auth_bob = auth_user(&bob);

    // Create: 2 x 50.00 paid with 100.00 cash leaves no change.
    let created = receipt_service::create_receipt(
        &state,
        &auth_alice,
        CreateReceiptRequest {
            shop_name: "Corner Shop".into(),
            payment_type: PaymentType::Cash,
            amount: d("100.00"),
            products: vec![product("Bread", "50.00", "2")],
        },
    )
    .await?;
    let created = created.data.unwrap();
    assert_eq!(created.receipt.total, d("100.00"));
    assert_eq!(created.receipt.change, d("0.00"));
    assert_eq!(created.items.len(), 1);
    assert_eq!(created.items[0].line_total, d("100.00"));
    let receipt_id = created.receipt.id;
    let first_created_at = created.receipt.created_at;

    // Underpaying in cash never creates a receipt.
    let short = receipt_service::create_receipt(
        &state,
        &auth_alice,
        CreateReceiptRequest {
            shop_name: "Corner Shop".into(),
            payment_type: PaymentType::Cash,
            amount: d("50.00"),
            products: vec![product("Wine", "50.00", "2")],
        },
    )
    .await;
    assert!(matches!(short, Err(AppError::InsufficientPayment)));

    // A second, cheaper receipt for the list filters.
    let cheap = receipt_service::create_receipt(
        &state,
        &auth_alice,
        CreateReceiptRequest {
            shop_name: "Kiosk".into(),
            payment_type: PaymentType::Cashless,
            amount: d("9.00"),
            products: vec![product("Coffee", "4.50", "2")],
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(cheap.receipt.change, d("0.00"));

    // List is ownership-scoped and newest first.
    let listed = receipt_service::list_receipts(&state, &auth_alice, ReceiptListQuery::default())
        .await?;
    let items = listed.data.unwrap().items;
    assert_eq!(items.len(), 2);
    assert!(items[0].created_at >= items[1].created_at);

    // min_total filter keeps only the expensive receipt.
    let filtered = receipt_service::list_receipts(
        &state,
        &auth_alice,
        ReceiptListQuery {
            min_total: Some(d("50.00")),
            ..Default::default()
        },
    )
    .await?;
    let filtered = filtered.data.unwrap().items;
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, receipt_id);

    // max_total filter keeps only the cheap receipt.
    let capped = receipt_service::list_receipts(
        &state,
        &auth_alice,
        ReceiptListQuery {
            max_total: Some(d("50.00")),
            ..Default::default()
        },
    )
    .await?;
    let capped = capped.data.unwrap().items;
    assert_eq!(capped.len(), 1);
    assert_eq!(capped[0].id, cheap.receipt.id);

    // An inclusive date window around the first receipt excludes the second,
    // which was created strictly later.
    let windowed = receipt_service::list_receipts(
        &state,
        &auth_alice,
        ReceiptListQuery {
            date_from: Some(first_created_at),
            date_to: Some(first_created_at),
            ..Default::default()
        },
    )
    .await?;
    let windowed = windowed.data.unwrap().items;
    assert_eq!(windowed.len(), 1);
    assert_eq!(windowed[0].id, receipt_id);

    // A window that ends before anything was created matches nothing.
    let empty = receipt_service::list_receipts(
        &state,
        &auth_alice,
        ReceiptListQuery {
            date_to: Some(first_created_at - chrono::Duration::days(1)),
            ..Default::default()
        },
    )
    .await?;
    assert!(empty.data.unwrap().items.is_empty());

    // payment_type filter keeps only the cashless one.
    let cashless_only = receipt_service::list_receipts(
        &state,
        &auth_alice,
        ReceiptListQuery {
            payment_type: Some(PaymentType::Cashless),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(cashless_only.data.unwrap().items.len(), 1);

    // Bob sees none of Alice's receipts in his list and cannot fetch,
    // render, or delete them directly.
    let bob_list = receipt_service::list_receipts(&state, &auth_bob, ReceiptListQuery::default())
        .await?;
    assert!(bob_list.data.unwrap().items.is_empty());
    assert!(matches!(
        receipt_service::get_receipt(&state, &auth_bob, receipt_id).await,
        Err(AppError::Forbidden)
    ));
    assert!(matches!(
        receipt_service::render_receipt(&state, &auth_bob, receipt_id).await,
        Err(AppError::Forbidden)
    ));
    assert!(matches!(
        receipt_service::delete_receipt(&state, &auth_bob, receipt_id).await,
        Err(AppError::Forbidden)
    ));

    // Owner gets the rendered document.
    let text = receipt_service::render_receipt(&state, &auth_alice, receipt_id).await?;
    assert!(text.contains("Corner Shop"));
    assert!(text.contains("TOTAL"));
    assert!(text.contains("CHANGE"));

    // Delete cascades and the receipt is gone.
    receipt_service::delete_receipt(&state, &auth_alice, receipt_id).await?;
    assert!(matches!(
        receipt_service::get_receipt(&state, &auth_alice, receipt_id).await,
        Err(AppError::NotFound)
    ));

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE receipt_items, receipts, audit_logs, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState {
        pool,
        orm,
        tokens: TokenCodec::new("test-secret", Algorithm::HS256, 30),
    })
}

async fn register(state: &AppState, username: &str, email: &str) -> anyhow::Result<User> {
    let resp = user_service::register_user(
        state,
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "secret".into(),
            full_name: format!("{username} Example"),
        },
    )
    .await?;
    Ok(resp.data.unwrap())
}

fn auth_user(user: &User) -> AuthUser {
    AuthUser {
        user_id: user.id,
        user: user.clone(),
    }
}

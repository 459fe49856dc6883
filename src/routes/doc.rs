use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{TokenRequest, TokenResponse},
        receipts::{CreateReceiptRequest, ProductInput, ReceiptList, ReceiptWithItems},
        users::RegisterRequest,
    },
    entity::{receipt_items::QuantityUnit, receipts::PaymentType},
    models::{Receipt, ReceiptItem, User},
    response::{ApiResponse, Meta},
    routes::{auth, health, params, receipts, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::token,
        users::register,
        users::me,
        receipts::create_receipt,
        receipts::list_receipts,
        receipts::get_receipt,
        receipts::receipt_text,
        receipts::delete_receipt
    ),
    components(
        schemas(
            User,
            Receipt,
            ReceiptItem,
            PaymentType,
            QuantityUnit,
            RegisterRequest,
            TokenRequest,
            TokenResponse,
            CreateReceiptRequest,
            ProductInput,
            ReceiptList,
            ReceiptWithItems,
            params::ReceiptListQuery,
            Meta,
            ApiResponse<User>,
            ApiResponse<ReceiptList>,
            ApiResponse<ReceiptWithItems>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Token issuance"),
        (name = "Users", description = "User registration and profile"),
        (name = "Receipts", description = "Receipt endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

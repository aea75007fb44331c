//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, health, inventory, loans, students, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Escuela API",
        version = "1.0.0",
        description = "School administration REST API: students, inventory and loans"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::register,
        // Users
        users::list_users,
        users::profile,
        users::get_user,
        users::update_user,
        users::delete_user,
        // Students
        students::list_students,
        students::search_students,
        students::get_student,
        students::create_student,
        students::update_student,
        students::delete_student,
        // Inventory
        inventory::list_items,
        inventory::search_items,
        inventory::get_item,
        inventory::create_item,
        inventory::update_item,
        inventory::adjust_quantity,
        inventory::delete_item,
        // Loans
        loans::list_loans,
        loans::list_active_loans,
        loans::list_student_loans,
        loans::list_item_loans,
        loans::get_loan,
        loans::create_loan,
        loans::return_loan,
        loans::get_statistics,
    ),
    components(
        schemas(
            // Auth
            auth::LoginResponse,
            auth::RegisterResponse,
            crate::models::user::LoginRequest,
            crate::models::user::RegisterRequest,
            // Users
            crate::models::user::UserInfo,
            crate::models::user::UserClaims,
            crate::models::user::UpdateUser,
            // Students
            crate::models::student::Student,
            crate::models::student::StudentInput,
            // Inventory
            crate::models::inventory::InventoryItem,
            crate::models::inventory::InventoryItemInput,
            crate::models::inventory::QuantityOperation,
            crate::models::inventory::AdjustQuantity,
            crate::models::inventory::QuantityResponse,
            // Loans
            loans::LoanResponse,
            loans::ReturnResponse,
            crate::models::loan::LoanStatus,
            crate::models::loan::Loan,
            crate::models::loan::LoanDetails,
            crate::models::loan::CreateLoan,
            crate::models::loan::TopItem,
            crate::models::loan::LoanStatistics,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "Administrative user management"),
        (name = "students", description = "Student records"),
        (name = "inventory", description = "Lendable inventory"),
        (name = "loans", description = "Loan management and statistics")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by secured paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
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
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

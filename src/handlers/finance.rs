// src/handlers/finance.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PastorOrLeader, RequireRole},
        tenancy::TenantContext,
    },
    models::finance::{
        AccountPayload, CategoryPayload, ContactPayload, CostCenter, CostCenterPayload,
        FinancialAccount, FinancialCategory, FinancialContact, FinancialTransaction,
        TransactionFilters, TransactionPayload,
    },
};

// =============================================================================
//  CONTAS
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/finance/accounts",
    tag = "Finance",
    responses((status = 200, description = "Contas", body = Vec<FinancialAccount>)),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn list_accounts(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let accounts = app_state
        .finance_repo
        .list_accounts(tenant.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(accounts)))
}

#[utoipa::path(
    post,
    path = "/api/finance/accounts",
    tag = "Finance",
    request_body = AccountPayload,
    responses((status = 201, description = "Conta criada", body = FinancialAccount)),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn create_account(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Json(payload): Json<AccountPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let account = app_state
        .finance_repo
        .create_account(tenant.0, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(account)))
}

#[utoipa::path(
    put,
    path = "/api/finance/accounts/{id}",
    tag = "Finance",
    request_body = AccountPayload,
    responses((status = 200, description = "Conta atualizada", body = FinancialAccount)),
    params(
        ("id" = Uuid, Path, description = "ID da conta"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_account(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<AccountPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let account = app_state
        .finance_repo
        .update_account(tenant.0, account_id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(account)))
}

#[utoipa::path(
    delete,
    path = "/api/finance/accounts/{id}",
    tag = "Finance",
    responses((status = 204, description = "Conta removida")),
    params(
        ("id" = Uuid, Path, description = "ID da conta"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_account(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path(account_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .finance_repo
        .delete_account(tenant.0, account_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  CATEGORIAS
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/finance/categories",
    tag = "Finance",
    responses((status = 200, description = "Categorias", body = Vec<FinancialCategory>)),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let categories = app_state
        .finance_repo
        .list_categories(tenant.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(categories)))
}

#[utoipa::path(
    post,
    path = "/api/finance/categories",
    tag = "Finance",
    request_body = CategoryPayload,
    responses((status = 201, description = "Categoria criada", body = FinancialCategory)),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let category = app_state
        .finance_repo
        .create_category(tenant.0, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    put,
    path = "/api/finance/categories/{id}",
    tag = "Finance",
    request_body = CategoryPayload,
    responses((status = 200, description = "Categoria atualizada", body = FinancialCategory)),
    params(
        ("id" = Uuid, Path, description = "ID da categoria"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_category(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let category = app_state
        .finance_repo
        .update_category(tenant.0, category_id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(category)))
}

#[utoipa::path(
    delete,
    path = "/api/finance/categories/{id}",
    tag = "Finance",
    responses((status = 204, description = "Categoria removida")),
    params(
        ("id" = Uuid, Path, description = "ID da categoria"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_category(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .finance_repo
        .delete_category(tenant.0, category_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  CONTATOS
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/finance/contacts",
    tag = "Finance",
    responses((status = 200, description = "Contatos", body = Vec<FinancialContact>)),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn list_contacts(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let contacts = app_state
        .finance_repo
        .list_contacts(tenant.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(contacts)))
}

#[utoipa::path(
    post,
    path = "/api/finance/contacts",
    tag = "Finance",
    request_body = ContactPayload,
    responses((status = 201, description = "Contato criado", body = FinancialContact)),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn create_contact(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Json(payload): Json<ContactPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let contact = app_state
        .finance_repo
        .create_contact(tenant.0, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(contact)))
}

#[utoipa::path(
    put,
    path = "/api/finance/contacts/{id}",
    tag = "Finance",
    request_body = ContactPayload,
    responses((status = 200, description = "Contato atualizado", body = FinancialContact)),
    params(
        ("id" = Uuid, Path, description = "ID do contato"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_contact(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path(contact_id): Path<Uuid>,
    Json(payload): Json<ContactPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let contact = app_state
        .finance_repo
        .update_contact(tenant.0, contact_id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(contact)))
}

#[utoipa::path(
    delete,
    path = "/api/finance/contacts/{id}",
    tag = "Finance",
    responses((status = 204, description = "Contato removido")),
    params(
        ("id" = Uuid, Path, description = "ID do contato"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_contact(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path(contact_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .finance_repo
        .delete_contact(tenant.0, contact_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  CENTROS DE CUSTO
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/finance/cost-centers",
    tag = "Finance",
    responses((status = 200, description = "Centros de custo", body = Vec<CostCenter>)),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn list_cost_centers(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let centers = app_state
        .finance_repo
        .list_cost_centers(tenant.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(centers)))
}

#[utoipa::path(
    post,
    path = "/api/finance/cost-centers",
    tag = "Finance",
    request_body = CostCenterPayload,
    responses((status = 201, description = "Centro de custo criado", body = CostCenter)),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn create_cost_center(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Json(payload): Json<CostCenterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let center = app_state
        .finance_repo
        .create_cost_center(tenant.0, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(center)))
}

#[utoipa::path(
    put,
    path = "/api/finance/cost-centers/{id}",
    tag = "Finance",
    request_body = CostCenterPayload,
    responses((status = 200, description = "Centro de custo atualizado", body = CostCenter)),
    params(
        ("id" = Uuid, Path, description = "ID do centro de custo"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_cost_center(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path(center_id): Path<Uuid>,
    Json(payload): Json<CostCenterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let center = app_state
        .finance_repo
        .update_cost_center(tenant.0, center_id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(center)))
}

#[utoipa::path(
    delete,
    path = "/api/finance/cost-centers/{id}",
    tag = "Finance",
    responses((status = 204, description = "Centro de custo removido")),
    params(
        ("id" = Uuid, Path, description = "ID do centro de custo"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_cost_center(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path(center_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .finance_repo
        .delete_cost_center(tenant.0, center_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  LANÇAMENTOS
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/finance/transactions",
    tag = "Finance",
    params(
        TransactionFilters,
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    responses((status = 200, description = "Lançamentos, mais recentes primeiro", body = Vec<FinancialTransaction>)),
    security(("api_jwt" = []))
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Query(filters): Query<TransactionFilters>,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = app_state
        .finance_repo
        .list_transactions(tenant.0, &filters)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(transactions)))
}

#[utoipa::path(
    post,
    path = "/api/finance/transactions",
    tag = "Finance",
    request_body = TransactionPayload,
    responses((status = 201, description = "Lançamento criado", body = FinancialTransaction)),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn create_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireRole<PastorOrLeader>,
    Json(payload): Json<TransactionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let transaction = app_state
        .finance_repo
        .create_transaction(tenant.0, user.id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

#[utoipa::path(
    put,
    path = "/api/finance/transactions/{id}",
    tag = "Finance",
    request_body = TransactionPayload,
    responses((status = 200, description = "Lançamento atualizado", body = FinancialTransaction)),
    params(
        ("id" = Uuid, Path, description = "ID do lançamento"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path(transaction_id): Path<Uuid>,
    Json(payload): Json<TransactionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let transaction = app_state
        .finance_repo
        .update_transaction(tenant.0, transaction_id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(transaction)))
}

#[utoipa::path(
    delete,
    path = "/api/finance/transactions/{id}",
    tag = "Finance",
    responses((status = 204, description = "Lançamento removido")),
    params(
        ("id" = Uuid, Path, description = "ID do lançamento"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path(transaction_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .finance_repo
        .delete_transaction(tenant.0, transaction_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

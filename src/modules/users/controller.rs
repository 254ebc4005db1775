use anyhow::{Context as _, anyhow};
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::Response;
use sales_auth::Claims;
use sales_core::validate::check_id;
use sales_core::{RequestError, ShutdownError};
use sales_web::{Context, basic_auth, decode, params, respond};

use super::model::{NewUser, TokenResponse, UpdateUser};
use super::store::StoreError;
use crate::state::AppState;

/// Maps a store failure onto the error taxonomy. Anything unexpected stays
/// an unclassified 500.
fn store_error(err: StoreError) -> anyhow::Error {
    match err {
        StoreError::NotFound => RequestError::not_found(err).into(),
        StoreError::AuthenticationFailure => RequestError::unauthorized(err).into(),
        StoreError::Forbidden => RequestError::forbidden(err).into(),
        StoreError::InvalidId => RequestError::bad_request(err).into(),
        StoreError::Duplicate(_) => RequestError::conflict(err).into(),
        StoreError::Internal(err) => err,
    }
}

/// Claims attached by the authenticate middleware. Reaching a handler
/// without them means the route was registered without it.
fn claims(ctx: &Context) -> Result<&Claims, ShutdownError> {
    ctx.claims()
        .ok_or_else(|| ShutdownError::new("claims missing from context"))
}

fn parse_positive(name: &str, value: &str) -> Result<usize, RequestError> {
    value
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| RequestError::bad_request(anyhow!("invalid {name} format: {value}")))
}

/// GET /v1/users/token
pub async fn token(state: AppState, ctx: Context, req: Request) -> anyhow::Result<Response> {
    let now = ctx.values()?.now;

    let (email, password) = basic_auth(req.headers()).ok_or_else(|| {
        RequestError::unauthorized(anyhow!("must provide email and password in Basic auth"))
    })?;

    let claims = state
        .store
        .authenticate(&email, &password, now)
        .await
        .map_err(store_error)?;

    let token = state.authority.issue(&claims).context("generating token")?;

    respond(&ctx, &TokenResponse { token }, StatusCode::OK)
}

/// GET /v1/users/{page}/{rows}
pub async fn query(state: AppState, ctx: Context, mut req: Request) -> anyhow::Result<Response> {
    let params = params(&mut req).await?;
    let page = parse_positive("page", params.require("page")?)?;
    let rows = parse_positive("rows", params.require("rows")?)?;

    let users = state.store.query(page, rows).await.map_err(store_error)?;

    respond(&ctx, &users, StatusCode::OK)
}

/// GET /v1/users/{id}
pub async fn query_by_id(state: AppState, ctx: Context, mut req: Request) -> anyhow::Result<Response> {
    let claims = claims(&ctx)?;
    let params = params(&mut req).await?;
    let id = params.require("id")?;
    check_id(id).map_err(RequestError::bad_request)?;

    let user = state
        .store
        .query_by_id(claims, id)
        .await
        .map_err(store_error)?;

    respond(&ctx, &user, StatusCode::OK)
}

/// POST /v1/users
pub async fn create(state: AppState, ctx: Context, req: Request) -> anyhow::Result<Response> {
    let now = ctx.values()?.now;
    let new: NewUser = decode(req).await?;

    let user = state.store.create(new, now).await.map_err(store_error)?;

    respond(&ctx, &user, StatusCode::CREATED)
}

/// PUT /v1/users/{id}
pub async fn update(state: AppState, ctx: Context, mut req: Request) -> anyhow::Result<Response> {
    let now = ctx.values()?.now;
    let claims = claims(&ctx)?;
    let id = params(&mut req).await?.require("id")?.to_string();
    check_id(&id).map_err(RequestError::bad_request)?;

    let update: UpdateUser = decode(req).await?;
    state
        .store
        .update(claims, &id, update, now)
        .await
        .map_err(store_error)
        .with_context(|| format!("updating user {id}"))?;

    respond(&ctx, &(), StatusCode::NO_CONTENT)
}

/// DELETE /v1/users/{id}
pub async fn delete(state: AppState, ctx: Context, mut req: Request) -> anyhow::Result<Response> {
    let claims = claims(&ctx)?;
    let id = params(&mut req).await?.require("id")?.to_string();
    check_id(&id).map_err(RequestError::bad_request)?;

    state
        .store
        .delete(claims, &id)
        .await
        .map_err(store_error)
        .with_context(|| format!("deleting user {id}"))?;

    respond(&ctx, &(), StatusCode::NO_CONTENT)
}

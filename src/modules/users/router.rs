use axum::routing::MethodFilter;
use sales_auth::Role;
use sales_web::App;

use super::controller;
use crate::middleware::{authenticate, authorize};
use crate::state::AppState;

pub fn register(app: &mut App, state: &AppState) {
    let authn = || authenticate(state.authority.clone());
    let admin = || vec![authn(), authorize(&[Role::Admin])];

    app.handle(
        MethodFilter::GET,
        "v1",
        "/users/token",
        state.handler(controller::token),
        vec![],
    );
    app.handle(
        MethodFilter::GET,
        "v1",
        "/users/{page}/{rows}",
        state.handler(controller::query),
        admin(),
    );
    app.handle(
        MethodFilter::GET,
        "v1",
        "/users/{id}",
        state.handler(controller::query_by_id),
        vec![authn()],
    );
    app.handle(
        MethodFilter::POST,
        "v1",
        "/users",
        state.handler(controller::create),
        admin(),
    );
    app.handle(
        MethodFilter::PUT,
        "v1",
        "/users/{id}",
        state.handler(controller::update),
        vec![authn()],
    );
    app.handle(
        MethodFilter::DELETE,
        "v1",
        "/users/{id}",
        state.handler(controller::delete),
        vec![authn()],
    );
}

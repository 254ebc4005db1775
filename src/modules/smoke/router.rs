use axum::routing::MethodFilter;
use sales_auth::Role;
use sales_web::{App, Handler};

use super::controller;
use crate::middleware::{authenticate, authorize};
use crate::state::AppState;

pub fn register(app: &mut App, state: &AppState) {
    app.handle(
        MethodFilter::GET,
        "v1",
        "/test",
        Handler::new(controller::status),
        vec![],
    );
    app.handle(
        MethodFilter::GET,
        "v1",
        "/testauth",
        Handler::new(controller::status),
        vec![authenticate(state.authority.clone()), authorize(&[Role::Admin])],
    );
}

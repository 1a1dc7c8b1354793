use axum::{
    handler::Handler,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};

use crate::{
    auth::{
        middleware::{require_auth, require_role},
        Role, RoleGuard,
    },
    handlers::{articles, auth, users},
    AppState,
};

pub fn router(state: AppState) -> Router {
    let authenticated = from_fn_with_state(state.tokens.clone(), require_auth);
    let staff_only = from_fn_with_state(RoleGuard::new(Role::STAFF), require_role);
    let admin_only = from_fn_with_state(RoleGuard::new([Role::Admin]), require_role);

    let staff = Router::new()
        .route("/articles", get(articles::list_all).post(articles::create))
        .route(
            "/articles/:id",
            put(articles::update).delete(articles::delete.layer(admin_only.clone())),
        )
        .route("/articles/:id/publish", post(articles::publish))
        .route("/articles/:id/unpublish", post(articles::unpublish))
        .route_layer(staff_only);

    let admin = Router::new()
        .route("/users", get(users::list))
        .route("/users/:id/role", put(users::set_role))
        .route_layer(admin_only);

    let admin_api = staff.merge(admin).route_layer(authenticated.clone());

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me).route_layer(authenticated))
        .route("/api/articles", get(articles::list_published))
        .route("/api/articles/:id", get(articles::read_published))
        .nest("/api/admin", admin_api)
        .with_state(state)
}

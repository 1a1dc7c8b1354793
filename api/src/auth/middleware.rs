//! Request guards for the auth pipeline.
//!
//! Each guard is a plain function returning `Result<_, AuthRejection>`; the
//! axum middlewares below only thread that result through the request:
//!
//! 1. [`require_auth`] reads `Authorization: Bearer <token>`, validates it and
//!    stores the [`Identity`] in the request extensions.
//! 2. [`require_role`] checks that identity against a [`RoleGuard`].
//! 3. Handlers read the identity back with the [`CurrentUser`] extractor.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{Identity, Role, TokenService};
use crate::error::AuthRejection;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<Identity, AuthRejection> {
    let token = bearer_token(headers).ok_or(AuthRejection::MissingCredential)?;
    tokens
        .validate(token)
        .ok_or(AuthRejection::InvalidOrExpiredToken)
}

pub async fn require_auth(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Response {
    match authenticate(req.headers(), &tokens) {
        Ok(identity) => {
            tracing::debug!(user_id = %identity.id, role = %identity.role, "authenticated");
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(rejection) => {
            tracing::info!(path = %req.uri().path(), reason = %rejection, "request rejected");
            rejection.into_response()
        }
    }
}

/// The set of roles allowed past a route group.
#[derive(Debug, Clone)]
pub struct RoleGuard {
    permitted: Arc<[Role]>,
}

impl RoleGuard {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            permitted: roles.into_iter().collect(),
        }
    }

    pub fn permits(&self, role: Role) -> bool {
        self.permitted.contains(&role)
    }

    pub fn check<'a>(&self, identity: Option<&'a Identity>) -> Result<&'a Identity, AuthRejection> {
        let identity = identity.ok_or(AuthRejection::MissingCredential)?;
        if self.permits(identity.role) {
            Ok(identity)
        } else {
            Err(AuthRejection::InsufficientRole)
        }
    }
}

pub async fn require_role(State(guard): State<RoleGuard>, req: Request, next: Next) -> Response {
    if let Err(rejection) = guard.check(req.extensions().get::<Identity>()) {
        tracing::info!(path = %req.uri().path(), reason = %rejection, "request rejected");
        return rejection.into_response();
    }
    next.run(req).await
}

/// The identity attached by [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AuthRejection::MissingCredential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use axum::{body::Body, http::StatusCode, middleware::from_fn_with_state, routing::get, Router};
    use tower::{ServiceBuilder, ServiceExt};

    fn tokens() -> Arc<TokenService> {
        Arc::new(TokenService::new(&JwtConfig::new("test_secret_key").unwrap()))
    }

    fn identity(role: Role) -> Identity {
        Identity {
            id: "u1".into(),
            email: "a@b.com".into(),
            role,
        }
    }

    fn app(tokens: Arc<TokenService>, guard: RoleGuard) -> Router {
        Router::new()
            .route(
                "/protected",
                get(|CurrentUser(user): CurrentUser| async move { user.email }),
            )
            .layer(
                ServiceBuilder::new()
                    .layer(from_fn_with_state(tokens, require_auth))
                    .layer(from_fn_with_state(guard, require_role)),
            )
    }

    async fn call(app: Router, auth: Option<String>) -> (StatusCode, String) {
        let mut builder = axum::http::Request::builder().uri("/protected");
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        let res = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[test]
    fn bearer_prefix_is_required() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);
        headers.insert(AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
        headers.insert(AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
        headers.insert(AUTHORIZATION, "Bearer abc.def".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }

    #[test]
    fn authenticate_states() {
        let tokens = tokens();
        let mut headers = HeaderMap::new();
        assert_eq!(
            authenticate(&headers, &tokens),
            Err(AuthRejection::MissingCredential)
        );

        headers.insert(AUTHORIZATION, "Bearer garbage".parse().unwrap());
        assert_eq!(
            authenticate(&headers, &tokens),
            Err(AuthRejection::InvalidOrExpiredToken)
        );

        let token = tokens.issue(&identity(Role::Editor)).unwrap();
        headers.insert(AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
        assert_eq!(authenticate(&headers, &tokens), Ok(identity(Role::Editor)));
    }

    #[test]
    fn guard_checks() {
        let guard = RoleGuard::new([Role::Admin, Role::Editor]);
        assert_eq!(guard.check(None), Err(AuthRejection::MissingCredential));

        let reader = identity(Role::Reader);
        assert_eq!(
            guard.check(Some(&reader)),
            Err(AuthRejection::InsufficientRole)
        );

        let admin = identity(Role::Admin);
        assert_eq!(guard.check(Some(&admin)), Ok(&admin));
    }

    #[tokio::test]
    async fn missing_header_is_401() {
        let (status, body) = call(app(tokens(), RoleGuard::new(Role::STAFF)), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"error":"Authentication required"}"#);
    }

    #[tokio::test]
    async fn garbage_token_is_403() {
        let (status, body) = call(
            app(tokens(), RoleGuard::new(Role::STAFF)),
            Some("Bearer eyJhbGciOiJIUzI1NiJ9.e30.c2ln".into()),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, r#"{"error":"Invalid or expired token"}"#);
    }

    #[tokio::test]
    async fn guard_reconfiguration_changes_outcome() {
        let tokens = tokens();
        let token = tokens.issue(&identity(Role::Admin)).unwrap();

        let (status, body) = call(
            app(tokens.clone(), RoleGuard::new([Role::Admin, Role::Editor])),
            Some(format!("Bearer {token}")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "a@b.com");

        let (status, body) = call(
            app(tokens, RoleGuard::new([Role::Editor])),
            Some(format!("Bearer {token}")),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, r#"{"error":"Insufficient permissions"}"#);
    }

    #[tokio::test]
    async fn guard_without_auth_layer_is_401() {
        let app = Router::new()
            .route("/protected", get(|| async { "ok" }))
            .layer(from_fn_with_state(RoleGuard::new(Role::STAFF), require_role));
        let (status, _) = call(app, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

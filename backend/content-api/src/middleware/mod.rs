/// HTTP middleware for content-api
///
/// The bearer-credential gate. Validates the token from the Authorization
/// header or the `access_token` cookie, resolves it to a user's public
/// profile, and stores that identity in the request extensions where the
/// `CurrentUser` extractor hands it to handlers as an explicit value.
///
/// Every gate failure is a 401 in the standard error envelope. The message
/// distinguishes missing / invalid / unknown-subject credentials; the
/// status deliberately does not.
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use auth_core::JwtKeys;
use futures::future::LocalBoxFuture;
use sqlx::PgPool;
use std::future::{ready, Ready};
use std::rc::Rc;
use uuid::Uuid;

use crate::db::user_repo;
use crate::error::AppError;
use crate::models::UserProfile;

/// Resolved identity stored in request extensions after the gate.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserProfile);

impl CurrentUser {
    pub fn id(&self) -> Uuid {
        self.0.id
    }
}

/// Pull the bearer credential out of a request: `Authorization: Bearer`
/// header first, `access_token` cookie as the fallback.
fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let header_token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.to_string());

    header_token.or_else(|| {
        req.request()
            .cookie("access_token")
            .map(|c| c.value().to_string())
    })
}

/// Actix middleware that gates a scope behind bearer-credential auth.
pub struct JwtAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            // Owned copies first; extensions_mut() must not overlap any
            // other borrow of the request.
            let token = bearer_token(&req)
                .ok_or_else(|| AppError::Unauthorized("Missing bearer credential".to_string()))?;

            let keys = req
                .app_data::<web::Data<JwtKeys>>()
                .cloned()
                .ok_or_else(|| AppError::Internal("JWT keys not configured".to_string()))?;

            let pool = req
                .app_data::<web::Data<PgPool>>()
                .cloned()
                .ok_or_else(|| AppError::Internal("Database pool not configured".to_string()))?;

            // Surface the verifier's own message (expired vs malformed etc.)
            let token_data = keys
                .validate_token(&token)
                .map_err(|e| AppError::Unauthorized(e.to_string()))?;

            let user_id = Uuid::parse_str(&token_data.claims.sub)
                .map_err(|_| AppError::Unauthorized("Invalid credential subject".to_string()))?;

            let profile = user_repo::find_profile_by_id(&pool, user_id)
                .await
                .map_err(AppError::Database)?
                .ok_or_else(|| AppError::Unauthorized("Invalid access credential".to_string()))?;

            req.extensions_mut().insert(CurrentUser(profile));

            service.call(req).await
        })
    }
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<CurrentUser>()
                .cloned()
                .ok_or_else(|| {
                    AppError::Unauthorized("Identity missing from request".to_string()).into()
                }),
        )
    }
}

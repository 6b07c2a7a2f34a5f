use crate::database::DbPool;
use crate::error::AppError;
use crate::models::Profile;
use crate::utils::JwtService;
use actix_web::http::Method;
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::rc::Rc;

/// Verified token identity, present on every authenticated request.
#[derive(Debug, Clone)]
pub struct AuthIdentity {
    pub subject: String,
    pub email: Option<String>,
}

/// The role-tagged profile resolved from the identity. Absent until the
/// account has registered a profile.
#[derive(Debug, Clone)]
pub struct CurrentProfile(pub Profile);

impl FromRequest for AuthIdentity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthIdentity>()
                .cloned()
                .ok_or_else(|| AppError::AuthError("Missing access token".to_string()).into()),
        )
    }
}

impl FromRequest for CurrentProfile {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<CurrentProfile>()
                .cloned()
                .ok_or_else(|| {
                    AppError::AuthError("No profile registered for this account".to_string()).into()
                }),
        )
    }
}

struct PublicPaths {
    exact_paths: Vec<&'static str>,
    prefix_paths: Vec<&'static str>,
}

impl PublicPaths {
    fn new() -> Self {
        Self {
            exact_paths: vec!["/health", "/swagger-ui", "/api-docs/openapi.json"],
            prefix_paths: vec!["/swagger-ui/", "/api-docs/", "/webhook/"],
        }
    }

    fn is_public_path(&self, path: &str) -> bool {
        if self.exact_paths.contains(&path) {
            return true;
        }
        self.prefix_paths
            .iter()
            .any(|&prefix| path.starts_with(prefix))
    }
}

/// Verifies the bearer token and resolves it to a profile row, storing both
/// the identity and the profile (when one exists) in request extensions.
pub struct AuthMiddleware {
    jwt_service: JwtService,
    pool: DbPool,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService, pool: DbPool) -> Self {
        Self { jwt_service, pool }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            jwt_service: self.jwt_service.clone(),
            pool: self.pool.clone(),
            public_paths: PublicPaths::new(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    jwt_service: JwtService,
    pool: DbPool,
    public_paths: PublicPaths,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
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
        // let CORS preflights through
        if req.method() == Method::OPTIONS {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        if self.public_paths.is_public_path(req.path()) {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let token = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|t| t.to_string());

        let Some(token) = token else {
            let error = AppError::AuthError("Missing access token".to_string());
            return Box::pin(async move { Err(error.into()) });
        };

        let claims = match self.jwt_service.verify_token(&token) {
            Ok(claims) => claims,
            Err(_) => {
                let error = AppError::AuthError("Invalid access token".to_string());
                return Box::pin(async move { Err(error.into()) });
            }
        };

        let service = Rc::clone(&self.service);
        let pool = self.pool.clone();

        Box::pin(async move {
            let profile = sqlx::query_as::<_, Profile>(
                "SELECT id, auth_subject, role, studio_id, display_name, email, phone, \
                 created_at, updated_at FROM profiles WHERE auth_subject = $1",
            )
            .bind(&claims.sub)
            .fetch_optional(&pool)
            .await
            .map_err(AppError::DatabaseError)?;

            req.extensions_mut().insert(AuthIdentity {
                subject: claims.sub,
                email: claims.email,
            });
            if let Some(profile) = profile {
                req.extensions_mut().insert(CurrentProfile(profile));
            }

            service.call(req).await
        })
    }
}

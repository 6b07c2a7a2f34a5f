use crate::error::AppError;
use crate::middlewares::auth::CurrentProfile;
use crate::models::Role;
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

const STAFF: &[Role] = &[Role::Instructor, Role::Admin];
const DANCER: &[Role] = &[Role::Dancer];
const INSTRUCTOR: &[Role] = &[Role::Instructor];
const ADMIN: &[Role] = &[Role::Admin];

struct CapabilityRule {
    /// `None` matches every method
    method: Option<Method>,
    /// path relative to /api/v1; `{}` matches one segment, a trailing `/*`
    /// matches the path itself and everything below it
    pattern: &'static str,
    roles: &'static [Role],
}

fn rules() -> Vec<CapabilityRule> {
    use Method as M;
    let rule = |method: Option<Method>, pattern: &'static str, roles: &'static [Role]| {
        CapabilityRule {
            method,
            pattern,
            roles,
        }
    };
    vec![
        rule(None, "/students/*", STAFF),
        rule(Some(M::POST), "/classes", STAFF),
        rule(Some(M::PUT), "/classes/{}", STAFF),
        rule(Some(M::DELETE), "/classes/{}", STAFF),
        rule(Some(M::GET), "/classes/{}/cost", STAFF),
        rule(Some(M::GET), "/classes/{}/enrollments", STAFF),
        rule(Some(M::POST), "/classes/{}/enroll", DANCER),
        rule(Some(M::POST), "/classes/{}/drop", DANCER),
        rule(None, "/notes/*", STAFF),
        rule(Some(M::POST), "/payments", STAFF),
        rule(Some(M::POST), "/lesson-packs", STAFF),
        rule(Some(M::PUT), "/lesson-packs/{}", STAFF),
        rule(Some(M::POST), "/lesson-packs/purchases", STAFF),
        rule(Some(M::POST), "/lesson-packs/{}/checkout", DANCER),
        rule(Some(M::POST), "/lesson-packs/purchases/{}/spend", DANCER),
        rule(Some(M::GET), "/lesson-packs/history", DANCER),
        rule(Some(M::GET), "/lesson-packs/students/{}/history", STAFF),
        rule(Some(M::POST), "/lesson-requests", DANCER),
        rule(Some(M::POST), "/lesson-requests/{}/accept", INSTRUCTOR),
        rule(Some(M::POST), "/lesson-requests/{}/decline", INSTRUCTOR),
        rule(Some(M::POST), "/lesson-requests/{}/complete", INSTRUCTOR),
        rule(Some(M::POST), "/waivers/templates", STAFF),
        rule(Some(M::PUT), "/waivers/templates/{}", STAFF),
        rule(Some(M::GET), "/waivers/templates/{}/signatures", STAFF),
        rule(Some(M::POST), "/waivers/sign", DANCER),
        rule(Some(M::PUT), "/studios/current", ADMIN),
        rule(Some(M::GET), "/studios/address-autocomplete", STAFF),
        rule(None, "/studios/inquiries/*", STAFF),
    ]
}

fn matches_pattern(pattern: &str, path: &str) -> bool {
    if let Some(prefix) = pattern.strip_suffix("/*") {
        let prefix_segments: Vec<&str> = prefix.split('/').filter(|s| !s.is_empty()).collect();
        let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if path_segments.len() < prefix_segments.len() {
            return false;
        }
        return prefix_segments
            .iter()
            .zip(path_segments.iter())
            .all(|(p, s)| p == s);
    }

    let pattern_segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if pattern_segments.len() != path_segments.len() {
        return false;
    }
    pattern_segments
        .iter()
        .zip(path_segments.iter())
        .all(|(p, s)| *p == "{}" || p == s)
}

/// Roles allowed on a route, or `None` when the route only requires a
/// signed-in profile.
fn required_roles(method: &Method, relative_path: &str) -> Option<&'static [Role]> {
    rules()
        .into_iter()
        .find(|rule| {
            rule.method.as_ref().is_none_or(|m| m == method)
                && matches_pattern(rule.pattern, relative_path)
        })
        .map(|rule| rule.roles)
}

/// Role matrix applied once at the app level. Routes not listed in the
/// matrix are available to any signed-in profile; handlers still scope the
/// data they return to the caller.
pub struct CapabilityGuard;

impl<S, B> Transform<S, ServiceRequest> for CapabilityGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CapabilityGuardService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CapabilityGuardService { service }))
    }
}

pub struct CapabilityGuardService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for CapabilityGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
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

        let Some(relative_path) = req.path().strip_prefix("/api/v1") else {
            let fut = self.service.call(req);
            return Box::pin(fut);
        };

        if let Some(allowed) = required_roles(req.method(), relative_path) {
            let role = req
                .extensions()
                .get::<CurrentProfile>()
                .map(|p| p.0.role);

            match role {
                Some(role) if allowed.contains(&role) => {}
                Some(role) => {
                    log::warn!(
                        "Role {role} denied for {} {}",
                        req.method(),
                        req.path()
                    );
                    let error = AppError::Forbidden;
                    return Box::pin(async move { Err(error.into()) });
                }
                None => {
                    let error =
                        AppError::AuthError("No profile registered for this account".to_string());
                    return Box::pin(async move { Err(error.into()) });
                }
            }
        }

        let fut = self.service.call(req);
        Box::pin(fut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_matching() {
        assert!(matches_pattern("/classes/{}/enroll", "/classes/42/enroll"));
        assert!(!matches_pattern("/classes/{}/enroll", "/classes/42/drop"));
        assert!(!matches_pattern("/classes/{}/enroll", "/classes/enroll"));
        assert!(matches_pattern("/students/*", "/students"));
        assert!(matches_pattern("/students/*", "/students/9"));
        assert!(matches_pattern("/students/*", "/students/9/anything/else"));
        assert!(!matches_pattern("/students/*", "/classes/9"));
    }

    #[test]
    fn test_required_roles() {
        let spend = required_roles(&Method::POST, "/lesson-packs/purchases/5/spend").unwrap();
        assert_eq!(spend, DANCER);

        let roster = required_roles(&Method::GET, "/students").unwrap();
        assert_eq!(roster, STAFF);

        let accept = required_roles(&Method::POST, "/lesson-requests/3/accept").unwrap();
        assert_eq!(accept, INSTRUCTOR);

        // class listing is open to any signed-in profile
        assert!(required_roles(&Method::GET, "/classes").is_none());
        assert!(required_roles(&Method::GET, "/auth/me").is_none());
    }

    #[test]
    fn test_direct_purchase_is_staff_only() {
        let record = required_roles(&Method::POST, "/lesson-packs/purchases").unwrap();
        assert_eq!(record, STAFF);

        let checkout = required_roles(&Method::POST, "/lesson-packs/7/checkout").unwrap();
        assert_eq!(checkout, DANCER);
    }
}

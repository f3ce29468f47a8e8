use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::Header,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use futures::future::LocalBoxFuture;

use crate::{
    auth::{require_role, Claims, JwtService},
    errors::{AppError, AppResult},
    models::domain::UserRole,
};

/// Auth gate: verifies the bearer token, checks the role against `allowed`
/// and stores the decoded [`Claims`] in the request extensions.
#[derive(Clone, Copy)]
pub struct RequireRoles {
    allowed: &'static [UserRole],
}

impl RequireRoles {
    pub fn new(allowed: &'static [UserRole]) -> Self {
        Self { allowed }
    }

    pub fn any_role() -> Self {
        Self::new(UserRole::ALL)
    }

    pub fn staff() -> Self {
        Self::new(UserRole::STAFF)
    }

    pub fn student() -> Self {
        Self::new(UserRole::STUDENT)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRoles
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRolesService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRolesService {
            service: Rc::new(service),
            allowed: self.allowed,
        }))
    }
}

pub struct RequireRolesService<S> {
    service: Rc<S>,
    allowed: &'static [UserRole],
}

impl<S, B> Service<ServiceRequest> for RequireRolesService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let allowed = self.allowed;

        Box::pin(async move {
            let claims = match authenticate(&req, allowed) {
                Ok(claims) => claims,
                Err(err) => {
                    log::debug!("Rejected {} {}: {}", req.method(), req.path(), err);
                    return Ok(req.error_response(err).map_into_right_body());
                }
            };

            req.extensions_mut().insert(claims);

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

fn authenticate(req: &ServiceRequest, allowed: &[UserRole]) -> AppResult<Claims> {
    let jwt_service = req
        .app_data::<web::Data<JwtService>>()
        .ok_or_else(|| AppError::InternalError("JWT service not configured".to_string()))?;

    let token = Authorization::<Bearer>::parse(req)
        .map(|auth| auth.into_scheme().token().to_string())
        .map_err(|_| AppError::Unauthorized("No token, authorization denied".to_string()))?;

    let claims = jwt_service.validate_token(&token)?;
    require_role(&claims, allowed)?;

    Ok(claims)
}

// Extractor for authenticated user in handlers
pub struct AuthenticatedUser(pub Claims);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let claims = req
            .extensions()
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("No token, authorization denied".to_string()));

        ready(claims.map(AuthenticatedUser))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App, HttpResponse};
    use secrecy::SecretString;

    use crate::models::domain::User;

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.0.sub)
    }

    fn jwt_service() -> JwtService {
        JwtService::new(&SecretString::from("middleware_test_secret".to_string()), 1)
    }

    fn token_for(role: UserRole) -> String {
        let user = User::new("Test", "test@school.test", "hash".to_string(), role);
        jwt_service().create_token(&user).unwrap()
    }

    #[actix_rt::test]
    async fn test_staff_gate_rejects_students() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(jwt_service()))
                .service(
                    web::resource("/staff")
                        .wrap(RequireRoles::staff())
                        .route(web::get().to(whoami)),
                ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/staff")
            .insert_header(("Authorization", format!("Bearer {}", token_for(UserRole::Student))))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get()
            .uri("/staff")
            .insert_header(("Authorization", format!("Bearer {}", token_for(UserRole::Teacher))))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_rt::test]
    async fn test_missing_header_is_unauthorized() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(jwt_service()))
                .service(
                    web::resource("/any")
                        .wrap(RequireRoles::any_role())
                        .route(web::get().to(whoami)),
                ),
        )
        .await;

        let req = test::TestRequest::get().uri("/any").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_extractor_without_gate_is_unauthorized() {
        let app = test::init_service(App::new().route("/open", web::get().to(whoami))).await;

        let req = test::TestRequest::get().uri("/open").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}

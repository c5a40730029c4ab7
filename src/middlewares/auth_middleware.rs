//! JWT 인증 미들웨어
//!
//! ActixWeb 요청 파이프라인에서 베어러 토큰을 검증하고, 인증된 계정을
//! 요청 확장에 넣습니다. 핸들러는 [`AuthenticatedAccount`](crate::domain::models::auth::AuthenticatedAccount)
//! 인자로 꺼내 씁니다.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
};
pub use crate::middlewares::auth_inner::{AuthGate, GateComponents};
use crate::middlewares::auth_inner::AuthMiddlewareService;

/// 인증 게이트 미들웨어
///
/// ```rust,ignore
/// web::scope("/admin").wrap(AuthMiddleware::administrator())
/// ```
pub struct AuthMiddleware {
    gate: AuthGate,
    components: Option<GateComponents>,
}

impl AuthMiddleware {
    pub fn new(gate: AuthGate) -> Self {
        Self {
            gate,
            components: None,
        }
    }

    /// 유효한 토큰이 필요한 경로
    pub fn required() -> Self {
        Self::new(AuthGate::Login)
    }

    /// 관리자 계정만 접근 가능한 경로
    pub fn administrator() -> Self {
        Self::new(AuthGate::Administrator)
    }

    /// 토큰 발급기와 계정 조회기를 직접 지정합니다.
    ///
    /// 지정하지 않으면 워커 생성 시 `ServiceLocator`에서 가져옵니다.
    pub fn with_components(mut self, components: GateComponents) -> Self {
        self.components = Some(components);
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        let components = self
            .components
            .clone()
            .unwrap_or_else(GateComponents::from_locator);

        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            gate: self.gate,
            components,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};
    use crate::config::JwtConfig;
    use crate::domain::entities::AccountRole;
    use crate::domain::models::auth::AuthenticatedAccount;
    use crate::core::errors::INTERNAL_ERROR_MESSAGE;
    use crate::services::auth::authorization::tests::{InMemoryAccounts, UnavailableStore};
    use crate::services::auth::TokenAuthority;

    fn components() -> GateComponents {
        let authority = TokenAuthority::new(&JwtConfig {
            secret: "gate-secret".to_string(),
            expiration_seconds: 3600,
        });
        let accounts = InMemoryAccounts::default()
            .with("admin-1", AccountRole::Administrator)
            .with("patient-1", AccountRole::Patient);

        GateComponents {
            authority: Arc::new(authority),
            lookup: Arc::new(accounts),
        }
    }

    fn bearer_for(components: &GateComponents, account_id: &str) -> String {
        let token = components.authority.issue_token(account_id, 60).unwrap();
        format!("Bearer {}", token)
    }

    async fn whoami(account: AuthenticatedAccount) -> HttpResponse {
        HttpResponse::Ok().body(account.account_id)
    }

    #[actix_web::test]
    async fn test_login_gate_requires_token() {
        let components = components();
        let app = test::init_service(
            App::new().service(
                web::scope("/me")
                    .wrap(AuthMiddleware::required().with_components(components.clone()))
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/me").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "unauthorized");

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", bearer_for(&components, "patient-1")))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "patient-1");
    }

    #[actix_web::test]
    async fn test_login_gate_hides_failure_cause() {
        let app = test::init_service(
            App::new().service(
                web::scope("/me")
                    .wrap(AuthMiddleware::required().with_components(components()))
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        for header in ["Token abc", "Bearer not.a.jwt"] {
            let req = test::TestRequest::get()
                .uri("/me")
                .insert_header(("Authorization", header))
                .to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

            let body: serde_json::Value = test::read_body_json(res).await;
            assert_eq!(body["error"], "unauthorized");
        }
    }

    #[actix_web::test]
    async fn test_administrator_gate() {
        let components = components();
        let app = test::init_service(
            App::new().service(
                web::scope("/admin")
                    .wrap(AuthMiddleware::administrator().with_components(components.clone()))
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let cases = [
            ("admin-1", StatusCode::OK),
            ("patient-1", StatusCode::FORBIDDEN),
            ("ghost-1", StatusCode::UNAUTHORIZED),
        ];

        for (account_id, expected) in cases {
            let req = test::TestRequest::get()
                .uri("/admin")
                .insert_header(("Authorization", bearer_for(&components, account_id)))
                .to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), expected, "account = {}", account_id);
        }
    }

    #[actix_web::test]
    async fn test_administrator_gate_hides_lookup_failure() {
        let authority = components().authority;
        let unavailable = GateComponents {
            authority: authority.clone(),
            lookup: Arc::new(UnavailableStore),
        };
        let app = test::init_service(
            App::new().service(
                web::scope("/admin")
                    .wrap(AuthMiddleware::administrator().with_components(unavailable.clone()))
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/admin")
            .insert_header(("Authorization", bearer_for(&unavailable, "admin-1")))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);
    }
}

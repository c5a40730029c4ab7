//! AuthMiddleware 인증 로직의 핵심적인 기능
use std::rc::Rc;
use std::sync::Arc;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{Error, HttpMessage, ResponseError};
use futures_util::future::LocalBoxFuture;
use log::{debug, warn};
use crate::core::errors::{AppError, UNAUTHORIZED_MESSAGE};
use crate::core::registry::ServiceLocator;
use crate::domain::models::auth::AuthenticatedAccount;
use crate::repositories::accounts::AccountRepository;
use crate::services::auth::{require_administrator, AccountLookup, AuthError, TokenAuthority};

/// 경로 그룹에 적용되는 인증 수준
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthGate {
    /// 유효한 토큰이면 통과
    Login,
    /// 유효한 토큰 + 저장된 계정 역할이 관리자
    Administrator,
}

/// 게이트가 사용하는 토큰 검증기와 계정 조회기
#[derive(Clone)]
pub struct GateComponents {
    pub authority: Arc<TokenAuthority>,
    pub lookup: Arc<dyn AccountLookup>,
}

impl GateComponents {
    /// `main`에서 등록한 토큰 발급기와 계정 리포지토리를 사용합니다.
    pub fn from_locator() -> Self {
        let lookup: Arc<dyn AccountLookup> = AccountRepository::instance();
        Self {
            authority: ServiceLocator::get::<TokenAuthority>(),
            lookup,
        }
    }
}

pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub gate: AuthGate,
    pub components: GateComponents,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let gate = self.gate;
        let components = self.components.clone();

        Box::pin(async move {
            let outcome = match authorization_header(&req) {
                Ok(header) => pass_gate(gate, &components, header.as_deref()).await,
                Err(err) => Err(AppError::from(err)),
            };

            match outcome {
                Ok(principal) => {
                    debug!("인증 성공: 계정 ID {} ({:?})", principal.account_id, gate);
                    req.extensions_mut().insert(principal);
                }
                Err(error) => {
                    let response = error.error_response();
                    let (req, _) = req.into_parts();
                    return Ok(ServiceResponse::new(req, response).map_into_right_body());
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// ASCII가 아닌 헤더 값은 형식 오류로 처리합니다.
fn authorization_header(req: &ServiceRequest) -> Result<Option<String>, AuthError> {
    match req.headers().get(AUTHORIZATION) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(|s| Some(s.to_string()))
            .map_err(|_| AuthError::MalformedHeader),
    }
}

/// 토큰 검증 후 게이트 수준에 따라 관리자 권한을 확인합니다.
///
/// - 토큰 검증 실패, 관리자 게이트에서 계정이 사라진 경우 → 401
/// - 관리자 게이트에서 관리자가 아닌 경우 → 403
pub(crate) async fn pass_gate(
    gate: AuthGate,
    components: &GateComponents,
    header: Option<&str>,
) -> Result<AuthenticatedAccount, AppError> {
    let claims = components.authority.verify_and_extract(header)?;
    let principal = AuthenticatedAccount::from(claims);

    if gate == AuthGate::Administrator {
        match require_administrator(components.lookup.as_ref(), &principal.account_id).await {
            Ok(()) => {}
            Err(AuthError::NotFound(account_id)) => {
                warn!("🔒 토큰 주체 계정 없음: {}", account_id);
                return Err(AppError::AuthenticationError(UNAUTHORIZED_MESSAGE.to_string()));
            }
            Err(err) => {
                warn!("⛔ 관리자 게이트 거부: {} ({})", principal.account_id, err);
                return Err(err.into());
            }
        }
    }

    Ok(principal)
}

//! 병원 백오피스 서비스 메인 애플리케이션
//!
//! 설정을 한 번 로드해 MongoDB 연결과 토큰 발급기를 만들고,
//! 싱글톤 서비스를 초기화한 뒤 Actix-web HTTP 서버를 구동합니다.

use std::io;
use std::sync::Arc;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{middleware, App, HttpServer};
use actix_governor::{Governor, GovernorConfigBuilder};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use hospital_backend::config::{AppConfig, CorsConfig};
use hospital_backend::core::registry::ServiceLocator;
use hospital_backend::db::Database;
use hospital_backend::repositories::accounts::AccountRepository;
use hospital_backend::repositories::appointments::AppointmentRepository;
use hospital_backend::repositories::doctors::DoctorRepository;
use hospital_backend::routes::configure_all_routes;
use hospital_backend::services::auth::TokenAuthority;

#[actix_web::main]
async fn main() -> io::Result<()> {
    load_env_file();
    init_logging();

    info!("🚀 병원 백오피스 서비스 시작중...");

    let config = AppConfig::from_env().map_err(startup_error)?;

    info!("📡 데이터베이스 연결 중...");
    let database = Database::connect(&config.database, &config.transaction)
        .await
        .map_err(startup_error)?;

    // ServiceLocator에 핵심 의존성 등록
    let config = Arc::new(config);
    ServiceLocator::set(config.clone());
    ServiceLocator::set(Arc::new(database));
    ServiceLocator::set(Arc::new(TokenAuthority::new(&config.jwt)));

    ServiceLocator::initialize_all()
        .await
        .map_err(|e| startup_error(format!("서비스 초기화 실패: {}", e)))?;

    create_indexes().await?;

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    start_http_server(config).await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// 요청 제한, CORS, 로깅, 경로 정규화 미들웨어를 적용합니다.
async fn start_http_server(config: Arc<AppConfig>) -> io::Result<()> {
    let bind_address = config.server.bind_address();

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);

    let rate_limit = &config.rate_limit;
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit.per_second)
        .burst_size(rate_limit.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| startup_error("Rate Limiting 설정 값은 0보다 커야 합니다"))?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit.per_second,
        rate_limit.burst_size
    );

    let cors_config = config.cors.clone();

    HttpServer::new(move || {
        App::new()
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors(&cors_config))
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_all_routes)
    })
        .bind(&bind_address)?
        .workers(config.server.workers)
        .run()
        .await
}

/// 리포지토리별 MongoDB 인덱스를 생성합니다.
async fn create_indexes() -> io::Result<()> {
    AccountRepository::instance().create_indexes().await.map_err(startup_error)?;
    DoctorRepository::instance().create_indexes().await.map_err(startup_error)?;
    AppointmentRepository::instance().create_indexes().await.map_err(startup_error)?;

    info!("📇 인덱스 생성 완료");
    Ok(())
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => {
            if let Err(e) = dotenv::from_filename(".env.prod") {
                eprintln!(".env.prod 파일 로드 실패: {}", e);
            }
        }
        "dev" => {
            if let Err(e) = dotenv::from_filename(".env.dev") {
                eprintln!(".env.dev 파일 로드 실패: {}", e);
            }
        }
        _ => {
            dotenv().ok();
        }
    }
}

/// `RUST_LOG`가 없으면 "info,actix_web=debug"를 사용합니다.
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// 허용 Origin은 설정에서, 메서드/헤더는 고정 목록을 사용합니다.
fn configure_cors(config: &CorsConfig) -> Cors {
    let cors = config
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin));

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .supports_credentials()
        .max_age(3600)
}

fn startup_error(e: impl ToString) -> io::Error {
    let message = e.to_string();
    error!("❌ 시작 실패: {}", message);
    io::Error::other(message)
}

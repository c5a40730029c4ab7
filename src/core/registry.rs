//! # Service Registry - 싱글톤 의존성 주입 시스템
//!
//! `singleton_macro`의 `#[service]`/`#[repository]` 매크로가 생성하는 코드가
//! 의존하는 런타임 컨테이너입니다. 매크로는 다음을 이 모듈에서 찾습니다.
//!
//! - [`ServiceRegistration`], [`RepositoryRegistration`]: `inventory::submit!` 대상
//! - [`Service`], [`Repository`]: 매크로가 자동 구현하는 trait
//! - [`ServiceLocator::get`]: `Arc<T>` 필드 주입
//!
//! ## 동작 방식
//!
//! ```text
//! 1. 컴파일 타임
//!    ├─ #[repository(name = "doctor")] → RepositoryRegistration("doctor_repository")
//!    └─ #[service(name = "admin")]     → ServiceRegistration("admin_service")
//!
//! 2. 시작 시 (main)
//!    ├─ ServiceLocator::set(Arc<AppConfig>)
//!    ├─ ServiceLocator::set(Arc<Database>)
//!    ├─ ServiceLocator::set(Arc<TokenAuthority>)
//!    └─ ServiceLocator::initialize_all()  리포지토리 → 서비스 순서
//!
//! 3. 주입
//!    └─ Arc<DoctorRepository> 필드 → ServiceLocator::get::<DoctorRepository>()
//!         → 타입 이름 "DoctorRepository" → 키 "doctor" → 등록된 생성자 호출
//! ```
//!
//! 생성자는 인스턴스 맵의 잠금을 잡지 않은 상태에서 호출되므로,
//! 생성 중에 다른 의존성을 `get`으로 다시 조회해도 교착 상태가 생기지 않습니다.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use async_trait::async_trait;
use log::{debug, info};
use once_cell::sync::Lazy;

/// 비즈니스 로직 서비스 공통 인터페이스 (`#[service]`가 구현)
#[async_trait]
pub trait Service: Send + Sync {
    /// 레지스트리 키로 사용되는 서비스 이름
    fn name(&self) -> &str;

    /// 생성 직후 초기화 로직
    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// 데이터 액세스 리포지토리 공통 인터페이스 (`#[repository]`가 구현)
#[async_trait]
pub trait Repository: Send + Sync {
    /// 레지스트리 키로 사용되는 리포지토리 이름
    fn name(&self) -> &str;

    /// 연결된 MongoDB 컬렉션 이름
    fn collection_name(&self) -> &str;

    /// 생성 직후 초기화 로직
    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// `#[service]` 매크로가 제출하는 등록 정보
pub struct ServiceRegistration {
    /// 서비스 이름 (`admin_service` 형태)
    pub name: &'static str,
    /// 싱글톤 인스턴스를 `Box<Arc<T>>`로 돌려주는 생성 함수
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

/// `#[repository]` 매크로가 제출하는 등록 정보
pub struct RepositoryRegistration {
    /// 리포지토리 이름 (`doctor_repository` 형태)
    pub name: &'static str,
    /// 싱글톤 인스턴스를 `Box<Arc<T>>`로 돌려주는 생성 함수
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

inventory::collect!(ServiceRegistration);
inventory::collect!(RepositoryRegistration);

/// 정규화된 이름 → 서비스 등록 정보
static SERVICE_NAME_CACHE: Lazy<HashMap<String, &'static ServiceRegistration>> = Lazy::new(|| {
    let cache: HashMap<_, _> = inventory::iter::<ServiceRegistration>()
        .map(|registration| (extract_clean_name_static(registration.name), registration))
        .collect();

    debug!("🗂️ Service 이름 캐시 구성: {}개", cache.len());
    cache
});

/// 정규화된 이름 → 리포지토리 등록 정보
static REPOSITORY_NAME_CACHE: Lazy<HashMap<String, &'static RepositoryRegistration>> = Lazy::new(|| {
    let cache: HashMap<_, _> = inventory::iter::<RepositoryRegistration>()
        .map(|registration| (extract_clean_name_static(registration.name), registration))
        .collect();

    debug!("🗂️ Repository 이름 캐시 구성: {}개", cache.len());
    cache
});

/// `doctor_repository` → `doctor`, `admin_service` → `admin`
fn extract_clean_name_static(name: &str) -> String {
    name.strip_suffix("_service")
        .or_else(|| name.strip_suffix("_repository"))
        .unwrap_or(name)
        .to_string()
}

/// 등록된 컴포넌트의 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComponentKind {
    Repository,
    Service,
}

/// 타입 이름에서 컴포넌트 종류와 레지스트리 키를 추론합니다.
///
/// `AppointmentRepository` → `(Repository, "appointment")`
fn component_key(clean_type_name: &str) -> Option<(ComponentKind, String)> {
    if let Some(entity) = clean_type_name.strip_suffix("Repository") {
        return Some((ComponentKind::Repository, entity.to_lowercase()));
    }
    clean_type_name
        .strip_suffix("Service")
        .map(|entity| (ComponentKind::Service, entity.to_lowercase()))
}

/// 싱글톤 의존성 주입 컨테이너
pub struct ServiceLocator {
    /// `TypeId` → 생성된 인스턴스
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    /// 생성 중인 타입 (순환 참조 감지용)
    initializing: RwLock<HashSet<TypeId>>,
}

/// 생성이 끝나거나 패닉으로 풀릴 때 초기화 표시를 제거합니다.
struct InitializingMark(TypeId);

impl Drop for InitializingMark {
    fn drop(&mut self) {
        ServiceLocator::write_lock(&LOCATOR.initializing).remove(&self.0);
    }
}

impl ServiceLocator {
    fn new() -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
            initializing: RwLock::new(HashSet::new()),
        }
    }

    fn read_lock<V>(lock: &RwLock<V>) -> RwLockReadGuard<'_, V> {
        lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_lock<V>(lock: &RwLock<V>) -> RwLockWriteGuard<'_, V> {
        lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 이미 등록되었거나 생성된 인스턴스만 조회합니다.
    ///
    /// 생성자를 호출하지 않으므로 부트스트랩 순서 확인이나 테스트에 사용합니다.
    pub fn try_get<T: 'static + Send + Sync>() -> Option<Arc<T>> {
        Self::read_lock(&LOCATOR.instances)
            .get(&TypeId::of::<T>())
            .and_then(|instance| instance.clone().downcast::<T>().ok())
    }

    /// 지정된 타입의 싱글톤 인스턴스를 가져옵니다.
    ///
    /// 1. 캐시에 있으면 그대로 반환
    /// 2. 순환 참조 검사
    /// 3. 타입 이름(`XRepository`/`XService`)으로 등록 정보 검색
    /// 4. 잠금 없이 생성자 호출 후 캐시에 저장
    ///
    /// # Panics
    ///
    /// 의존성 배선 오류는 시작 시점에 드러나야 하므로 패닉으로 보고합니다.
    /// - 순환 참조 (`A → B → A`)
    /// - `#[service]`/`#[repository]`/`set`으로 등록되지 않은 타입
    /// - 등록 정보와 요청 타입 불일치
    pub fn get<T: 'static + Send + Sync>() -> Arc<T> {
        if let Some(instance) = Self::try_get::<T>() {
            return instance;
        }

        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        if !Self::write_lock(&LOCATOR.initializing).insert(type_id) {
            panic!("Circular dependency detected: {} is already being initialized", type_name);
        }
        let _mark = InitializingMark(type_id);

        let created = Self::construct::<T>(type_name);

        let mut instances = Self::write_lock(&LOCATOR.instances);
        let stored = instances
            .entry(type_id)
            .or_insert_with(|| created as Arc<dyn Any + Send + Sync>)
            .clone();

        match stored.downcast::<T>() {
            Ok(instance) => instance,
            Err(_) => panic!("Type mismatch in ServiceLocator for {}", type_name),
        }
    }

    /// 등록 정보를 찾아 생성자를 호출합니다.
    fn construct<T: 'static + Send + Sync>(type_name: &str) -> Arc<T> {
        let clean_type_name = Self::extract_clean_type_name(type_name);

        let (kind, key) = component_key(&clean_type_name).unwrap_or_else(|| {
            panic!(
                "Service not found: {}. Register it with #[service], #[repository] or ServiceLocator::set()",
                type_name
            )
        });

        let (registration_name, boxed) = match kind {
            ComponentKind::Repository => {
                let registration = REPOSITORY_NAME_CACHE
                    .get(&key)
                    .unwrap_or_else(|| panic!("No repository found for entity: {}", key));
                (registration.name, (registration.constructor)())
            }
            ComponentKind::Service => {
                let registration = SERVICE_NAME_CACHE
                    .get(&key)
                    .unwrap_or_else(|| panic!("No service found for entity: {}", key));
                (registration.name, (registration.constructor)())
            }
        };

        match boxed.downcast::<Arc<T>>() {
            Ok(instance) => {
                debug!("🔧 생성됨: {} ({})", clean_type_name, registration_name);
                *instance
            }
            Err(_) => panic!("Type mismatch for {:?}: {}", kind, registration_name),
        }
    }

    /// `hospital_backend::services::admin::AdminService` → `AdminService`
    fn extract_clean_type_name(type_name: &str) -> String {
        type_name
            .rsplit("::")
            .next()
            .unwrap_or(type_name)
            .to_string()
    }

    /// 매크로로 관리되지 않는 인프라 인스턴스를 직접 등록합니다.
    ///
    /// ```rust,ignore
    /// ServiceLocator::set(Arc::new(Database::connect(&config.database).await?));
    /// ServiceLocator::set(Arc::new(TokenAuthority::new(&config.jwt)));
    /// ```
    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        let clean_name = Self::extract_clean_type_name(std::any::type_name::<T>());
        info!("📦 등록: {}", clean_name);

        Self::write_lock(&LOCATOR.instances)
            .insert(TypeId::of::<T>(), instance as Arc<dyn Any + Send + Sync>);
    }

    /// 모든 리포지토리와 서비스를 미리 생성합니다.
    ///
    /// 리포지토리가 먼저 생성되어야 서비스의 `Arc<XRepository>` 필드가
    /// 이미 준비된 싱글톤을 주입받습니다.
    pub async fn initialize_all() -> Result<(), Box<dyn std::error::Error>> {
        info!("🔄 서비스 레지스트리 초기화 시작");

        let mut repo_count = 0;
        for registration in inventory::iter::<RepositoryRegistration>() {
            let _instance = (registration.constructor)();
            debug!("  ✓ {}", registration.name);
            repo_count += 1;
        }
        info!("🗄️ Repository {}개 생성 완료", repo_count);

        let mut service_count = 0;
        for registration in inventory::iter::<ServiceRegistration>() {
            let _instance = (registration.constructor)();
            debug!("  ✓ {}", registration.name);
            service_count += 1;
        }
        info!("⚙️ Service {}개 생성 완료", service_count);

        Ok(())
    }
}

/// 전역 서비스 로케이터 인스턴스
static LOCATOR: Lazy<ServiceLocator> = Lazy::new(ServiceLocator::new);

#[cfg(test)]
mod tests {
    use super::*;

    struct ProbeSettings {
        value: u32,
    }

    #[test]
    fn test_extract_clean_name() {
        assert_eq!(extract_clean_name_static("doctor_repository"), "doctor");
        assert_eq!(extract_clean_name_static("admin_service"), "admin");
        assert_eq!(extract_clean_name_static("plain"), "plain");
    }

    #[test]
    fn test_component_key_from_type_name() {
        assert_eq!(
            component_key("AppointmentRepository"),
            Some((ComponentKind::Repository, "appointment".to_string()))
        );
        assert_eq!(
            component_key("PatientService"),
            Some((ComponentKind::Service, "patient".to_string()))
        );
        assert_eq!(component_key("TokenAuthority"), None);
    }

    #[test]
    fn test_extract_clean_type_name() {
        assert_eq!(
            ServiceLocator::extract_clean_type_name("hospital_backend::services::admin::AdminService"),
            "AdminService"
        );
        assert_eq!(ServiceLocator::extract_clean_type_name("Database"), "Database");
    }

    #[test]
    fn test_set_then_get_returns_same_instance() {
        let settings = Arc::new(ProbeSettings { value: 7 });
        ServiceLocator::set(settings.clone());

        let fetched = ServiceLocator::get::<ProbeSettings>();
        assert!(Arc::ptr_eq(&settings, &fetched));
        assert_eq!(fetched.value, 7);
        assert!(ServiceLocator::try_get::<ProbeSettings>().is_some());
    }

    #[test]
    fn test_try_get_unregistered_is_none() {
        struct NeverRegistered;
        assert!(ServiceLocator::try_get::<NeverRegistered>().is_none());
    }
}

//! 认证状态管理模块
//!
//! 会话生命周期的唯一权威：启动恢复、登录、注册、登出、
//! 资料更新与密码操作都经过这里。状态通过 Leptos Signal
//! 暴露，路由守卫与页面组件只做订阅。

use leptos::prelude::*;

use julisha_shared::protocol::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, ProfileUpdate, RegisterRequest,
    UpdateFarmerProfileRequest, UpdateOfficerProfileRequest,
};
use julisha_shared::{Role, User};

use crate::api::{ApiClient, ApiError, send_with_stored_token};
use crate::config::ApiConfig;
use crate::session::SessionStore;
use crate::web::http::{HttpClient, WebHttpClient};
use crate::web::storage::{LocalStorage, StorageArea};
use crate::{log_info, log_warn};

// =========================================================
// 状态定义
// =========================================================

/// 认证状态机的三个对外状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// 启动读取尚未完成，真实状态未知
    Booting,
    /// 无有效会话
    Anonymous,
    /// 持有令牌 + 用户档案
    Authenticated,
}

/// 认证状态快照
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    /// 启动读取是否仍在进行；初始为 true，`init` 完成后永远为 false
    pub is_loading: bool,
    /// 会话代数。登出时递增，用于丢弃登出前发出的在途响应
    generation: u64,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            token: None,
            is_loading: true,
            generation: 0,
        }
    }
}

impl AuthState {
    /// 令牌与档案同时在场才算已认证
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn status(&self) -> AuthStatus {
        if self.is_loading {
            AuthStatus::Booting
        } else if self.is_authenticated() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Anonymous
        }
    }
}

/// 注册表单输入（界面层收集，提交前统一规范化）
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub role: String,
    pub region: String,
    pub preferred_language: String,
}

/// 电话号码规范化：去掉本地格式的前导 0
///
/// 服务端期望不带前导 0 的号码。
fn normalize_phone(phone: &str) -> String {
    phone.strip_prefix('0').unwrap_or(phone).to_string()
}

// =========================================================
// 认证服务
// =========================================================

/// 认证服务
///
/// 泛型于 HTTP 客户端与存储实现，测试时全部注入 Mock。
pub struct AuthService<C: HttpClient, S: StorageArea> {
    api: ApiClient<C>,
    store: SessionStore<S>,
    state: RwSignal<AuthState>,
}

impl<C: HttpClient + Clone, S: StorageArea + Clone> Clone for AuthService<C, S> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            store: self.store.clone(),
            state: self.state,
        }
    }
}

/// 生产环境的认证服务实例类型
pub type AppAuthService = AuthService<WebHttpClient, LocalStorage>;

impl AppAuthService {
    /// 创建浏览器环境的认证服务
    pub fn new_web(config: &ApiConfig) -> Self {
        Self::new(
            ApiClient::new(config, WebHttpClient),
            SessionStore::new(LocalStorage),
        )
    }
}

/// 从 Context 获取认证服务
pub fn use_auth() -> AppAuthService {
    use_context::<AppAuthService>()
        .expect("AuthService not found in context. Ensure App provides it.")
}

impl<C: HttpClient, S: StorageArea> AuthService<C, S> {
    pub fn new(api: ApiClient<C>, store: SessionStore<S>) -> Self {
        Self {
            api,
            store,
            state: RwSignal::new(AuthState::default()),
        }
    }

    /// 认证状态信号（页面组件订阅用）
    pub fn state(&self) -> RwSignal<AuthState> {
        self.state
    }

    /// 派生的状态机信号（路由守卫订阅用）
    pub fn status_signal(&self) -> Signal<AuthStatus> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.status()))
    }

    /// 当前会话代数快照
    fn generation(&self) -> u64 {
        self.state.with_untracked(|s| s.generation)
    }

    /// 该代数的会话是否仍然有效
    fn still_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    /// 建立会话：持久化后更新信号
    ///
    /// 若期间发生过登出（代数已变），响应按过期丢弃。
    fn establish_session(&self, generation: u64, token: String, user: User) {
        if !self.still_current(generation) {
            log_warn!("[Auth] discarding stale auth response from a previous session");
            return;
        }

        self.store.write(&token, &user);
        self.state.update(|s| {
            s.token = Some(token);
            s.user = Some(user);
            s.is_loading = false;
        });
    }

    // ---------------------------------------------------------
    // 生命周期操作
    // ---------------------------------------------------------

    /// 启动恢复：从存储读取会话
    ///
    /// 令牌与档案同时在场才恢复；只剩其中之一（半对）视为损坏
    /// 会话，清除后进入匿名态。存储内容被直接信任，不向服务端
    /// 校验令牌有效性。
    pub fn init(&self) {
        let session = self.store.read();

        match (session.token, session.user) {
            (Some(token), Some(user)) => {
                log_info!("[Auth] session restored for {}", user.email);
                self.state.update(|s| {
                    s.token = Some(token);
                    s.user = Some(user);
                    s.is_loading = false;
                });
            }
            (None, None) => {
                self.state.update(|s| s.is_loading = false);
            }
            _ => {
                log_warn!("[Auth] incomplete stored session, clearing");
                self.store.clear();
                self.state.update(|s| s.is_loading = false);
            }
        }
    }

    /// 登录
    ///
    /// 成功时持久化令牌与档案并切换到已认证态；服务端 2xx 但
    /// 缺少令牌或档案按失败处理，不留下半个会话。
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let generation = self.generation();
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self.api.send(&request).await?;

        match (response.token, response.user) {
            (Some(token), Some(user)) => {
                log_info!("[Auth] login ok for {}", user.email);
                self.establish_session(generation, token, user);
                Ok(())
            }
            _ => Err(ApiError::decode("Login failed")),
        }
    }

    /// 注册
    ///
    /// 成功后的会话处理与登录完全一致（令牌 + 档案都持久化）。
    pub async fn register(&self, form: RegistrationForm) -> Result<(), ApiError> {
        let generation = self.generation();
        let request = RegisterRequest {
            full_name: form.name,
            email: form.email,
            phone_number: normalize_phone(&form.phone_number),
            password: form.password,
            role: form.role,
            location: form.region,
            preffered_lang: form.preferred_language,
        };

        let response = self.api.send(&request).await?;

        match (response.token, response.user) {
            (Some(token), Some(user)) => {
                log_info!("[Auth] registration ok for {}", user.email);
                self.establish_session(generation, token, user);
                Ok(())
            }
            _ => Err(ApiError::decode("Registration failed")),
        }
    }

    /// 登出
    ///
    /// 纯客户端操作：清存储、清状态、递增会话代数（使在途的
    /// 认证响应过期）。重复调用无害。
    pub fn logout(&self) {
        self.store.clear();
        self.state.update(|s| {
            s.token = None;
            s.user = None;
            s.is_loading = false;
            s.generation += 1;
        });
        log_info!("[Auth] logged out");
    }

    // ---------------------------------------------------------
    // 资料与密码操作
    // ---------------------------------------------------------

    /// 更新用户资料
    ///
    /// 按角色分流到不同端点：farmer 走匿名端点，officer 走
    /// Bearer 认证端点。成功后只替换用户档案，令牌不变。
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<(), ApiError> {
        let generation = self.generation();

        let response = match Role::parse(&update.role) {
            Some(Role::Farmer) => self.api.send(&UpdateFarmerProfileRequest(update)).await?,
            Some(Role::Officer) => {
                send_with_stored_token(&self.api, &self.store, &UpdateOfficerProfileRequest(update))
                    .await?
            }
            _ => return Err(ApiError::decode("Invalid user role")),
        };

        let user = response
            .user
            .ok_or_else(|| ApiError::decode("Profile update failed"))?;

        if !self.still_current(generation) {
            log_warn!("[Auth] discarding stale profile response from a previous session");
            return Ok(());
        }

        self.store.write_user(&user);
        self.state.update(|s| s.user = Some(user));
        Ok(())
    }

    /// 修改密码
    ///
    /// 密码状态归服务端所有；成功与否都不触碰本地会话。
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let request = ChangePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };
        send_with_stored_token(&self.api, &self.store, &request).await?;
        Ok(())
    }

    /// 找回密码（匿名操作）
    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        let request = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.api.send(&request).await?;
        Ok(())
    }
}

// =========================================================
// Unit Tests
// =========================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{STORAGE_TOKEN_KEY, STORAGE_USER_KEY};
    use crate::web::http::mock::MockHttpClient;
    use crate::web::storage::mem::MemoryStorage;
    use serde_json::json;
    use std::future::Future;
    use std::pin::pin;
    use std::task::{Context, Poll};

    const BASE: &str = "http://test/api";

    fn service(
        http: &MockHttpClient,
        storage: &MemoryStorage,
    ) -> AuthService<MockHttpClient, MemoryStorage> {
        AuthService::new(
            ApiClient::new(&ApiConfig::with_base_url(BASE), http.clone()),
            SessionStore::new(storage.clone()),
        )
    }

    fn user_json(role: &str) -> serde_json::Value {
        json!({
            "id": "u1",
            "email": "jane@x.com",
            "name": "Jane",
            "role": role
        })
    }

    fn stored_user(role: Role) -> User {
        User {
            id: "u1".into(),
            email: "jane@x.com".into(),
            name: "Jane".into(),
            role,
            phone_number: None,
            location: None,
            pref_lang: None,
        }
    }

    fn seed_session(storage: &MemoryStorage, role: Role) {
        storage.set(STORAGE_TOKEN_KEY, "T1");
        storage.set(
            STORAGE_USER_KEY,
            &serde_json::to_string(&stored_user(role)).unwrap(),
        );
    }

    // ---------------------------------------------------------
    // 启动恢复
    // ---------------------------------------------------------

    #[test]
    fn state_starts_booting() {
        let auth = service(&MockHttpClient::new(), &MemoryStorage::new());
        assert_eq!(auth.state().get_untracked().status(), AuthStatus::Booting);
    }

    #[test]
    fn init_restores_complete_session() {
        let storage = MemoryStorage::new();
        seed_session(&storage, Role::Officer);
        let auth = service(&MockHttpClient::new(), &storage);

        auth.init();

        let state = auth.state().get_untracked();
        assert_eq!(state.status(), AuthStatus::Authenticated);
        assert_eq!(state.token.as_deref(), Some("T1"));
        assert_eq!(state.user.unwrap().role, Role::Officer);
    }

    #[test]
    fn init_with_empty_storage_is_anonymous() {
        let auth = service(&MockHttpClient::new(), &MemoryStorage::new());
        auth.init();
        assert_eq!(auth.state().get_untracked().status(), AuthStatus::Anonymous);
    }

    #[test]
    fn init_clears_orphan_token() {
        let storage = MemoryStorage::new();
        storage.set(STORAGE_TOKEN_KEY, "T1");
        let auth = service(&MockHttpClient::new(), &storage);

        auth.init();

        assert_eq!(auth.state().get_untracked().status(), AuthStatus::Anonymous);
        assert!(storage.get(STORAGE_TOKEN_KEY).is_none());
    }

    #[test]
    fn init_clears_orphan_user() {
        let storage = MemoryStorage::new();
        storage.set(
            STORAGE_USER_KEY,
            &serde_json::to_string(&stored_user(Role::Farmer)).unwrap(),
        );
        let auth = service(&MockHttpClient::new(), &storage);

        auth.init();

        assert_eq!(auth.state().get_untracked().status(), AuthStatus::Anonymous);
        assert!(storage.get(STORAGE_USER_KEY).is_none());
    }

    // ---------------------------------------------------------
    // 登录
    // ---------------------------------------------------------

    #[tokio::test]
    async fn login_success_persists_and_authenticates() {
        let http = MockHttpClient::new();
        http.mock_json(
            &format!("{}/auth/login", BASE),
            200,
            json!({"token": "T1", "user": user_json("farmer")}),
        );
        let storage = MemoryStorage::new();
        let auth = service(&http, &storage);
        auth.init();

        auth.login("jane@x.com", "pw").await.unwrap();

        let state = auth.state().get_untracked();
        assert_eq!(state.status(), AuthStatus::Authenticated);
        assert_eq!(storage.get(STORAGE_TOKEN_KEY).as_deref(), Some("T1"));
        assert!(storage.get(STORAGE_USER_KEY).is_some());
    }

    #[tokio::test]
    async fn login_rejection_surfaces_server_message() {
        let http = MockHttpClient::new();
        http.mock_json(
            &format!("{}/auth/login", BASE),
            401,
            json!({"error": "Invalid credentials"}),
        );
        let storage = MemoryStorage::new();
        let auth = service(&http, &storage);
        auth.init();

        let err = auth.login("jane@x.com", "wrong").await.unwrap_err();
        assert_eq!(err.message, "Invalid credentials");
        assert_eq!(err.status, 401);
        assert_eq!(auth.state().get_untracked().status(), AuthStatus::Anonymous);
        assert_eq!(storage.len(), 0);
    }

    #[tokio::test]
    async fn login_with_missing_token_fails_cleanly() {
        let http = MockHttpClient::new();
        http.mock_json(
            &format!("{}/auth/login", BASE),
            200,
            json!({"user": user_json("farmer")}),
        );
        let storage = MemoryStorage::new();
        let auth = service(&http, &storage);
        auth.init();

        let err = auth.login("jane@x.com", "pw").await.unwrap_err();
        assert_eq!(err.message, "Login failed");
        assert_eq!(auth.state().get_untracked().status(), AuthStatus::Anonymous);
        assert_eq!(storage.len(), 0);
    }

    // ---------------------------------------------------------
    // 注册
    // ---------------------------------------------------------

    fn sample_form() -> RegistrationForm {
        RegistrationForm {
            name: "Jane Farmer".into(),
            email: "jane@x.com".into(),
            phone_number: "0712345678".into(),
            password: "pw".into(),
            role: "farmer".into(),
            region: "nakuru".into(),
            preferred_language: "Swahili".into(),
        }
    }

    #[tokio::test]
    async fn register_success_persists_like_login() {
        let http = MockHttpClient::new();
        http.mock_json(
            &format!("{}/auth/register", BASE),
            201,
            json!({"token": "T1", "user": user_json("farmer")}),
        );
        let storage = MemoryStorage::new();
        let auth = service(&http, &storage);
        auth.init();

        auth.register(sample_form()).await.unwrap();

        assert_eq!(
            auth.state().get_untracked().status(),
            AuthStatus::Authenticated
        );
        assert_eq!(storage.get(STORAGE_TOKEN_KEY).as_deref(), Some("T1"));
        assert!(storage.get(STORAGE_USER_KEY).is_some());
    }

    #[tokio::test]
    async fn register_strips_leading_zero_from_phone() {
        let http = MockHttpClient::new();
        http.mock_json(
            &format!("{}/auth/register", BASE),
            201,
            json!({"token": "T1", "user": user_json("farmer")}),
        );
        let auth = service(&http, &MemoryStorage::new());
        auth.init();

        auth.register(sample_form()).await.unwrap();

        let body: serde_json::Value =
            serde_json::from_str(http.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["phoneNumber"], "712345678");
    }

    #[tokio::test]
    async fn register_leaves_phone_without_leading_zero_alone() {
        let http = MockHttpClient::new();
        http.mock_json(
            &format!("{}/auth/register", BASE),
            201,
            json!({"token": "T1", "user": user_json("farmer")}),
        );
        let auth = service(&http, &MemoryStorage::new());
        auth.init();

        let mut form = sample_form();
        form.phone_number = "712345678".into();
        auth.register(form).await.unwrap();

        let body: serde_json::Value =
            serde_json::from_str(http.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["phoneNumber"], "712345678");
    }

    #[tokio::test]
    async fn register_with_missing_user_fails_cleanly() {
        let http = MockHttpClient::new();
        http.mock_json(
            &format!("{}/auth/register", BASE),
            201,
            json!({"token": "T1"}),
        );
        let storage = MemoryStorage::new();
        let auth = service(&http, &storage);
        auth.init();

        let err = auth.register(sample_form()).await.unwrap_err();
        assert_eq!(err.message, "Registration failed");
        assert_eq!(storage.len(), 0);
    }

    // ---------------------------------------------------------
    // 登出
    // ---------------------------------------------------------

    #[test]
    fn logout_clears_session_and_is_idempotent() {
        let storage = MemoryStorage::new();
        seed_session(&storage, Role::Farmer);
        let auth = service(&MockHttpClient::new(), &storage);
        auth.init();
        assert_eq!(
            auth.state().get_untracked().status(),
            AuthStatus::Authenticated
        );

        auth.logout();
        assert_eq!(auth.state().get_untracked().status(), AuthStatus::Anonymous);
        assert_eq!(storage.len(), 0);

        auth.logout();
        assert_eq!(auth.state().get_untracked().status(), AuthStatus::Anonymous);
    }

    #[tokio::test]
    async fn login_response_arriving_after_logout_is_discarded() {
        let http = MockHttpClient::new();
        http.mock_json(
            &format!("{}/auth/login", BASE),
            200,
            json!({"token": "T1", "user": user_json("farmer")}),
        );
        http.hold();
        let storage = MemoryStorage::new();
        let auth = service(&http, &storage);
        auth.init();

        let mut fut = pin!(auth.login("jane@x.com", "pw"));
        let waker = futures::task::noop_waker();
        let mut cx = Context::from_waker(&waker);

        // drive past the request; response is gated
        assert!(fut.as_mut().poll(&mut cx).is_pending());
        assert_eq!(http.request_count(), 1);

        auth.logout();
        http.release();

        loop {
            if let Poll::Ready(result) = fut.as_mut().poll(&mut cx) {
                result.unwrap();
                break;
            }
        }

        // the response landed after logout and must not resurrect a session
        assert_eq!(auth.state().get_untracked().status(), AuthStatus::Anonymous);
        assert_eq!(storage.len(), 0);
    }

    // ---------------------------------------------------------
    // 资料更新
    // ---------------------------------------------------------

    fn profile_update(role: &str) -> ProfileUpdate {
        ProfileUpdate {
            role: role.into(),
            name: Some("Jane Updated".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn farmer_profile_update_is_anonymous_and_replaces_user() {
        let http = MockHttpClient::new();
        http.mock_json(
            &format!("{}/user/profile", BASE),
            200,
            json!({"user": {
                "id": "u1",
                "email": "jane@x.com",
                "name": "Jane Updated",
                "role": "farmer"
            }}),
        );
        let storage = MemoryStorage::new();
        seed_session(&storage, Role::Farmer);
        let auth = service(&http, &storage);
        auth.init();

        auth.update_profile(profile_update("farmer")).await.unwrap();

        let requests = http.requests();
        assert!(requests[0].header("Authorization").is_none());

        let state = auth.state().get_untracked();
        assert_eq!(state.user.unwrap().name, "Jane Updated");
        // token untouched
        assert_eq!(state.token.as_deref(), Some("T1"));
        assert_eq!(storage.get(STORAGE_TOKEN_KEY).as_deref(), Some("T1"));
        let stored: User =
            serde_json::from_str(&storage.get(STORAGE_USER_KEY).unwrap()).unwrap();
        assert_eq!(stored.name, "Jane Updated");
    }

    #[tokio::test]
    async fn officer_profile_update_carries_stored_bearer_token() {
        let http = MockHttpClient::new();
        http.mock_json(
            &format!("{}/officer/me", BASE),
            200,
            json!({"user": {
                "id": "u1",
                "email": "jane@x.com",
                "name": "Jane Updated",
                "role": "officer"
            }}),
        );
        let storage = MemoryStorage::new();
        seed_session(&storage, Role::Officer);
        let auth = service(&http, &storage);
        auth.init();

        auth.update_profile(profile_update("officer")).await.unwrap();

        let requests = http.requests();
        assert_eq!(requests[0].header("Authorization"), Some("Bearer T1"));
        assert_eq!(
            auth.state().get_untracked().user.unwrap().name,
            "Jane Updated"
        );
    }

    #[tokio::test]
    async fn invalid_role_makes_no_request() {
        let http = MockHttpClient::new();
        let storage = MemoryStorage::new();
        seed_session(&storage, Role::Farmer);
        let auth = service(&http, &storage);
        auth.init();

        let err = auth
            .update_profile(profile_update("superuser"))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Invalid user role");
        assert_eq!(http.request_count(), 0);
    }

    #[tokio::test]
    async fn failed_profile_update_leaves_session_unchanged() {
        let http = MockHttpClient::new();
        http.mock_json(
            &format!("{}/user/profile", BASE),
            500,
            json!({"error": "Update failed"}),
        );
        let storage = MemoryStorage::new();
        seed_session(&storage, Role::Farmer);
        let auth = service(&http, &storage);
        auth.init();

        let err = auth
            .update_profile(profile_update("farmer"))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Update failed");

        let state = auth.state().get_untracked();
        assert_eq!(state.status(), AuthStatus::Authenticated);
        assert_eq!(state.user.unwrap().name, "Jane");
        let stored: User =
            serde_json::from_str(&storage.get(STORAGE_USER_KEY).unwrap()).unwrap();
        assert_eq!(stored.name, "Jane");
    }

    // ---------------------------------------------------------
    // 密码操作
    // ---------------------------------------------------------

    #[tokio::test]
    async fn change_password_uses_bearer_and_keeps_session() {
        let http = MockHttpClient::new();
        http.mock_json(&format!("{}/user/change-password", BASE), 200, json!({}));
        let storage = MemoryStorage::new();
        seed_session(&storage, Role::Farmer);
        let auth = service(&http, &storage);
        auth.init();

        auth.change_password("old", "new").await.unwrap();

        let requests = http.requests();
        assert_eq!(requests[0].header("Authorization"), Some("Bearer T1"));
        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["currentPassword"], "old");
        assert_eq!(body["newPassword"], "new");
        assert_eq!(
            auth.state().get_untracked().status(),
            AuthStatus::Authenticated
        );
    }

    #[tokio::test]
    async fn forgot_password_is_anonymous() {
        let http = MockHttpClient::new();
        http.mock_json(&format!("{}/auth/forgot-password", BASE), 200, json!({}));
        let auth = service(&http, &MemoryStorage::new());
        auth.init();

        auth.forgot_password("jane@x.com").await.unwrap();

        let requests = http.requests();
        assert!(requests[0].header("Authorization").is_none());
        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["email"], "jane@x.com");
    }
}

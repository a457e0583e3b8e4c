//! Julisha 前端应用
//!
//! 面向农户/农业官员/管理员的角色化气候监测面板。
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `session`: 会话持久化
//! - `auth`: 认证状态管理
//! - `components`: UI 组件层

// =========================================================
// 跨平台日志宏
// =========================================================

#[cfg(target_arch = "wasm32")]
macro_rules! log_info {
    ($($t:tt)*) => (web_sys::console::log_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_warn {
    ($($t:tt)*) => (web_sys::console::warn_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_warn {
    ($($t:tt)*) => (eprintln!($($t)*))
}

pub(crate) use {log_info, log_warn};

// =========================================================
// 模块定义
// =========================================================

mod api;
mod auth;
mod components {
    pub mod dashboard;
    pub mod forgot_password;
    pub mod login;
    pub mod profile;
    pub mod register;
}
mod config;
mod session;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    pub mod http;
    pub mod route;
    pub mod router;
    pub mod storage;
}

use crate::auth::AppAuthService;
use crate::components::dashboard::DashboardPage;
use crate::components::forgot_password::ForgotPasswordPage;
use crate::components::login::LoginPage;
use crate::components::profile::ProfilePage;
use crate::components::register::RegisterPage;
use crate::config::ApiConfig;

use leptos::prelude::*;

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::ForgotPassword => view! { <ForgotPasswordPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证服务并注入 Context
    let auth = AppAuthService::new_web(&ApiConfig::from_env());
    provide_context(auth.clone());

    // 2. 启动恢复：从 LocalStorage 读取会话
    auth.init();

    // 3. 获取认证状态信号，用于注入路由服务（解耦！）
    let auth_status = auth.status_signal();

    view! {
        // 4. 路由器组件：注入认证信号实现守卫
        <Router auth_status=auth_status>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}

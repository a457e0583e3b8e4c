//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 路由守卫通过注入的认证状态信号决策，与认证系统解耦。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;
use crate::auth::AuthStatus;
use crate::log_info;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入认证状态信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 认证状态（注入的信号，实现解耦）
    auth_status: Signal<AuthStatus>,
}

impl RouterService {
    /// 创建新的路由服务
    ///
    /// # Arguments
    /// * `auth_status` - 认证状态信号，由外部注入实现解耦
    fn new(auth_status: Signal<AuthStatus>) -> Self {
        let path = current_path();
        let initial_route = AppRoute::from_path(&path);
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            auth_status,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 获取认证状态信号
    pub fn auth_status(&self) -> Signal<AuthStatus> {
        self.auth_status
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        let target_route = AppRoute::from_path(path);
        self.navigate_to_route(target_route, true);
    }

    /// 导航到指定路由
    ///
    /// # Arguments
    /// * `target_route` - 目标路由
    /// * `use_push` - true 使用 pushState, false 使用 replaceState
    fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) {
        let status = self.auth_status.get_untracked();

        // --- Step 1: 验证目标路由 ---
        // 目标需要认证而用户未认证：重定向到登录页。
        // Booting 状态放行（由出口渲染占位），避免刷新时闪跳到登录页。
        if target_route.requires_auth() && status == AuthStatus::Anonymous {
            log_info!("[Router] access denied, redirecting to login");
            let redirect = AppRoute::auth_failure_redirect();
            if use_push {
                push_history_state(redirect.to_path());
            } else {
                replace_history_state(redirect.to_path());
            }
            self.set_route.set(redirect);
            return;
        }

        // 已认证用户访问登录/注册页：重定向到面板
        if target_route.should_redirect_when_authenticated() && status == AuthStatus::Authenticated
        {
            log_info!("[Router] already authenticated, redirecting to dashboard");
            let redirect = AppRoute::auth_success_redirect();
            if use_push {
                push_history_state(redirect.to_path());
            } else {
                replace_history_state(redirect.to_path());
            }
            self.set_route.set(redirect);
            return;
        }

        // --- Step 2: 加载页面 (更新状态) ---
        if use_push {
            push_history_state(target_route.to_path());
        } else {
            replace_history_state(target_route.to_path());
        }
        self.set_route.set(target_route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let auth_status = self.auth_status;

        let closure = Closure::<dyn Fn()>::new(move || {
            let path = current_path();
            let target_route = AppRoute::from_path(&path);
            let status = auth_status.get_untracked();

            // popstate 时也执行守卫逻辑
            if target_route.requires_auth() && status == AuthStatus::Anonymous {
                let redirect = AppRoute::auth_failure_redirect();
                replace_history_state(redirect.to_path());
                set_route.set(redirect);
            } else {
                set_route.set(target_route);
            }
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 设置认证状态变化时的自动重定向
    ///
    /// 登出时从受保护页面跳回登录页（即"登出导航到登录入口"的
    /// 可观察副作用）；登录成功时从入口页面跳到面板。
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let auth_status = self.auth_status;

        Effect::new(move |_| {
            let status = auth_status.get();
            let route = current_route.get_untracked();

            match status {
                AuthStatus::Authenticated => {
                    if route.should_redirect_when_authenticated() {
                        let redirect = AppRoute::auth_success_redirect();
                        push_history_state(redirect.to_path());
                        set_route.set(redirect);
                        log_info!("[Router] auth state changed: logged in, showing dashboard");
                    }
                }
                AuthStatus::Anonymous => {
                    if route.requires_auth() {
                        let redirect = AppRoute::auth_failure_redirect();
                        push_history_state(redirect.to_path());
                        set_route.set(redirect);
                        log_info!("[Router] auth state changed: logged out, showing login");
                    }
                }
                // 启动读取尚未完成，不做任何重定向
                AuthStatus::Booting => {}
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(auth_status: Signal<AuthStatus>) -> RouterService {
    let router = RouterService::new(auth_status);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 认证状态信号
    auth_status: Signal<AuthStatus>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(auth_status);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
/// 启动读取完成前，受保护路由渲染中性占位，避免未认证误判。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        if current.requires_auth() && router.auth_status().get() == AuthStatus::Booting {
            return view! {
                <div class="flex items-center justify-center min-h-screen">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
            .into_any();
        }
        matcher(current)
    }
}

/// 应用内导航链接
///
/// 拦截点击事件，走路由服务（含守卫）而非整页刷新。
#[component]
pub fn Link(
    /// 目标路径
    #[prop(into)]
    to: String,
    /// CSS 类
    #[prop(into, optional)]
    class: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let to_clone = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(&to_clone);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}

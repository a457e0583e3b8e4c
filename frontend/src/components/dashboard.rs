use crate::auth::use_auth;
use crate::web::router::{Link, use_router};
use julisha_shared::Role;
use leptos::prelude::*;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let state = auth.state();

    let user_name = move || {
        state.with(|s| {
            s.user
                .as_ref()
                .map(|u| u.name.clone())
                .unwrap_or_default()
        })
    };
    // 角色决定顶层视图；档案缺失时回退为农户视图
    let role = move || state.with(|s| s.user.as_ref().map(|u| u.role).unwrap_or_default());

    let on_logout = move |_| {
        auth.logout();
        // 路由守卫会把未认证用户送回登录页；这里显式导航避免闪烁
        router.navigate("/login");
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <a class="btn btn-ghost text-xl text-primary">"Julisha"</a>
                        <span class="badge badge-neutral hidden md:inline-flex">
                            {move || format!("{} · {}", user_name(), role())}
                        </span>
                    </div>
                    <div class="flex-none gap-2">
                        <Link to="/profile" class="btn btn-ghost">"Profile"</Link>
                        <button on:click=on_logout class="btn btn-outline btn-error gap-2">
                            "Sign out"
                        </button>
                    </div>
                </div>

                {move || match role() {
                    Role::Farmer => view! { <FarmerDashboard /> }.into_any(),
                    Role::Officer => view! { <OfficerDashboard /> }.into_any(),
                    Role::Admin => view! { <AdminDashboard /> }.into_any(),
                }}
            </div>
        </div>
    }
}

/// 农户视图：天气与农事建议
#[component]
fn FarmerDashboard() -> impl IntoView {
    view! {
        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <div class="stat">
                <div class="stat-title">"Today's forecast"</div>
                <div class="stat-value text-primary">"24°C"</div>
                <div class="stat-desc">"Scattered showers expected"</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Soil moisture"</div>
                <div class="stat-value text-success">"Good"</div>
                <div class="stat-desc">"Suitable for planting"</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Rainfall this week"</div>
                <div class="stat-value text-secondary">"32mm"</div>
                <div class="stat-desc">"Above seasonal average"</div>
            </div>
        </div>

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h3 class="card-title">"Advisories"</h3>
                <p class="text-base-content/70 text-sm">
                    "Recommendations for your region based on current conditions."
                </p>
                <ul class="list-disc list-inside space-y-1 mt-2 text-sm">
                    <li>"Delay top-dressing fertilizer until after the expected showers."</li>
                    <li>"Scout maize fields for fall armyworm after the rains."</li>
                    <li>"Harvest and dry beans before the weekend rainfall peak."</li>
                </ul>
            </div>
        </div>
    }
}

/// 官员视图：辖区农户概况
#[component]
fn OfficerDashboard() -> impl IntoView {
    view! {
        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <div class="stat">
                <div class="stat-title">"Registered farmers"</div>
                <div class="stat-value text-primary">"128"</div>
                <div class="stat-desc">"In your region"</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Active alerts"</div>
                <div class="stat-value text-warning">"3"</div>
                <div class="stat-desc">"Pest and drought warnings"</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Field visits this month"</div>
                <div class="stat-value text-secondary">"17"</div>
            </div>
        </div>

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h3 class="card-title">"Regional outlook"</h3>
                <p class="text-base-content/70 text-sm">
                    "Summary of climate conditions across your assigned wards."
                </p>
                <ul class="list-disc list-inside space-y-1 mt-2 text-sm">
                    <li>"Northern wards report below-average soil moisture."</li>
                    <li>"Armyworm sightings confirmed in two wards; advisories issued."</li>
                    <li>"Next bulletin dispatch scheduled for Friday."</li>
                </ul>
            </div>
        </div>
    }
}

/// 管理员视图：平台概况
#[component]
fn AdminDashboard() -> impl IntoView {
    view! {
        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <div class="stat">
                <div class="stat-title">"Total users"</div>
                <div class="stat-value text-primary">"2,431"</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Officers"</div>
                <div class="stat-value text-secondary">"86"</div>
            </div>
            <div class="stat">
                <div class="stat-title">"System status"</div>
                <div class="stat-value text-success">"Healthy"</div>
                <div class="stat-desc">"All data feeds online"</div>
            </div>
        </div>

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h3 class="card-title">"Administration"</h3>
                <p class="text-base-content/70 text-sm">
                    "Platform-wide management and data feed health."
                </p>
            </div>
        </div>
    }
}

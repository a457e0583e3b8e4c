use crate::auth::use_auth;
use crate::web::router::Link;
use julisha_shared::protocol::ProfileUpdate;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 空字符串视为"未修改"，不发送该字段
fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();
    let state = auth.state();

    // 用当前档案预填表单
    let current = state.get_untracked();
    let (name, set_name) = signal(
        current
            .user
            .as_ref()
            .map(|u| u.name.clone())
            .unwrap_or_default(),
    );
    let (phone, set_phone) = signal(
        current
            .user
            .as_ref()
            .and_then(|u| u.phone_number.clone())
            .unwrap_or_default(),
    );
    let (location, set_location) = signal(
        current
            .user
            .as_ref()
            .and_then(|u| u.location.clone())
            .unwrap_or_default(),
    );
    let (language, set_language) = signal(
        current
            .user
            .as_ref()
            .and_then(|u| u.pref_lang.clone())
            .unwrap_or_default(),
    );

    let (is_saving, set_is_saving) = signal(false);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None); // 消息内容, 是否出错

    let save_auth = auth.clone();
    let on_save = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_is_saving.set(true);
        set_notification.set(None);

        let role = state.with_untracked(|s| {
            s.user
                .as_ref()
                .map(|u| u.role.as_str().to_string())
                .unwrap_or_default()
        });
        let update = ProfileUpdate {
            role,
            name: non_empty(name.get_untracked()),
            phone_number: non_empty(phone.get_untracked()),
            location: non_empty(location.get_untracked()),
            pref_lang: non_empty(language.get_untracked()),
        };

        let auth = save_auth.clone();
        spawn_local(async move {
            match auth.update_profile(update).await {
                Ok(()) => set_notification.set(Some(("Profile updated".to_string(), false))),
                Err(e) => set_notification.set(Some((e.message, true))),
            }
            set_is_saving.set(false);
        });
    };

    // 修改密码表单
    let (current_pw, set_current_pw) = signal(String::new());
    let (new_pw, set_new_pw) = signal(String::new());
    let (is_changing, set_is_changing) = signal(false);

    let pw_auth = auth.clone();
    let on_change_password = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if current_pw.get().is_empty() || new_pw.get().is_empty() {
            set_notification.set(Some(("Please fill in both password fields".to_string(), true)));
            return;
        }

        set_is_changing.set(true);
        set_notification.set(None);

        let auth = pw_auth.clone();
        spawn_local(async move {
            match auth
                .change_password(&current_pw.get_untracked(), &new_pw.get_untracked())
                .await
            {
                Ok(()) => {
                    set_notification.set(Some(("Password changed".to_string(), false)));
                    set_current_pw.set(String::new());
                    set_new_pw.set(String::new());
                }
                Err(e) => set_notification.set(Some((e.message, true))),
            }
            set_is_changing.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-3xl mx-auto space-y-8">
                <Show when=move || notification.get().is_some()>
                    <div class="toast toast-top toast-end z-50">
                        <div class=move || {
                            let (_, is_err) = notification.get().unwrap_or_default();
                            if is_err {
                                "alert alert-error shadow-lg"
                            } else {
                                "alert alert-success shadow-lg"
                            }
                        }>
                            <span>{move || notification.get().unwrap_or_default().0}</span>
                        </div>
                    </div>
                </Show>

                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1">
                        <Link to="/dashboard" class="btn btn-ghost">"← Dashboard"</Link>
                    </div>
                    <div class="flex-none">
                        <span class="text-xl font-bold text-primary px-4">"My profile"</span>
                    </div>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <form class="card-body" on:submit=on_save>
                        <h3 class="card-title">"Profile details"</h3>

                        <div class="form-control">
                            <label class="label" for="name">
                                <span class="label-text">"Full name"</span>
                            </label>
                            <input
                                id="name"
                                type="text"
                                on:input=move |ev| set_name.set(event_target_value(&ev))
                                prop:value=name
                                class="input input-bordered"
                            />
                        </div>

                        <div class="grid grid-cols-1 md:grid-cols-2 gap-2">
                            <div class="form-control">
                                <label class="label" for="phone">
                                    <span class="label-text">"Phone number"</span>
                                </label>
                                <input
                                    id="phone"
                                    type="tel"
                                    on:input=move |ev| set_phone.set(event_target_value(&ev))
                                    prop:value=phone
                                    class="input input-bordered"
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="location">
                                    <span class="label-text">"Region"</span>
                                </label>
                                <input
                                    id="location"
                                    type="text"
                                    on:input=move |ev| set_location.set(event_target_value(&ev))
                                    prop:value=location
                                    class="input input-bordered"
                                />
                            </div>
                        </div>

                        <div class="form-control">
                            <label class="label" for="language">
                                <span class="label-text">"Preferred language"</span>
                            </label>
                            <select
                                id="language"
                                class="select select-bordered"
                                on:change=move |ev| set_language.set(event_target_value(&ev))
                                prop:value=language
                            >
                                <option value="">"No preference"</option>
                                <option value="English">"English"</option>
                                <option value="Swahili">"Swahili"</option>
                            </select>
                        </div>

                        <div class="card-actions justify-end mt-4">
                            <button class="btn btn-primary" disabled=move || is_saving.get()>
                                {move || if is_saving.get() {
                                    view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                                } else {
                                    "Save changes".into_any()
                                }}
                            </button>
                        </div>
                    </form>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <form class="card-body" on:submit=on_change_password>
                        <h3 class="card-title">"Change password"</h3>

                        <div class="grid grid-cols-1 md:grid-cols-2 gap-2">
                            <div class="form-control">
                                <label class="label" for="current-password">
                                    <span class="label-text">"Current password"</span>
                                </label>
                                <input
                                    id="current-password"
                                    type="password"
                                    on:input=move |ev| set_current_pw.set(event_target_value(&ev))
                                    prop:value=current_pw
                                    class="input input-bordered"
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="new-password">
                                    <span class="label-text">"New password"</span>
                                </label>
                                <input
                                    id="new-password"
                                    type="password"
                                    on:input=move |ev| set_new_pw.set(event_target_value(&ev))
                                    prop:value=new_pw
                                    class="input input-bordered"
                                />
                            </div>
                        </div>

                        <div class="card-actions justify-end mt-4">
                            <button class="btn btn-outline" disabled=move || is_changing.get()>
                                {move || if is_changing.get() {
                                    view! { <span class="loading loading-spinner"></span> "Updating..." }.into_any()
                                } else {
                                    "Update password".into_any()
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}

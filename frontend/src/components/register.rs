use crate::auth::{RegistrationForm, use_auth};
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    // 表单字段
    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (phone, set_phone) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (role, set_role) = signal("farmer".to_string());
    let (region, set_region) = signal(String::new());
    let (language, set_language) = signal("English".to_string());

    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();

        if name.get().is_empty() || email.get().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("Please fill in all required fields".to_string()));
            return;
        }
        if password.get() != confirm.get() {
            set_error_msg.set(Some("Passwords do not match".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let form = RegistrationForm {
            name: name.get_untracked(),
            email: email.get_untracked(),
            phone_number: phone.get_untracked(),
            password: password.get_untracked(),
            role: role.get_untracked(),
            region: region.get_untracked(),
            preferred_language: language.get_untracked(),
        };

        let auth = auth.clone();
        spawn_local(async move {
            match auth.register(form).await {
                Ok(()) => router.navigate("/dashboard"),
                Err(e) => set_error_msg.set(Some(e.message)),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-lg">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold text-primary">"Create your Julisha account"</h1>
                    <p class="text-base-content/70">
                        "Climate insight for farmers and field officers"
                    </p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

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
                                required
                            />
                        </div>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>

                        <div class="form-control">
                            <label class="label" for="phone">
                                <span class="label-text">"Phone number"</span>
                            </label>
                            // 本地格式（带前导 0）会在提交前规范化
                            <input
                                id="phone"
                                type="tel"
                                placeholder="0712 345 678"
                                on:input=move |ev| set_phone.set(event_target_value(&ev))
                                prop:value=phone
                                class="input input-bordered"
                                required
                            />
                        </div>

                        <div class="grid grid-cols-1 md:grid-cols-2 gap-2">
                            <div class="form-control">
                                <label class="label" for="role">
                                    <span class="label-text">"I am a"</span>
                                </label>
                                <select
                                    id="role"
                                    class="select select-bordered"
                                    on:change=move |ev| set_role.set(event_target_value(&ev))
                                    prop:value=role
                                >
                                    <option value="farmer">"Farmer"</option>
                                    <option value="officer">"Agricultural officer"</option>
                                </select>
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
                                    <option value="English">"English"</option>
                                    <option value="Swahili">"Swahili"</option>
                                </select>
                            </div>
                        </div>

                        <div class="form-control">
                            <label class="label" for="region">
                                <span class="label-text">"Region"</span>
                            </label>
                            <input
                                id="region"
                                type="text"
                                placeholder="e.g. Nakuru"
                                on:input=move |ev| set_region.set(event_target_value(&ev))
                                prop:value=region
                                class="input input-bordered"
                                required
                            />
                        </div>

                        <div class="grid grid-cols-1 md:grid-cols-2 gap-2">
                            <div class="form-control">
                                <label class="label" for="password">
                                    <span class="label-text">"Password"</span>
                                </label>
                                <input
                                    id="password"
                                    type="password"
                                    on:input=move |ev| set_password.set(event_target_value(&ev))
                                    prop:value=password
                                    class="input input-bordered"
                                    required
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="confirm">
                                    <span class="label-text">"Confirm password"</span>
                                </label>
                                <input
                                    id="confirm"
                                    type="password"
                                    on:input=move |ev| set_confirm.set(event_target_value(&ev))
                                    prop:value=confirm
                                    class="input input-bordered"
                                    required
                                />
                            </div>
                        </div>

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                                } else {
                                    "Register".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "Already registered? "
                            <Link to="/login" class="link link-primary">"Sign in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}

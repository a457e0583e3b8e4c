use crate::auth::use_auth;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let auth = use_auth();

    let (email, set_email) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (sent, set_sent) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if email.get().is_empty() {
            set_error_msg.set(Some("Please enter your email".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let auth = auth.clone();
        spawn_local(async move {
            match auth.forgot_password(&email.get_untracked()).await {
                Ok(()) => set_sent.set(true),
                Err(e) => set_error_msg.set(Some(e.message)),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold text-primary">"Reset your password"</h1>
                    <p class="text-base-content/70">
                        "We will email you a link to reset it"
                    </p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <Show
                        when=move || !sent.get()
                        fallback=|| view! {
                            <div class="card-body text-center">
                                <div role="alert" class="alert alert-success text-sm py-2">
                                    <span>"If that email is registered, a reset link is on its way."</span>
                                </div>
                                <Link to="/login" class="link link-primary mt-2">"Back to sign in"</Link>
                            </div>
                        }
                    >
                        <form class="card-body" on:submit=on_submit.clone()>
                            <Show when=move || error_msg.get().is_some()>
                                <div role="alert" class="alert alert-error text-sm py-2">
                                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                                </div>
                            </Show>

                            <div class="form-control">
                                <label class="label" for="email">
                                    <span class="label-text">"Email"</span>
                                </label>
                                <input
                                    id="email"
                                    type="email"
                                    placeholder="you@example.com"
                                    on:input=move |ev| set_email.set(event_target_value(&ev))
                                    prop:value=email
                                    class="input input-bordered"
                                    required
                                />
                            </div>
                            <div class="form-control mt-6">
                                <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                    {move || if is_submitting.get() {
                                        view! { <span class="loading loading-spinner"></span> "Sending..." }.into_any()
                                    } else {
                                        "Send reset link".into_any()
                                    }}
                                </button>
                            </div>
                            <p class="text-center text-sm mt-2">
                                <Link to="/login" class="link link-hover">"Back to sign in"</Link>
                            </p>
                        </form>
                    </Show>
                </div>
            </div>
        </div>
    }
}

//! HTML rendering of the prompt form.

use leptos::prelude::*;

use crate::form::{FormState, RequestStatus};

const PLACEHOLDER: &str =
    "Enter a prompt to generate an image, e.g., 'A robot holding a red skateboard.'";

const STYLE: &str = r"
body { font-family: system-ui, sans-serif; max-width: 720px; margin: 2rem auto; padding: 0 1rem; }
.prompt-container { display: flex; flex-direction: column; gap: .75rem; }
.prompt-container.busy button, .prompt-container.busy textarea { opacity: .6; cursor: wait; }
textarea { min-height: 6rem; font: inherit; padding: .5rem; }
button { align-self: flex-start; padding: .5rem 1.25rem; font: inherit; cursor: pointer; }
.result-container { margin-top: 1.5rem; min-height: 12rem; display: flex; align-items: center; justify-content: center; border: 1px dashed #bbb; border-radius: 8px; }
.result-container img { max-width: 100%; border-radius: 8px; }
.error-message { color: #b00020; }
.placeholder { color: #777; }
.loading-spinner { width: 2.5rem; height: 2.5rem; border: 4px solid #ddd; border-top-color: #555; border-radius: 50%; animation: spin 1s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
";

/// The result region: exactly one of spinner, error, image, or placeholder.
fn result_region(state: &FormState) -> AnyView {
    match &state.status {
        RequestStatus::Loading => {
            view! { <div class="loading-spinner" aria-label="Loading"></div> }.into_any()
        }
        RequestStatus::Failed(message) => {
            view! { <p class="error-message" role="alert">{message.clone()}</p> }.into_any()
        }
        RequestStatus::Succeeded(image) => {
            view! { <img src=image.url.clone() alt=state.prompt.clone()/> }.into_any()
        }
        RequestStatus::Idle => {
            view! { <p class="placeholder">"Your generated image will appear here."</p> }.into_any()
        }
    }
}

/// Render the full page for a form snapshot.
#[must_use]
pub fn render_page(state: &FormState) -> String {
    let loading = state.status.is_loading();
    let form_class = if loading { "prompt-container busy" } else { "prompt-container" };
    let label = if loading { "Generating..." } else { "Generate Image" };
    let prompt = state.prompt.clone();
    let result = result_region(state);

    let page = view! {
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                {loading.then(|| view! { <meta http-equiv="refresh" content="2"/> })}
                <title>"AI Image Generator"</title>
                <style>{STYLE}</style>
            </head>
            <body>
                <h1>"AI Image Generator"</h1>
                <form class=form_class method="post" action="/generate">
                    <textarea name="prompt" placeholder=PLACEHOLDER aria-label="Image prompt" disabled=loading>{prompt}</textarea>
                    <button type="submit" disabled=loading>{label}</button>
                </form>
                <div class="result-container" aria-live="polite">{result}</div>
            </body>
        </html>
    };
    format!("<!DOCTYPE html>{}", page.to_html())
}

//! Small helpers shared by the forms.

use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

pub fn input_value(e: InputEvent) -> String {
    e.target_unchecked_into::<HtmlInputElement>().value()
}

pub fn textarea_value(e: InputEvent) -> String {
    e.target_unchecked_into::<HtmlTextAreaElement>().value()
}

pub fn select_value(e: Event) -> String {
    e.target_unchecked_into::<HtmlSelectElement>().value()
}

/// Labelled `<input>` bound to `value`.
pub fn field(label: &str, kind: &'static str, value: &str, required: bool, oninput: Callback<String>) -> Html {
    html! {
        <label class="field">
            <span>{ label }{ if required { " *" } else { "" } }</span>
            <input
                type={kind}
                value={value.to_string()}
                {required}
                oninput={oninput.reform(input_value)}
            />
        </label>
    }
}

pub fn error_line(error: Option<&str>) -> Html {
    match error {
        Some(message) => html! { <p class="form-error">{ message }</p> },
        None => html! {},
    }
}

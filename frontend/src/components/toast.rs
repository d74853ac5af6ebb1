//! Transient notifications appended to the page body.

use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::config::TOAST_MS;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl ToastKind {
    fn background(self) -> &'static str {
        match self {
            ToastKind::Info => "rgba(0, 0, 0, 0.8)",
            ToastKind::Success => "rgba(5, 150, 105, 0.95)",
            ToastKind::Error => "rgba(220, 38, 38, 0.95)",
        }
    }
}

/// Shows `message` at the bottom of the screen and removes it after
/// [`TOAST_MS`]. The text is set as text content, never parsed as HTML.
pub fn show_toast(message: &str, kind: ToastKind) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) else {
        return;
    };
    toast.set_text_content(Some(message));
    toast.set_class_name("toast");
    let toast: HtmlElement = toast.unchecked_into();
    let style = toast.style();
    style.set_property("position", "fixed").ok();
    style.set_property("bottom", "20px").ok();
    style.set_property("left", "50%").ok();
    style.set_property("transform", "translateX(-50%)").ok();
    style.set_property("background", kind.background()).ok();
    style.set_property("color", "#fff").ok();
    style.set_property("padding", "10px 20px").ok();
    style.set_property("border-radius", "6px").ok();
    style.set_property("z-index", "10000").ok();

    if body.append_child(&toast).is_ok() {
        wasm_bindgen_futures::spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(TOAST_MS).await;
            if let Some(parent) = toast.parent_node() {
                parent.remove_child(&toast).ok();
            }
        });
    }
}

pub fn toast_error(message: &str) {
    gloo_console::error!(message);
    show_toast(message, ToastKind::Error);
}

pub fn toast_success(message: &str) {
    show_toast(message, ToastKind::Success);
}

//! Browser history plumbing for [`Route`].

use common::route::{QueryParams, Route, RouteError};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::UrlSearchParams;

/// Query keys any route reads.
const QUERY_KEYS: [&str; 5] = ["token", "lat", "lng", "from", "id"];

/// Route of the current location.
pub fn current() -> Result<Route, RouteError> {
    let Some(location) = web_sys::window().map(|w| w.location()) else {
        return Route::parse("/", &QueryParams::new());
    };
    let path = location.pathname().unwrap_or_else(|_| "/".into());
    let search = location.search().unwrap_or_default();
    let mut query = QueryParams::new();
    if let Ok(params) = UrlSearchParams::new_with_str(&search) {
        for key in QUERY_KEYS {
            if let Some(value) = params.get(key) {
                query.insert(key.to_string(), value);
            }
        }
    }
    Route::parse(&path, &query)
}

pub fn push(route: &Route) {
    if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
        history
            .push_state_with_url(&JsValue::NULL, "", Some(&route.to_url()))
            .ok();
    }
}

pub fn replace(route: &Route) {
    if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
        history
            .replace_state_with_url(&JsValue::NULL, "", Some(&route.to_url()))
            .ok();
    }
}

/// Calls `on_change` on back/forward navigation. The returned closure must be
/// kept alive for as long as the listener should stay registered.
pub fn listen(on_change: impl Fn() + 'static) -> Option<Closure<dyn FnMut(web_sys::Event)>> {
    let window = web_sys::window()?;
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| on_change());
    window
        .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
        .ok()?;
    Some(closure)
}

pub fn unlisten(closure: &Closure<dyn FnMut(web_sys::Event)>) {
    if let Some(window) = web_sys::window() {
        window
            .remove_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
            .ok();
    }
}

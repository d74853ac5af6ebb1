//! Serves the embedded frontend bundle.
//!
//! Requests for a file of the bundle get that file. Every other path is a
//! page of the single-page app: it is parsed as a [`Route`] and the access
//! guard runs before `index.html` goes out, so a signed-out visitor never
//! receives a dashboard page and a signed-in one skips the login form.

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use common::route::{QueryParams, Route};
use include_dir::{include_dir, Dir};
use log::debug;
use mime_guess::from_path;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

/// Cookie set by the API on sign-in.
const SESSION_COOKIE: &str = "token";

pub async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    serve_from(&STATIC_DIR, &req)
}

fn serve_from(bundle: &Dir<'_>, req: &HttpRequest) -> HttpResponse {
    let path = req.path().trim_start_matches('/');
    if let Some(file) = bundle.get_file(path) {
        let mime = from_path(path).first_or_octet_stream();
        return HttpResponse::Ok()
            .content_type(mime.as_ref())
            .body(file.contents().to_vec());
    }

    let query = web::Query::<QueryParams>::from_query(req.query_string())
        .map(web::Query::into_inner)
        .unwrap_or_default();
    let route = Route::parse(req.path(), &query);
    // Tokens in auth links carry dots, so only a dotted path that is not a
    // page of the app is a missing file.
    if route.is_err() && looks_like_file(path) {
        return HttpResponse::NotFound().body("Not Found");
    }

    // Unknown paths still get the app, which shows its own not-found page.
    if let Ok(route) = route {
        let authenticated = req.cookie(SESSION_COOKIE).is_some_and(|c| !c.value().is_empty());
        if let Some(target) = route.guard(authenticated) {
            debug!("guard: {} -> {}", req.path(), target.to_url());
            return HttpResponse::Found()
                .insert_header((header::LOCATION, target.to_url()))
                .finish();
        }
    }

    match bundle.get_file("index.html") {
        Some(index) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(index.contents().to_vec()),
        None => HttpResponse::ServiceUnavailable().body("Frontend bundle missing: build ../frontend with trunk"),
    }
}

/// A path naming a file (its last segment has an extension).
fn looks_like_file(path: &str) -> bool {
    path.rsplit('/').next().is_some_and(|last| last.contains('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    static BUNDLE: Dir = include_dir!("$CARGO_MANIFEST_DIR/tests/bundle");

    async fn bundle_page(req: HttpRequest) -> HttpResponse {
        serve_from(&BUNDLE, &req)
    }

    macro_rules! app {
        () => {
            test::init_service(App::new().default_service(web::route().to(bundle_page))).await
        };
    }

    fn location(resp: &actix_web::dev::ServiceResponse) -> String {
        resp.headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    #[actix_web::test]
    async fn signed_out_dashboard_redirects_to_login() {
        let app = app!();
        let req = test::TestRequest::get().uri("/dashboard/marches").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "/login");
    }

    #[actix_web::test]
    async fn signed_in_login_redirects_to_dashboard() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/login")
            .cookie(Cookie::new("token", "abc"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "/dashboard");
    }

    #[actix_web::test]
    async fn signed_in_dashboard_gets_the_app() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/dashboard/map?lat=34.0&lng=-5.0")
            .cookie(Cookie::new("token", "abc"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("<html"));
    }

    #[actix_web::test]
    async fn public_pages_and_unknown_paths_are_not_guarded() {
        let app = app!();
        for uri in ["/forgot-password", "/reset-password?token=t1", "/nowhere"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        }
    }

    #[actix_web::test]
    async fn assets_are_served_with_their_mime_type() {
        let app = app!();
        let req = test::TestRequest::get().uri("/styles.css").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("text/css")
        );

        let req = test::TestRequest::get().uri("/missing.js").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn dotted_tokens_in_auth_links_get_the_app() {
        let app = app!();
        for uri in [
            "/verify-email/eyJhbGciOi.eyJzdWIi.SflKxw",
            "/reset-password/tok.en",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "{uri}");
            let body = test::read_body(resp).await;
            assert!(String::from_utf8_lossy(&body).contains("<html"), "{uri}");
        }
    }
}

//! Application shell: current route, signed-in user, the form/map handoff and
//! the client-side access guard.

use std::cell::RefCell;
use std::rc::Rc;

use common::error::ApiError;
use common::handoff::Handoff;
use common::model::auth::User;
use common::route::{Route, RouteError};
use wasm_bindgen::closure::Closure;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::components::navbar::Navbar;
use crate::components::toast::toast_error;
use crate::pages::dashboard::Dashboard;
use crate::pages::forgot_password::ForgotPassword;
use crate::pages::login::Login;
use crate::pages::map_page::MapPage;
use crate::pages::marche_detail::MarcheDetail;
use crate::pages::marche_form::MarcheFormPage;
use crate::pages::marches_list::MarchesList;
use crate::pages::register::Register;
use crate::pages::reset_password::ResetPassword;
use crate::pages::verify_email::VerifyEmail;
use crate::router;

/// Handles passed down to every page.
#[derive(Clone)]
pub struct AppContext {
    pub handoff: Rc<RefCell<Handoff>>,
    pub navigate: Callback<Route>,
    pub signed_in: Callback<User>,
    /// A request answered 401: the session is gone.
    pub session_expired: Callback<()>,
}

impl PartialEq for AppContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.handoff, &other.handoff)
            && self.navigate == other.navigate
            && self.signed_in == other.signed_in
            && self.session_expired == other.session_expired
    }
}

impl AppContext {
    /// Reports `err` to the user with `fallback` for bare rejections, and
    /// drops the session on a 401.
    pub fn report(&self, err: &ApiError, fallback: &str) {
        if err.is_unauthorized() {
            self.session_expired.emit(());
        }
        toast_error(&err.user_message(fallback));
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct PageProps {
    pub app: AppContext,
}

pub enum Msg {
    Navigate(Route),
    LocationChanged,
    UserLoaded(Result<User, ApiError>),
    SignedIn(User),
    SessionExpired,
    Logout,
    LoggedOut,
}

pub struct App {
    route: Result<Route, RouteError>,
    user: Option<User>,
    auth_checked: bool,
    context: AppContext,
    popstate: Option<Closure<dyn FnMut(web_sys::Event)>>,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link();
        let context = AppContext {
            handoff: Rc::new(RefCell::new(Handoff::default())),
            navigate: link.callback(Msg::Navigate),
            signed_in: link.callback(Msg::SignedIn),
            session_expired: link.callback(|_| Msg::SessionExpired),
        };
        let popstate = {
            let link = link.clone();
            router::listen(move || link.send_message(Msg::LocationChanged))
        };
        fetch_user(link.clone());
        Self {
            route: router::current(),
            user: None,
            auth_checked: false,
            context,
            popstate,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Navigate(route) => {
                router::push(&route);
                self.route = Ok(route);
            }
            Msg::LocationChanged => self.route = router::current(),
            Msg::UserLoaded(result) => {
                self.auth_checked = true;
                match result {
                    Ok(user) => self.user = Some(user),
                    Err(err) if err.is_network() => {
                        toast_error(&err.to_string());
                        self.user = None;
                    }
                    Err(_) => self.user = None,
                }
            }
            Msg::SignedIn(user) => {
                self.user = Some(user);
                self.auth_checked = true;
                router::push(&Route::Dashboard);
                self.route = Ok(Route::Dashboard);
            }
            Msg::SessionExpired => self.user = None,
            Msg::Logout => {
                let link = ctx.link().clone();
                spawn_local(async move {
                    if let Err(err) = api::auth::logout().await {
                        gloo_console::error!(err.to_string());
                    }
                    link.send_message(Msg::LoggedOut);
                });
                return false;
            }
            Msg::LoggedOut => {
                self.user = None;
                self.context.handoff.borrow_mut().clear();
            }
        }
        self.apply_guard();
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if !self.auth_checked {
            return html! { <div class="page-loading">{ "Chargement..." }</div> };
        }
        let route = match &self.route {
            Ok(route) => route,
            Err(err) => return self.not_found(err),
        };
        let page = self.page(route);
        if !route.is_protected() {
            return page;
        }
        html! {
            <div class="layout">
                <Navbar
                    route={route.clone()}
                    user={self.user.clone()}
                    on_navigate={self.context.navigate.clone()}
                    on_logout={ctx.link().callback(|_| Msg::Logout)}
                />
                <main class="content">{ page }</main>
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        if let Some(closure) = self.popstate.take() {
            router::unlisten(&closure);
        }
    }
}

impl App {
    fn apply_guard(&mut self) {
        if !self.auth_checked {
            return;
        }
        if let Ok(route) = &self.route {
            if let Some(target) = route.guard(self.user.is_some()) {
                router::replace(&target);
                self.route = Ok(target);
            }
        }
    }

    fn page(&self, route: &Route) -> Html {
        let app = self.context.clone();
        match route {
            Route::Login => html! { <Login {app} /> },
            Route::Register => html! { <Register {app} /> },
            Route::ForgotPassword => html! { <ForgotPassword {app} /> },
            Route::ResetPassword { token } => html! { <ResetPassword {app} token={token.clone()} /> },
            Route::VerifyEmail { token } => html! { <VerifyEmail {app} token={token.clone()} /> },
            Route::Dashboard => html! { <Dashboard {app} /> },
            Route::Marches => html! { <MarchesList {app} /> },
            Route::MarcheAdd => html! { <MarcheFormPage key="add" {app} id={None::<i64>} /> },
            Route::MarcheEdit { id } => {
                html! { <MarcheFormPage key={format!("edit-{id}")} {app} id={Some(*id)} /> }
            }
            Route::MarcheDetail { id } => html! { <MarcheDetail key={id.to_string()} {app} id={*id} /> },
            Route::Map { center, selection } => html! {
                <MapPage key={route.to_url()} {app} center={*center} selection={*selection} />
            },
        }
    }

    fn not_found(&self, err: &RouteError) -> Html {
        let home = self.context.navigate.reform(|_: MouseEvent| Route::Dashboard);
        html! {
            <div class="centered-card">
                <h1>{ "Page introuvable" }</h1>
                <p>{ err.to_string() }</p>
                <button class="btn" onclick={home}>{ "Retour au tableau de bord" }</button>
            </div>
        }
    }
}

fn fetch_user(link: yew::html::Scope<App>) {
    spawn_local(async move {
        let result = api::auth::current_user().await;
        link.send_message(Msg::UserLoaded(result));
    });
}

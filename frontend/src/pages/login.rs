use common::error::ApiError;
use common::model::auth::{LoginRequest, User};
use common::route::Route;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::app::PageProps;
use crate::components::form::{error_line, field};

pub enum Msg {
    Email(String),
    Password(String),
    Submit,
    Done(Result<User, ApiError>),
}

pub struct Login {
    email: String,
    password: String,
    loading: bool,
    error: Option<String>,
}

impl Component for Login {
    type Message = Msg;
    type Properties = PageProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            loading: false,
            error: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Email(v) => self.email = v,
            Msg::Password(v) => self.password = v,
            Msg::Submit => {
                if self.loading {
                    return false;
                }
                self.loading = true;
                self.error = None;
                let request = LoginRequest {
                    email: self.email.trim().to_string(),
                    password: self.password.clone(),
                };
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = match api::auth::login(&request).await {
                        Ok(()) => api::auth::current_user().await,
                        Err(err) => Err(err),
                    };
                    link.send_message(Msg::Done(result));
                });
            }
            Msg::Done(Ok(user)) => {
                self.loading = false;
                ctx.props().app.signed_in.emit(user);
            }
            Msg::Done(Err(err)) => {
                self.loading = false;
                self.error = Some(match err {
                    ApiError::Unauthorized { message } => {
                        message.unwrap_or_else(|| "Email ou mot de passe incorrect".to_string())
                    }
                    other => other.user_message("Erreur lors de la connexion"),
                });
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let navigate = ctx.props().app.navigate.clone();
        let onsubmit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Submit
        });
        html! {
            <div class="centered-card">
                <h1>{ "Connexion" }</h1>
                { error_line(self.error.as_deref()) }
                <form {onsubmit}>
                    { field("Email", "email", &self.email, true, link.callback(Msg::Email)) }
                    { field("Mot de passe", "password", &self.password, true, link.callback(Msg::Password)) }
                    <button class="btn" type="submit" disabled={self.loading}>
                        { if self.loading { "Connexion..." } else { "Se connecter" } }
                    </button>
                </form>
                <div class="card-links">
                    <a onclick={navigate.reform(|_: MouseEvent| Route::ForgotPassword)}>{ "Mot de passe oublié ?" }</a>
                    <a onclick={navigate.reform(|_: MouseEvent| Route::Register)}>{ "Créer un compte" }</a>
                </div>
            </div>
        }
    }
}

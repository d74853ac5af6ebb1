use common::error::ApiError;
use common::model::auth::{MessageResponse, ResetPasswordRequest};
use common::route::Route;
use common::validation::validate_password_reset;
use gloo_timers::callback::Timeout;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::app::AppContext;
use crate::components::form::{error_line, field};
use crate::config::RESET_REDIRECT_MS;

#[derive(Properties, PartialEq)]
pub struct ResetPasswordProps {
    pub app: AppContext,
    pub token: String,
}

pub enum Msg {
    Password(String),
    Confirm(String),
    Submit,
    Done(Result<MessageResponse, ApiError>),
}

pub struct ResetPassword {
    password: String,
    confirm: String,
    loading: bool,
    message: Option<String>,
    error: Option<String>,
    redirect: Option<Timeout>,
}

impl Component for ResetPassword {
    type Message = Msg;
    type Properties = ResetPasswordProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            password: String::new(),
            confirm: String::new(),
            loading: false,
            message: None,
            error: None,
            redirect: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Password(v) => self.password = v,
            Msg::Confirm(v) => self.confirm = v,
            Msg::Submit => {
                self.error = None;
                self.message = None;
                if let Err(err) = validate_password_reset(&self.password, &self.confirm) {
                    self.error = Some(err.to_string());
                    return true;
                }
                self.loading = true;
                let request = ResetPasswordRequest {
                    token: ctx.props().token.clone(),
                    new_password: self.password.clone(),
                };
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::Done(api::auth::reset_password(&request).await));
                });
            }
            Msg::Done(Ok(_)) => {
                self.loading = false;
                self.message =
                    Some("Mot de passe mis à jour avec succès. Vous pouvez vous connecter.".into());
                let navigate = ctx.props().app.navigate.clone();
                self.redirect = Some(Timeout::new(RESET_REDIRECT_MS, move || navigate.emit(Route::Login)));
            }
            Msg::Done(Err(err)) => {
                self.loading = false;
                self.error = Some(err.user_message("Erreur lors de la réinitialisation"));
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let onsubmit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Submit
        });
        html! {
            <div class="centered-card">
                <h1>{ "Nouveau mot de passe" }</h1>
                if let Some(message) = &self.message {
                    <p class="form-success">{ message }</p>
                }
                { error_line(self.error.as_deref()) }
                <form {onsubmit}>
                    { field("Mot de passe", "password", &self.password, true, link.callback(Msg::Password)) }
                    { field("Confirmer le mot de passe", "password", &self.confirm, true, link.callback(Msg::Confirm)) }
                    <button class="btn" type="submit" disabled={self.loading}>
                        { if self.loading { "Mise à jour..." } else { "Mettre à jour" } }
                    </button>
                </form>
            </div>
        }
    }
}

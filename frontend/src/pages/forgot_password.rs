use common::error::ApiError;
use common::model::auth::{ForgotPasswordRequest, MessageResponse};
use common::route::Route;
use common::validation::is_valid_email;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::app::PageProps;
use crate::components::form::{error_line, field};

pub enum Msg {
    Email(String),
    Submit,
    Done(Result<MessageResponse, ApiError>),
}

pub struct ForgotPassword {
    email: String,
    loading: bool,
    message: Option<String>,
    error: Option<String>,
}

impl Component for ForgotPassword {
    type Message = Msg;
    type Properties = PageProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            email: String::new(),
            loading: false,
            message: None,
            error: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Email(v) => self.email = v,
            Msg::Submit => {
                self.error = None;
                self.message = None;
                if !is_valid_email(&self.email) {
                    self.error = Some("Adresse email invalide".into());
                    return true;
                }
                self.loading = true;
                let request = ForgotPasswordRequest {
                    email: self.email.trim().to_string(),
                };
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::Done(api::auth::forgot_password(&request).await));
                });
            }
            Msg::Done(result) => {
                self.loading = false;
                match result {
                    Ok(_) => self.message = Some("Un email de réinitialisation a été envoyé.".into()),
                    Err(err) => self.error = Some(err.user_message("Erreur inconnue")),
                }
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
        let to_login = ctx.props().app.navigate.reform(|_: MouseEvent| Route::Login);
        html! {
            <div class="centered-card">
                <h1>{ "Mot de passe oublié" }</h1>
                if let Some(message) = &self.message {
                    <p class="form-success">{ message }</p>
                }
                { error_line(self.error.as_deref()) }
                <form {onsubmit}>
                    { field("Email", "email", &self.email, true, link.callback(Msg::Email)) }
                    <button class="btn" type="submit" disabled={self.loading}>
                        { if self.loading { "Envoi..." } else { "Envoyer le lien" } }
                    </button>
                </form>
                <div class="card-links">
                    <a onclick={to_login}>{ "Retour à la connexion" }</a>
                </div>
            </div>
        }
    }
}

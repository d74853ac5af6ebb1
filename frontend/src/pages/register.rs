use common::error::ApiError;
use common::model::auth::{MessageResponse, RegisterForm};
use common::route::Route;
use common::validation::validate_registration;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::app::PageProps;
use crate::components::form::{error_line, field};

#[derive(Clone, Copy)]
pub enum Field {
    LastName,
    FirstName,
    Email,
    Password,
    Confirm,
}

pub enum Msg {
    Edit(Field, String),
    Submit,
    Done(Result<MessageResponse, ApiError>),
}

pub struct Register {
    form: RegisterForm,
    loading: bool,
    error: Option<String>,
    success: Option<String>,
}

impl Component for Register {
    type Message = Msg;
    type Properties = PageProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            form: RegisterForm::default(),
            loading: false,
            error: None,
            success: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Edit(field, value) => {
                self.error = None;
                match field {
                    Field::LastName => self.form.last_name = value,
                    Field::FirstName => self.form.name = value,
                    Field::Email => self.form.email = value,
                    Field::Password => self.form.password = value,
                    Field::Confirm => self.form.confirm_password = value,
                }
            }
            Msg::Submit => {
                if self.loading {
                    return false;
                }
                let request = match validate_registration(&self.form) {
                    Ok(request) => request,
                    Err(err) => {
                        self.error = Some(err.to_string());
                        return true;
                    }
                };
                self.loading = true;
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::Done(api::auth::register(&request).await));
                });
            }
            Msg::Done(Ok(answer)) => {
                self.loading = false;
                self.form = RegisterForm::default();
                self.success = Some(answer.message.unwrap_or_else(|| {
                    "Compte créé. Vérifiez votre email pour activer votre compte.".to_string()
                }));
            }
            Msg::Done(Err(err)) => {
                self.loading = false;
                self.error = Some(err.user_message("Erreur lors de l'inscription"));
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let edit = |f: Field| link.callback(move |v: String| Msg::Edit(f, v));
        let onsubmit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Submit
        });
        let to_login = ctx.props().app.navigate.reform(|_: MouseEvent| Route::Login);
        html! {
            <div class="centered-card">
                <h1>{ "Inscription" }</h1>
                { error_line(self.error.as_deref()) }
                if let Some(message) = &self.success {
                    <p class="form-success">{ message }</p>
                }
                <form {onsubmit} novalidate={true}>
                    { field("Nom", "text", &self.form.last_name, true, edit(Field::LastName)) }
                    { field("Prénom", "text", &self.form.name, true, edit(Field::FirstName)) }
                    { field("Email", "email", &self.form.email, true, edit(Field::Email)) }
                    { field("Mot de passe", "password", &self.form.password, true, edit(Field::Password)) }
                    { field("Confirmer le mot de passe", "password", &self.form.confirm_password, true, edit(Field::Confirm)) }
                    <button class="btn" type="submit" disabled={self.loading}>
                        { if self.loading { "Inscription..." } else { "S'inscrire" } }
                    </button>
                </form>
                <div class="card-links">
                    <a onclick={to_login}>{ "Déjà inscrit ? Se connecter" }</a>
                </div>
            </div>
        }
    }
}

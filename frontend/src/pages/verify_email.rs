use common::error::ApiError;
use common::model::auth::MessageResponse;
use common::route::Route;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::app::AppContext;

#[derive(Properties, PartialEq)]
pub struct VerifyEmailProps {
    pub app: AppContext,
    pub token: String,
}

pub enum Msg {
    Done(Result<MessageResponse, ApiError>),
}

enum Status {
    Loading,
    Verified(String),
    Failed(String),
}

pub struct VerifyEmail {
    status: Status,
}

impl Component for VerifyEmail {
    type Message = Msg;
    type Properties = VerifyEmailProps;

    fn create(ctx: &Context<Self>) -> Self {
        let token = ctx.props().token.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::Done(api::auth::verify_email(&token).await));
        });
        Self { status: Status::Loading }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        let Msg::Done(result) = msg;
        self.status = match result {
            Ok(answer) => Status::Verified(
                answer
                    .message
                    .unwrap_or_else(|| "Email vérifié avec succès.".to_string()),
            ),
            Err(err) => Status::Failed(err.user_message("Lien invalide ou expiré.")),
        };
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let to_login = ctx.props().app.navigate.reform(|_: MouseEvent| Route::Login);
        html! {
            <div class="centered-card">
                <h1>{ "Vérification de l'email" }</h1>
                {
                    match &self.status {
                        Status::Loading => html! { <p>{ "Traitement..." }</p> },
                        Status::Verified(message) => html! {
                            <>
                                <p class="form-success">{ message }</p>
                                <button class="btn" onclick={to_login}>{ "Se connecter" }</button>
                            </>
                        },
                        Status::Failed(message) => html! { <p class="form-error">{ message }</p> },
                    }
                }
            </div>
        }
    }
}

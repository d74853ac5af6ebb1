use common::error::ApiError;
use common::model::marche::Marche;
use common::route::Route;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::app::AppContext;
use crate::components::documents::DocumentBrowser;
use crate::components::toast::toast_error;

#[derive(Properties, PartialEq, Clone)]
pub struct MarcheDetailProps {
    pub app: AppContext,
    pub id: i64,
}

pub enum Msg {
    Loaded(Result<Marche, ApiError>),
    Localise,
}

pub struct MarcheDetail {
    marche: Option<Marche>,
    error: Option<String>,
}

impl Component for MarcheDetail {
    type Message = Msg;
    type Properties = MarcheDetailProps;

    fn create(ctx: &Context<Self>) -> Self {
        let id = ctx.props().id;
        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::Loaded(api::marches::get(id).await));
        });
        Self {
            marche: None,
            error: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let app = &ctx.props().app;
        match msg {
            Msg::Loaded(Ok(marche)) => self.marche = Some(marche),
            Msg::Loaded(Err(err)) => {
                app.report(&err, "Marché introuvable");
                self.error = Some(err.user_message("Marché introuvable"));
            }
            Msg::Localise => match self.marche.as_ref().and_then(Marche::position) {
                Some(at) => app.navigate.emit(Route::Map {
                    center: Some(at),
                    selection: None,
                }),
                None => toast_error("Coordonnées indisponibles pour ce marché"),
            },
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let navigate = &props.app.navigate;
        let id = props.id;

        let header = match (&self.marche, &self.error) {
            (Some(m), _) => html! {
                <div class="card marche-summary">
                    <h1>{ format!("Marché {}", m.num_marche) }</h1>
                    <dl>
                        <dt>{ "Objet" }</dt><dd>{ &m.objet }</dd>
                        <dt>{ "Année" }</dt><dd>{ m.annee }</dd>
                        <dt>{ "Organisme" }</dt><dd>{ m.organisme() }</dd>
                        <dt>{ "Type de communauté" }</dt>
                        <dd>{ m.type_communaute_publique.clone().unwrap_or_default() }</dd>
                        <dt>{ "N° boîte" }</dt><dd>{ m.num_boite.clone().unwrap_or_default() }</dd>
                        <dt>{ "Position" }</dt>
                        <dd>{
                            m.position()
                                .map(|p| format!("{:.5}, {:.5}", p.lat, p.lng))
                                .unwrap_or_else(|| "Non renseignée".into())
                        }</dd>
                    </dl>
                    <div class="row-actions">
                        <button class="btn secondary" onclick={navigate.reform(|_: MouseEvent| Route::Marches)}>
                            { "Retour" }
                        </button>
                        <button class="btn secondary" onclick={ctx.link().callback(|_| Msg::Localise)}>
                            { "Localiser" }
                        </button>
                        <button class="btn" onclick={navigate.reform(move |_: MouseEvent| Route::MarcheEdit { id })}>
                            { "Modifier" }
                        </button>
                    </div>
                </div>
            },
            (None, Some(error)) => html! { <p class="form-error">{ error }</p> },
            (None, None) => html! { <div class="page-loading">{ "Chargement du marché..." }</div> },
        };

        html! {
            <div class="marche-detail">
                { header }
                <DocumentBrowser app={props.app.clone()} marche_id={id} />
            </div>
        }
    }
}

//! Add and edit form for a marché.
//!
//! Both modes park their draft in the handoff before opening the map in
//! selection mode, and take it back (with the picked position) on return.

use common::error::ApiError;
use common::handoff::SelectionPurpose;
use common::model::marche::{FormField, Marche, MarcheForm};
use common::route::Route;
use common::sync::Mutation;
use common::validation::{parse_coordinates, validate_marche_update, validate_new_marche};
use gloo_timers::callback::Timeout;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::app::AppContext;
use crate::components::form::{error_line, field};
use crate::components::toast::toast_success;
use crate::config::TOAST_MS;

#[derive(Properties, PartialEq, Clone)]
pub struct MarcheFormProps {
    pub app: AppContext,
    /// `None` creates a marché, `Some` edits that one.
    pub id: Option<i64>,
}

pub enum Msg {
    Edit(FormField, String),
    Loaded(Result<Marche, ApiError>),
    PickOnMap,
    Submit,
    Saved(Mutation, Result<String, ApiError>),
    HideBanner,
}

pub struct MarcheFormPage {
    form: MarcheForm,
    loading: bool,
    submitting: bool,
    error: Option<String>,
    /// Position that just came back from the map.
    picked_banner: bool,
    banner_timer: Option<Timeout>,
}

impl Component for MarcheFormPage {
    type Message = Msg;
    type Properties = MarcheFormProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let purpose = purpose(props.id);
        let returned = props.app.handoff.borrow_mut().take(purpose);

        let mut page = Self {
            form: MarcheForm::blank(current_year()),
            loading: false,
            submitting: false,
            error: None,
            picked_banner: false,
            banner_timer: None,
        };

        match returned {
            Some((draft, picked)) => {
                page.form = draft;
                if picked.is_some() {
                    page.show_banner(ctx);
                }
            }
            None => {
                if let Some(id) = props.id {
                    page.loading = true;
                    let link = ctx.link().clone();
                    spawn_local(async move {
                        link.send_message(Msg::Loaded(api::marches::get(id).await));
                    });
                }
            }
        }
        page
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let app = &ctx.props().app;
        match msg {
            Msg::Edit(field, value) => {
                self.form.set(field, value);
                self.error = None;
            }
            Msg::Loaded(Ok(marche)) => {
                self.loading = false;
                self.form = MarcheForm::from_marche(&marche);
            }
            Msg::Loaded(Err(err)) => {
                self.loading = false;
                app.report(&err, "Impossible de charger le marché");
                self.error = Some(err.user_message("Impossible de charger le marché"));
            }
            Msg::PickOnMap => {
                let purpose = purpose(ctx.props().id);
                app.handoff.borrow_mut().begin(purpose, self.form.clone());
                let center = parse_coordinates(&self.form.latitude, &self.form.longitude)
                    .ok()
                    .flatten();
                app.navigate.emit(Route::Map {
                    center,
                    selection: Some(purpose),
                });
                return false;
            }
            Msg::Submit => {
                if self.submitting {
                    return false;
                }
                let mutation = match self.mutation(ctx.props().id) {
                    Ok(mutation) => mutation,
                    Err(message) => {
                        self.error = Some(message);
                        return true;
                    }
                };
                self.submitting = true;
                self.error = None;
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = api::execute(&mutation, None).await;
                    link.send_message(Msg::Saved(mutation, result));
                });
            }
            Msg::Saved(mutation, Ok(_)) => {
                self.submitting = false;
                toast_success(mutation.success_message());
                app.navigate.emit(Route::Marches);
                return false;
            }
            Msg::Saved(mutation, Err(err)) => {
                self.submitting = false;
                if err.is_unauthorized() {
                    app.session_expired.emit(());
                }
                self.error = Some(err.user_message(mutation.failure_fallback()));
            }
            Msg::HideBanner => {
                self.picked_banner = false;
                self.banner_timer = None;
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let editing = ctx.props().id.is_some();
        if self.loading {
            return html! { <div class="page-loading">{ "Chargement du marché..." }</div> };
        }
        let edit = |f: FormField| link.callback(move |value: String| Msg::Edit(f, value));
        let onsubmit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Submit
        });
        let cancel = ctx.props().app.navigate.reform(|_: MouseEvent| Route::Marches);

        html! {
            <div class="marche-form">
                <h1>{ if editing { "Modifier le marché" } else { "Nouveau marché" } }</h1>
                if self.picked_banner {
                    <div class="banner success">{ "Coordonnées sélectionnées sur la carte" }</div>
                }
                <form class="card" {onsubmit}>
                    { field("Numéro du marché", "text", &self.form.num_marche, true, edit(FormField::NumMarche)) }
                    { field("Objet", "text", &self.form.objet, true, edit(FormField::Objet)) }
                    { field("Année", "number", &self.form.annee, true, edit(FormField::Annee)) }
                    { field("N° boîte", "text", &self.form.num_boite, false, edit(FormField::NumBoite)) }
                    { field("Organisme", "text", &self.form.organisme, false, edit(FormField::Organisme)) }
                    { field(
                        "Type de communauté publique",
                        "text",
                        &self.form.type_communaute_publique,
                        false,
                        edit(FormField::TypeCommunaute),
                    ) }
                    <div class="coordinates">
                        { field("Latitude", "text", &self.form.latitude, false, edit(FormField::Latitude)) }
                        { field("Longitude", "text", &self.form.longitude, false, edit(FormField::Longitude)) }
                        <button type="button" class="btn secondary" onclick={link.callback(|_| Msg::PickOnMap)}>
                            { "Choisir sur la carte" }
                        </button>
                    </div>
                    { error_line(self.error.as_deref()) }
                    <div class="form-actions">
                        <button type="button" class="btn secondary" onclick={cancel}>{ "Annuler" }</button>
                        <button type="submit" class="btn" disabled={self.submitting}>
                            { if self.submitting { "Enregistrement..." } else { "Enregistrer" } }
                        </button>
                    </div>
                </form>
            </div>
        }
    }
}

impl MarcheFormPage {
    fn mutation(&self, id: Option<i64>) -> Result<Mutation, String> {
        let mutation = match id {
            None => validate_new_marche(&self.form).map(Mutation::CreateMarche),
            Some(id) => validate_marche_update(&self.form).map(|body| Mutation::UpdateMarche { id, body }),
        };
        mutation.map_err(|err| err.to_string())
    }

    fn show_banner(&mut self, ctx: &Context<Self>) {
        self.picked_banner = true;
        let link = ctx.link().clone();
        self.banner_timer = Some(Timeout::new(TOAST_MS, move || link.send_message(Msg::HideBanner)));
    }
}

fn purpose(id: Option<i64>) -> SelectionPurpose {
    match id {
        Some(id) => SelectionPurpose::EditMarche(id),
        None => SelectionPurpose::AddMarche,
    }
}

fn current_year() -> i32 {
    js_sys::Date::new_0().get_full_year() as i32
}

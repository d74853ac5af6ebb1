//! Paginated, filterable list of marchés.
//!
//! Every page request takes a ticket from the sequencer; a response that is
//! not the latest one is dropped, so a slow page 1 never overwrites page 2.

use common::error::ApiError;
use common::model::marche::{FilterField, Marche, MarcheFilters};
use common::pagination::{MarcheQuery, Page};
use common::route::Route;
use common::sequence::{RequestSequencer, Ticket};
use common::state::dialog::{DialogSlot, MarcheDialog};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::app::PageProps;
use crate::components::form::input_value;
use crate::components::sheet::Sheet;
use crate::components::toast::{toast_error, toast_success};
use crate::config::PAGE_SIZE;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Cards,
    Table,
}

pub enum Msg {
    Filter(FilterField, String),
    Search,
    ResetFilters,
    GoToPage(usize),
    Loaded(Ticket, Result<Page<Marche>, ApiError>),
    SetLayout(Layout),
    Localise(Marche),
    AskDelete(Marche),
    ConfirmDelete,
    CancelDelete,
    Deleted(Result<String, ApiError>),
}

pub struct MarchesList {
    filters: MarcheFilters,
    page: Page<Marche>,
    requested_page: usize,
    sequencer: RequestSequencer,
    loading: bool,
    error: Option<String>,
    layout: Layout,
    dialog: DialogSlot<MarcheDialog>,
}

impl Component for MarchesList {
    type Message = Msg;
    type Properties = PageProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut list = Self {
            filters: MarcheFilters::default(),
            page: Page::empty(PAGE_SIZE),
            requested_page: 1,
            sequencer: RequestSequencer::new(),
            loading: false,
            error: None,
            layout: Layout::Cards,
            dialog: DialogSlot::default(),
        };
        list.fetch(ctx);
        list
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let app = &ctx.props().app;
        match msg {
            Msg::Filter(field, value) => {
                self.filters.set(field, value);
                return false;
            }
            Msg::Search => {
                self.requested_page = 1;
                self.fetch(ctx);
            }
            Msg::ResetFilters => {
                self.filters = MarcheFilters::default();
                self.requested_page = 1;
                self.fetch(ctx);
            }
            Msg::GoToPage(page) => {
                self.requested_page = page.max(1);
                self.fetch(ctx);
            }
            Msg::Loaded(ticket, result) => {
                if !self.sequencer.is_current(ticket) {
                    return false;
                }
                self.loading = false;
                match result {
                    Ok(page) => {
                        self.page = page;
                        self.error = None;
                    }
                    Err(err) => {
                        app.report(&err, "Erreur lors du chargement des marchés");
                        self.error = Some(err.user_message("Erreur lors du chargement des marchés"));
                        self.page = Page::empty(PAGE_SIZE);
                    }
                }
            }
            Msg::SetLayout(layout) => self.layout = layout,
            Msg::Localise(marche) => match marche.position() {
                Some(at) => app.navigate.emit(Route::Map {
                    center: Some(at),
                    selection: None,
                }),
                None => toast_error("Coordonnées indisponibles pour ce marché"),
            },
            Msg::AskDelete(marche) => self.dialog.open(MarcheDialog::ConfirmDelete {
                id: marche.id,
                num_marche: marche.num_marche,
            }),
            Msg::ConfirmDelete => {
                let Ok(Some(mutation)) = self.dialog.confirm() else {
                    return true;
                };
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::Deleted(api::execute(&mutation, None).await));
                });
            }
            Msg::CancelDelete => self.dialog.cancel(),
            Msg::Deleted(Ok(_)) => {
                self.dialog.resolve(Ok(()));
                toast_success("Marché supprimé");
                self.fetch(ctx);
            }
            Msg::Deleted(Err(err)) => {
                let message = err.user_message("Erreur lors de la suppression du marché");
                if err.is_unauthorized() {
                    app.session_expired.emit(());
                }
                self.dialog.resolve(Err(message));
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        html! {
            <div class="marches-list">
                <div class="page-header">
                    <h1>{ "Marchés" }</h1>
                    <div class="toolbar">
                        <button
                            class={classes!("btn", "secondary", (self.layout == Layout::Cards).then_some("active"))}
                            onclick={link.callback(|_| Msg::SetLayout(Layout::Cards))}
                        >{ "Cartes" }</button>
                        <button
                            class={classes!("btn", "secondary", (self.layout == Layout::Table).then_some("active"))}
                            onclick={link.callback(|_| Msg::SetLayout(Layout::Table))}
                        >{ "Tableau" }</button>
                        <button class="btn" onclick={ctx.props().app.navigate.reform(|_: MouseEvent| Route::MarcheAdd)}>
                            { "Nouveau marché" }
                        </button>
                    </div>
                </div>
                { self.filter_bar(link) }
                if let Some(error) = &self.error {
                    <p class="form-error">{ error }</p>
                }
                if self.loading {
                    <p class="muted">{ "Chargement..." }</p>
                }
                {
                    if self.page.data.is_empty() && !self.loading {
                        html! { <p class="muted">{ "Aucun marché trouvé" }</p> }
                    } else {
                        match self.layout {
                            Layout::Cards => self.cards(ctx),
                            Layout::Table => self.table(ctx),
                        }
                    }
                }
                { self.pager(link) }
                { self.delete_dialog(link) }
            </div>
        }
    }
}

impl MarchesList {
    fn fetch(&mut self, ctx: &Context<Self>) {
        let ticket = self.sequencer.issue();
        let query = MarcheQuery::new(self.requested_page, PAGE_SIZE, self.filters.clone());
        self.loading = true;
        let link = ctx.link().clone();
        spawn_local(async move {
            let result = api::marches::list(&query).await;
            link.send_message(Msg::Loaded(ticket, result));
        });
    }

    fn filter_bar(&self, link: &yew::html::Scope<Self>) -> Html {
        let input = |label: &'static str, field: FilterField, value: &str| {
            html! {
                <input
                    placeholder={label}
                    value={value.to_string()}
                    oninput={link.callback(move |e: InputEvent| Msg::Filter(field, input_value(e)))}
                />
            }
        };
        let onsubmit = link.callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Search
        });
        html! {
            <form class="filters" {onsubmit}>
                { input("Numéro", FilterField::NumMarche, &self.filters.num_marche) }
                { input("Objet", FilterField::Objet, &self.filters.objet) }
                { input("Organisme", FilterField::Organisme, &self.filters.organisme) }
                { input("Année", FilterField::Annee, &self.filters.annee) }
                { input("N° boîte", FilterField::NumBoite, &self.filters.num_boite) }
                { input("Type de communauté", FilterField::TypeCommunaute, &self.filters.type_communaute) }
                <button class="btn" type="submit">{ "Rechercher" }</button>
                <button class="btn secondary" type="button" onclick={link.callback(|_| Msg::ResetFilters)}>
                    { "Réinitialiser" }
                </button>
            </form>
        }
    }

    fn actions(&self, ctx: &Context<Self>, marche: &Marche) -> Html {
        let navigate = &ctx.props().app.navigate;
        let id = marche.id;
        let localise = marche.clone();
        let delete = marche.clone();
        html! {
            <div class="row-actions">
                <button class="btn small" onclick={navigate.reform(move |_: MouseEvent| Route::MarcheDetail { id })}>
                    { "Détails" }
                </button>
                <button class="btn small secondary" onclick={navigate.reform(move |_: MouseEvent| Route::MarcheEdit { id })}>
                    { "Modifier" }
                </button>
                <button class="btn small secondary" onclick={ctx.link().callback(move |_| Msg::Localise(localise.clone()))}>
                    { "Localiser" }
                </button>
                <button class="btn small danger" onclick={ctx.link().callback(move |_| Msg::AskDelete(delete.clone()))}>
                    { "Supprimer" }
                </button>
            </div>
        }
    }

    fn cards(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="cards">
                { for self.page.data.iter().map(|m| html! {
                    <div class="card marche-card" key={m.id}>
                        <div class="card-title">
                            <strong>{ &m.num_marche }</strong>
                            <span class="badge">{ m.annee }</span>
                        </div>
                        <p>{ &m.objet }</p>
                        <p class="muted">{ m.organisme() }</p>
                        if let Some(kind) = &m.type_communaute_publique {
                            <p class="muted">{ kind }</p>
                        }
                        { self.actions(ctx, m) }
                    </div>
                }) }
            </div>
        }
    }

    fn table(&self, ctx: &Context<Self>) -> Html {
        html! {
            <table class="table">
                <thead>
                    <tr>
                        <th>{ "Numéro" }</th>
                        <th>{ "Objet" }</th>
                        <th>{ "Année" }</th>
                        <th>{ "Organisme" }</th>
                        <th>{ "Type" }</th>
                        <th>{ "N° boîte" }</th>
                        <th />
                    </tr>
                </thead>
                <tbody>
                    { for self.page.data.iter().map(|m| html! {
                        <tr key={m.id}>
                            <td>{ &m.num_marche }</td>
                            <td>{ &m.objet }</td>
                            <td>{ m.annee }</td>
                            <td>{ m.organisme() }</td>
                            <td>{ m.type_communaute_publique.clone().unwrap_or_default() }</td>
                            <td>{ m.num_boite.clone().unwrap_or_default() }</td>
                            <td>{ self.actions(ctx, m) }</td>
                        </tr>
                    }) }
                </tbody>
            </table>
        }
    }

    fn pager(&self, link: &yew::html::Scope<Self>) -> Html {
        let page = self.page.page;
        html! {
            <div class="pager">
                <button
                    class="btn secondary"
                    disabled={!self.page.has_previous()}
                    onclick={link.callback(move |_| Msg::GoToPage(page - 1))}
                >{ "Précédent" }</button>
                <span>{ format!("Page {} / {} ({} marchés)", page, self.page.total_pages, self.page.total_items) }</span>
                <button
                    class="btn secondary"
                    disabled={!self.page.has_next()}
                    onclick={link.callback(move |_| Msg::GoToPage(page + 1))}
                >{ "Suivant" }</button>
            </div>
        }
    }

    fn delete_dialog(&self, link: &yew::html::Scope<Self>) -> Html {
        let Some(open) = self.dialog.current() else {
            return html! {};
        };
        let MarcheDialog::ConfirmDelete { num_marche, .. } = &open.dialog;
        let submitting = self.dialog.is_submitting();
        html! {
            <Sheet title="Supprimer le marché" on_close={link.callback(|_| Msg::CancelDelete)}>
                <p>{ format!("Supprimer définitivement le marché {num_marche} ?") }</p>
                if let Some(error) = &open.error {
                    <p class="form-error">{ error }</p>
                }
                <div class="sheet-actions">
                    <button class="btn secondary" onclick={link.callback(|_| Msg::CancelDelete)}>{ "Annuler" }</button>
                    <button class="btn danger" disabled={submitting} onclick={link.callback(|_| Msg::ConfirmDelete)}>
                        { if submitting { "Suppression..." } else { "Supprimer" } }
                    </button>
                </div>
            </Sheet>
        }
    }
}

use common::model::marche::FilterField;
use common::state::map::{BaseLayer, DrawKind, MapMode};
use yew::html::Scope;
use yew::prelude::*;

use crate::components::form::input_value;

use super::messages::Msg;
use super::state::MapView;

pub fn view(map: &MapView, ctx: &Context<MapView>) -> Html {
    let link = ctx.link();
    html! {
        <div class="map-page">
            <div class="map-container" ref={map.container.clone()} />
            { toolbar(map, link) }
            { mode_banner(map, link) }
            if map.filters_open {
                { filters(map, link) }
            }
            { selection_panel(map, link) }
            if map.results_open {
                { results(map, link) }
            }
            if map.loading {
                <div class="map-overlay">{ "Chargement des marchés..." }</div>
            }
            if let Some(error) = &map.error {
                <div class="map-overlay error">{ error }</div>
            }
        </div>
    }
}

fn toolbar(map: &MapView, link: &Scope<MapView>) -> Html {
    let c = &map.controller;
    let idle = matches!(c.mode(), MapMode::Idle);
    html! {
        <div class="map-toolbar">
            <div class="layer-switch">
                { for BaseLayer::ALL.iter().map(|&layer| html! {
                    <button
                        class={classes!("btn", "small", (c.base_layer() == layer).then_some("active"))}
                        onclick={link.callback(move |_| Msg::SetBaseLayer(layer))}
                    >{ layer.label() }</button>
                }) }
            </div>
            <button class="btn small secondary" onclick={link.callback(|_| Msg::ToggleFilters)}>
                { format!("Filtres ({} affichés)", c.visible_marches().len()) }
            </button>
            <button class="btn small" disabled={!idle} onclick={link.callback(|_| Msg::StartSearch)}>
                { "Recherche par zone" }
            </button>
            if c.has_search() {
                <button class="btn small secondary" onclick={link.callback(|_| Msg::ToggleResults)}>
                    { format!("Résultats ({})", c.filtered_results().len()) }
                </button>
                <button class="btn small secondary" onclick={link.callback(|_| Msg::ClearSearch)}>
                    { "Effacer la zone" }
                </button>
            }
        </div>
    }
}

fn mode_banner(map: &MapView, link: &Scope<MapView>) -> Html {
    let mode = map.controller.mode();
    let text = match mode {
        MapMode::Idle => return html! {},
        MapMode::Selection { .. } => "Cliquez sur la carte pour choisir la position du marché".to_string(),
        MapMode::SearchDraw { vertices } => {
            format!("Tracez la zone de recherche : {} point(s)", vertices.len())
        }
        MapMode::GeometryDraw { kind, vertices, .. } => {
            format!("Tracé {} : {} point(s)", kind.label(), vertices.len())
        }
    };
    html! {
        <div class="map-banner">
            <span>{ text }</span>
            if mode.is_drawing() {
                <button
                    class="btn small secondary"
                    disabled={mode.vertices().is_empty()}
                    onclick={link.callback(|_| Msg::UndoVertex)}
                >{ "Annuler le dernier point" }</button>
                <button class="btn small" onclick={link.callback(|_| Msg::CompleteShape)}>{ "Terminer" }</button>
            }
            <button class="btn small danger" onclick={link.callback(|_| Msg::CancelMode)}>{ "Annuler" }</button>
        </div>
    }
}

fn filters(map: &MapView, link: &Scope<MapView>) -> Html {
    let f = map.controller.filters();
    let input = |label: &'static str, field: FilterField, value: &str| {
        html! {
            <label class="field">
                <span>{ label }</span>
                <input
                    value={value.to_string()}
                    oninput={link.callback(move |e: InputEvent| Msg::Filter(field, input_value(e)))}
                />
            </label>
        }
    };
    html! {
        <aside class="map-panel filters">
            <h3>{ "Filtres" }</h3>
            { input("Numéro", FilterField::NumMarche, &f.num_marche) }
            { input("Objet", FilterField::Objet, &f.objet) }
            { input("Organisme", FilterField::Organisme, &f.organisme) }
            { input("Année", FilterField::Annee, &f.annee) }
            { input("N° boîte", FilterField::NumBoite, &f.num_boite) }
            { input("Type de communauté", FilterField::TypeCommunaute, &f.type_communaute) }
            <button class="btn small secondary" onclick={link.callback(|_| Msg::ResetFilters)}>
                { "Réinitialiser" }
            </button>
        </aside>
    }
}

fn selection_panel(map: &MapView, link: &Scope<MapView>) -> Html {
    let c = &map.controller;
    let Some(marche) = c.selected() else {
        return html! {};
    };
    let id = marche.id;
    let idle = matches!(c.mode(), MapMode::Idle) && !map.saving_geometry;
    html! {
        <aside class="map-panel selection">
            <div class="sheet-header">
                <h3>{ &marche.num_marche }</h3>
                <button class="icon-btn" title="Fermer" onclick={link.callback(|_| Msg::ClearSelection)}>{ "✕" }</button>
            </div>
            <p>{ &marche.objet }</p>
            <p class="muted">{ format!("{} · {}", marche.organisme(), marche.annee) }</p>
            <button class="btn small secondary" onclick={link.callback(move |_| Msg::OpenDetails(id))}>
                { "Voir les détails" }
            </button>
            <h4>{ "Ajouter une géométrie" }</h4>
            <div class="row-actions">
                { for [DrawKind::Point, DrawKind::Line, DrawKind::Polygon].iter().map(|&kind| html! {
                    <button
                        class="btn small"
                        disabled={!idle}
                        onclick={link.callback(move |_| Msg::StartGeometry(kind))}
                    >{ kind.label() }</button>
                }) }
            </div>
            if map.saving_geometry {
                <p class="muted">{ "Enregistrement de la géométrie..." }</p>
            }
            <h4>{ format!("Géométries ({})", c.geometries().len()) }</h4>
            <ul class="geometry-list">
                { for c.geometries().iter().map(|g| html! {
                    <li>
                        { g.geometry.label() }
                        if let Some(created) = &g.created_at {
                            <span class="muted">{ format!(" · {}", created.get(..10).unwrap_or(created)) }</span>
                        }
                    </li>
                }) }
            </ul>
        </aside>
    }
}

fn results(map: &MapView, link: &Scope<MapView>) -> Html {
    let c = &map.controller;
    let page = c.results_page();
    let current = page.page;
    let only_on_map = c.results_only_on_map();
    html! {
        <aside class="map-panel results">
            <div class="sheet-header">
                <h3>{ format!("{} marché(s) dans la zone", page.total_items) }</h3>
                <button class="icon-btn" title="Fermer" onclick={link.callback(|_| Msg::ToggleResults)}>{ "✕" }</button>
            </div>
            <input
                placeholder="Filtrer les résultats"
                value={c.results_filter().to_string()}
                oninput={link.callback(|e: InputEvent| Msg::ResultsFilter(input_value(e)))}
            />
            <label class="checkbox">
                <input
                    type="checkbox"
                    checked={only_on_map}
                    onchange={link.callback(move |_| Msg::ShowResultsOnMap(!only_on_map))}
                />
                { "Afficher uniquement ces marchés sur la carte" }
            </label>
            <ul class="results-list">
                { for page.data.iter().map(|m| {
                    let id = m.id;
                    html! {
                        <li key={id}>
                            <strong>{ &m.num_marche }</strong>
                            <span>{ &m.objet }</span>
                            <span class="muted">{ m.organisme() }</span>
                            <button class="btn small secondary" onclick={link.callback(move |_| Msg::ViewOnMap(id))}>
                                { "Voir sur la carte" }
                            </button>
                        </li>
                    }
                }) }
            </ul>
            <div class="pager">
                <button
                    class="btn small secondary"
                    disabled={!page.has_previous()}
                    onclick={link.callback(move |_| Msg::ResultsPage(current - 1))}
                >{ "‹" }</button>
                <span>{ format!("{} / {}", current, page.total_pages.max(1)) }</span>
                <button
                    class="btn small secondary"
                    disabled={!page.has_next()}
                    onclick={link.callback(move |_| Msg::ResultsPage(current + 1))}
                >{ "›" }</button>
            </div>
        </aside>
    }
}

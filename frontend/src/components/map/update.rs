use common::model::geometry::{MarcheGeometry, NewGeometry};
use common::route::Route;
use common::state::map::{MapEffect, MapError, MapMode};
use common::sync::Mutation;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::components::toast::{show_toast, toast_error, toast_success, ToastKind};

use super::messages::Msg;
use super::state::MapView;

/// Deepest zoom a cluster click flies to.
const MAX_CLUSTER_ZOOM: f64 = 18.0;

pub fn update(view: &mut MapView, ctx: &Context<MapView>, msg: Msg) -> bool {
    let app = &ctx.props().app;
    let c = &mut view.controller;
    match msg {
        Msg::MarchesLoaded(result) => {
            view.loading = false;
            match result {
                Ok(marches) => {
                    c.set_marches(marches);
                    view.error = None;
                }
                Err(err) => {
                    app.report(&err, "Erreur lors du chargement des marchés");
                    view.error = Some(err.user_message("Erreur lors du chargement des marchés"));
                    c.set_marches(Vec::new());
                }
            }
        }
        Msg::MapUnavailable => view.error = Some("La carte n'a pas pu être chargée".into()),
        Msg::MapClicked(at) => {
            let effects = c.click(at);
            return run(view, ctx, effects);
        }
        Msg::ViewportChanged => {
            let Some((center, zoom)) = view.leaflet.as_ref().and_then(|l| l.viewport()) else {
                return false;
            };
            let regroup = zoom != c.zoom();
            c.set_viewport(center, zoom);
            return regroup;
        }
        Msg::MarkerClicked(id) => {
            let effects = c.select_marche(id);
            apply(view, ctx, effects);
        }
        Msg::ClusterClicked(at) => {
            let zoom = (c.zoom() + 2.0).min(MAX_CLUSTER_ZOOM);
            apply(view, ctx, vec![MapEffect::FlyTo { at, zoom }]);
            return false;
        }
        Msg::Filter(field, value) => c.set_filter(field, value),
        Msg::ResetFilters => c.reset_filters(),
        Msg::ToggleFilters => view.filters_open = !view.filters_open,
        Msg::SetBaseLayer(layer) => c.set_base_layer(layer),
        Msg::StartSearch => {
            let started = c.start_search_draw();
            view.results_open = false;
            return report(started);
        }
        Msg::StartGeometry(kind) => return report(c.start_geometry_draw(kind)),
        Msg::UndoVertex => return report(c.undo_vertex().map(|_| ())),
        Msg::CompleteShape => {
            let effects = c.complete_shape();
            return run(view, ctx, effects);
        }
        Msg::CancelMode => {
            // Leaving selection mode without a pick returns to the form as is.
            if let MapMode::Selection { purpose } = c.mode() {
                let back = MapEffect::NavigateBack {
                    route: purpose.return_route(),
                    delay_ms: 0,
                };
                c.cancel();
                apply(view, ctx, vec![back]);
                return false;
            }
            c.cancel();
        }
        Msg::ClearSelection => c.clear_selection(),
        Msg::OpenDetails(id) => {
            app.navigate.emit(Route::MarcheDetail { id });
            return false;
        }
        Msg::ClearSearch => {
            c.clear_search();
            view.results_open = false;
        }
        Msg::ToggleResults => view.results_open = !view.results_open && c.has_search(),
        Msg::ResultsFilter(text) => c.set_results_filter(text),
        Msg::ResultsPage(page) => c.set_results_page(page),
        Msg::ShowResultsOnMap(on) => {
            let effect = c.show_results_on_map(on);
            apply(view, ctx, effect.into_iter().collect());
        }
        Msg::ViewOnMap(id) => {
            let effects = c.view_on_map(id);
            apply(view, ctx, effects);
        }
        Msg::GeometriesLoaded(ticket, marche_id, result) => {
            if !view.geometry_requests.is_current(ticket) {
                return false;
            }
            match result {
                Ok(geometries) => c.set_geometries(marche_id, geometries),
                Err(err) => {
                    gloo_console::error!("Erreur chargement géométries", err.to_string());
                    c.set_geometries(marche_id, Vec::new());
                }
            }
        }
        Msg::GeometrySaved(mutation, Ok(body)) => {
            view.saving_geometry = false;
            toast_success(mutation.success_message());
            let saved = serde_json::from_str::<MarcheGeometry>(&body).ok();
            let effects = c.geometry_saved(&mutation, saved);
            apply(view, ctx, effects);
        }
        Msg::GeometrySaved(_, Err(err)) => {
            view.saving_geometry = false;
            if err.is_unauthorized() {
                app.session_expired.emit(());
            }
            toast_error(&c.geometry_failed(&err));
        }
    }
    true
}

/// Shows a rejected operation as a toast and re-renders on success.
fn report(outcome: Result<(), MapError>) -> bool {
    match outcome {
        Ok(()) => true,
        Err(err) => {
            toast_error(&err.to_string());
            false
        }
    }
}

fn run(view: &mut MapView, ctx: &Context<MapView>, effects: Result<Vec<MapEffect>, MapError>) -> bool {
    match effects {
        Ok(effects) => {
            apply(view, ctx, effects);
            true
        }
        Err(err) => report(Err(err)),
    }
}

/// Carries out controller effects.
fn apply(view: &mut MapView, ctx: &Context<MapView>, effects: Vec<MapEffect>) {
    for effect in effects {
        match effect {
            MapEffect::ShowResults { count } => {
                view.results_open = true;
                show_toast(&format!("{count} marché(s) dans la zone"), ToastKind::Info);
            }
            MapEffect::SubmitGeometry { marche_id, geometry } => {
                view.saving_geometry = true;
                let mutation = Mutation::CreateGeometry(NewGeometry { marche_id, geometry });
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = api::execute(&mutation, None).await;
                    link.send_message(Msg::GeometrySaved(mutation, result));
                });
            }
            MapEffect::CoordinatePicked { .. } | MapEffect::NavigateBack { .. } => {
                ctx.props().on_exit.emit(effect);
            }
            MapEffect::FlyTo { at, zoom } => {
                if let Some(leaflet) = &view.leaflet {
                    leaflet.fly_to(at, zoom);
                }
            }
            MapEffect::FitBounds(bbox) => {
                if let Some(leaflet) = &view.leaflet {
                    leaflet.fit(bbox);
                }
            }
            MapEffect::LoadGeometries { marche_id } => {
                let ticket = view.geometry_requests.issue();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = api::geometries::list(marche_id).await;
                    link.send_message(Msg::GeometriesLoaded(ticket, marche_id, result));
                });
            }
        }
    }
}

//! Mirrors the controller state onto the Leaflet layer groups.

use common::geo::marker::{marker_color, marker_svg, marker_tooltip};
use common::geo::LatLng;
use common::model::geometry::Geometry;
use common::state::map::{DrawKind, MapMode};
use wasm_bindgen::JsValue;
use yew::prelude::*;

use super::leaflet::{area, event_latlng, html_marker, line, on_click, vertex, Layer, Leaflet, ShapeStyle};
use super::messages::Msg;
use super::state::{Listener, MapView};

const SELECTED_COLOR: &str = "blue";
const STORED: ShapeStyle = ShapeStyle {
    color: "#2563eb",
    dashed: false,
};
const DRAFT: ShapeStyle = ShapeStyle {
    color: "#dc2626",
    dashed: true,
};
const SEARCH: ShapeStyle = ShapeStyle {
    color: "#7c3aed",
    dashed: false,
};

/// Creates the Leaflet map inside the container and wires its events.
pub fn mount(view: &mut MapView, ctx: &Context<MapView>) {
    let Some(element) = view.container.cast::<web_sys::HtmlElement>() else {
        return;
    };
    let c = &view.controller;
    match Leaflet::mount(&element, c.center(), c.zoom(), c.base_layer()) {
        Ok(leaflet) => {
            let link = ctx.link().clone();
            let click = Listener::new(move |event: JsValue| {
                if let Some(at) = event_latlng(&event) {
                    link.send_message(Msg::MapClicked(at));
                }
            });
            leaflet.on("click", &click);

            // zoomend is followed by moveend, one handler covers both.
            let link = ctx.link().clone();
            let moved = Listener::new(move |_: JsValue| link.send_message(Msg::ViewportChanged));
            leaflet.on("moveend", &moved);

            view.map_listeners = vec![click, moved];
            view.leaflet = Some(leaflet);
        }
        Err(err) => {
            gloo_console::error!("Leaflet indisponible", err);
            ctx.link().send_message(Msg::MapUnavailable);
        }
    }
}

pub fn sync(view: &mut MapView, ctx: &Context<MapView>) {
    let Some(leaflet) = view.leaflet.as_mut() else {
        return;
    };
    let c = &view.controller;
    leaflet.set_base(c.base_layer());

    let selected = c.selected().map(|m| m.id);
    let mut markers = Vec::new();
    let mut listeners = Vec::new();
    for cluster in c.clusters() {
        let link = ctx.link().clone();
        if cluster.is_single() {
            let id = cluster.members[0];
            let Some(marche) = c.marches().iter().find(|m| m.id == id) else {
                continue;
            };
            let color = if selected == Some(id) {
                SELECTED_COLOR
            } else {
                marker_color(marche.organisme())
            };
            let tooltip = marker_tooltip(marche);
            let layer = html_marker(cluster.center, &marker_svg(color), 32, Some(&tooltip));
            let handler = Listener::new(move |_: JsValue| link.send_message(Msg::MarkerClicked(id)));
            on_click(&layer, &handler);
            markers.push(layer);
            listeners.push(handler);
        } else {
            let html = format!(
                r#"<div class="cluster" style="background: {};">{}</div>"#,
                cluster.size().background(),
                cluster.members.len()
            );
            let at = cluster.center;
            let layer = html_marker(at, &html, 40, None);
            let handler = Listener::new(move |_: JsValue| link.send_message(Msg::ClusterClicked(at)));
            on_click(&layer, &handler);
            markers.push(layer);
            listeners.push(handler);
        }
    }
    leaflet.markers.replace(markers);
    view.marker_listeners = listeners;

    leaflet
        .geometries
        .replace(c.geometries().iter().map(|g| stored_shape(&g.geometry)).collect());
    leaflet.draft.replace(draft_shapes(c.mode()));
    leaflet.search.replace(
        c.search_polygon()
            .map(|polygon| vec![area(polygon.ring(), &SEARCH)])
            .unwrap_or_default(),
    );
}

fn stored_shape(geometry: &Geometry) -> Layer {
    let positions = geometry.positions();
    match geometry {
        Geometry::Point(p) => vertex(LatLng::from_lng_lat(*p), STORED.color),
        Geometry::LineString(_) => line(&positions, &STORED),
        Geometry::Polygon(_) => area(&positions, &STORED),
    }
}

/// Vertices captured so far, joined by the outline of the shape in progress.
fn draft_shapes(mode: &MapMode) -> Vec<Layer> {
    let vertices = mode.vertices();
    let closes = match mode {
        MapMode::SearchDraw { .. } => true,
        MapMode::GeometryDraw { kind, .. } => *kind == DrawKind::Polygon,
        _ => false,
    };
    let mut layers: Vec<Layer> = vertices.iter().map(|v| vertex(*v, DRAFT.color)).collect();
    if closes && vertices.len() >= 3 {
        layers.push(area(vertices, &DRAFT));
    } else if vertices.len() >= 2 {
        layers.push(line(vertices, &DRAFT));
    }
    layers
}

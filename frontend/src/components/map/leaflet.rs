//! Bindings to the Leaflet global `L`, loaded by `index.html`, and the handle
//! the map component keeps on its mounted map.
//!
//! Options objects are built with `serde_json` and handed over as plain JS
//! objects.

use common::geo::{BoundingBox, LatLng};
use common::state::map::BaseLayer;
use js_sys::Function;
use serde::Serialize;
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen]
extern "C" {
    pub type LeafletMap;

    #[wasm_bindgen(js_namespace = L, js_name = map, catch)]
    fn create_map(element: &web_sys::HtmlElement, options: &JsValue) -> Result<LeafletMap, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &LeafletMap, center: &JsValue, zoom: f64) -> LeafletMap;

    #[wasm_bindgen(method, js_name = flyTo)]
    fn fly_to(this: &LeafletMap, center: &JsValue, zoom: f64);

    #[wasm_bindgen(method, js_name = fitBounds)]
    fn fit_bounds(this: &LeafletMap, bounds: &JsValue, options: &JsValue);

    #[wasm_bindgen(method, js_name = on)]
    fn on_map(this: &LeafletMap, event: &str, handler: &Function);

    #[wasm_bindgen(method, js_name = getZoom)]
    fn get_zoom(this: &LeafletMap) -> f64;

    #[wasm_bindgen(method, js_name = getCenter)]
    fn get_center(this: &LeafletMap) -> JsValue;

    #[wasm_bindgen(method, js_name = remove)]
    fn remove_map(this: &LeafletMap);

    pub type Layer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Layer, map: &LeafletMap) -> Layer;

    #[wasm_bindgen(method, js_name = remove)]
    fn remove_layer(this: &Layer) -> Layer;

    #[wasm_bindgen(method, js_name = on)]
    fn on_layer(this: &Layer, event: &str, handler: &Function) -> Layer;

    #[wasm_bindgen(method, js_name = bindTooltip)]
    fn bind_tooltip(this: &Layer, content: &str) -> Layer;

    #[wasm_bindgen(extends = Layer)]
    pub type LayerGroup;

    #[wasm_bindgen(js_namespace = L, js_name = layerGroup)]
    fn layer_group() -> LayerGroup;

    #[wasm_bindgen(method, js_name = clearLayers)]
    fn clear_layers(this: &LayerGroup);

    #[wasm_bindgen(method, js_name = addLayer)]
    fn add_layer(this: &LayerGroup, layer: &Layer);

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn tile_layer(url: &str, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn marker(at: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = divIcon)]
    fn div_icon(options: &JsValue) -> JsValue;

    #[wasm_bindgen(js_namespace = L, js_name = circleMarker)]
    fn circle_marker(at: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = polyline)]
    fn polyline(points: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = polygon)]
    fn polygon(points: &JsValue, options: &JsValue) -> Layer;
}

/// Plain JS object out of a serde value. Maps become objects, not `Map`s.
fn js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::UNDEFINED)
}

fn point(at: LatLng) -> JsValue {
    js(&[at.lat, at.lng])
}

fn points(path: &[LatLng]) -> JsValue {
    let pairs: Vec<[f64; 2]> = path.iter().map(|p| [p.lat, p.lng]).collect();
    js(&pairs)
}

/// Reads a Leaflet `LatLng` (`{lat, lng}`) out of a JS value.
pub fn read_latlng(value: &JsValue) -> Option<LatLng> {
    serde_wasm_bindgen::from_value(value.clone()).ok()
}

/// `latlng` of a Leaflet mouse event.
pub fn event_latlng(event: &JsValue) -> Option<LatLng> {
    let latlng = js_sys::Reflect::get(event, &JsValue::from_str("latlng")).ok()?;
    read_latlng(&latlng)
}

/// Shape style of a drawn or stored geometry.
pub struct ShapeStyle {
    pub color: &'static str,
    pub dashed: bool,
}

impl ShapeStyle {
    fn options(&self) -> Value {
        let mut options = json!({ "color": self.color, "weight": 3, "fillOpacity": 0.15 });
        if self.dashed {
            options["dashArray"] = json!("6 6");
        }
        options
    }
}

/// A mounted Leaflet map with one layer group per concern.
pub struct Leaflet {
    map: LeafletMap,
    base: Layer,
    base_kind: BaseLayer,
    pub markers: LayerGroup,
    pub geometries: LayerGroup,
    pub draft: LayerGroup,
    pub search: LayerGroup,
}

impl Leaflet {
    pub fn mount(element: &web_sys::HtmlElement, center: LatLng, zoom: f64, base_kind: BaseLayer) -> Result<Self, JsValue> {
        let map = create_map(element, &js(&json!({ "zoomControl": true })))?;
        map.set_view(&point(center), zoom);
        let base = base_tiles(base_kind);
        base.add_to(&map);
        let group = |map: &LeafletMap| {
            let g = layer_group();
            g.add_to(map);
            g
        };
        Ok(Self {
            markers: group(&map),
            geometries: group(&map),
            search: group(&map),
            draft: group(&map),
            map,
            base,
            base_kind,
        })
    }

    /// Registers `handler` for a map event (`click`, `moveend`, ...).
    pub fn on(&self, event: &str, handler: &Closure<dyn FnMut(JsValue)>) {
        self.map.on_map(event, handler.as_ref().unchecked_ref());
    }

    pub fn viewport(&self) -> Option<(LatLng, f64)> {
        Some((read_latlng(&self.map.get_center())?, self.map.get_zoom()))
    }

    pub fn set_base(&mut self, kind: BaseLayer) {
        if kind == self.base_kind {
            return;
        }
        self.base.remove_layer();
        self.base = base_tiles(kind);
        self.base.add_to(&self.map);
        self.base_kind = kind;
    }

    pub fn fly_to(&self, at: LatLng, zoom: f64) {
        self.map.fly_to(&point(at), zoom);
    }

    pub fn fit(&self, bbox: BoundingBox) {
        self.map.fit_bounds(&js(&bbox.corners()), &js(&json!({ "padding": [40, 40], "maxZoom": 15 })));
    }

    pub fn remove(&self) {
        self.map.remove_map();
    }
}

fn base_tiles(kind: BaseLayer) -> Layer {
    tile_layer(
        kind.url(),
        &js(&json!({ "attribution": kind.attribution(), "maxZoom": 19 })),
    )
}

/// Marker drawn from inline HTML (pin or cluster bubble).
pub fn html_marker(at: LatLng, html: &str, size: u32, tooltip: Option<&str>) -> Layer {
    let icon = div_icon(&js(&json!({
        "html": html,
        "className": "marche-marker",
        "iconSize": [size, size],
        "iconAnchor": [size / 2, size],
    })));
    let options = js_sys::Object::new();
    js_sys::Reflect::set(&options, &JsValue::from_str("icon"), &icon).ok();
    let layer = marker(&point(at), &options);
    if let Some(text) = tooltip {
        layer.bind_tooltip(text);
    }
    layer
}

pub fn vertex(at: LatLng, color: &str) -> Layer {
    circle_marker(&point(at), &js(&json!({ "radius": 5, "color": color, "fillOpacity": 1.0 })))
}

pub fn line(path: &[LatLng], style: &ShapeStyle) -> Layer {
    polyline(&points(path), &js(&style.options()))
}

pub fn area(ring: &[LatLng], style: &ShapeStyle) -> Layer {
    polygon(&points(ring), &js(&style.options()))
}

/// Registers a click handler on a layer.
pub fn on_click(layer: &Layer, handler: &Closure<dyn FnMut(JsValue)>) {
    layer.on_layer("click", handler.as_ref().unchecked_ref());
}

impl LayerGroup {
    pub fn replace(&self, layers: Vec<Layer>) {
        self.clear_layers();
        for layer in &layers {
            self.add_layer(layer);
        }
    }
}

use common::sequence::RequestSequencer;
use common::state::map::MapController;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsValue;
use yew::prelude::*;

use super::leaflet::Leaflet;

pub type Listener = Closure<dyn FnMut(JsValue)>;

pub struct MapView {
    pub controller: MapController,
    pub container: NodeRef,
    /// `None` until the first render mounted the map, or when Leaflet is
    /// missing from the page.
    pub leaflet: Option<Leaflet>,
    /// Map-level handlers, alive as long as the map.
    pub map_listeners: Vec<Listener>,
    /// Marker handlers, replaced whenever the markers are redrawn.
    pub marker_listeners: Vec<Listener>,
    pub loading: bool,
    pub error: Option<String>,
    pub geometry_requests: RequestSequencer,
    pub saving_geometry: bool,
    pub filters_open: bool,
    pub results_open: bool,
}

impl MapView {
    pub fn new(controller: MapController) -> Self {
        Self {
            controller,
            container: NodeRef::default(),
            leaflet: None,
            map_listeners: Vec::new(),
            marker_listeners: Vec::new(),
            loading: true,
            error: None,
            geometry_requests: RequestSequencer::new(),
            saving_geometry: false,
            filters_open: false,
            results_open: false,
        }
    }
}

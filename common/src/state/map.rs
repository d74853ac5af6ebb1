//! State of the map page: loaded marchés, selection, the draw-mode state
//! machine, the polygon search results and the viewport.
//!
//! The controller never talks to Leaflet or the network. Operations return
//! [`MapEffect`]s for the component to carry out.

use thiserror::Error;

use crate::error::ApiError;
use crate::geo::cluster::{CLUSTER_RADIUS_PX, Cluster, cluster_marches};
use crate::geo::{BoundingBox, LatLng, Polygon, marches_within};
use crate::handoff::SelectionPurpose;
use crate::model::geometry::{Geometry, MarcheGeometry};
use crate::model::marche::{FilterField, Marche, MarcheFilters};
use crate::pagination::{DEFAULT_PAGE_SIZE, Page, paginate};
use crate::route::Route;
use crate::sync::{Collection, Mutation};

pub const DEFAULT_CENTER: LatLng = LatLng::new(34.0333, -5.0);
pub const DEFAULT_ZOOM: f64 = 5.0;
pub const FLY_TO_ZOOM: f64 = 13.0;
/// Delay between a pick in selection mode and the navigation back to the form.
pub const SELECTION_EXIT_DELAY_MS: u32 = 200;

/// Shape drawn for a marché geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    Point,
    Line,
    Polygon,
}

impl DrawKind {
    pub fn min_vertices(self) -> usize {
        match self {
            DrawKind::Point => 1,
            DrawKind::Line => 2,
            DrawKind::Polygon => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DrawKind::Point => "Point",
            DrawKind::Line => "Ligne",
            DrawKind::Polygon => "Polygone",
        }
    }

    fn geometry(self, vertices: &[LatLng]) -> Geometry {
        match self {
            DrawKind::Point => Geometry::Point(vertices[0].to_lng_lat()),
            DrawKind::Line => Geometry::line(vertices),
            DrawKind::Polygon => Geometry::polygon(vertices),
        }
    }
}

/// Tile source of the map background.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BaseLayer {
    #[default]
    Street,
    Satellite,
    Dark,
}

impl BaseLayer {
    pub const ALL: [BaseLayer; 3] = [BaseLayer::Street, BaseLayer::Satellite, BaseLayer::Dark];

    pub fn url(self) -> &'static str {
        match self {
            BaseLayer::Street => "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            BaseLayer::Satellite => {
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
            }
            BaseLayer::Dark => "https://tiles.stadiamaps.com/tiles/alidade_smooth_dark/{z}/{x}/{y}{r}.png",
        }
    }

    pub fn attribution(self) -> &'static str {
        match self {
            BaseLayer::Street => "&copy; OpenStreetMap contributors",
            BaseLayer::Satellite => "Tiles © Esri & Contributors",
            BaseLayer::Dark => "&copy; Stadia Maps",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BaseLayer::Street => "Plan",
            BaseLayer::Satellite => "Satellite",
            BaseLayer::Dark => "Sombre",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum MapMode {
    #[default]
    Idle,
    SearchDraw {
        vertices: Vec<LatLng>,
    },
    GeometryDraw {
        marche_id: i64,
        kind: DrawKind,
        vertices: Vec<LatLng>,
    },
    Selection {
        purpose: SelectionPurpose,
    },
}

impl MapMode {
    pub fn is_drawing(&self) -> bool {
        matches!(self, MapMode::SearchDraw { .. } | MapMode::GeometryDraw { .. })
    }

    /// Vertices captured so far by the active draw.
    pub fn vertices(&self) -> &[LatLng] {
        match self {
            MapMode::SearchDraw { vertices } | MapMode::GeometryDraw { vertices, .. } => vertices,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapEffect {
    /// The polygon search finished; the results panel opens.
    ShowResults { count: usize },
    SubmitGeometry { marche_id: i64, geometry: Geometry },
    /// Write the picked position to the handoff.
    CoordinatePicked { purpose: SelectionPurpose, at: LatLng },
    NavigateBack { route: Route, delay_ms: u32 },
    FlyTo { at: LatLng, zoom: f64 },
    FitBounds(BoundingBox),
    LoadGeometries { marche_id: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("Veuillez d'abord sélectionner un marché sur la carte")]
    NoRecordSelected,
    #[error("{} : au moins {needed} sommets sont nécessaires", kind.label())]
    NotEnoughVertices { kind: DrawKind, needed: usize },
    #[error("Aucun tracé en cours")]
    NotDrawing,
    #[error("Terminez ou annulez le tracé en cours")]
    Busy,
}

#[derive(Debug, Clone)]
pub struct MapController {
    marches: Vec<Marche>,
    filters: MarcheFilters,
    mode: MapMode,
    selected: Option<i64>,
    geometries: Vec<MarcheGeometry>,
    search: Option<SearchResults>,
    base_layer: BaseLayer,
    center: LatLng,
    zoom: f64,
}

#[derive(Debug, Clone)]
struct SearchResults {
    polygon: Polygon,
    hits: Vec<Marche>,
    filter: String,
    page: usize,
    only_on_map: bool,
}

impl Default for MapController {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl MapController {
    /// Controller for a map route: centred on `center` when one was given,
    /// in selection mode when the route carries a purpose.
    pub fn new(center: Option<LatLng>, selection: Option<SelectionPurpose>) -> Self {
        Self {
            marches: Vec::new(),
            filters: MarcheFilters::default(),
            mode: selection.map_or(MapMode::Idle, |purpose| MapMode::Selection { purpose }),
            selected: None,
            geometries: Vec::new(),
            search: None,
            base_layer: BaseLayer::default(),
            center: center.unwrap_or(DEFAULT_CENTER),
            zoom: if center.is_some() { FLY_TO_ZOOM } else { DEFAULT_ZOOM },
        }
    }

    pub fn mode(&self) -> &MapMode {
        &self.mode
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Tracks the viewport after the user panned or zoomed.
    pub fn set_viewport(&mut self, center: LatLng, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
    }

    pub fn base_layer(&self) -> BaseLayer {
        self.base_layer
    }

    pub fn set_base_layer(&mut self, layer: BaseLayer) {
        self.base_layer = layer;
    }

    pub fn marches(&self) -> &[Marche] {
        &self.marches
    }

    /// Replaces the loaded records. A selection whose record vanished is
    /// dropped together with its geometries.
    pub fn set_marches(&mut self, marches: Vec<Marche>) {
        self.marches = marches;
        if let Some(id) = self.selected {
            if !self.marches.iter().any(|m| m.id == id) {
                self.clear_selection();
            }
        }
    }

    pub fn filters(&self) -> &MarcheFilters {
        &self.filters
    }

    pub fn set_filter(&mut self, field: FilterField, value: String) {
        self.filters.set(field, value);
    }

    pub fn reset_filters(&mut self) {
        self.filters = MarcheFilters::default();
    }

    /// Markers on the map: records with a position matching the filter
    /// panel, restricted to the search hits when "show on map" is on.
    pub fn visible_marches(&self) -> Vec<&Marche> {
        let only: Option<&[Marche]> = self
            .search
            .as_ref()
            .filter(|s| s.only_on_map)
            .map(|s| s.hits.as_slice());
        self.marches
            .iter()
            .filter(|m| m.position().is_some() && self.filters.matches(m))
            .filter(|m| only.is_none_or(|hits| hits.iter().any(|h| h.id == m.id)))
            .collect()
    }

    pub fn clusters(&self) -> Vec<Cluster> {
        cluster_marches(self.visible_marches(), self.zoom, CLUSTER_RADIUS_PX)
    }

    pub fn selected(&self) -> Option<&Marche> {
        let id = self.selected?;
        self.marches.iter().find(|m| m.id == id)
    }

    /// Selects a record (marker click or list). Its geometries are loaded and
    /// the map flies to it when it has a position.
    pub fn select_marche(&mut self, id: i64) -> Vec<MapEffect> {
        let Some(marche) = self.marches.iter().find(|m| m.id == id) else {
            return Vec::new();
        };
        let mut effects = vec![MapEffect::LoadGeometries { marche_id: id }];
        if let Some(at) = marche.position() {
            effects.push(MapEffect::FlyTo {
                at,
                zoom: self.zoom.max(FLY_TO_ZOOM),
            });
        }
        if self.selected != Some(id) {
            self.geometries.clear();
        }
        self.selected = Some(id);
        effects
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.geometries.clear();
        if matches!(self.mode, MapMode::GeometryDraw { .. }) {
            self.mode = MapMode::Idle;
        }
    }

    pub fn geometries(&self) -> &[MarcheGeometry] {
        &self.geometries
    }

    /// Applies a geometry fetch; answers for a record that is no longer
    /// selected are ignored.
    pub fn set_geometries(&mut self, marche_id: i64, geometries: Vec<MarcheGeometry>) {
        if self.selected == Some(marche_id) {
            self.geometries = geometries;
        }
    }

    /// Shows the stored geometry right away and asks for the collection the
    /// mutation invalidated. The reload replaces the local append.
    pub fn geometry_saved(&mut self, mutation: &Mutation, saved: Option<MarcheGeometry>) -> Vec<MapEffect> {
        if let Some(saved) = saved.filter(|g| self.selected == Some(g.marche_id)) {
            self.geometries.push(saved);
        }
        match mutation.refetch() {
            Collection::Geometries { marche_id } if self.selected == Some(marche_id) => {
                vec![MapEffect::LoadGeometries { marche_id }]
            }
            _ => Vec::new(),
        }
    }

    /// Alert text for a rejected geometry submission.
    pub fn geometry_failed(&self, err: &ApiError) -> String {
        err.user_message("Erreur lors de la sauvegarde de la géométrie")
    }

    fn ensure_idle(&self) -> Result<(), MapError> {
        match self.mode {
            MapMode::Idle => Ok(()),
            _ => Err(MapError::Busy),
        }
    }

    /// Starts drawing the search polygon. Any previous search is discarded.
    pub fn start_search_draw(&mut self) -> Result<(), MapError> {
        self.ensure_idle()?;
        self.search = None;
        self.mode = MapMode::SearchDraw { vertices: Vec::new() };
        Ok(())
    }

    /// Starts drawing a geometry for the selected record.
    pub fn start_geometry_draw(&mut self, kind: DrawKind) -> Result<(), MapError> {
        let marche_id = self.selected.ok_or(MapError::NoRecordSelected)?;
        self.ensure_idle()?;
        self.mode = MapMode::GeometryDraw {
            marche_id,
            kind,
            vertices: Vec::new(),
        };
        Ok(())
    }

    /// A click on the map background. Draws capture a vertex, a point
    /// geometry completes at once, selection mode picks the position.
    pub fn click(&mut self, at: LatLng) -> Result<Vec<MapEffect>, MapError> {
        match &mut self.mode {
            MapMode::Idle => Ok(Vec::new()),
            MapMode::Selection { purpose } => {
                let purpose = *purpose;
                self.mode = MapMode::Idle;
                Ok(vec![
                    MapEffect::CoordinatePicked { purpose, at },
                    MapEffect::NavigateBack {
                        route: purpose.return_route(),
                        delay_ms: SELECTION_EXIT_DELAY_MS,
                    },
                ])
            }
            MapMode::GeometryDraw {
                kind: DrawKind::Point,
                vertices,
                ..
            } => {
                vertices.clear();
                vertices.push(at);
                self.complete_shape()
            }
            MapMode::SearchDraw { .. } | MapMode::GeometryDraw { .. } => {
                self.add_vertex(at)?;
                Ok(Vec::new())
            }
        }
    }

    pub fn add_vertex(&mut self, at: LatLng) -> Result<(), MapError> {
        match &mut self.mode {
            MapMode::SearchDraw { vertices } | MapMode::GeometryDraw { vertices, .. } => {
                vertices.push(at);
                Ok(())
            }
            _ => Err(MapError::NotDrawing),
        }
    }

    pub fn undo_vertex(&mut self) -> Result<Option<LatLng>, MapError> {
        match &mut self.mode {
            MapMode::SearchDraw { vertices } | MapMode::GeometryDraw { vertices, .. } => Ok(vertices.pop()),
            _ => Err(MapError::NotDrawing),
        }
    }

    /// Finishes the active draw. Too few vertices leave the draw running.
    pub fn complete_shape(&mut self) -> Result<Vec<MapEffect>, MapError> {
        match &self.mode {
            MapMode::SearchDraw { vertices } => {
                let polygon = Polygon::new(vertices.clone()).ok_or(MapError::NotEnoughVertices {
                    kind: DrawKind::Polygon,
                    needed: DrawKind::Polygon.min_vertices(),
                })?;
                let hits = marches_within(&self.marches, &polygon);
                let count = hits.len();
                let bbox = polygon.bbox();
                self.search = Some(SearchResults {
                    polygon,
                    hits,
                    filter: String::new(),
                    page: 1,
                    only_on_map: false,
                });
                self.mode = MapMode::Idle;
                Ok(vec![MapEffect::ShowResults { count }, MapEffect::FitBounds(bbox)])
            }
            MapMode::GeometryDraw {
                marche_id,
                kind,
                vertices,
            } => {
                if vertices.len() < kind.min_vertices() {
                    return Err(MapError::NotEnoughVertices {
                        kind: *kind,
                        needed: kind.min_vertices(),
                    });
                }
                let effect = MapEffect::SubmitGeometry {
                    marche_id: *marche_id,
                    geometry: kind.geometry(vertices),
                };
                self.mode = MapMode::Idle;
                Ok(vec![effect])
            }
            _ => Err(MapError::NotDrawing),
        }
    }

    /// Leaves whatever mode is active. Captured vertices are discarded.
    pub fn cancel(&mut self) {
        self.mode = MapMode::Idle;
    }

    pub fn has_search(&self) -> bool {
        self.search.is_some()
    }

    pub fn search_polygon(&self) -> Option<&Polygon> {
        self.search.as_ref().map(|s| &s.polygon)
    }

    pub fn clear_search(&mut self) {
        self.search = None;
    }

    pub fn results_filter(&self) -> &str {
        self.search.as_ref().map_or("", |s| s.filter.as_str())
    }

    pub fn set_results_filter(&mut self, text: String) {
        if let Some(search) = &mut self.search {
            search.filter = text;
            search.page = 1;
        }
    }

    /// Search hits matching the results list filter.
    pub fn filtered_results(&self) -> Vec<Marche> {
        self.search
            .as_ref()
            .map(|s| s.hits.iter().filter(|m| m.matches_text(&s.filter)).cloned().collect())
            .unwrap_or_default()
    }

    /// Current page of the results list.
    pub fn results_page(&self) -> Page<Marche> {
        let page = self.search.as_ref().map_or(1, |s| s.page);
        paginate(&self.filtered_results(), page, DEFAULT_PAGE_SIZE)
    }

    pub fn set_results_page(&mut self, page: usize) {
        if let Some(search) = &mut self.search {
            search.page = page.max(1);
        }
    }

    pub fn results_only_on_map(&self) -> bool {
        self.search.as_ref().is_some_and(|s| s.only_on_map)
    }

    /// Restricts the markers to the search hits (or lifts the restriction).
    /// Turning it on frames the hits.
    pub fn show_results_on_map(&mut self, on: bool) -> Option<MapEffect> {
        let search = self.search.as_mut()?;
        search.only_on_map = on;
        if !on {
            return None;
        }
        let positions: Vec<LatLng> = search.hits.iter().filter_map(Marche::position).collect();
        BoundingBox::of(&positions).map(MapEffect::FitBounds)
    }

    /// "Voir sur la carte" from the results list.
    pub fn view_on_map(&mut self, id: i64) -> Vec<MapEffect> {
        self.select_marche(id)
            .into_iter()
            .map(|effect| match effect {
                MapEffect::FlyTo { at, .. } => MapEffect::FlyTo { at, zoom: FLY_TO_ZOOM },
                other => other,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marche(id: i64, lat: f64, lng: f64) -> Marche {
        Marche {
            id,
            num_marche: format!("{id}/2024"),
            objet: format!("Objet {id}"),
            annee: 2024,
            num_boite: None,
            organisme: Some("Commune".into()),
            type_communaute_publique: None,
            latitude: Some(lat),
            longitude: Some(lng),
            created_at: None,
        }
    }

    fn loaded() -> MapController {
        let mut map = MapController::default();
        map.set_marches(vec![marche(1, 1.0, 1.0), marche(2, 5.0, 5.0), marche(3, 0.5, 1.5)]);
        map
    }

    fn draw_square(map: &mut MapController) {
        for (lat, lng) in [(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)] {
            map.click(LatLng::new(lat, lng)).unwrap();
        }
    }

    #[test]
    fn polygon_search_returns_to_idle_with_results() {
        let mut map = loaded();
        map.start_search_draw().unwrap();
        draw_square(&mut map);
        let effects = map.complete_shape().unwrap();
        assert_eq!(effects[0], MapEffect::ShowResults { count: 2 });
        assert_eq!(map.mode(), &MapMode::Idle);
        let ids: Vec<i64> = map.filtered_results().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3]);

        map.set_results_filter("objet 3".into());
        assert_eq!(map.results_page().data.len(), 1);

        assert!(map.show_results_on_map(true).is_some());
        assert_eq!(map.visible_marches().len(), 2);
    }

    #[test]
    fn search_polygon_needs_three_vertices() {
        let mut map = loaded();
        map.start_search_draw().unwrap();
        map.click(LatLng::new(0.0, 0.0)).unwrap();
        map.click(LatLng::new(1.0, 1.0)).unwrap();
        assert!(matches!(
            map.complete_shape(),
            Err(MapError::NotEnoughVertices { needed: 3, .. })
        ));
        assert!(map.mode().is_drawing());
        assert_eq!(map.undo_vertex(), Ok(Some(LatLng::new(1.0, 1.0))));
        map.cancel();
        assert_eq!(map.mode(), &MapMode::Idle);
    }

    #[test]
    fn geometry_draw_submits_for_the_selection() {
        let mut map = loaded();
        map.select_marche(2);
        map.start_geometry_draw(DrawKind::Line).unwrap();
        assert_eq!(map.start_search_draw(), Err(MapError::Busy));
        map.click(LatLng::new(5.0, 5.0)).unwrap();
        map.click(LatLng::new(5.5, 5.5)).unwrap();
        let effects = map.complete_shape().unwrap();
        assert_eq!(
            effects,
            vec![MapEffect::SubmitGeometry {
                marche_id: 2,
                geometry: Geometry::LineString(vec![[5.0, 5.0], [5.5, 5.5]]),
            }]
        );
        assert_eq!(map.mode(), &MapMode::Idle);
    }

    #[test]
    fn saved_geometry_reloads_the_selected_collection() {
        let mut map = loaded();
        map.select_marche(2);
        let geometry = Geometry::Point([5.0, 5.0]);
        let mutation = Mutation::CreateGeometry(crate::model::geometry::NewGeometry {
            marche_id: 2,
            geometry: geometry.clone(),
        });
        let saved = MarcheGeometry {
            id: Some(7),
            marche_id: 2,
            geometry,
            created_at: None,
        };

        let effects = map.geometry_saved(&mutation, Some(saved));
        assert_eq!(effects, vec![MapEffect::LoadGeometries { marche_id: 2 }]);
        assert_eq!(map.geometries().len(), 1);

        // An unreadable body still reloads.
        let effects = map.geometry_saved(&mutation, None);
        assert_eq!(effects, vec![MapEffect::LoadGeometries { marche_id: 2 }]);

        map.select_marche(1);
        assert!(map.geometry_saved(&mutation, None).is_empty());
    }

    #[test]
    fn point_geometry_completes_on_click() {
        let mut map = loaded();
        map.select_marche(1);
        map.start_geometry_draw(DrawKind::Point).unwrap();
        let effects = map.click(LatLng::new(1.0, 1.0)).unwrap();
        assert!(matches!(effects[0], MapEffect::SubmitGeometry { marche_id: 1, .. }));
    }

    #[test]
    fn selection_mode_picks_and_returns() {
        let mut map = MapController::new(None, Some(SelectionPurpose::EditMarche(8)));
        let effects = map.click(LatLng::new(33.0, -7.0)).unwrap();
        assert_eq!(
            effects,
            vec![
                MapEffect::CoordinatePicked {
                    purpose: SelectionPurpose::EditMarche(8),
                    at: LatLng::new(33.0, -7.0),
                },
                MapEffect::NavigateBack {
                    route: Route::MarcheEdit { id: 8 },
                    delay_ms: 200,
                },
            ]
        );
    }

    #[test]
    fn stale_geometry_answers_are_ignored() {
        let mut map = loaded();
        map.select_marche(1);
        map.select_marche(2);
        map.set_geometries(
            1,
            vec![MarcheGeometry {
                id: Some(1),
                marche_id: 1,
                geometry: Geometry::Point([1.0, 1.0]),
                created_at: None,
            }],
        );
        assert!(map.geometries().is_empty());
    }
}

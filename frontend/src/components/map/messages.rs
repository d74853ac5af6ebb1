use common::error::ApiError;
use common::geo::LatLng;
use common::model::geometry::MarcheGeometry;
use common::model::marche::{FilterField, Marche};
use common::sequence::Ticket;
use common::state::map::{BaseLayer, DrawKind};
use common::sync::Mutation;

pub enum Msg {
    MarchesLoaded(Result<Vec<Marche>, ApiError>),
    MapUnavailable,
    MapClicked(LatLng),
    ViewportChanged,
    MarkerClicked(i64),
    ClusterClicked(LatLng),
    Filter(FilterField, String),
    ResetFilters,
    ToggleFilters,
    SetBaseLayer(BaseLayer),
    StartSearch,
    StartGeometry(DrawKind),
    UndoVertex,
    CompleteShape,
    CancelMode,
    ClearSelection,
    OpenDetails(i64),
    ClearSearch,
    ToggleResults,
    ResultsFilter(String),
    ResultsPage(usize),
    ShowResultsOnMap(bool),
    ViewOnMap(i64),
    GeometriesLoaded(Ticket, i64, Result<Vec<MarcheGeometry>, ApiError>),
    GeometrySaved(Mutation, Result<String, ApiError>),
}

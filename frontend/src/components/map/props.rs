use common::geo::LatLng;
use common::handoff::SelectionPurpose;
use common::state::map::MapEffect;
use yew::prelude::*;

use crate::app::AppContext;

#[derive(Properties, PartialEq, Clone)]
pub struct MapViewProps {
    pub app: AppContext,
    /// Position to open on, from a "Localiser" action.
    #[prop_or_default]
    pub center: Option<LatLng>,
    /// Set when the form sent the user here to pick a position.
    #[prop_or_default]
    pub selection: Option<SelectionPurpose>,
    /// Effects that leave the map: a picked coordinate and the way back.
    pub on_exit: Callback<MapEffect>,
}

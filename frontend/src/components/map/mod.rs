//! Interactive map of the marchés.
//!
//! All decisions live in [`MapController`]; this component feeds it browser
//! events, carries out the [`MapEffect`]s it returns and mirrors its state
//! onto the Leaflet layers after every change.
//!
//! [`MapController`]: common::state::map::MapController
//! [`MapEffect`]: common::state::map::MapEffect

use common::state::map::MapController;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;

mod layers;
mod leaflet;
mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::MapViewProps;
pub use state::MapView;

impl Component for MapView {
    type Message = Msg;
    type Properties = MapViewProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::MarchesLoaded(api::marches::all().await));
        });
        MapView::new(MapController::new(props.center, props.selection))
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let render = update::update(self, ctx, msg);
        layers::sync(self, ctx);
        render
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            layers::mount(self, ctx);
            layers::sync(self, ctx);
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        if let Some(leaflet) = self.leaflet.take() {
            leaflet.remove();
        }
        self.map_listeners.clear();
        self.marker_listeners.clear();
    }
}

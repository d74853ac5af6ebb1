use common::geo::LatLng;
use common::handoff::SelectionPurpose;
use common::route::Route;
use common::state::map::MapEffect;
use gloo_timers::callback::Timeout;
use yew::prelude::*;

use crate::app::AppContext;
use crate::components::map::MapView;
use crate::components::toast::toast_success;

#[derive(Properties, PartialEq, Clone)]
pub struct MapPageProps {
    pub app: AppContext,
    #[prop_or_default]
    pub center: Option<LatLng>,
    #[prop_or_default]
    pub selection: Option<SelectionPurpose>,
}

pub enum Msg {
    Exit(MapEffect),
    Return(Route),
}

pub struct MapPage {
    return_timer: Option<Timeout>,
}

impl Component for MapPage {
    type Message = Msg;
    type Properties = MapPageProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self { return_timer: None }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let app = &ctx.props().app;
        match msg {
            Msg::Exit(MapEffect::CoordinatePicked { purpose, at }) => {
                app.handoff.borrow_mut().pick(purpose, at);
                toast_success(&format!("Position sélectionnée : {:.5}, {:.5}", at.lat, at.lng));
            }
            Msg::Exit(MapEffect::NavigateBack { route, delay_ms }) => {
                if delay_ms == 0 {
                    app.navigate.emit(route);
                } else {
                    let link = ctx.link().clone();
                    self.return_timer = Some(Timeout::new(delay_ms, move || {
                        link.send_message(Msg::Return(route));
                    }));
                }
            }
            Msg::Exit(_) => {}
            Msg::Return(route) => {
                self.return_timer = None;
                app.navigate.emit(route);
            }
        }
        false
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        html! {
            <MapView
                app={props.app.clone()}
                center={props.center}
                selection={props.selection}
                on_exit={ctx.link().callback(Msg::Exit)}
            />
        }
    }
}

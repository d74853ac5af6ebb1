use crate::app::App;

mod api;
mod app;
mod components;
mod config;
mod pages;
mod router;

fn main() {
    yew::Renderer::<App>::new().render();
}

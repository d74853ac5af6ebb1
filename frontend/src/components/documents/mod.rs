//! Document browser of a marché: its folder tree, the pieces filed in each
//! folder and every folder/piece action behind a modal sheet.
//!
//! The tree is always refetched after a successful change, never patched
//! locally. Loads are sequenced so an older answer cannot replace a newer one.

use yew::prelude::*;

mod helpers;
mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::DocumentBrowserProps;
pub use state::DocumentBrowser;

impl Component for DocumentBrowser {
    type Message = Msg;
    type Properties = DocumentBrowserProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut browser = DocumentBrowser::new();
        update::load(&mut browser, ctx);
        browser
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().marche_id != old_props.marche_id {
            *self = DocumentBrowser::new();
            update::load(self, ctx);
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }
}

//! Modal sheet sliding in from the top of the page.
//!
//! The sheet mounts hidden and receives the `show` class right after its
//! first render, which plays the CSS transition.

use gloo_timers::callback::Timeout;
use uuid::Uuid;
use yew::prelude::*;

pub struct Sheet {
    id: String,
    node_ref: NodeRef,
}

#[derive(Properties, PartialEq)]
pub struct SheetProps {
    pub title: AttrValue,
    pub on_close: Callback<()>,
    #[prop_or_default]
    pub wide: bool,
    #[prop_or_default]
    pub children: Html,
}

impl Component for Sheet {
    type Message = ();
    type Properties = SheetProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            id: format!("sheet-{}", Uuid::new_v4()),
            node_ref: NodeRef::default(),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let close = props.on_close.reform(|_: MouseEvent| ());
        html! {
            <div class="sheet-backdrop">
                <div
                    class={classes!("top-sheet", props.wide.then_some("wide"))}
                    id={self.id.clone()}
                    ref={self.node_ref.clone()}
                >
                    <div class="sheet-header">
                        <h3>{ props.title.clone() }</h3>
                        <button class="icon-btn" title="Fermer" onclick={close}>{ "✕" }</button>
                    </div>
                    <div class="sheet-body">{ props.children.clone() }</div>
                </div>
            </div>
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, first_render: bool) {
        if first_render {
            let node_ref = self.node_ref.clone();
            Timeout::new(50, move || {
                if let Some(sheet) = node_ref.cast::<web_sys::HtmlElement>() {
                    sheet.class_list().add_1("show").ok();
                }
            })
            .forget();
        }
    }
}

use yew::prelude::*;

use crate::app::AppContext;

#[derive(Properties, PartialEq, Clone)]
pub struct DocumentBrowserProps {
    pub app: AppContext,
    pub marche_id: i64,
}

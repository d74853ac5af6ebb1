use common::model::auth::User;
use common::route::Route;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct NavbarProps {
    pub route: Route,
    pub user: Option<User>,
    pub on_navigate: Callback<Route>,
    pub on_logout: Callback<()>,
}

#[function_component(Navbar)]
pub fn navbar(props: &NavbarProps) -> Html {
    let link = |target: Route, label: &'static str| {
        let active = std::mem::discriminant(&target) == std::mem::discriminant(&props.route);
        let onclick = props.on_navigate.reform(move |_: MouseEvent| target.clone());
        html! {
            <button class={classes!("nav-link", active.then_some("active"))} {onclick}>{ label }</button>
        }
    };
    let logout = props.on_logout.reform(|_: MouseEvent| ());

    html! {
        <nav class="navbar">
            <span class="brand">{ "Marchés publics" }</span>
            { link(Route::Dashboard, "Tableau de bord") }
            { link(Route::Marches, "Marchés") }
            { link(Route::MarcheAdd, "Nouveau marché") }
            { link(Route::Map { center: None, selection: None }, "Carte") }
            <span class="spacer" />
            <span class="user">{ props.user.as_ref().map(User::display_name).unwrap_or_default() }</span>
            <button class="btn secondary" onclick={logout}>{ "Déconnexion" }</button>
        </nav>
    }
}

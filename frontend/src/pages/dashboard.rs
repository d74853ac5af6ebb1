use common::error::ApiError;
use common::model::marche::Marche;
use common::route::Route;
use common::stats::{DashboardStats, PALETTE};
use num_format::{Locale, ToFormattedString};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::app::PageProps;

pub enum Msg {
    Loaded {
        marches: Result<Vec<Marche>, ApiError>,
        folders: Result<u64, ApiError>,
        pieces: Result<u64, ApiError>,
    },
}

pub struct Dashboard {
    stats: Option<DashboardStats>,
    error: Option<String>,
}

impl Component for Dashboard {
    type Message = Msg;
    type Properties = PageProps;

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        spawn_local(async move {
            let marches = api::marches::all().await;
            let folders = api::documents::count().await;
            let pieces = api::pieces::count().await;
            link.send_message(Msg::Loaded {
                marches,
                folders,
                pieces,
            });
        });
        Self {
            stats: None,
            error: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let Msg::Loaded {
            marches,
            folders,
            pieces,
        } = msg;
        let app = &ctx.props().app;
        let marches = marches.unwrap_or_else(|err| {
            app.report(&err, "Impossible de charger les données marchés.");
            self.error = Some(err.user_message("Impossible de charger les données marchés."));
            Vec::new()
        });
        // Count failures only zero their tile.
        let folders = folders.unwrap_or_else(|err| {
            gloo_console::error!("Erreur chargement total dossiers", err.to_string());
            0
        });
        let pieces = pieces.unwrap_or_else(|err| {
            gloo_console::error!("Erreur chargement total pièces", err.to_string());
            0
        });
        self.stats = Some(DashboardStats::compute(&marches, folders, pieces));
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let navigate = ctx.props().app.navigate.clone();
        let Some(stats) = &self.stats else {
            return html! { <div class="page-loading">{ "Chargement du tableau de bord..." }</div> };
        };
        let latest = stats
            .latest_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "—".into());

        html! {
            <div class="dashboard">
                <div class="page-header">
                    <h1>{ "Tableau de bord" }</h1>
                    <button class="btn" onclick={navigate.reform(|_: MouseEvent| Route::MarcheAdd)}>
                        { "Nouveau marché" }
                    </button>
                </div>
                if let Some(error) = &self.error {
                    <p class="form-error">{ error }</p>
                }
                <div class="tiles">
                    { tile("Marchés", format_count(stats.total_marches as u64)) }
                    { tile("Dernière année", latest) }
                    { tile("Dossiers", format_count(stats.total_folders)) }
                    { tile("Pièces", format_count(stats.total_pieces)) }
                </div>
                <div class="charts">
                    <section class="card">
                        <h2>{ "Marchés par année" }</h2>
                        { year_bars(stats) }
                    </section>
                    <section class="card">
                        <h2>{ "Répartition par type de communauté" }</h2>
                        { type_breakdown(stats) }
                    </section>
                </div>
            </div>
        }
    }
}

fn format_count(n: u64) -> String {
    n.to_formatted_string(&Locale::fr)
}

fn tile(label: &str, value: String) -> Html {
    html! {
        <div class="tile">
            <span class="tile-value">{ value }</span>
            <span class="tile-label">{ label }</span>
        </div>
    }
}

fn year_bars(stats: &DashboardStats) -> Html {
    if stats.by_year.is_empty() {
        return html! { <p class="muted">{ "Aucune donnée" }</p> };
    }
    let max = stats.max_per_year().max(1);
    html! {
        <div class="bars">
            { for stats.by_year.iter().map(|(year, count)| {
                let height = format!("height: {}%;", count * 100 / max);
                html! {
                    <div class="bar" title={format!("{year} : {count}")}>
                        <div class="bar-fill" style={height} />
                        <span class="bar-label">{ year }</span>
                    </div>
                }
            }) }
        </div>
    }
}

fn type_breakdown(stats: &DashboardStats) -> Html {
    if stats.by_type.is_empty() {
        return html! { <p class="muted">{ "Aucune donnée" }</p> };
    }
    html! {
        <ul class="breakdown">
            { for stats.by_type.iter().enumerate().map(|(i, (kind, count))| {
                let swatch = format!("background: {};", PALETTE[i % PALETTE.len()]);
                html! {
                    <li>
                        <span class="swatch" style={swatch} />
                        <span class="kind">{ kind }</span>
                        <span class="count">{ format!("{count} ({:.0} %)", stats.share(*count)) }</span>
                    </li>
                }
            }) }
        </ul>
    }
}

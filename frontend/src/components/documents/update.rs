use common::state::dialog::{DialogField, DocumentDialog};
use common::sync::{Collection, Mutation};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::components::toast::{toast_error, toast_success};
use crate::config::API_BASE;

use super::helpers::folder_ids;
use super::messages::Msg;
use super::state::DocumentBrowser;

/// Requests the tree of the current marché under a fresh ticket.
pub fn load(browser: &mut DocumentBrowser, ctx: &Context<DocumentBrowser>) {
    let ticket = browser.sequencer.issue();
    browser.loading = true;
    let marche_id = ctx.props().marche_id;
    let link = ctx.link().clone();
    spawn_local(async move {
        let result = api::documents::tree(marche_id).await;
        link.send_message(Msg::Loaded(ticket, result));
    });
}

pub fn update(browser: &mut DocumentBrowser, ctx: &Context<DocumentBrowser>, msg: Msg) -> bool {
    let app = &ctx.props().app;
    match msg {
        Msg::Reload => load(browser, ctx),
        Msg::Loaded(ticket, result) => {
            if !browser.sequencer.is_current(ticket) {
                return false;
            }
            browser.loading = false;
            match result {
                Ok(tree) => {
                    browser.tree = Some(tree);
                    browser.error = None;
                }
                Err(err) => {
                    app.report(&err, "Erreur lors du chargement des documents");
                    browser.error = Some(err.user_message("Erreur lors du chargement des documents"));
                    browser.tree = None;
                }
            }
        }
        Msg::Search(query) => browser.query = query,
        Msg::Toggle(id) => {
            if !browser.expanded.remove(&id) {
                browser.expanded.insert(id);
            }
        }
        Msg::ExpandAll => {
            if let Some(tree) = &browser.tree {
                browser.expanded = folder_ids(&tree.views()).into_iter().collect();
            }
        }
        Msg::CollapseAll => browser.expanded.clear(),
        Msg::Open(dialog) => {
            browser.file = None;
            browser.dialog.open(dialog);
        }
        Msg::Preview(piece) => match DocumentDialog::preview(&piece, API_BASE) {
            Some(dialog) => browser.dialog.open(dialog),
            None => toast_error("Aucun fichier disponible pour cette pièce"),
        },
        Msg::Edit(field, value) => browser.dialog.edit(field, value),
        Msg::FileChosen(file) => {
            let name = file.as_ref().map(|f| f.name()).unwrap_or_default();
            browser.dialog.edit(DialogField::File, name);
            browser.file = file;
        }
        Msg::Confirm => {
            // Validation failures are shown inside the dialog by the slot.
            if let Ok(Some(mutation)) = browser.dialog.confirm() {
                let file = browser.file.clone();
                browser.in_flight = Some(mutation.clone());
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = api::execute(&mutation, file.as_ref()).await;
                    link.send_message(Msg::Done(result));
                });
            }
        }
        Msg::Cancel => {
            browser.dialog.cancel();
            browser.file = None;
        }
        Msg::Done(Ok(_)) => {
            browser.dialog.resolve(Ok(()));
            browser.file = None;
            if let Some(mutation) = browser.in_flight.take() {
                toast_success(mutation.success_message());
                match &mutation {
                    Mutation::CreateFolder(folder) => {
                        if let Some(parent) = folder.id_parent {
                            browser.expanded.insert(parent);
                        }
                    }
                    Mutation::UploadPiece { upload, .. } => {
                        browser.expanded.insert(upload.hierarchie_id);
                    }
                    Mutation::DeleteFolder { id, .. } => {
                        browser.expanded.remove(id);
                    }
                    _ => {}
                }
                if matches!(mutation.refetch(), Collection::DocumentTree { .. }) {
                    load(browser, ctx);
                }
            }
        }
        Msg::Done(Err(err)) => {
            let fallback = browser
                .in_flight
                .take()
                .map(|m| m.failure_fallback())
                .unwrap_or("Erreur");
            if err.is_unauthorized() {
                app.session_expired.emit(());
            }
            gloo_console::error!(fallback, err.to_string());
            browser.dialog.resolve(Err(err.user_message(fallback)));
        }
        Msg::Download(piece) => {
            if !browser.downloading.insert(piece.id) {
                return false;
            }
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = api::pieces::download(&piece).await;
                link.send_message(Msg::Downloaded(piece.id, result));
            });
        }
        Msg::Downloaded(id, result) => {
            browser.downloading.remove(&id);
            if let Err(err) = result {
                app.report(&err, "Erreur lors du téléchargement");
            }
        }
    }
    true
}

use common::model::piece::{Piece, PieceKind};
use common::state::dialog::{DialogField, DocumentDialog, OpenDialog, PieceForm};
use common::tree::FolderView;
use web_sys::HtmlInputElement;
use yew::html::Scope;
use yew::prelude::*;

use crate::components::form::{error_line, input_value, select_value, textarea_value};
use crate::components::sheet::Sheet;

use super::helpers::{describe_file, folder_options, kind_label};
use super::messages::Msg;
use super::state::DocumentBrowser;

pub fn view(browser: &DocumentBrowser, ctx: &Context<DocumentBrowser>) -> Html {
    let link = ctx.link();
    let marche_id = ctx.props().marche_id;
    html! {
        <section class="documents card">
            <div class="documents-header">
                <h2>{ "Documents" }</h2>
                <div class="toolbar">
                    <input
                        class="search"
                        placeholder="Rechercher un dossier ou une pièce"
                        value={browser.query.clone()}
                        oninput={link.callback(|e: InputEvent| Msg::Search(input_value(e)))}
                    />
                    <button class="btn secondary small" onclick={link.callback(|_| Msg::ExpandAll)}>{ "Tout déplier" }</button>
                    <button class="btn secondary small" onclick={link.callback(|_| Msg::CollapseAll)}>{ "Tout replier" }</button>
                    <button
                        class="btn small"
                        onclick={link.callback(move |_| Msg::Open(DocumentDialog::create_folder(marche_id, None)))}
                    >{ "Nouveau dossier" }</button>
                    <button
                        class="btn small"
                        onclick={link.callback(move |_| Msg::Open(DocumentDialog::upload_piece(marche_id, None)))}
                    >{ "Importer une pièce" }</button>
                </div>
            </div>
            if let Some(error) = &browser.error {
                <p class="form-error">
                    { error }
                    <button class="btn small secondary" onclick={link.callback(|_| Msg::Reload)}>{ "Réessayer" }</button>
                </p>
            }
            { body(browser, link) }
            { dialog(browser, link) }
        </section>
    }
}

fn body(browser: &DocumentBrowser, link: &Scope<DocumentBrowser>) -> Html {
    let Some(tree) = &browser.tree else {
        return if browser.loading {
            html! { <p class="muted">{ "Chargement des documents..." }</p> }
        } else {
            html! { <p class="muted">{ "Aucun document" }</p> }
        };
    };
    let forest = tree.search(&browser.query);
    if forest.is_empty() {
        let message = if browser.is_searching() {
            "Aucun résultat"
        } else {
            "Aucun dossier pour ce marché"
        };
        return html! { <p class="muted">{ message }</p> };
    }
    html! {
        <ul class="tree">
            { for forest.iter().map(|view| folder(browser, link, view)) }
        </ul>
    }
}

fn folder(browser: &DocumentBrowser, link: &Scope<DocumentBrowser>, view: &FolderView) -> Html {
    let id = view.id();
    let node = view.node.clone();
    let open = browser.is_expanded(id);
    let marche_id = node.marche_id;
    let (rename, delete) = (node.clone(), node.clone());
    html! {
        <li class="folder" key={id}>
            <div class="folder-row">
                <button class="icon-btn" onclick={link.callback(move |_| Msg::Toggle(id))}>
                    { if open { "▾" } else { "▸" } }
                </button>
                <span class="folder-name">{ "📁 " }{ &node.nom }</span>
                <span class="muted">{ format!("{} pièce(s)", view.pieces.len()) }</span>
                <div class="row-actions">
                    <button
                        class="icon-btn"
                        title="Nouveau sous-dossier"
                        onclick={link.callback(move |_| Msg::Open(DocumentDialog::create_folder(marche_id, Some(id))))}
                    >{ "＋" }</button>
                    <button
                        class="icon-btn"
                        title="Importer ici"
                        onclick={link.callback(move |_| Msg::Open(DocumentDialog::upload_piece(marche_id, Some(id))))}
                    >{ "⇪" }</button>
                    <button
                        class="icon-btn"
                        title="Renommer"
                        onclick={link.callback(move |_| Msg::Open(DocumentDialog::rename_folder(&rename)))}
                    >{ "✎" }</button>
                    <button
                        class="icon-btn danger"
                        title="Supprimer"
                        onclick={link.callback(move |_| Msg::Open(DocumentDialog::delete_folder(&delete)))}
                    >{ "🗑" }</button>
                </div>
            </div>
            if open {
                <ul class="tree">
                    { for view.children.iter().map(|child| folder(browser, link, child)) }
                    { for view.pieces.iter().map(|piece| piece_row(browser, link, marche_id, piece)) }
                </ul>
            }
        </li>
    }
}

fn piece_row(browser: &DocumentBrowser, link: &Scope<DocumentBrowser>, marche_id: i64, piece: &Piece) -> Html {
    let downloading = browser.downloading.contains(&piece.id);
    let (preview, download, edit, delete) = (piece.clone(), piece.clone(), piece.clone(), piece.clone());
    html! {
        <li class="piece" key={format!("piece-{}", piece.id)}>
            <span class="piece-name">{ "📄 " }{ &piece.nom }</span>
            <span class="badge">{ kind_label(&piece.type_piece) }</span>
            <span class="muted">{ format!("× {}", piece.nombre_pieces) }</span>
            <span class="muted">{ piece.created_day() }</span>
            if !piece.description.is_empty() {
                <span class="piece-description">{ &piece.description }</span>
            }
            <div class="row-actions">
                <button class="icon-btn" title="Aperçu" onclick={link.callback(move |_| Msg::Preview(preview.clone()))}>
                    { "👁" }
                </button>
                <button
                    class="icon-btn"
                    title="Télécharger"
                    disabled={downloading}
                    onclick={link.callback(move |_| Msg::Download(download.clone()))}
                >{ if downloading { "…" } else { "⬇" } }</button>
                <button
                    class="icon-btn"
                    title="Modifier"
                    onclick={link.callback(move |_| Msg::Open(DocumentDialog::edit_piece(marche_id, &edit)))}
                >{ "✎" }</button>
                <button
                    class="icon-btn danger"
                    title="Supprimer"
                    onclick={link.callback(move |_| Msg::Open(DocumentDialog::delete_piece(marche_id, &delete)))}
                >{ "🗑" }</button>
            </div>
        </li>
    }
}

fn dialog(browser: &DocumentBrowser, link: &Scope<DocumentBrowser>) -> Html {
    let Some(open) = browser.dialog.current() else {
        return html! {};
    };
    let wide = matches!(open.dialog, DocumentDialog::Preview { .. });
    html! {
        <Sheet title={open.dialog.title()} {wide} on_close={link.callback(|_| Msg::Cancel)}>
            { dialog_body(browser, link, open) }
            { error_line(open.error.as_deref()) }
            { dialog_actions(browser, link, &open.dialog) }
        </Sheet>
    }
}

fn dialog_body(browser: &DocumentBrowser, link: &Scope<DocumentBrowser>, open: &OpenDialog<DocumentDialog>) -> Html {
    let edit = |field: DialogField| link.callback(move |e: InputEvent| Msg::Edit(field, input_value(e)));
    match &open.dialog {
        DocumentDialog::CreateFolder { name, .. } | DocumentDialog::RenameFolder { name, .. } => html! {
            <label class="field">
                <span>{ "Nom du dossier *" }</span>
                <input value={name.clone()} oninput={edit(DialogField::Name)} />
            </label>
        },
        DocumentDialog::DeleteFolder { name, .. } => html! {
            <p>{ format!("Supprimer le dossier « {name} » et tout son contenu ?") }</p>
        },
        DocumentDialog::DeletePiece { name, .. } => html! {
            <p>{ format!("Supprimer la pièce « {name} » ?") }</p>
        },
        DocumentDialog::UploadPiece { folder, form, .. } => {
            let options = browser
                .tree
                .as_ref()
                .map(|tree| folder_options(&tree.views()))
                .unwrap_or_default();
            let selected = folder.map(|id| id.to_string()).unwrap_or_default();
            let onchange = link.callback(|e: Event| {
                let files = e.target_unchecked_into::<HtmlInputElement>().files();
                Msg::FileChosen(files.and_then(|list| list.get(0)))
            });
            html! {
                <>
                    <label class="field">
                        <span>{ "Dossier *" }</span>
                        <select onchange={link.callback(|e: Event| Msg::Edit(DialogField::Folder, select_value(e)))}>
                            <option value="" selected={folder.is_none()}>{ "Choisir un dossier" }</option>
                            { for options.into_iter().map(|(id, label)| html! {
                                <option value={id.to_string()} selected={selected == id.to_string()}>{ label }</option>
                            }) }
                        </select>
                    </label>
                    <label class="field">
                        <span>{ "Fichier *" }</span>
                        <input type="file" ref={browser.file_input_ref.clone()} {onchange} />
                    </label>
                    if let Some(file) = &browser.file {
                        <p class="muted">{ describe_file(file) }</p>
                    }
                    { piece_fields(link, form) }
                </>
            }
        }
        DocumentDialog::EditPiece { name, form, .. } => html! {
            <>
                <p class="muted">{ name }</p>
                { piece_fields(link, form) }
            </>
        },
        DocumentDialog::Preview { url, name } => html! {
            <div class="preview">
                <iframe src={url.clone()} title={name.clone()} class="preview-frame" />
                <a href={url.clone()} target="_blank" rel="noopener">{ "Ouvrir dans un nouvel onglet" }</a>
            </div>
        },
    }
}

fn piece_fields(link: &Scope<DocumentBrowser>, form: &PieceForm) -> Html {
    let kind = form.type_piece.as_str().to_string();
    html! {
        <>
            <label class="field">
                <span>{ "Description" }</span>
                <textarea
                    value={form.description.clone()}
                    oninput={link.callback(|e: InputEvent| Msg::Edit(DialogField::Description, textarea_value(e)))}
                />
            </label>
            <label class="field">
                <span>{ "Type de pièce" }</span>
                <select onchange={link.callback(|e: Event| Msg::Edit(DialogField::TypePiece, select_value(e)))}>
                    { for [PieceKind::Originale, PieceKind::Copie].iter().map(|k| html! {
                        <option value={k.as_str().to_string()} selected={kind == k.as_str()}>{ kind_label(k) }</option>
                    }) }
                    if let PieceKind::Other(tag) = &form.type_piece {
                        <option value={tag.clone()} selected={true}>{ tag }</option>
                    }
                </select>
            </label>
            <label class="field">
                <span>{ "Nombre de pièces *" }</span>
                <input
                    type="number"
                    min="1"
                    value={form.nombre_pieces.clone()}
                    oninput={link.callback(|e: InputEvent| Msg::Edit(DialogField::NombrePieces, input_value(e)))}
                />
            </label>
        </>
    }
}

fn dialog_actions(browser: &DocumentBrowser, link: &Scope<DocumentBrowser>, dialog: &DocumentDialog) -> Html {
    let submitting = browser.dialog.is_submitting();
    let (label, class) = match dialog {
        DocumentDialog::Preview { .. } => ("Fermer", "btn"),
        DocumentDialog::DeleteFolder { .. } | DocumentDialog::DeletePiece { .. } => ("Supprimer", "btn danger"),
        DocumentDialog::UploadPiece { .. } => ("Importer", "btn"),
        _ => ("Enregistrer", "btn"),
    };
    html! {
        <div class="sheet-actions">
            if !matches!(dialog, DocumentDialog::Preview { .. }) {
                <button class="btn secondary" onclick={link.callback(|_| Msg::Cancel)}>{ "Annuler" }</button>
            }
            <button {class} disabled={submitting} onclick={link.callback(|_| Msg::Confirm)}>
                { if submitting { "En cours..." } else { label } }
            </button>
        </div>
    }
}

use common::model::piece::PieceKind;
use common::tree::FolderView;

/// Every folder of `forest` in display order, labelled with its depth, for
/// the target-folder select of the upload dialog.
pub fn folder_options(forest: &[FolderView]) -> Vec<(i64, String)> {
    fn walk(views: &[FolderView], depth: usize, out: &mut Vec<(i64, String)>) {
        for view in views {
            out.push((view.id(), format!("{}{}", "\u{a0}\u{a0}".repeat(depth), view.node.nom)));
            walk(&view.children, depth + 1, out);
        }
    }
    let mut out = Vec::new();
    walk(forest, 0, &mut out);
    out
}

/// Every folder id of `forest`.
pub fn folder_ids(forest: &[FolderView]) -> Vec<i64> {
    folder_options(forest).into_iter().map(|(id, _)| id).collect()
}

pub fn kind_label(kind: &PieceKind) -> &str {
    match kind {
        PieceKind::Originale => "Originale",
        PieceKind::Copie => "Copie",
        PieceKind::Other(tag) => tag,
    }
}

/// Human file size in the units the browser shows for uploads.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{bytes} o")
    } else if b < KB * KB {
        format!("{:.1} Ko", b / KB)
    } else {
        format!("{:.1} Mo", b / (KB * KB))
    }
}

/// Summary of the file chosen for upload.
pub fn describe_file(file: &web_sys::File) -> String {
    let file = gloo_file::File::from(file.clone());
    format!("{} ({})", file.name(), format_size(file.size()))
}

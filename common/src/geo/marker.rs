use crate::model::marche::Marche;

/// Pin colour for a marché, chosen from the kind of organisation that owns it.
pub fn marker_color(organisme: &str) -> &'static str {
    const KINDS: [(&str, &str); 5] = [
        ("Commune", "green"),
        ("Région", "orange"),
        ("Préfecture", "red"),
        ("Ministère", "purple"),
        ("Établissement", "cadetblue"),
    ];
    KINDS
        .iter()
        .find(|(kind, _)| organisme.contains(kind))
        .map(|(_, color)| *color)
        .unwrap_or("green")
}

/// SVG pin drawn for single markers.
pub fn marker_svg(color: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 32 32" width="32" height="32"><path fill="{color}" d="M16 2C10.48 2 6 6.48 6 12c0 8.5 10 18 10 18s10-9.5 10-18c0-5.52-4.48-10-10-10zm0 15c-2.76 0-5-2.24-5-5s2.24-5 5-5 5 2.24 5 5-2.24 5-5 5z"/><circle fill="white" cx="16" cy="12" r="3"/></svg>"#
    )
}

/// Hover text of a single marker. The map inserts tooltip strings as markup,
/// so the record's own text is escaped.
pub fn marker_tooltip(marche: &Marche) -> String {
    escape_html(&format!("{} : {}", marche.num_marche, marche.objet))
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tooltip_text_is_not_markup() {
        let marche = Marche {
            id: 1,
            num_marche: "12/2024".into(),
            objet: r#"<img src=x onerror="alert(1)"> & co"#.into(),
            annee: 2024,
            num_boite: None,
            organisme: None,
            type_communaute_publique: None,
            latitude: None,
            longitude: None,
            created_at: None,
        };
        let tooltip = marker_tooltip(&marche);
        assert_eq!(
            tooltip,
            "12/2024 : &lt;img src=x onerror=&quot;alert(1)&quot;&gt; &amp; co"
        );
        assert!(!tooltip.contains('<'));
    }

    #[test]
    fn colour_follows_organisation_kind() {
        assert_eq!(marker_color("Préfecture de Casablanca"), "red");
        assert_eq!(marker_color("Région Fès-Meknès"), "orange");
        assert_eq!(marker_color("Office national"), "green");
    }
}

//! Route table of the application and the access guard shared by the host and
//! the frontend router.

use std::collections::HashMap;

use thiserror::Error;

use crate::geo::LatLng;
use crate::handoff::SelectionPurpose;

/// Decoded query string parameters.
pub type QueryParams = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("page introuvable: {0}")]
    Unknown(String),
    #[error("identifiant invalide: {0}")]
    BadId(String),
    #[error("lien invalide: jeton manquant")]
    MissingToken,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Login,
    Register,
    ForgotPassword,
    ResetPassword { token: String },
    VerifyEmail { token: String },
    Dashboard,
    Marches,
    MarcheAdd,
    MarcheDetail { id: i64 },
    MarcheEdit { id: i64 },
    /// The map, optionally centred on a position (localise) or in selection
    /// mode for one of the marché forms.
    Map {
        center: Option<LatLng>,
        selection: Option<SelectionPurpose>,
    },
}

impl Route {
    pub fn parse(path: &str, query: &QueryParams) -> Result<Route, RouteError> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let param = |key: &str| query.get(key).map(String::as_str).filter(|v| !v.is_empty());

        let route = match segments.as_slice() {
            [] => Route::Dashboard,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["forgot-password"] => Route::ForgotPassword,
            ["reset-password"] => Route::ResetPassword {
                token: param("token").ok_or(RouteError::MissingToken)?.to_string(),
            },
            ["reset-password", token] | ["dashboard", "reset-password", token] => Route::ResetPassword {
                token: decode_component(token),
            },
            ["verify-email", token] => Route::VerifyEmail {
                token: decode_component(token),
            },
            ["dashboard"] => Route::Dashboard,
            ["dashboard", "marches"] => Route::Marches,
            ["dashboard", "marches", "ajouter"] => Route::MarcheAdd,
            ["dashboard", "marches", id] => Route::MarcheDetail { id: parse_id(id)? },
            ["dashboard", "marches", id, "modifier"] => Route::MarcheEdit { id: parse_id(id)? },
            ["dashboard", "map"] => {
                let center = match (param("lat"), param("lng")) {
                    (Some(lat), Some(lng)) => match (lat.parse(), lng.parse()) {
                        (Ok(lat), Ok(lng)) => Some(LatLng::new(lat, lng)),
                        _ => None,
                    },
                    _ => None,
                };
                Route::Map {
                    center,
                    selection: SelectionPurpose::from_query(param("from"), param("id")),
                }
            }
            _ => return Err(RouteError::Unknown(path.to_string())),
        };
        Ok(route)
    }

    /// Path and query string of the route, as pushed to the history.
    pub fn to_url(&self) -> String {
        let (path, query): (String, Vec<(&str, String)>) = match self {
            Route::Login => ("/login".into(), vec![]),
            Route::Register => ("/register".into(), vec![]),
            Route::ForgotPassword => ("/forgot-password".into(), vec![]),
            Route::ResetPassword { token } => ("/reset-password".into(), vec![("token", token.clone())]),
            Route::VerifyEmail { token } => (format!("/verify-email/{}", encode_component(token)), vec![]),
            Route::Dashboard => ("/dashboard".into(), vec![]),
            Route::Marches => ("/dashboard/marches".into(), vec![]),
            Route::MarcheAdd => ("/dashboard/marches/ajouter".into(), vec![]),
            Route::MarcheDetail { id } => (format!("/dashboard/marches/{id}"), vec![]),
            Route::MarcheEdit { id } => (format!("/dashboard/marches/{id}/modifier"), vec![]),
            Route::Map { center, selection } => {
                let mut query = Vec::new();
                if let Some(at) = center {
                    query.push(("lat", at.lat.to_string()));
                    query.push(("lng", at.lng.to_string()));
                }
                if let Some(purpose) = selection {
                    query.extend(purpose.query_pairs());
                }
                ("/dashboard/map".into(), query)
            }
        };
        if query.is_empty() {
            return path;
        }
        let query: Vec<String> = query
            .iter()
            .map(|(k, v)| format!("{k}={}", encode_component(v)))
            .collect();
        format!("{path}?{}", query.join("&"))
    }

    /// Pages that need a signed-in user.
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::Dashboard
                | Route::Marches
                | Route::MarcheAdd
                | Route::MarcheDetail { .. }
                | Route::MarcheEdit { .. }
                | Route::Map { .. }
        )
    }

    /// Pages a signed-in user has no business on.
    pub fn is_entry_only(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }

    /// Where to send the user instead of `self`, if anywhere.
    pub fn guard(&self, authenticated: bool) -> Option<Route> {
        if !authenticated && self.is_protected() {
            Some(Route::Login)
        } else if authenticated && self.is_entry_only() {
            Some(Route::Dashboard)
        } else {
            None
        }
    }

    /// Title shown in the navigation bar.
    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Connexion",
            Route::Register => "Inscription",
            Route::ForgotPassword => "Mot de passe oublié",
            Route::ResetPassword { .. } => "Réinitialisation du mot de passe",
            Route::VerifyEmail { .. } => "Vérification de l'email",
            Route::Dashboard => "Tableau de bord",
            Route::Marches => "Marchés",
            Route::MarcheAdd => "Ajouter un marché",
            Route::MarcheDetail { .. } => "Détails du marché",
            Route::MarcheEdit { .. } => "Modifier le marché",
            Route::Map { .. } => "Carte",
        }
    }
}

impl SelectionPurpose {
    /// The form page the map returns to once a position is picked.
    pub fn return_route(self) -> Route {
        match self {
            SelectionPurpose::AddMarche => Route::MarcheAdd,
            SelectionPurpose::EditMarche(id) => Route::MarcheEdit { id },
        }
    }
}

fn parse_id(segment: &str) -> Result<i64, RouteError> {
    segment
        .parse()
        .map_err(|_| RouteError::BadId(segment.to_string()))
}

/// Percent-encodes everything outside the URL unreserved set.
fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Reverse of [`encode_component`]. A `%` not followed by two hex digits is
/// kept as is.
fn decode_component(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let escaped = (bytes[i] == b'%')
            .then(|| bytes.get(i + 1..i + 3))
            .flatten()
            .and_then(|hex| std::str::from_utf8(hex).ok())
            .and_then(|hex| u8::from_str_radix(hex, 16).ok());
        match escaped {
            Some(byte) => {
                out.push(byte);
                i += 3;
            }
            None => {
                out.push(bytes[i]);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> QueryParams {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn parses_the_marche_pages() {
        let none = QueryParams::new();
        assert_eq!(Route::parse("/dashboard/marches/ajouter", &none), Ok(Route::MarcheAdd));
        assert_eq!(
            Route::parse("/dashboard/marches/42/modifier", &none),
            Ok(Route::MarcheEdit { id: 42 })
        );
        assert_eq!(
            Route::parse("/dashboard/marches/abc", &none),
            Err(RouteError::BadId("abc".into()))
        );
        assert!(Route::parse("/nowhere", &none).is_err());
    }

    #[test]
    fn map_route_round_trips_selection() {
        let route = Route::parse(
            "/dashboard/map",
            &query(&[("from", "edit-marche"), ("id", "9"), ("lat", "34.1"), ("lng", "-5.2")]),
        )
        .unwrap();
        assert_eq!(
            route,
            Route::Map {
                center: Some(LatLng::new(34.1, -5.2)),
                selection: Some(SelectionPurpose::EditMarche(9)),
            }
        );
        assert_eq!(
            route.to_url(),
            "/dashboard/map?lat=34.1&lng=-5.2&from=edit-marche&id=9"
        );
    }

    #[test]
    fn reset_needs_a_token() {
        assert_eq!(
            Route::parse("/reset-password", &QueryParams::new()),
            Err(RouteError::MissingToken)
        );
        let route = Route::parse("/reset-password", &query(&[("token", "a b")])).unwrap();
        assert_eq!(route.to_url(), "/reset-password?token=a%20b");
    }

    #[test]
    fn path_tokens_survive_a_trip_through_the_url() {
        let none = QueryParams::new();
        let route = Route::VerifyEmail {
            token: "a/b c+d%é".into(),
        };
        let url = route.to_url();
        assert_eq!(url, "/verify-email/a%2Fb%20c%2Bd%25%C3%A9");
        assert_eq!(Route::parse(&url, &none), Ok(route));

        assert_eq!(
            Route::parse("/reset-password/tok.en%3D", &none),
            Ok(Route::ResetPassword { token: "tok.en=".into() })
        );
        assert_eq!(
            Route::parse("/verify-email/100%", &none),
            Ok(Route::VerifyEmail { token: "100%".into() })
        );
    }

    #[test]
    fn guard_redirects_both_ways() {
        assert_eq!(Route::Marches.guard(false), Some(Route::Login));
        assert_eq!(Route::Marches.guard(true), None);
        assert_eq!(Route::Register.guard(true), Some(Route::Dashboard));
        assert_eq!(Route::ForgotPassword.guard(true), None);
        assert_eq!(Route::ForgotPassword.guard(false), None);
    }
}

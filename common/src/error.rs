use thiserror::Error;

use crate::model::auth::MessageResponse;

/// Failure of a call to the remote API, classified the way the UI reports it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The request never reached the API (server down, CORS, offline).
    #[error("Backend non accessible sur {endpoint}. Veuillez démarrer votre serveur.")]
    Network { endpoint: String },
    #[error("{}", message.as_deref().unwrap_or("Session expirée, veuillez vous reconnecter."))]
    Unauthorized { message: Option<String> },
    /// The API answered with a non-success status.
    #[error("{}", rejected_text(.message))]
    Rejected { status: u16, message: Option<String> },
    #[error("Réponse inattendue du serveur: {0}")]
    Decode(String),
    /// The browser could not hand a fetched file over to the user.
    #[error("Téléchargement impossible: {0}")]
    Download(String),
}

fn rejected_text(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or("Erreur serveur")
}

impl ApiError {
    /// Builds the error for a non-success response. A JSON `{ "message" }`
    /// body is surfaced as the server-provided message.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<MessageResponse>(body)
            .ok()
            .and_then(|m| m.message)
            .filter(|m| !m.trim().is_empty());
        if status == 401 {
            return ApiError::Unauthorized { message };
        }
        ApiError::Rejected { status, message }
    }

    /// Message shown to the user: the server's own message when it gave one,
    /// `fallback` for a bare rejection, the classified text otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected { message: Some(m), .. } => m.clone(),
            ApiError::Rejected { message: None, .. } => fallback.to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_wins_over_fallback() {
        let err = ApiError::from_response(409, r#"{"message":"Dossier déjà existant"}"#);
        assert_eq!(err.user_message("Erreur création dossier"), "Dossier déjà existant");

        let bare = ApiError::from_response(500, "<html>oops</html>");
        assert_eq!(bare.user_message("Erreur création dossier"), "Erreur création dossier");
        assert_eq!(bare.to_string(), "Erreur serveur");
    }

    #[test]
    fn network_errors_name_the_endpoint() {
        let err = ApiError::Network {
            endpoint: "http://localhost:5001".into(),
        };
        assert!(err.is_network());
        assert!(err.user_message("ignored").contains("http://localhost:5001"));
    }

    #[test]
    fn download_failures_are_not_masked_by_the_fallback() {
        let err = ApiError::Download("lien de téléchargement indisponible".into());
        assert_eq!(
            err.user_message("Erreur lors du téléchargement"),
            "Téléchargement impossible: lien de téléchargement indisponible"
        );
    }

    #[test]
    fn unauthorized_is_its_own_kind() {
        let bare = ApiError::from_response(401, "");
        assert!(bare.is_unauthorized());
        assert_eq!(bare.to_string(), "Session expirée, veuillez vous reconnecter.");
    }

    #[test]
    fn unauthorized_keeps_the_server_message() {
        let err = ApiError::from_response(401, r#"{"message":"Email non vérifié"}"#);
        assert!(err.is_unauthorized());
        assert_eq!(err.user_message("Erreur lors de la connexion"), "Email non vérifié");
    }
}

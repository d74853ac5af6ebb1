//! Client-side checks run before any request is sent. Messages are the ones
//! shown inline on the forms.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::geo::LatLng;
use crate::model::auth::{RegisterForm, RegisterRequest};
use crate::model::marche::{MarcheForm, MarcheUpdate, NewMarche, wkt_point};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").unwrap());

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Le nom est requis")]
    MissingLastName,
    #[error("Le prénom est requis")]
    MissingFirstName,
    #[error("Adresse email invalide")]
    InvalidEmail,
    #[error("Le mot de passe doit contenir au moins 6 caractères")]
    PasswordTooShort,
    #[error("Les mots de passe ne correspondent pas")]
    PasswordMismatch,
    #[error("Le champ « {0} » est requis")]
    Required(&'static str),
    #[error("L'année doit être un nombre")]
    InvalidYear,
    #[error("Coordonnées invalides")]
    InvalidCoordinates,
    #[error("Le nom du dossier est requis")]
    EmptyFolderName,
    #[error("Sélectionnez un fichier et un dossier")]
    MissingUpload,
    #[error("Le nombre de pièces doit être un entier positif")]
    InvalidPieceCount,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email.trim())
}

/// Checks the register form in the order the page reports problems.
pub fn validate_registration(form: &RegisterForm) -> Result<RegisterRequest, ValidationError> {
    if form.last_name.trim().is_empty() {
        return Err(ValidationError::MissingLastName);
    }
    if form.name.trim().is_empty() {
        return Err(ValidationError::MissingFirstName);
    }
    if !is_valid_email(&form.email) {
        return Err(ValidationError::InvalidEmail);
    }
    validate_password_reset(&form.password, &form.confirm_password)?;
    Ok(RegisterRequest {
        name: form.name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password.clone(),
    })
}

pub fn validate_password_reset(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Parses the latitude/longitude pair of a form. Both blank means "no
/// position"; one blank, unparsable or out of range values are an error.
pub fn parse_coordinates(lat: &str, lng: &str) -> Result<Option<LatLng>, ValidationError> {
    let (lat, lng) = (lat.trim(), lng.trim());
    if lat.is_empty() && lng.is_empty() {
        return Ok(None);
    }
    let lat: f64 = lat.replace(',', ".").parse().map_err(|_| ValidationError::InvalidCoordinates)?;
    let lng: f64 = lng.replace(',', ".").parse().map_err(|_| ValidationError::InvalidCoordinates)?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(ValidationError::InvalidCoordinates);
    }
    Ok(Some(LatLng::new(lat, lng)))
}

struct CheckedMarche {
    annee: i32,
    position: Option<LatLng>,
}

fn check_marche(form: &MarcheForm) -> Result<CheckedMarche, ValidationError> {
    if form.num_marche.trim().is_empty() {
        return Err(ValidationError::Required("Numéro de marché"));
    }
    if form.objet.trim().is_empty() {
        return Err(ValidationError::Required("Objet"));
    }
    if form.annee.trim().is_empty() {
        return Err(ValidationError::Required("Année"));
    }
    let annee = form.annee.trim().parse().map_err(|_| ValidationError::InvalidYear)?;
    let position = parse_coordinates(&form.latitude, &form.longitude)?;
    Ok(CheckedMarche { annee, position })
}

pub fn validate_new_marche(form: &MarcheForm) -> Result<NewMarche, ValidationError> {
    let checked = check_marche(form)?;
    Ok(NewMarche {
        num_marche: form.num_marche.trim().to_string(),
        objet: form.objet.trim().to_string(),
        annee: checked.annee,
        num_boite: form.num_boite.trim().to_string(),
        organisme: form.organisme.trim().to_string(),
        type_communaute_publique: form.type_communaute_publique.trim().to_string(),
        geom: checked.position.map(wkt_point),
    })
}

pub fn validate_marche_update(form: &MarcheForm) -> Result<MarcheUpdate, ValidationError> {
    let checked = check_marche(form)?;
    Ok(MarcheUpdate {
        num_marche: form.num_marche.trim().to_string(),
        objet: form.objet.trim().to_string(),
        annee: checked.annee,
        num_boite: form.num_boite.trim().to_string(),
        organisme: form.organisme.trim().to_string(),
        type_communaute_publique: form.type_communaute_publique.trim().to_string(),
        latitude: checked.position.map(|p| p.lat),
        longitude: checked.position.map(|p| p.lng),
    })
}

pub fn validate_folder_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyFolderName);
    }
    Ok(name.to_string())
}

pub fn validate_piece_count(count: &str) -> Result<u32, ValidationError> {
    match count.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ValidationError::InvalidPieceCount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register() -> RegisterForm {
        RegisterForm {
            name: "Salma".into(),
            last_name: "Alaoui".into(),
            email: "salma@example.ma".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        }
    }

    #[test]
    fn registration_reports_first_problem() {
        assert!(validate_registration(&register()).is_ok());

        let mut form = register();
        form.last_name = " ".into();
        form.email = "nope".into();
        assert_eq!(validate_registration(&form), Err(ValidationError::MissingLastName));

        let mut form = register();
        form.email = "salma@example".into();
        assert_eq!(validate_registration(&form), Err(ValidationError::InvalidEmail));

        let mut form = register();
        form.confirm_password = "secret2".into();
        assert_eq!(validate_registration(&form), Err(ValidationError::PasswordMismatch));
    }

    #[test]
    fn short_passwords_are_refused() {
        assert_eq!(
            validate_password_reset("abc", "abc"),
            Err(ValidationError::PasswordTooShort)
        );
        assert_eq!(
            ValidationError::PasswordTooShort.to_string(),
            "Le mot de passe doit contenir au moins 6 caractères"
        );
    }

    #[test]
    fn coordinates_are_optional_but_checked() {
        assert_eq!(parse_coordinates("", " "), Ok(None));
        assert_eq!(
            parse_coordinates("34,02", "-6.84"),
            Ok(Some(LatLng::new(34.02, -6.84)))
        );
        assert_eq!(
            parse_coordinates("34.02", ""),
            Err(ValidationError::InvalidCoordinates)
        );
        assert_eq!(
            parse_coordinates("95", "0"),
            Err(ValidationError::InvalidCoordinates)
        );
    }

    #[test]
    fn new_marche_carries_wkt() {
        let form = MarcheForm {
            num_marche: "3/2024".into(),
            objet: "Assainissement".into(),
            annee: "2024".into(),
            latitude: "34.5".into(),
            longitude: "-6.25".into(),
            ..Default::default()
        };
        let body = validate_new_marche(&form).unwrap();
        assert_eq!(body.geom.as_deref(), Some("POINT(-6.25 34.5)"));

        let update = validate_marche_update(&form).unwrap();
        assert_eq!(update.latitude, Some(34.5));

        let bad_year = MarcheForm {
            annee: "deux mille".into(),
            ..form
        };
        assert_eq!(validate_new_marche(&bad_year), Err(ValidationError::InvalidYear));
    }
}

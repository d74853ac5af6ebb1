pub mod auth;
pub mod document;
pub mod geometry;
pub mod marche;
pub mod piece;

mod lenient;

pub mod documents;
pub mod form;
pub mod map;
pub mod navbar;
pub mod sheet;
pub mod toast;

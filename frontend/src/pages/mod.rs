pub mod dashboard;
pub mod forgot_password;
pub mod login;
pub mod map_page;
pub mod marche_detail;
pub mod marche_form;
pub mod marches_list;
pub mod register;
pub mod reset_password;
pub mod verify_email;

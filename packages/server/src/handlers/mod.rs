pub mod admin;
pub mod certificate;
pub mod health;
pub mod upload;
pub mod verify;

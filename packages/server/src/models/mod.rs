pub mod admin;
pub mod certificate;
pub mod shared;
pub mod verify;

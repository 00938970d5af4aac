mod admin;
mod certificate;
mod common;
mod upload;
mod verify;

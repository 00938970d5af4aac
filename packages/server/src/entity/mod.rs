pub mod certificate;
pub mod certificate_upload;

pub mod csv_prepare;
pub mod csv_process;
pub mod health;
pub mod home;
pub mod image_upload;
pub mod response;

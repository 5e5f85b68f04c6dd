pub mod summary;
pub mod verify;

pub mod address;
pub mod batch;
pub mod deploy;
pub mod upgrade;
pub mod validate;
pub mod verify;

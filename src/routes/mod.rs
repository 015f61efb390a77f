pub mod email;
pub mod health;
pub mod quiz;
pub mod upload;

pub mod email_dto;
pub mod quiz_dto;

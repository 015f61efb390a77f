pub mod email;
pub mod question;
pub mod quiz_session;

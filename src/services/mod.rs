pub mod email_service;
pub mod grading_service;
pub mod language_detector;
pub mod question_bank;
pub mod quiz_service;
pub mod resume_service;
pub mod session_store;
pub mod upload_service;

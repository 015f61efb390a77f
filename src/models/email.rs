use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    Selected,
    Rejected,
}

impl CandidateStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "selected" => Some(CandidateStatus::Selected),
            "rejected" => Some(CandidateStatus::Rejected),
            _ => None,
        }
    }
}

/// A rendered plain-text message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

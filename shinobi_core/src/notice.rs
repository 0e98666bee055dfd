use std::fmt;

use crate::{error::ApiError, utils::non_empty_messages};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn all(level: NoticeLevel, messages: Vec<String>) -> Vec<Notice> {
        non_empty_messages(messages)
            .into_iter()
            .map(|text| Notice { level, text })
            .collect()
    }

    pub fn success(messages: Vec<String>) -> Vec<Notice> {
        Notice::all(NoticeLevel::Success, messages)
    }

    pub fn danger(messages: Vec<String>) -> Vec<Notice> {
        Notice::all(NoticeLevel::Danger, messages)
    }

    /// Notices for a failed request. An unauthorized answer asks for a login
    /// first.
    pub fn from_error(error: &ApiError) -> Vec<Notice> {
        match error {
            ApiError::Status { status, .. } => {
                let level = Notice::level_for_status(*status);
                let mut notices = vec![];
                if *status == 401 {
                    notices.push(Notice {
                        level,
                        text: "Please log in".to_string(),
                    });
                }
                notices.extend(Notice::all(level, error.messages()));
                notices
            }
            other => Notice::danger(other.messages()),
        }
    }

    pub fn level_for_status(status: u16) -> NoticeLevel {
        match status {
            200..=299 => NoticeLevel::Success,
            401 => NoticeLevel::Warning,
            _ => NoticeLevel::Danger,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Danger => "error",
        };
        write!(f, "[{}] {}", tag, self.text)
    }
}

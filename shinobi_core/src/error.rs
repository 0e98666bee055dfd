use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("server answered {status}: {}", .messages.join("; "))]
    Status { status: u16, messages: Vec<String> },
    #[error("malformed payload: {0}")]
    Payload(String),
}

impl ApiError {
    pub fn messages(&self) -> Vec<String> {
        match self {
            ApiError::Status { messages, .. } if !messages.is_empty() => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Payload(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("the move is not complete yet")]
    Incomplete,
    #[error("it is not your turn")]
    NotYourTurn,
    #[error(transparent)]
    Api(#[from] ApiError),
}

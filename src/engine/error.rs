/// A session operation was invoked at the wrong time or with bad arguments
///
/// Recoverable: the session is left exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidStateError {
    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    #[error("Question '{question}' is not active (state: {state})")]
    QuestionNotActive { question: String, state: String },

    #[error("Question '{0}' was already resolved")]
    AlreadyResolved(String),

    #[error("Option {index} is out of range for question '{question}' ({options} option(s))")]
    OptionOutOfRange {
        question: String,
        index: usize,
        options: usize,
    },

    #[error("Session is closed ({0})")]
    SessionClosed(String),
}

use crate::normalizer::Rejection;
use thiserror::Error;

/// A document that failed the garbage screen. Terminal for that document:
/// retrying the same text yields the same rejection.
///
/// `Display` renders the rejection's reason verbatim so collaborators can show
/// it to users unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{rejection}")]
pub struct InvalidInputError {
    pub rejection: Rejection,
}

impl InvalidInputError {
    pub fn reason(&self) -> &'static str {
        self.rejection.reason()
    }
}

impl From<Rejection> for InvalidInputError {
    fn from(rejection: Rejection) -> Self {
        Self { rejection }
    }
}

// Literal shown while a read has not resolved.
pub const PLACEHOLDER: &str = "...";

/// Result of a contract read as the page sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState<T> {
    Pending,
    Ready(T),
}

impl<T> Default for ReadState<T> {
    fn default() -> Self {
        ReadState::Pending
    }
}

impl<T> ReadState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            ReadState::Ready(value) => Some(value),
            ReadState::Pending => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ReadState::Ready(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ReadState<U> {
        match self {
            ReadState::Ready(value) => ReadState::Ready(f(value)),
            ReadState::Pending => ReadState::Pending,
        }
    }

    pub fn render(&self, f: impl FnOnce(&T) -> String) -> String {
        match self {
            ReadState::Ready(value) => f(value),
            ReadState::Pending => PLACEHOLDER.to_string(),
        }
    }

    // Prefer a fresh result; otherwise keep whatever was known before.
    pub fn or_previous(self, previous: ReadState<T>) -> ReadState<T> {
        match self {
            ReadState::Ready(_) => self,
            ReadState::Pending => previous,
        }
    }
}

impl<T, E> From<Result<T, E>> for ReadState<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => ReadState::Ready(value),
            Err(_) => ReadState::Pending,
        }
    }
}

//! Errors raised by the deque and by Dot export.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, displaydoc::Display, thiserror::Error)]
pub enum Error {
    /// Attempted to pop or peek an empty deque
    EmptyQueue,
    /// I/O error: {0}
    Io(#[from] std::io::Error),
    #[cfg(feature = "graphviz")]
    /// Graphviz rejected the Dot source: {0}
    GraphvizParse(String),
}

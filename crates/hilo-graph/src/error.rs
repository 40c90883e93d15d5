//! Graph construction errors. Any of these aborts the chat being processed.

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Message {id} belongs to chat {found}, expected chat {expected}")]
    ForeignMessage { expected: i64, found: i64, id: i64 },
}

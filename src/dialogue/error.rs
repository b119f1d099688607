use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueErrorKind {
    Collaborator,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueError {
    pub kind: DialogueErrorKind,
    pub message: String,
}

impl DialogueError {
    pub fn new(kind: DialogueErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for DialogueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DialogueError {}

pub fn collaborator_failure(message: impl Into<String>) -> DialogueError {
    DialogueError::new(DialogueErrorKind::Collaborator, message)
}

pub fn internal_error(message: impl Into<String>) -> DialogueError {
    DialogueError::new(DialogueErrorKind::Internal, message)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandErrorKind {
    InvalidArguments,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError {
    pub kind: CommandErrorKind,
    pub message: String,
}

impl CommandError {
    pub fn new(kind: CommandErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommandError {}

pub fn invalid_arguments(message: impl Into<String>) -> CommandError {
    CommandError::new(CommandErrorKind::InvalidArguments, message)
}

pub fn command_internal_error(message: impl Into<String>) -> CommandError {
    CommandError::new(CommandErrorKind::Internal, message)
}

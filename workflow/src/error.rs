use thiserror::Error;

/// A recognised command whose arguments could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("{command} needs an argument: {usage}")]
    MissingArgument {
        command: &'static str,
        usage: &'static str,
    },

    #[error("{command} does not understand {argument:?}: {usage}")]
    InvalidArgument {
        command: &'static str,
        argument: String,
        usage: &'static str,
    },
}

impl CommandError {
    pub fn usage(&self) -> &'static str {
        match self {
            CommandError::MissingArgument { usage, .. }
            | CommandError::InvalidArgument { usage, .. } => usage,
        }
    }
}

/// Core error type for the command interpreter.
///
/// Adapter crates (webhook transport, Supabase store) map their specific
/// failures into this type so outcomes can be reported consistently. The
/// user-facing strings match what the WhatsApp sender historically saw.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("User not found for this phone number")]
    UserNotFound,

    #[error("Comando não reconhecido. Use: TAREFA:, EVENTO: ou CONTATO:")]
    UnrecognizedCommand,

    #[error("{0}")]
    MissingRequiredField(String),

    #[error("storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, Error>;

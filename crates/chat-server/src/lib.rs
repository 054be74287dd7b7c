pub mod completion;
pub mod config;
pub mod error;
pub mod routes;

pub use completion::{Completer, OpenAiCompleter};
pub use config::ServerConfig;
pub use error::{ApiError, CompletionError, ServerConfigError};
pub use routes::{router, AppState};

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod transport;
pub mod wire;

pub use config::ClientConfig;
pub use controller::{ControllerOptions, Dispatch, RequestController, Resolution, SubmitError};
pub use error::{ConfigError, TransportError};
pub use model::{ChatError, ChatReply, RequestState, FALLBACK_ERROR_MESSAGE};
pub use transport::{HttpTransport, Transport};

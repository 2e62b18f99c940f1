pub mod backend;
pub mod cli;
pub mod relay;

pub use backend::{BackendError, ChatBackend, ChatRequest, OpenAiBackend};
pub use relay::{Exchange, Relay, RelayError, RelaySettings, Reply};

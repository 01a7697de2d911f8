pub mod client;
pub mod compress;
pub mod provider;
pub mod providers;
pub mod retry;
pub mod transport;

pub use client::ChatClient;
pub use compress::CompressionClient;
pub use provider::{LlmError, LlmProvider, Message, Role};
pub use providers::{resolve_provider, AuthStyle, ProviderKind, ResolvedProvider};
pub use retry::RetryPolicy;
pub use transport::{HttpReply, HttpTransport, ReqwestTransport};

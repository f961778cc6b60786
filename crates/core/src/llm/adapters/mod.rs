//! Language model client implementations.

mod azure_adapter;
pub mod mock_client;
mod openai_adapter;
pub(crate) mod wire;

pub use azure_adapter::AzureOpenAiAdapter;
pub use mock_client::{MockCall, MockClient};
pub use openai_adapter::OpenAiAdapter;

//! Language model access.
//!
//! This module provides the `LanguageModelClient` trait (Adapter Pattern),
//! HTTP and mock implementations, a retrying decorator, and the factory that
//! builds a client from configuration.

pub mod adapters;
pub mod base;
pub mod factory;
pub mod provider_type;
pub mod retry;

pub use adapters::MockClient;
pub use base::{ChatMessage, LanguageModelClient, Role, TransportError};
pub use factory::ClientFactory;
pub use provider_type::ProviderType;
pub use retry::{RetryPolicy, RetryingClient};

//! Shared helpers for the integration tests.
//!
//! - Fixtures (documents, summaries, scaffolded projects)
//! - Event assertions
//! - Scripted clients

pub mod assertions;
pub mod fixtures;
pub mod mock_clients;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mock_clients::*;

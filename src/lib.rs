//! testkit-bridge - remote-method dispatch server for test harnesses
//!
//! Exposes a registered set of operations over HTTP so a remote test driver
//! can exercise an embedded library. Three pieces form the core:
//!
//! - [`memory::Memory`] - thread-safe table mapping opaque handles to live
//!   server-side values, so stateful objects survive across stateless
//!   requests
//! - [`serializer`] - the tagged wire-string grammar (`I42`, `L...`,
//!   `"..."`, `@handle`, double-encoded JSON containers) shared with the
//!   existing remote drivers
//! - [`dispatcher::Dispatcher`] + [`registry::HandlerRegistry`] - explicit
//!   startup-time operation table and the request pipeline around it
//!
//! The HTTP adapter ([`http`]) and the built-in handler namespaces
//! ([`handlers`]) sit on top; embedders register their own namespaces next
//! to the built-ins and hand the registry to the server.

pub mod args;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod http;
pub mod memory;
pub mod metrics;
pub mod registry;
pub mod serializer;
pub mod value;

pub use args::Args;
pub use context::ServerContext;
pub use dispatcher::{Dispatcher, VOID_SENTINEL};
pub use error::{BridgeError, Result};
pub use memory::Memory;
pub use registry::{HandlerRegistry, Operation, OperationResult};
pub use value::{ObjectRef, Value};

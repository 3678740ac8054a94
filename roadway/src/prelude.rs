//! A collection of useful traits that should always be imported.

pub use crate::handler::{Handler, IntoHandlerFuture, IntoResponse, MapHandlerError, NewHandler};
pub use crate::middleware::Middleware;
pub use crate::router::builder::{DefineSingleRoute, DrawRoutes};
pub use crate::state::FromState;

//! Event system for portal actions.
//!
//! Events are fired from every action that changes authentication state.
//! If no listeners are registered, dispatch is a no-op.
//!
//! Register listeners once at startup:
//!
//! ```rust,ignore
//! use medgate::events::listeners::LoggingListener;
//! use medgate::events::register_event_listeners;
//!
//! register_event_listeners(|registry| {
//!     registry.listen(LoggingListener::new());
//! });
//! ```

mod event;
mod listener;
mod registry;

pub mod listeners;

pub use event::PortalEvent;
pub use listener::Listener;
pub use registry::{dispatch, register_event_listeners};

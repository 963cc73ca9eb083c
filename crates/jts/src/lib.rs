//! Introspects a PostgreSQL catalog into a Table Schema document.
//!
//! ```no_run
//! # fn run(connection: &mut impl jts::Connection) -> jts::Result<()> {
//! let config = jts::Config::new().recursion_limit(4);
//! let introspection = jts::introspect(connection, &config)?;
//!
//! for notification in &introspection.notifications {
//!     eprintln!("{notification}");
//! }
//! println!("{}", introspection.database.to_json(true)?);
//! # Ok(())
//! # }
//! ```

pub mod catalog;

pub mod column;

mod config;
pub use config::{Config, DEFAULT_RECURSION_LIMIT};

mod engine;
pub use engine::{introspect, Introspection, SchemaAssembler};

pub mod fk;

pub mod index;

pub mod ty;

pub mod weak_ref;

pub use jts_core::{driver::Connection, schema, Error, Notification, Notifications, Result};

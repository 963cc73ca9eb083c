pub mod driver;
pub use driver::Connection;

mod error;
pub use error::{Error, IntoError};

pub mod notification;
pub use notification::{Notification, NotificationKind, Notifications, ObjectPath, Severity};

pub mod schema;
pub use schema::Database;

/// A Result type alias that uses the crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

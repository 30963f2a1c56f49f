//! Session storage, the session context and profile display

mod profile;
pub mod storage;
mod store;

pub use profile::ProfileDisplay;
pub use storage::{keys, FileStorage, MemoryStorage, SessionStorage};
pub use store::{Session, SessionContext, SessionEvent, StoredCredentials};

//! Raidadmin renders the administration page of a raid event site and
//! executes the actions that page posts back.

pub mod action;
pub mod error;
pub mod html;
pub mod message;
pub mod page;
pub mod raid;
pub mod render;
pub mod role;
pub mod service;
pub mod storage;

// Re-export core types
pub use action::{AdminAction, MAX_FILE_SIZE, RaidIdSource};
pub use error::{ACCESS_DENIED_MESSAGE, AdminError, Result, ValidationError};
pub use message::{Broadcast, MessageKind, QueuedBroadcast};
pub use page::{PageContext, PageContextBuilder};
pub use raid::{Raid, RaidDataFile, RaidId, RaidIssue, Team, TeamRecord};
pub use render::{RaidSelector, render_admin_page, render_document, render_print_page};
pub use role::{Role, Viewer};
pub use service::{ActionOutcome, ActionRequest, RaidAdmin};
#[cfg(feature = "memory")]
pub use storage::MemoryStorage;
pub use storage::RaidStorage;

/// Get the library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

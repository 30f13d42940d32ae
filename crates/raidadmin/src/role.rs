//! Viewer roles

use serde::{Deserialize, Serialize};

/// Role a viewer holds on the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrator,
    Moderator,
    Participant,
}

/// The person the page is rendered for
///
/// The two flags mirror how the site tracks privileges: a viewer may be an
/// administrator, a moderator of the current raid, both, or neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub name: String,
    pub administrator: bool,
    pub moderator: bool,
}

impl Viewer {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Viewer {
            name: name.into(),
            administrator: role == Role::Administrator,
            moderator: role == Role::Moderator,
        }
    }

    pub fn anonymous() -> Self {
        Viewer::new("", Role::Participant)
    }

    /// Highest role held
    pub fn role(&self) -> Role {
        if self.administrator {
            Role::Administrator
        } else if self.moderator {
            Role::Moderator
        } else {
            Role::Participant
        }
    }

    /// Administrators and moderators may use the admin page
    pub fn can_administer(&self) -> bool {
        self.administrator || self.moderator
    }
}

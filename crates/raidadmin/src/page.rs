//! Request-scoped values the admin page is rendered from

use serde::{Deserialize, Serialize};

use crate::raid::RaidId;
use crate::role::Viewer;

/// Tab index the message form controls count up from when not configured
pub const DEFAULT_TAB_INDEX: u32 = 200;

/// Everything the admin page interpolates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContext {
    /// URL of the script the forms post back to
    pub script_url: String,

    /// Raid currently selected in the layout
    pub raid_id: RaidId,

    pub viewer: Viewer,

    /// Last tab index used by the surrounding layout
    pub tab_index: u32,

    /// Outcome of the previous action, shown above the forms
    pub short_result: Option<String>,
}

impl PageContext {
    pub fn builder(script_url: impl Into<String>) -> PageContextBuilder {
        PageContextBuilder::new(script_url.into())
    }
}

/// Builder for [`PageContext`]
#[derive(Debug)]
pub struct PageContextBuilder {
    script_url: String,
    raid_id: RaidId,
    viewer: Viewer,
    tab_index: u32,
    short_result: Option<String>,
}

impl PageContextBuilder {
    pub fn new(script_url: String) -> Self {
        PageContextBuilder {
            script_url,
            raid_id: RaidId::ALL,
            viewer: Viewer::anonymous(),
            tab_index: DEFAULT_TAB_INDEX,
            short_result: None,
        }
    }

    pub fn raid(mut self, raid_id: RaidId) -> Self {
        self.raid_id = raid_id;
        self
    }

    pub fn viewer(mut self, viewer: Viewer) -> Self {
        self.viewer = viewer;
        self
    }

    pub fn tab_index(mut self, tab_index: u32) -> Self {
        self.tab_index = tab_index;
        self
    }

    pub fn short_result(mut self, message: impl Into<String>) -> Self {
        self.short_result = Some(message.into());
        self
    }

    pub fn build(self) -> PageContext {
        PageContext {
            script_url: self.script_url,
            raid_id: self.raid_id,
            viewer: self.viewer,
            tab_index: self.tab_index,
            short_result: self.short_result,
        }
    }
}

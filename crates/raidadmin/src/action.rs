//! The contract between the admin page and the script it posts to
//!
//! Action names and field names are wire values: the rendered JavaScript
//! writes them into hidden fields and the server reads them back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AdminError;

/// Form field names
pub mod field {
    pub const ACTION: &str = "action";
    pub const RAID_ID: &str = "RaidId";
    pub const MAX_FILE_SIZE: &str = "MAX_FILE_SIZE";
    pub const DATA_FILE: &str = "android";
    pub const MESSAGE_SUBJECT: &str = "MessageSubject";
    pub const MESSAGE_TEXT: &str = "MessageText";
    pub const MESSAGE_KIND: &str = "SendForAllTypeId";
}

/// Upload limit announced in the `MAX_FILE_SIZE` hidden field
pub const MAX_FILE_SIZE: usize = 1_000_000;

/// Name of the shared admin form
pub const ADMIN_FORM: &str = "AdminForm";
/// Name of the broadcast message form
pub const MESSAGE_FORM: &str = "SendMessageForAllForm";
/// Name of the raid selector form provided by the surrounding layout
pub const SELECTOR_FORM: &str = "FindTeamForm";

/// Actions that can be posted back from the admin page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdminAction {
    RecalcRaidResults,
    FindRaidErrors,
    ClearTables,
    LoadRaidDataFile,
    #[serde(rename = "JSON")]
    Json,
    RecalcRaidRank,
    RecalcAllRaidsRank,
    SendMessageForAll,
    /// Reached through a GET link rather than a button
    PrintRaidTeams,
}

/// How a submit function fills `RaidId` before submitting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaidIdSource {
    /// Copied from the raid selector form
    Selector,
    /// Forced to 0, meaning every raid
    AllRaids,
    /// Whatever the hidden field already holds
    Unchanged,
}

impl AdminAction {
    /// Every action that has a JavaScript submit function, in emission order
    pub const SUBMITTED: [AdminAction; 8] = [
        AdminAction::RecalcRaidResults,
        AdminAction::FindRaidErrors,
        AdminAction::ClearTables,
        AdminAction::LoadRaidDataFile,
        AdminAction::Json,
        AdminAction::RecalcRaidRank,
        AdminAction::RecalcAllRaidsRank,
        AdminAction::SendMessageForAll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdminAction::RecalcRaidResults => "RecalcRaidResults",
            AdminAction::FindRaidErrors => "FindRaidErrors",
            AdminAction::ClearTables => "ClearTables",
            AdminAction::LoadRaidDataFile => "LoadRaidDataFile",
            AdminAction::Json => "JSON",
            AdminAction::RecalcRaidRank => "RecalcRaidRank",
            AdminAction::RecalcAllRaidsRank => "RecalcAllRaidsRank",
            AdminAction::SendMessageForAll => "SendMessageForAll",
            AdminAction::PrintRaidTeams => "PrintRaidTeams",
        }
    }

    /// JavaScript function that submits this action; same as the wire name
    pub fn function_name(&self) -> &'static str {
        self.as_str()
    }

    /// Form the action is submitted through
    pub fn form(&self) -> &'static str {
        match self {
            AdminAction::SendMessageForAll => MESSAGE_FORM,
            _ => ADMIN_FORM,
        }
    }

    pub fn raid_id_source(&self) -> RaidIdSource {
        match self {
            AdminAction::RecalcRaidResults
            | AdminAction::FindRaidErrors
            | AdminAction::Json
            | AdminAction::RecalcRaidRank => RaidIdSource::Selector,
            AdminAction::RecalcAllRaidsRank => RaidIdSource::AllRaids,
            _ => RaidIdSource::Unchanged,
        }
    }

    /// Actions that change raid data
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            AdminAction::FindRaidErrors | AdminAction::Json | AdminAction::PrintRaidTeams
        )
    }
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminAction {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdminAction::SUBMITTED
            .iter()
            .chain(std::iter::once(&AdminAction::PrintRaidTeams))
            .find(|action| action.as_str() == s)
            .copied()
            .ok_or_else(|| AdminError::UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wire_names() {
        assert_eq!("JSON".parse::<AdminAction>().unwrap(), AdminAction::Json);
        assert_eq!(
            "RecalcAllRaidsRank".parse::<AdminAction>().unwrap(),
            AdminAction::RecalcAllRaidsRank
        );
        assert_eq!(
            "PrintRaidTeams".parse::<AdminAction>().unwrap(),
            AdminAction::PrintRaidTeams
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "DropDatabase".parse::<AdminAction>().unwrap_err();
        assert!(matches!(err, AdminError::UnknownAction(name) if name == "DropDatabase"));
        assert!("json".parse::<AdminAction>().is_err());
    }

    #[test]
    fn test_raid_id_rules() {
        assert_eq!(AdminAction::Json.raid_id_source(), RaidIdSource::Selector);
        assert_eq!(
            AdminAction::RecalcAllRaidsRank.raid_id_source(),
            RaidIdSource::AllRaids
        );
        assert_eq!(
            AdminAction::LoadRaidDataFile.raid_id_source(),
            RaidIdSource::Unchanged
        );
    }

    #[test]
    fn test_message_action_uses_message_form() {
        assert_eq!(AdminAction::SendMessageForAll.form(), MESSAGE_FORM);
        assert_eq!(AdminAction::ClearTables.form(), ADMIN_FORM);
    }

    #[test]
    fn test_read_only_actions() {
        assert!(AdminAction::LoadRaidDataFile.is_mutating());
        assert!(AdminAction::RecalcAllRaidsRank.is_mutating());
        assert!(!AdminAction::Json.is_mutating());
        assert!(!AdminAction::FindRaidErrors.is_mutating());
    }
}

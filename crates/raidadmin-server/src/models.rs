//! Request models for the admin page

use std::collections::HashMap;

use raidadmin::{ActionRequest, AdminAction, RaidId, action::field};
use serde::Deserialize;

use crate::error::{ApiError, Result};

/// Query string of a GET on the admin page
#[derive(Debug, Default, Deserialize)]
pub struct AdminQuery {
    #[serde(rename = "RaidId")]
    pub raid_id: Option<String>,

    pub action: Option<String>,
}

impl AdminQuery {
    pub fn raid_id(&self) -> Result<RaidId> {
        Ok(self.raid_id.as_deref().unwrap_or_default().parse()?)
    }

    pub fn action(&self) -> Result<Option<AdminAction>> {
        match self.action.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => Ok(Some(name.parse()?)),
        }
    }
}

/// Fields posted by either admin page form
#[derive(Debug, Default)]
pub struct PostedForm {
    pub fields: HashMap<String, String>,
    pub upload: Option<Vec<u8>>,
}

impl PostedForm {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn action(&self) -> Result<AdminAction> {
        let name = self
            .get(field::ACTION)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::bad_request("No action given"))?;
        Ok(name.parse()?)
    }

    /// Split into the library's action request
    pub fn into_request(mut self) -> Result<ActionRequest> {
        let raid_id = self
            .fields
            .get(field::RAID_ID)
            .map(String::as_str)
            .unwrap_or_default()
            .parse()?;

        Ok(ActionRequest {
            raid_id,
            upload: self.upload.take(),
            message_subject: self.fields.remove(field::MESSAGE_SUBJECT),
            message_text: self.fields.remove(field::MESSAGE_TEXT),
            message_kind: self.fields.remove(field::MESSAGE_KIND),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let query = AdminQuery::default();
        assert_eq!(query.raid_id().unwrap(), RaidId::ALL);
        assert!(query.action().unwrap().is_none());
    }

    #[test]
    fn test_posted_form_into_request() {
        let mut form = PostedForm::default();
        form.fields.insert("action".to_string(), "SendMessageForAll".to_string());
        form.fields.insert("RaidId".to_string(), "3".to_string());
        form.fields.insert("MessageSubject".to_string(), "Старт".to_string());

        assert_eq!(form.action().unwrap(), AdminAction::SendMessageForAll);
        let request = form.into_request().unwrap();
        assert_eq!(request.raid_id, RaidId(3));
        assert_eq!(request.message_subject.as_deref(), Some("Старт"));
        assert!(request.message_text.is_none());
    }

    #[test]
    fn test_missing_action_is_bad_request() {
        let form = PostedForm::default();
        assert!(matches!(form.action(), Err(ApiError::BadRequest(_))));
    }
}

//! Execution of posted admin actions against a raid storage

use std::sync::Arc;

use serde::Serialize;
use time::OffsetDateTime;

use crate::action::AdminAction;
use crate::error::{AdminError, Result};
use crate::message::{Broadcast, QueuedBroadcast};
use crate::raid::{Raid, RaidDataFile, RaidId, RaidIssue};
use crate::role::Viewer;
use crate::storage::RaidStorage;

/// Values posted together with an action
#[derive(Debug, Clone, Default)]
pub struct ActionRequest {
    pub raid_id: RaidId,
    /// Contents of the `android` file field
    pub upload: Option<Vec<u8>>,
    pub message_subject: Option<String>,
    pub message_text: Option<String>,
    pub message_kind: Option<String>,
}

/// What an action produced
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    Done { message: String },
    Issues { raid_id: RaidId, issues: Vec<RaidIssue> },
    Dump { raid_id: RaidId, raid: Raid },
    Queued { recipients: usize },
}

impl ActionOutcome {
    /// Short result text for the page banner
    pub fn short_result(&self) -> String {
        match self {
            ActionOutcome::Done { message } => message.clone(),
            ActionOutcome::Issues { issues, .. } if issues.is_empty() => {
                "Ошибок не найдено".to_string()
            }
            ActionOutcome::Issues { issues, .. } => issues
                .iter()
                .map(|issue| issue.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
            ActionOutcome::Dump { raid_id, .. } => format!("Дамп марш-броска {} сформирован", raid_id),
            ActionOutcome::Queued { recipients } => {
                format!("Сообщение поставлено в очередь для {} участников", recipients)
            }
        }
    }
}

/// Runs admin actions for privileged viewers
pub struct RaidAdmin<S: RaidStorage> {
    storage: Arc<S>,
}

impl<S: RaidStorage> Clone for RaidAdmin<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<S: RaidStorage> RaidAdmin<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Execute a posted action on behalf of `viewer`
    pub async fn execute(
        &self,
        viewer: &Viewer,
        action: AdminAction,
        request: ActionRequest,
    ) -> Result<ActionOutcome> {
        if !viewer.can_administer() {
            return Err(AdminError::access_denied());
        }

        match action {
            AdminAction::RecalcRaidResults => {
                let raid = self
                    .storage
                    .update_raid(request.raid_id, Box::new(Raid::recalculate_results))
                    .await?;
                Ok(done(format!("Результаты марш-броска {} пересчитаны", raid.name)))
            }
            AdminAction::FindRaidErrors => {
                let raid = self.storage.get_raid(request.raid_id).await?;
                Ok(ActionOutcome::Issues {
                    raid_id: raid.id,
                    issues: raid.find_issues(),
                })
            }
            AdminAction::ClearTables => {
                let raid = self
                    .storage
                    .update_raid(request.raid_id, Box::new(Raid::clear))
                    .await?;
                Ok(done(format!("Данные марш-броска {} очищены", raid.name)))
            }
            AdminAction::LoadRaidDataFile => {
                let bytes = request
                    .upload
                    .ok_or_else(|| AdminError::missing_field(crate::action::field::DATA_FILE))?;
                let data = RaidDataFile::parse(&bytes)?;
                let raid = self
                    .storage
                    .update_raid(
                        request.raid_id,
                        Box::new(move |raid: &mut Raid| {
                            raid.load(data);
                        }),
                    )
                    .await?;
                Ok(done(format!("Загружено команд: {}", raid.teams.len())))
            }
            AdminAction::Json => {
                let raid = self.storage.get_raid(request.raid_id).await?;
                Ok(ActionOutcome::Dump {
                    raid_id: raid.id,
                    raid,
                })
            }
            AdminAction::RecalcRaidRank => {
                let raid = self
                    .storage
                    .update_raid(request.raid_id, Box::new(Raid::recalculate_rank))
                    .await?;
                Ok(done(format!("Рейтинг марш-броска {} пересчитан", raid.name)))
            }
            AdminAction::RecalcAllRaidsRank => {
                let count = self
                    .storage
                    .update_all_raids(Box::new(Raid::recalculate_rank))
                    .await?;
                Ok(done(format!("Рейтинг пересчитан для {} марш-бросков", count)))
            }
            AdminAction::SendMessageForAll => self.send_message_for_all(request).await,
            AdminAction::PrintRaidTeams => Err(AdminError::UnknownAction(action.to_string())),
        }
    }

    async fn send_message_for_all(&self, request: ActionRequest) -> Result<ActionOutcome> {
        let broadcast = Broadcast::from_form(
            request.raid_id,
            request.message_subject.as_deref(),
            request.message_text.as_deref(),
            request.message_kind.as_deref(),
        )?;

        let raids = if broadcast.raid_id.is_all() {
            self.storage.list_raids().await?
        } else {
            vec![self.storage.get_raid(broadcast.raid_id).await?]
        };

        let mut recipients: Vec<String> = raids
            .iter()
            .flat_map(|raid| raid.participants().map(str::to_string))
            .collect();
        recipients.sort();
        recipients.dedup();

        let count = recipients.len();
        self.storage
            .queue_broadcast(QueuedBroadcast {
                broadcast,
                recipients,
                queued_at: OffsetDateTime::now_utc(),
            })
            .await?;

        Ok(ActionOutcome::Queued { recipients: count })
    }

    /// Raid for the print page; printing is open to privileged viewers only
    pub async fn printable_raid(&self, viewer: &Viewer, raid_id: RaidId) -> Result<Raid> {
        if !viewer.can_administer() {
            return Err(AdminError::access_denied());
        }
        self.storage.get_raid(raid_id).await
    }

    /// Raid ids and names for the selector form
    pub async fn raid_choices(&self) -> Result<Vec<(RaidId, String)>> {
        Ok(self
            .storage
            .list_raids()
            .await?
            .into_iter()
            .map(|raid| (raid.id, raid.name))
            .collect())
    }
}

fn done(message: String) -> ActionOutcome {
    ActionOutcome::Done { message }
}

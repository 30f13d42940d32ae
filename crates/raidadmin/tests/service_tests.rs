use async_trait::async_trait;
use raidadmin::storage::{RaidUpdate, RaidsUpdate};
use raidadmin::{
    ActionOutcome, ActionRequest, AdminAction, AdminError, MemoryStorage, QueuedBroadcast, Raid,
    RaidAdmin, RaidId, RaidIssue, RaidStorage, Role, Team, Viewer,
};
use serde_json::json;

fn admin() -> Viewer {
    Viewer::new("root", Role::Administrator)
}

fn raid_admin() -> RaidAdmin<MemoryStorage> {
    RaidAdmin::new(MemoryStorage::with_raids([
        Raid::new(1, "Весна").with_teams(vec![
            Team::new(1, "Ежи").with_members(["Аня", "Петя"]).finished(600, 1),
            Team::new(2, "Лоси").with_members(["Оля"]).finished(620, 0),
        ]),
        Raid::new(2, "Осень").with_teams(vec![
            Team::new(1, "Совы").with_members(["Иван", "Аня"]).finished(700, 0),
        ]),
    ]))
}

fn for_raid(id: u64) -> ActionRequest {
    ActionRequest {
        raid_id: RaidId(id),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_participant_cannot_execute() {
    let admin_service = raid_admin();
    let viewer = Viewer::new("runner", Role::Participant);

    let result = admin_service
        .execute(&viewer, AdminAction::ClearTables, for_raid(1))
        .await;
    assert!(matches!(result, Err(AdminError::AccessDenied { .. })));

    let raid = admin_service.storage().get_raid(RaidId(1)).await.unwrap();
    assert_eq!(raid.teams.len(), 2);
}

#[tokio::test]
async fn test_recalc_rank_orders_by_penalised_result() {
    let admin_service = raid_admin();

    admin_service
        .execute(&admin(), AdminAction::RecalcRaidRank, for_raid(1))
        .await
        .unwrap();

    let raid = admin_service.storage().get_raid(RaidId(1)).await.unwrap();
    assert_eq!(raid.teams[0].result_minutes, Some(660));
    assert_eq!(raid.teams[0].rank, Some(2));
    assert_eq!(raid.teams[1].rank, Some(1));
}

#[tokio::test]
async fn test_recalc_all_raids_rank() {
    let admin_service = raid_admin();

    let outcome = admin_service
        .execute(&admin(), AdminAction::RecalcAllRaidsRank, for_raid(0))
        .await
        .unwrap();
    assert!(outcome.short_result().contains('2'));

    for raid in admin_service.storage().list_raids().await.unwrap() {
        assert!(raid.ranked_at.is_some());
    }
}

#[tokio::test]
async fn test_unknown_raid() {
    let result = raid_admin()
        .execute(&admin(), AdminAction::Json, for_raid(99))
        .await;
    assert!(matches!(result, Err(AdminError::RaidNotFound(99))));
}

#[tokio::test]
async fn test_find_errors_after_load() {
    let admin_service = raid_admin();
    let file = json!({
        "teams": [
            { "number": 5, "name": "Ежи", "members": ["Аня"], "finish_minutes": 500 },
            { "number": 5, "name": "", "members": [] }
        ]
    });

    let loaded = admin_service
        .execute(
            &admin(),
            AdminAction::LoadRaidDataFile,
            ActionRequest {
                raid_id: RaidId(2),
                upload: Some(serde_json::to_vec(&file).unwrap()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(loaded.short_result(), "Загружено команд: 2");

    let outcome = admin_service
        .execute(&admin(), AdminAction::FindRaidErrors, for_raid(2))
        .await
        .unwrap();
    match outcome {
        ActionOutcome::Issues { issues, .. } => {
            assert!(issues.contains(&RaidIssue::DuplicateNumber(5)));
            assert!(issues.contains(&RaidIssue::BlankName(5)));
            assert!(issues.contains(&RaidIssue::NoMembers(5)));
            assert!(issues.contains(&RaidIssue::StaleResult(5)));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_load_without_file() {
    let result = raid_admin()
        .execute(&admin(), AdminAction::LoadRaidDataFile, for_raid(1))
        .await;
    assert!(matches!(result, Err(AdminError::Validation(_))));
}

#[tokio::test]
async fn test_clear_tables() {
    let admin_service = raid_admin();
    admin_service
        .execute(&admin(), AdminAction::ClearTables, for_raid(1))
        .await
        .unwrap();

    let raid = admin_service.storage().get_raid(RaidId(1)).await.unwrap();
    assert!(raid.teams.is_empty());
}

#[tokio::test]
async fn test_broadcast_to_all_raids_deduplicates_recipients() {
    let admin_service = raid_admin();
    let outcome = admin_service
        .execute(
            &admin(),
            AdminAction::SendMessageForAll,
            ActionRequest {
                raid_id: RaidId::ALL,
                message_subject: Some("Старт".to_string()),
                message_text: Some("Сбор в 9:00".to_string()),
                message_kind: Some("2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(matches!(outcome, ActionOutcome::Queued { recipients: 4 }));
    let outbox = admin_service.storage().outbox().await.unwrap();
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].recipients, vec!["Аня", "Иван", "Оля", "Петя"]);
}

#[tokio::test]
async fn test_broadcast_with_prompt_text_is_rejected() {
    let admin_service = raid_admin();
    let result = admin_service
        .execute(
            &admin(),
            AdminAction::SendMessageForAll,
            ActionRequest {
                raid_id: RaidId(1),
                message_subject: Some("Тема рассылки".to_string()),
                message_text: Some("Текст сообщения".to_string()),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AdminError::Validation(_))));
    assert!(admin_service.storage().outbox().await.unwrap().is_empty());
}

/// Storage that yields to the scheduler before every call, so concurrent
/// actions get a chance to interleave
struct YieldingStorage(MemoryStorage);

impl YieldingStorage {
    async fn pause() {
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
    }
}

#[async_trait]
impl RaidStorage for YieldingStorage {
    async fn save_raid(&self, raid: &Raid) -> raidadmin::Result<()> {
        Self::pause().await;
        self.0.save_raid(raid).await
    }

    async fn get_raid(&self, id: RaidId) -> raidadmin::Result<Raid> {
        Self::pause().await;
        self.0.get_raid(id).await
    }

    async fn update_raid(&self, id: RaidId, apply: RaidUpdate) -> raidadmin::Result<Raid> {
        Self::pause().await;
        self.0.update_raid(id, apply).await
    }

    async fn update_all_raids(&self, apply: RaidsUpdate) -> raidadmin::Result<usize> {
        Self::pause().await;
        self.0.update_all_raids(apply).await
    }

    async fn list_raids(&self) -> raidadmin::Result<Vec<Raid>> {
        Self::pause().await;
        self.0.list_raids().await
    }

    async fn queue_broadcast(&self, broadcast: QueuedBroadcast) -> raidadmin::Result<()> {
        Self::pause().await;
        self.0.queue_broadcast(broadcast).await
    }

    async fn outbox(&self) -> raidadmin::Result<Vec<QueuedBroadcast>> {
        Self::pause().await;
        self.0.outbox().await
    }
}

#[tokio::test]
async fn test_concurrent_actions_keep_uploaded_teams() {
    let admin_service = RaidAdmin::new(YieldingStorage(MemoryStorage::with_raids([
        Raid::new(1, "Весна").with_teams(vec![
            Team::new(1, "Старые").with_members(["Аня"]).finished(600, 0),
        ]),
    ])));
    let file = json!({
        "teams": [
            { "number": 2, "name": "Лоси", "members": ["Оля"], "finish_minutes": 500 },
            { "number": 3, "name": "Совы", "members": ["Иван"], "finish_minutes": 450 }
        ]
    });
    let viewer = admin();

    let (loaded, ranked, ranked_all) = tokio::join!(
        admin_service.execute(
            &viewer,
            AdminAction::LoadRaidDataFile,
            ActionRequest {
                raid_id: RaidId(1),
                upload: Some(serde_json::to_vec(&file).unwrap()),
                ..Default::default()
            },
        ),
        admin_service.execute(&viewer, AdminAction::RecalcRaidRank, for_raid(1)),
        admin_service.execute(&viewer, AdminAction::RecalcAllRaidsRank, for_raid(0)),
    );
    assert_eq!(loaded.unwrap().short_result(), "Загружено команд: 2");
    ranked.unwrap();
    ranked_all.unwrap();

    let raid = admin_service.storage().get_raid(RaidId(1)).await.unwrap();
    let mut names: Vec<&str> = raid.teams.iter().map(|team| team.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["Лоси", "Совы"]);
}

#[tokio::test]
async fn test_load_rejects_overflowing_penalty() {
    let admin_service = raid_admin();
    let file = json!({
        "teams": [
            { "number": 9, "name": "Ежи", "members": ["Аня"], "finish_minutes": 600, "missed_points": 80_000_000u32 }
        ]
    });

    let result = admin_service
        .execute(
            &admin(),
            AdminAction::LoadRaidDataFile,
            ActionRequest {
                raid_id: RaidId(1),
                upload: Some(serde_json::to_vec(&file).unwrap()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AdminError::DataFile { .. })));

    let raid = admin_service.storage().get_raid(RaidId(1)).await.unwrap();
    assert_eq!(raid.teams.len(), 2);
}

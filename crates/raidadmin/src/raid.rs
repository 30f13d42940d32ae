//! Raids, teams and the bookkeeping the admin actions perform on them

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::action::MAX_FILE_SIZE;
use crate::error::{AdminError, Result};

/// Penalty added to the finish time for each missed control point
pub const PENALTY_MINUTES_PER_POINT: u32 = 60;

/// Unique identifier for a raid; 0 stands for "all raids"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RaidId(pub u64);

impl RaidId {
    pub const ALL: RaidId = RaidId(0);

    pub fn is_all(&self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for RaidId {
    fn from(id: u64) -> Self {
        RaidId(id)
    }
}

impl fmt::Display for RaidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RaidId {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(RaidId::ALL);
        }
        trimmed
            .parse::<u64>()
            .map(RaidId)
            .map_err(|_| AdminError::invalid_field(crate::action::field::RAID_ID, "not a number"))
    }
}

/// A team taking part in a raid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub number: u32,
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
    /// Minutes from start to finish, absent if the team did not finish
    pub finish_minutes: Option<u32>,
    #[serde(default)]
    pub missed_points: u32,
    pub result_minutes: Option<u32>,
    pub rank: Option<u32>,
}

impl Team {
    pub fn new(number: u32, name: impl Into<String>) -> Self {
        Team {
            number,
            name: name.into(),
            members: Vec::new(),
            finish_minutes: None,
            missed_points: 0,
            result_minutes: None,
            rank: None,
        }
    }

    pub fn with_members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members = members.into_iter().map(Into::into).collect();
        self
    }

    pub fn finished(mut self, minutes: u32, missed_points: u32) -> Self {
        self.finish_minutes = Some(minutes);
        self.missed_points = missed_points;
        self
    }

    /// Finish time plus penalties, None for unfinished teams
    ///
    /// Saturates at `u32::MAX`; uploads that would overflow are refused by
    /// [`RaidDataFile::parse`].
    pub fn compute_result(&self) -> Option<u32> {
        self.finish_minutes.map(|finish| {
            penalised_result(finish, self.missed_points).unwrap_or(u32::MAX)
        })
    }
}

fn penalised_result(finish_minutes: u32, missed_points: u32) -> Option<u32> {
    missed_points
        .checked_mul(PENALTY_MINUTES_PER_POINT)
        .and_then(|penalty| finish_minutes.checked_add(penalty))
}

/// A raid with its teams
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Raid {
    pub id: RaidId,
    pub name: String,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub results_recalculated_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub ranked_at: Option<OffsetDateTime>,
}

impl Raid {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Raid {
            id: RaidId(id),
            name: name.into(),
            teams: Vec::new(),
            results_recalculated_at: None,
            ranked_at: None,
        }
    }

    pub fn with_teams(mut self, teams: Vec<Team>) -> Self {
        self.teams = teams;
        self
    }

    /// Recompute every team's result from its finish time and penalties
    pub fn recalculate_results(&mut self) {
        for team in &mut self.teams {
            team.result_minutes = team.compute_result();
        }
        self.results_recalculated_at = Some(OffsetDateTime::now_utc());
    }

    /// Recompute results, then rank teams by ascending result
    ///
    /// Equal results share a rank and the next rank skips accordingly
    /// (1, 2, 2, 4). Teams without a result are left unranked.
    pub fn recalculate_rank(&mut self) {
        self.recalculate_results();

        let mut order: Vec<(u32, u32, usize)> = self
            .teams
            .iter()
            .enumerate()
            .filter_map(|(idx, team)| team.result_minutes.map(|r| (r, team.number, idx)))
            .collect();
        order.sort();

        for team in &mut self.teams {
            team.rank = None;
        }

        let mut previous: Option<(u32, u32)> = None;
        for (position, (result, _, idx)) in order.into_iter().enumerate() {
            let rank = match previous {
                Some((prev_result, prev_rank)) if prev_result == result => prev_rank,
                _ => position as u32 + 1,
            };
            self.teams[idx].rank = Some(rank);
            previous = Some((result, rank));
        }

        self.ranked_at = Some(OffsetDateTime::now_utc());
    }

    /// Remove all teams and the derived timestamps
    pub fn clear(&mut self) {
        self.teams.clear();
        self.results_recalculated_at = None;
        self.ranked_at = None;
    }

    /// Replace the teams with the contents of an uploaded data file
    pub fn load(&mut self, data: RaidDataFile) -> usize {
        self.teams = data.teams.into_iter().map(Team::from).collect();
        self.results_recalculated_at = None;
        self.ranked_at = None;
        self.teams.len()
    }

    /// Every participant of the raid, in team order
    pub fn participants(&self) -> impl Iterator<Item = &str> {
        self.teams
            .iter()
            .flat_map(|team| team.members.iter().map(String::as_str))
    }

    /// Consistency problems an administrator should look at
    pub fn find_issues(&self) -> Vec<RaidIssue> {
        let mut issues = Vec::new();

        let mut seen: HashMap<u32, usize> = HashMap::new();
        for team in &self.teams {
            *seen.entry(team.number).or_default() += 1;
        }
        let mut duplicates: Vec<u32> = seen
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(number, _)| number)
            .collect();
        duplicates.sort_unstable();
        issues.extend(duplicates.into_iter().map(RaidIssue::DuplicateNumber));

        for team in &self.teams {
            if team.name.trim().is_empty() {
                issues.push(RaidIssue::BlankName(team.number));
            }
            if team.members.is_empty() {
                issues.push(RaidIssue::NoMembers(team.number));
            }
            if team.result_minutes != team.compute_result() {
                issues.push(RaidIssue::StaleResult(team.number));
            }
        }

        issues
    }
}

/// A problem reported by the error search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "team", rename_all = "snake_case")]
pub enum RaidIssue {
    DuplicateNumber(u32),
    BlankName(u32),
    NoMembers(u32),
    /// Stored result disagrees with finish time and penalties
    StaleResult(u32),
}

impl fmt::Display for RaidIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaidIssue::DuplicateNumber(n) => write!(f, "Номер команды {} повторяется", n),
            RaidIssue::BlankName(n) => write!(f, "У команды {} нет названия", n),
            RaidIssue::NoMembers(n) => write!(f, "В команде {} нет участников", n),
            RaidIssue::StaleResult(n) => write!(f, "Результат команды {} не пересчитан", n),
        }
    }
}

/// One team as exported by the field terminals
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TeamRecord {
    pub number: u32,
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub finish_minutes: Option<u32>,
    #[serde(default)]
    pub missed_points: u32,
}

impl From<TeamRecord> for Team {
    fn from(record: TeamRecord) -> Self {
        Team {
            number: record.number,
            name: record.name,
            members: record.members,
            finish_minutes: record.finish_minutes,
            missed_points: record.missed_points,
            result_minutes: None,
            rank: None,
        }
    }
}

/// Raid data file uploaded through the admin page
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RaidDataFile {
    pub teams: Vec<TeamRecord>,
}

impl RaidDataFile {
    /// Parse an uploaded file, enforcing the announced size limit
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > MAX_FILE_SIZE {
            return Err(AdminError::FileTooLarge {
                size: bytes.len(),
                limit: MAX_FILE_SIZE,
            });
        }
        if bytes.is_empty() {
            return Err(AdminError::missing_field(crate::action::field::DATA_FILE));
        }
        let data: RaidDataFile =
            serde_json::from_slice(bytes).map_err(|e| AdminError::DataFile {
                reason: e.to_string(),
            })?;

        for record in &data.teams {
            let finish = record.finish_minutes.unwrap_or(0);
            if penalised_result(finish, record.missed_points).is_none() {
                return Err(AdminError::DataFile {
                    reason: format!(
                        "team {}: {} missed points after {} minutes is out of range",
                        record.number, record.missed_points, finish
                    ),
                });
            }
        }

        Ok(data)
    }
}

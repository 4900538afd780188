//! Gathering entity - a study or project group with capacity-gated membership

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Kind of gathering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatheringKind {
    Study,
    Project,
}

impl GatheringKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Study => "study",
            Self::Project => "project",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "study" => Some(Self::Study),
            "project" => Some(Self::Project),
            _ => None,
        }
    }
}

/// How the gathering meets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyType {
    Online,
    Offline,
    Mixed,
}

impl StudyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Mixed => "mixed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "online" => Some(Self::Online),
            "offline" => Some(Self::Offline),
            "mixed" => Some(Self::Mixed),
            _ => None,
        }
    }

    /// Offline and mixed gatherings need a meeting location
    #[inline]
    pub fn requires_location(&self) -> bool {
        matches!(self, Self::Offline | Self::Mixed)
    }
}

/// Expected experience level of participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetLevel {
    Beginner,
    Intermediate,
    Advanced,
    All,
}

impl TargetLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::All => "all",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

/// Gathering lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatheringStatus {
    Recruiting,
    RecruitmentComplete,
    InProgress,
    Finished,
}

impl GatheringStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recruiting => "recruiting",
            Self::RecruitmentComplete => "recruitment_complete",
            Self::InProgress => "in_progress",
            Self::Finished => "finished",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "recruiting" => Some(Self::Recruiting),
            "recruitment_complete" => Some(Self::RecruitmentComplete),
            "in_progress" => Some(Self::InProgress),
            "finished" => Some(Self::Finished),
            _ => None,
        }
    }

    /// Explicit owner-driven transitions
    pub fn can_transition_to(self, next: GatheringStatus) -> bool {
        matches!(
            (self, next),
            (
                Self::Recruiting,
                Self::RecruitmentComplete | Self::InProgress
            ) | (
                Self::RecruitmentComplete,
                Self::Recruiting | Self::InProgress
            ) | (Self::InProgress, Self::Finished)
        )
    }
}

/// Gathering entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gathering {
    pub id: Snowflake,
    pub owner_id: Snowflake,
    pub category_id: Snowflake,
    pub kind: GatheringKind,
    pub title: String,
    pub description: String,
    pub max_members: i32,
    pub current_members: i32,
    pub recruitment_end: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub meeting_schedule: Option<String>,
    pub study_type: StudyType,
    pub location: Option<String>,
    pub target_level: TargetLevel,
    pub has_cost: bool,
    pub cost_description: Option<String>,
    pub status: GatheringStatus,
    pub required_skills: Option<String>,
    pub project_goal: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Gathering {
    #[inline]
    pub fn is_owner(&self, user_id: Snowflake) -> bool {
        self.owner_id == user_id
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.current_members >= self.max_members
    }

    #[inline]
    pub fn remaining_seats(&self) -> i32 {
        (self.max_members - self.current_members).max(0)
    }

    #[inline]
    pub fn is_recruiting(&self) -> bool {
        self.status == GatheringStatus::Recruiting
    }

    /// Account for one newly approved member
    ///
    /// Flips recruiting to recruitment_complete when the last seat fills.
    pub fn member_approved(&mut self) {
        self.current_members += 1;
        if self.is_full() && self.status == GatheringStatus::Recruiting {
            self.status = GatheringStatus::RecruitmentComplete;
        }
        self.updated_at = Utc::now();
    }

    /// Account for one member leaving or being removed
    ///
    /// Reopens recruitment when a seat frees up before the gathering starts.
    pub fn member_left(&mut self) {
        self.current_members = (self.current_members - 1).max(1);
        if self.status == GatheringStatus::RecruitmentComplete && !self.is_full() {
            self.status = GatheringStatus::Recruiting;
        }
        self.updated_at = Utc::now();
    }

    /// All fields are editable while recruiting or recruitment_complete;
    /// in_progress narrows the set and finished freezes the gathering.
    pub fn is_fully_editable(&self) -> bool {
        matches!(
            self.status,
            GatheringStatus::Recruiting | GatheringStatus::RecruitmentComplete
        )
    }

    /// Deletable only when the leader sits alone and nothing has started
    pub fn can_delete(&self) -> bool {
        self.current_members == 1
            && !matches!(
                self.status,
                GatheringStatus::InProgress | GatheringStatus::Finished
            )
    }

    /// Past the recruitment deadline at `today`
    pub fn recruitment_expired(&self, today: NaiveDate) -> bool {
        self.status == GatheringStatus::Recruiting && self.recruitment_end < today
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gathering(max: i32) -> Gathering {
        let now = Utc::now();
        Gathering {
            id: Snowflake::new(1),
            owner_id: Snowflake::new(10),
            category_id: Snowflake::new(20),
            kind: GatheringKind::Study,
            title: "러스트 스터디".to_string(),
            description: "주 1회".to_string(),
            max_members: max,
            current_members: 1,
            recruitment_end: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 8).unwrap(),
            end_date: None,
            meeting_schedule: None,
            study_type: StudyType::Online,
            location: None,
            target_level: TargetLevel::All,
            has_cost: false,
            cost_description: None,
            status: GatheringStatus::Recruiting,
            required_skills: None,
            project_goal: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_fill_flips_to_complete() {
        let mut g = gathering(2);
        assert!(!g.is_full());
        g.member_approved();
        assert!(g.is_full());
        assert_eq!(g.status, GatheringStatus::RecruitmentComplete);
        assert_eq!(g.remaining_seats(), 0);
    }

    #[test]
    fn test_leave_reopens_recruitment() {
        let mut g = gathering(2);
        g.member_approved();
        g.member_left();
        assert_eq!(g.status, GatheringStatus::Recruiting);
        assert_eq!(g.current_members, 1);
    }

    #[test]
    fn test_counter_never_drops_below_leader() {
        let mut g = gathering(3);
        g.member_left();
        assert_eq!(g.current_members, 1);
    }

    #[test]
    fn test_status_transitions() {
        use GatheringStatus::*;
        assert!(Recruiting.can_transition_to(RecruitmentComplete));
        assert!(Recruiting.can_transition_to(InProgress));
        assert!(RecruitmentComplete.can_transition_to(Recruiting));
        assert!(RecruitmentComplete.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Finished));
        assert!(!Finished.can_transition_to(Recruiting));
        assert!(!Recruiting.can_transition_to(Finished));
        assert!(!InProgress.can_transition_to(Recruiting));
    }

    #[test]
    fn test_delete_rules() {
        let mut g = gathering(3);
        assert!(g.can_delete());
        g.member_approved();
        assert!(!g.can_delete());
        g.member_left();
        g.status = GatheringStatus::InProgress;
        assert!(!g.can_delete());
    }

    #[test]
    fn test_recruitment_expired() {
        let g = gathering(3);
        assert!(!g.recruitment_expired(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()));
        assert!(g.recruitment_expired(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()));
    }

    #[test]
    fn test_location_requirement() {
        assert!(!StudyType::Online.requires_location());
        assert!(StudyType::Offline.requires_location());
        assert!(StudyType::Mixed.requires_location());
    }
}

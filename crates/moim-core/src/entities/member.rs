//! Member entity - a user's membership in a gathering

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Role inside a gathering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Leader,
    Participant,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Leader => "leader",
            Self::Participant => "participant",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "leader" => Some(Self::Leader),
            "participant" => Some(Self::Participant),
            _ => None,
        }
    }
}

/// Membership application status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Pending,
    Approved,
    Rejected,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Gathering member entity (junction between User and Gathering)
///
/// One row per (gathering, user) pair. Leaving flips `is_active` off
/// instead of deleting, so rejoin attempts can see the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatheringMember {
    pub id: Snowflake,
    pub gathering_id: Snowflake,
    pub user_id: Snowflake,
    pub role: MemberRole,
    pub status: MemberStatus,
    pub is_active: bool,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GatheringMember {
    /// Leader row, created together with the gathering
    pub fn new_leader(id: Snowflake, gathering_id: Snowflake, user_id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            gathering_id,
            user_id,
            role: MemberRole::Leader,
            status: MemberStatus::Approved,
            is_active: true,
            joined_at: now,
            updated_at: now,
        }
    }

    /// Pending participant row, created by a join request
    pub fn new_pending(id: Snowflake, gathering_id: Snowflake, user_id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            gathering_id,
            user_id,
            role: MemberRole::Participant,
            status: MemberStatus::Pending,
            is_active: true,
            joined_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_leader(&self) -> bool {
        self.role == MemberRole::Leader
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == MemberStatus::Pending && self.is_active
    }

    /// Approved and still active, i.e. counted in `current_members`
    #[inline]
    pub fn is_approved_active(&self) -> bool {
        self.status == MemberStatus::Approved && self.is_active
    }

    pub fn approve(&mut self) {
        self.status = MemberStatus::Approved;
        self.updated_at = Utc::now();
    }

    pub fn reject(&mut self) {
        self.status = MemberStatus::Rejected;
        self.updated_at = Utc::now();
    }

    /// Leave or removal of an approved member
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leader_row() {
        let m = GatheringMember::new_leader(Snowflake::new(1), Snowflake::new(2), Snowflake::new(3));
        assert!(m.is_leader());
        assert!(m.is_approved_active());
        assert!(!m.is_pending());
    }

    #[test]
    fn test_pending_to_approved() {
        let mut m =
            GatheringMember::new_pending(Snowflake::new(1), Snowflake::new(2), Snowflake::new(3));
        assert!(m.is_pending());
        m.approve();
        assert!(m.is_approved_active());
    }

    #[test]
    fn test_deactivate_leaves_counting() {
        let mut m =
            GatheringMember::new_pending(Snowflake::new(1), Snowflake::new(2), Snowflake::new(3));
        m.approve();
        m.deactivate();
        assert!(!m.is_approved_active());
        assert_eq!(m.status, MemberStatus::Approved);
    }

    #[test]
    fn test_reject() {
        let mut m =
            GatheringMember::new_pending(Snowflake::new(1), Snowflake::new(2), Snowflake::new(3));
        m.reject();
        assert_eq!(m.status, MemberStatus::Rejected);
        assert!(!m.is_pending());
    }
}

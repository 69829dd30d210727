use std::{fmt, str::FromStr};

use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Status of an item request.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
        }
    }

    /// Pending is the only state that can be left; decisions are final.
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        self == next || (self == RequestStatus::Pending && next != RequestStatus::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Pending" => Ok(RequestStatus::Pending),
            "Approved" => Ok(RequestStatus::Approved),
            "Rejected" => Ok(RequestStatus::Rejected),
            other => anyhow::bail!("unknown request status {:?}", other),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    pub id: Uuid,
    pub item_id: Uuid,
    pub item_name: String,
    pub requested_by: String,
    pub status: RequestStatus,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewItemRequest {
    pub item_id: Uuid,
    pub item_name: String,
    pub requested_by: String,
    pub notes: Option<String>,
}

/// Row shape of the `item_requests` table.
#[derive(Debug, FromRow)]
pub struct ItemRequestRow {
    pub id: Uuid,
    pub item_id: Uuid,
    pub item_name: String,
    pub requested_by: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<ItemRequestRow> for ItemRequest {
    type Error = anyhow::Error;

    fn try_from(r: ItemRequestRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            item_id: r.item_id,
            item_name: r.item_name,
            requested_by: r.requested_by,
            status: r.status.parse()?,
            notes: r.notes,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::RequestStatus::*;

    #[test]
    fn decisions_are_final() {
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Approved.can_transition_to(Approved));
        assert!(!Approved.can_transition_to(Rejected));
        assert!(!Approved.can_transition_to(Pending));
        assert!(!Rejected.can_transition_to(Approved));
    }
}

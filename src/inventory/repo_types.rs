use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Lifecycle state of an inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Available,
    InUse,
    NeedsRepair,
}

impl ItemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Available => "Available",
            ItemStatus::InUse => "In Use",
            ItemStatus::NeedsRepair => "Needs Repair",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid status {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for ItemStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Available" => Ok(ItemStatus::Available),
            "In Use" => Ok(ItemStatus::InUse),
            // older front ends label the repair state "Maintenance"
            "Needs Repair" | "Maintenance" => Ok(ItemStatus::NeedsRepair),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl Serialize for ItemStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub location: String,
    pub status: ItemStatus,
    pub icon: String,
    pub description: Option<String>,
    pub quantity: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Fields of an item before the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub location: String,
    pub status: ItemStatus,
    pub icon: String,
    pub description: Option<String>,
    pub quantity: i32,
}

/// Row shape of the `inventory_items` table.
#[derive(Debug, FromRow)]
pub struct InventoryItemRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub location: String,
    pub status: String,
    pub icon: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<InventoryItemRow> for InventoryItem {
    type Error = anyhow::Error;

    fn try_from(r: InventoryItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            name: r.name,
            category: r.category,
            location: r.location,
            status: r.status.parse()?,
            icon: r.icon,
            description: r.description,
            quantity: r.quantity,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::inventory::dto::{CreateItemRequest, UpdateItemRequest};
use crate::inventory::repo::ItemRepo;
use crate::inventory::repo_types::{InventoryItem, ItemStatus, NewItem};

pub(crate) const DEFAULT_ICON: &str = "package";
pub(crate) const DEFAULT_QUANTITY: i32 = 1;

impl ItemStatus {
    /// Available -> In Use | Needs Repair, In Use -> Available,
    /// Needs Repair -> Available. Staying put is always allowed.
    pub fn can_transition_to(self, next: ItemStatus) -> bool {
        use ItemStatus::*;
        self == next
            || matches!(
                (self, next),
                (Available, InUse) | (Available, NeedsRepair) | (InUse, Available) | (NeedsRepair, Available)
            )
    }
}

pub(crate) fn parse_status(raw: &str) -> Result<ItemStatus, ApiError> {
    raw.parse::<ItemStatus>()
        .map_err(|e| ApiError::validation(format!("Invalid status: {:?}", e.0)))
}

fn check_transition(from: ItemStatus, to: ItemStatus) -> Result<(), ApiError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        warn!(%from, %to, "rejected status transition");
        Err(ApiError::validation(format!(
            "Cannot change status from {} to {}",
            from, to
        )))
    }
}

fn required(field: Option<String>, label: &str) -> Result<String, ApiError> {
    field
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation(format!("{} is required", label)))
}

fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_quantity(quantity: i32) -> Result<i32, ApiError> {
    if quantity < 0 {
        return Err(ApiError::validation("Quantity cannot be negative"));
    }
    Ok(quantity)
}

/// Validate a create request and fill in defaults.
pub fn new_item_from(req: CreateItemRequest) -> Result<NewItem, ApiError> {
    let status = match non_empty(req.status) {
        Some(s) => parse_status(&s)?,
        None => ItemStatus::Available,
    };
    Ok(NewItem {
        name: required(req.name, "Name")?,
        category: required(req.category, "Category")?,
        location: required(req.location, "Location")?,
        status,
        icon: non_empty(req.icon).unwrap_or_else(|| DEFAULT_ICON.to_string()),
        description: req.description,
        quantity: check_quantity(req.quantity.unwrap_or(DEFAULT_QUANTITY))?,
    })
}

/// Merge request fields into the stored item. Empty strings leave a field
/// untouched; `description` is replaced whenever it is present.
pub fn merge_update(mut item: InventoryItem, req: UpdateItemRequest) -> Result<InventoryItem, ApiError> {
    if let Some(name) = non_empty(req.name) {
        item.name = name;
    }
    if let Some(category) = non_empty(req.category) {
        item.category = category;
    }
    if let Some(location) = non_empty(req.location) {
        item.location = location;
    }
    if let Some(icon) = non_empty(req.icon) {
        item.icon = icon;
    }
    if let Some(status) = non_empty(req.status) {
        let next = parse_status(&status)?;
        check_transition(item.status, next)?;
        item.status = next;
    }
    if let Some(description) = req.description {
        item.description = description;
    }
    if let Some(quantity) = req.quantity {
        item.quantity = check_quantity(quantity)?;
    }
    Ok(item)
}

/// Persist `next`, which was derived from a stored item whose status was
/// `expected`.
async fn store(
    repo: &dyn ItemRepo,
    next: &InventoryItem,
    expected: ItemStatus,
) -> Result<InventoryItem, ApiError> {
    match repo
        .replace(next, expected)
        .await
        .map_err(ApiError::internal("Failed to update item"))?
    {
        Some(item) => Ok(item),
        None => match repo
            .get(next.id)
            .await
            .map_err(ApiError::internal("Failed to update item"))?
        {
            None => Err(ApiError::not_found("Item not found")),
            Some(current) => {
                warn!(item_id = %next.id, %expected, actual = %current.status, "status changed concurrently");
                Err(ApiError::conflict("Item status changed, reload and try again"))
            }
        },
    }
}

async fn load(repo: &dyn ItemRepo, id: Uuid, context: &'static str) -> Result<InventoryItem, ApiError> {
    repo.get(id)
        .await
        .map_err(ApiError::internal(context))?
        .ok_or_else(|| ApiError::not_found("Item not found"))
}

pub async fn update_item(
    repo: &dyn ItemRepo,
    id: Uuid,
    req: UpdateItemRequest,
) -> Result<InventoryItem, ApiError> {
    let current = load(repo, id, "Failed to update item").await?;
    let expected = current.status;
    let next = merge_update(current, req)?;
    store(repo, &next, expected).await
}

/// Move an item to `status` if the transition graph allows it.
pub async fn transition(
    repo: &dyn ItemRepo,
    id: Uuid,
    status: &str,
) -> Result<InventoryItem, ApiError> {
    let next_status = parse_status(status)?;
    let current = load(repo, id, "Failed to update status").await?;
    let expected = current.status;
    check_transition(expected, next_status)?;
    let next = InventoryItem {
        status: next_status,
        ..current
    };
    let item = store(repo, &next, expected).await?;
    info!(item_id = %id, from = %expected, to = %item.status, "item status changed");
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::repo::MemoryItemRepo;
    use ItemStatus::*;

    #[test]
    fn transition_graph() {
        assert!(Available.can_transition_to(InUse));
        assert!(Available.can_transition_to(NeedsRepair));
        assert!(InUse.can_transition_to(Available));
        assert!(NeedsRepair.can_transition_to(Available));
        assert!(InUse.can_transition_to(InUse));

        assert!(!InUse.can_transition_to(NeedsRepair));
        assert!(!NeedsRepair.can_transition_to(InUse));
    }

    #[test]
    fn status_parsing() {
        assert_eq!("In Use".parse::<ItemStatus>().unwrap(), InUse);
        assert_eq!("Maintenance".parse::<ItemStatus>().unwrap(), NeedsRepair);
        assert!("Lost".parse::<ItemStatus>().is_err());
        assert!(parse_status("in use").is_err());
    }

    #[test]
    fn create_defaults() {
        let item = new_item_from(CreateItemRequest {
            name: Some("Mouse".into()),
            category: Some("Electronics".into()),
            location: Some("Lab A".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(item.status, Available);
        assert_eq!(item.quantity, 1);
        assert_eq!(item.icon, "package");
        assert!(item.description.is_none());
    }

    #[test]
    fn create_requires_name_category_location() {
        let err = new_item_from(CreateItemRequest {
            name: Some("Mouse".into()),
            category: Some("  ".into()),
            location: Some("Lab A".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Category is required");

        assert!(new_item_from(CreateItemRequest {
            name: Some("Mouse".into()),
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn create_rejects_negative_quantity_and_bad_status() {
        let base = CreateItemRequest {
            name: Some("Markers".into()),
            category: Some("Office Supplies".into()),
            location: Some("Storage Room".into()),
            ..Default::default()
        };
        let mut negative = base.clone();
        negative.quantity = Some(-2);
        assert!(new_item_from(negative).is_err());

        let mut bogus = base;
        bogus.status = Some("Borrowed".into());
        assert!(new_item_from(bogus).is_err());
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let repo = MemoryItemRepo::default();
        let item = repo
            .create(new_item_from(CreateItemRequest {
                name: Some("Projector".into()),
                category: Some("Electronics".into()),
                location: Some("Classroom 101".into()),
                description: Some("Epson EB-X05".into()),
                ..Default::default()
            })
            .unwrap())
            .await
            .unwrap();

        let updated = update_item(
            &repo,
            item.id,
            UpdateItemRequest {
                name: Some(String::new()),
                location: Some("Main Office".into()),
                description: Some(None),
                quantity: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Projector");
        assert_eq!(updated.location, "Main Office");
        assert_eq!(updated.description, None);
        assert_eq!(updated.quantity, 3);
        assert_eq!(updated.category, "Electronics");
    }

    #[tokio::test]
    async fn transition_follows_graph() {
        let repo = MemoryItemRepo::default();
        let item = repo
            .create(new_item_from(CreateItemRequest {
                name: Some("Laptop".into()),
                category: Some("Electronics".into()),
                location: Some("Computer Lab A".into()),
                ..Default::default()
            })
            .unwrap())
            .await
            .unwrap();

        let out = transition(&repo, item.id, "In Use").await.unwrap();
        assert_eq!(out.status, InUse);

        let err = transition(&repo, item.id, "Needs Repair").await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);

        let back = transition(&repo, item.id, "Available").await.unwrap();
        assert_eq!(back.status, Available);

        let missing = transition(&repo, Uuid::new_v4(), "Available").await.unwrap_err();
        assert_eq!(missing.status_code(), axum::http::StatusCode::NOT_FOUND);
    }
}

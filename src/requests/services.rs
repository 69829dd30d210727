use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::requests::dto::CreateRequestBody;
use crate::requests::repo::RequestRepo;
use crate::requests::repo_types::{ItemRequest, NewItemRequest, RequestStatus};

fn required(field: Option<String>, label: &str) -> Result<String, ApiError> {
    field
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation(format!("{} is required", label)))
}

pub fn new_request_from(body: CreateRequestBody) -> Result<NewItemRequest, ApiError> {
    Ok(NewItemRequest {
        item_id: body
            .item_id
            .ok_or_else(|| ApiError::validation("Item id is required"))?,
        item_name: required(body.item_name, "Item name")?,
        requested_by: required(body.requested_by, "Requested by")?,
        notes: body.notes.filter(|n| !n.trim().is_empty()),
    })
}

/// Approve or reject a pending request.
pub async fn decide(
    repo: &dyn RequestRepo,
    id: Uuid,
    status: &str,
) -> Result<ItemRequest, ApiError> {
    let next = status
        .parse::<RequestStatus>()
        .map_err(|_| ApiError::validation(format!("Invalid status: {:?}", status.trim())))?;

    let current = repo
        .get(id)
        .await
        .map_err(ApiError::internal("Failed to update request"))?
        .ok_or_else(|| ApiError::not_found("Request not found"))?;

    if current.status == next {
        return Ok(current);
    }
    if !current.status.can_transition_to(next) {
        warn!(request_id = %id, from = %current.status, to = %next, "rejected request transition");
        return Err(ApiError::validation(format!(
            "Cannot change request from {} to {}",
            current.status, next
        )));
    }

    let updated = repo
        .set_status(id, current.status, next)
        .await
        .map_err(ApiError::internal("Failed to update request"))?
        // another operator decided first
        .ok_or_else(|| ApiError::conflict("Request was already decided"))?;

    info!(request_id = %id, status = %updated.status, "request decided");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::repo::MemoryRequestRepo;
    use axum::http::StatusCode;

    fn body() -> CreateRequestBody {
        CreateRequestBody {
            item_id: Some(Uuid::new_v4()),
            item_name: Some("Projector".into()),
            requested_by: Some("Ms. Rivera".into()),
            notes: Some("Needed for Friday assembly".into()),
        }
    }

    #[test]
    fn create_validates_fields() {
        assert!(new_request_from(body()).is_ok());

        let mut no_name = body();
        no_name.item_name = Some(" ".into());
        assert_eq!(new_request_from(no_name).unwrap_err().to_string(), "Item name is required");

        let mut no_item = body();
        no_item.item_id = None;
        assert!(new_request_from(no_item).is_err());

        let mut blank_notes = body();
        blank_notes.notes = Some(String::new());
        assert_eq!(new_request_from(blank_notes).unwrap().notes, None);
    }

    #[tokio::test]
    async fn pending_request_is_decided_once() {
        let repo = MemoryRequestRepo::default();
        let req = repo.create(new_request_from(body()).unwrap()).await.unwrap();
        assert_eq!(req.status, RequestStatus::Pending);

        let approved = decide(&repo, req.id, "Approved").await.unwrap();
        assert_eq!(approved.status, RequestStatus::Approved);

        let again = decide(&repo, req.id, "Approved").await.unwrap();
        assert_eq!(again.status, RequestStatus::Approved);

        let err = decide(&repo, req.id, "Rejected").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let err = decide(&repo, req.id, "Pending").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let stored = repo.get(req.id).await.unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::Approved);
    }

    #[tokio::test]
    async fn unknown_status_or_id() {
        let repo = MemoryRequestRepo::default();
        let req = repo.create(new_request_from(body()).unwrap()).await.unwrap();

        let err = decide(&repo, req.id, "Maybe").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = decide(&repo, Uuid::new_v4(), "Rejected").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}

use serde::Deserialize;
use uuid::Uuid;

/// Request body for `POST /requests`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestBody {
    pub item_id: Option<Uuid>,
    pub item_name: Option<String>,
    pub requested_by: Option<String>,
    pub notes: Option<String>,
}

/// Request body for `PATCH /requests/:id/status`.
#[derive(Debug, Deserialize)]
pub struct RequestStatusBody {
    #[serde(default)]
    pub status: String,
}

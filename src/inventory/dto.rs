use serde::{Deserialize, Deserializer};

/// Request body for `POST /inventory`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateItemRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i32>,
}

/// Request body for `PUT /inventory/:id`. Absent fields keep their value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub icon: Option<String>,
    /// `Some(None)` clears the description.
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub quantity: Option<i32>,
}

/// Request body for `PATCH /inventory/:id/status`.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    #[serde(default)]
    pub status: String,
}

/// Distinguishes an explicit `null` from an absent key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

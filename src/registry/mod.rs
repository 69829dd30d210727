//! Category and location name lists. Both are plain sets of strings with no
//! link to the items that mention them.

pub mod handlers;
pub mod repo;

use crate::state::AppState;
use axum::Router;
use handlers::{registry_routes, Categories, Locations};

pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Electronics",
    "Office Supplies",
    "Furniture",
    "Audio/Visual",
    "Sports Equipment",
    "Other",
];

pub const DEFAULT_LOCATIONS: &[&str] = &[
    "Computer Lab A",
    "Computer Lab B",
    "Classroom 101",
    "Main Office",
    "Storage Room",
    "IT Department",
];

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(registry_routes::<Categories>("/categories"))
        .merge(registry_routes::<Locations>("/locations"))
}

use tracing::{debug, info};

use crate::auth::repo_types::Role;
use crate::auth::services::{hash_password, normalize_email};
use crate::config::SeedConfig;
use crate::inventory::repo_types::{ItemStatus, NewItem};
use crate::state::AppState;

/// (name, category, location, status, icon, description, quantity)
type DemoItem = (&'static str, &'static str, &'static str, ItemStatus, &'static str, &'static str, i32);

const DEMO_ITEMS: &[DemoItem] = &[
    ("Projector", "Electronics", "Classroom 101", ItemStatus::Available, "projector", "Epson EB-X05 Projector", 1),
    ("Laptop", "Electronics", "Computer Lab A", ItemStatus::InUse, "laptop", "Dell Latitude 5420", 1),
    ("Markers", "Office Supplies", "Storage Room", ItemStatus::NeedsRepair, "markers", "Whiteboard markers set", 12),
    ("USB Drive", "Electronics", "IT Department", ItemStatus::Available, "usb", "SanDisk 64GB USB 3.0", 5),
    ("Mouse", "Electronics", "Computer Lab B", ItemStatus::Available, "mouse", "Logitech Wireless Mouse", 10),
    ("Keyboard", "Electronics", "Computer Lab A", ItemStatus::Available, "briefcase", "Mechanical Keyboard", 8),
];

/// Create the admin account and, on an empty inventory, the demo items.
/// Safe to run on every start.
pub async fn run(state: &AppState, cfg: &SeedConfig) -> anyhow::Result<()> {
    let email = normalize_email(&cfg.admin_email);
    if state.users.find_by_email(&email).await?.is_none() {
        let hash = hash_password(&cfg.admin_password)?;
        if let Some(admin) = state
            .users
            .create(&email, "Admin User", &hash, Role::Admin)
            .await?
        {
            info!(user_id = %admin.id, email = %admin.email, "seeded admin user");
        }
    } else {
        debug!(email = %email, "admin user already present");
    }

    if !state.items.list().await?.is_empty() {
        debug!("inventory not empty; skipping demo items");
        return Ok(());
    }
    for &(name, category, location, status, icon, description, quantity) in DEMO_ITEMS {
        state
            .items
            .create(NewItem {
                name: name.into(),
                category: category.into(),
                location: location.into(),
                status,
                icon: icon.into(),
                description: Some(description.into()),
                quantity,
            })
            .await?;
    }
    info!(count = DEMO_ITEMS.len(), "seeded demo inventory");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::services::verify_password;

    fn cfg() -> SeedConfig {
        SeedConfig {
            admin_email: "Admin@School.com".into(),
            admin_password: "admin123".into(),
        }
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let state = AppState::fake();
        run(&state, &cfg()).await.unwrap();
        run(&state, &cfg()).await.unwrap();

        let admin = state
            .users
            .find_by_email("admin@school.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(verify_password("admin123", &admin.password_hash).unwrap());

        let items = state.items.list().await.unwrap();
        assert_eq!(items.len(), DEMO_ITEMS.len());
        assert!(items.iter().any(|i| i.name == "Laptop" && i.status == ItemStatus::InUse));
    }
}

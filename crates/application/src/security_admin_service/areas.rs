use sgi_core::{AppError, AppResult, Principal};
use sgi_domain::{AreaName, AuditAction};
use tracing::info;

use super::{AdminAuditEvent, SecurityAdminService};

impl SecurityAdminService {
    /// Lists the area catalog. Open to every authenticated principal.
    pub async fn list_areas(&self, _actor: &Principal) -> AppResult<Vec<AreaName>> {
        self.area_repository.list_areas().await
    }

    /// Adds an area to the catalog.
    pub async fn add_area(&self, actor: &Principal, name: &str) -> AppResult<AreaName> {
        self.require_admin(actor)?;

        let area = AreaName::new(name)?;
        if let Some(existing) = self.area_repository.find_area(area.as_str()).await? {
            return Err(AppError::Conflict(format!(
                "area '{}' already exists",
                existing.as_str()
            )));
        }

        self.area_repository.create_area(&area).await?;
        info!(area = %area, "area added");

        self.append_audit(
            actor,
            AdminAuditEvent {
                action: AuditAction::AreaCreated,
                resource_type: "area",
                resource_id: area.as_str().to_owned(),
                detail: None,
            },
        )
        .await?;

        Ok(area)
    }

    /// Renames an area. Users and records follow the new name.
    pub async fn rename_area(
        &self,
        actor: &Principal,
        current: &str,
        renamed: &str,
    ) -> AppResult<AreaName> {
        self.require_admin(actor)?;

        let renamed = AreaName::new(renamed)?;
        let Some(existing) = self.area_repository.find_area(current).await? else {
            return Err(AppError::NotFound(format!("area '{}' not found", current.trim())));
        };

        if let Some(other) = self.area_repository.find_area(renamed.as_str()).await?
            && other != existing
        {
            return Err(AppError::Conflict(format!(
                "area '{}' already exists",
                other.as_str()
            )));
        }

        self.area_repository
            .rename_area(existing.as_str(), &renamed)
            .await?;
        info!(from = %existing, to = %renamed, "area renamed");

        self.append_audit(
            actor,
            AdminAuditEvent {
                action: AuditAction::AreaRenamed,
                resource_type: "area",
                resource_id: renamed.as_str().to_owned(),
                detail: Some(format!("renamed from '{}'", existing.as_str())),
            },
        )
        .await?;

        Ok(renamed)
    }

    /// Removes an unused area from the catalog.
    pub async fn remove_area(&self, actor: &Principal, name: &str) -> AppResult<()> {
        self.require_admin(actor)?;

        let Some(existing) = self.area_repository.find_area(name).await? else {
            return Err(AppError::NotFound(format!("area '{}' not found", name.trim())));
        };

        self.area_repository.remove_area(existing.as_str()).await?;
        info!(area = %existing, "area removed");

        self.append_audit(
            actor,
            AdminAuditEvent {
                action: AuditAction::AreaRemoved,
                resource_type: "area",
                resource_id: existing.as_str().to_owned(),
                detail: None,
            },
        )
        .await
    }
}

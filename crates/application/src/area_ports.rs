use async_trait::async_trait;
use sgi_core::AppResult;
use sgi_domain::AreaName;

/// Repository port for the area catalog.
///
/// Name lookups ignore case. Mutations run atomically so concurrent
/// administrators cannot produce duplicate entries.
#[async_trait]
pub trait AreaRepository: Send + Sync {
    /// Lists areas ordered by name.
    async fn list_areas(&self) -> AppResult<Vec<AreaName>>;

    /// Finds the stored entry matching `name`.
    async fn find_area(&self, name: &str) -> AppResult<Option<AreaName>>;

    /// Adds an area. Duplicates fail with `Conflict`.
    async fn create_area(&self, area: &AreaName) -> AppResult<()>;

    /// Renames an area, cascading to users and records.
    ///
    /// Fails with `NotFound` for an unknown area and `Conflict` when the new
    /// name belongs to another entry.
    async fn rename_area(&self, current: &str, renamed: &AreaName) -> AppResult<()>;

    /// Removes an area. Fails with `Conflict` while users or records reference it.
    async fn remove_area(&self, name: &str) -> AppResult<()>;
}

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sgi_application::{
    AuthorizationRepository, RecordCount, RecordCountQuery, RecordQuery, RecordRepository,
};
use sgi_core::{AppError, AppResult, UserId};
use sgi_domain::{
    EntityKind, EntityRef, MODALIDAD_FIELD, ProtectedRecord, RecordAttributes, RecordLink,
    TemporaryGrant,
};

use super::InMemoryStore;

fn unique_conflict(
    records: &BTreeMap<EntityRef, ProtectedRecord>,
    candidate: EntityRef,
    attributes: &RecordAttributes,
) -> Option<AppError> {
    let kind = candidate.kind;
    kind.fields()
        .iter()
        .filter(|field| field.unique)
        .filter_map(|field| attributes.get(field.name).map(|value| (field.name, value)))
        .find(|(name, value)| {
            records.values().any(|stored| {
                stored.kind == kind
                    && stored.id != candidate.id
                    && stored.attributes.get(*name) == Some(*value)
            })
        })
        .map(|_| {
            AppError::Conflict(format!(
                "a {} with the same unique value already exists",
                kind.display_name()
            ))
        })
}

#[async_trait]
impl RecordRepository for InMemoryStore {
    async fn insert_record(&self, record: &ProtectedRecord) -> AppResult<()> {
        self.ensure_area_exists(record.area.as_str()).await?;

        let mut records = self.records.write().await;
        let entity = record.entity_ref();
        if records.contains_key(&entity) {
            return Err(AppError::Conflict(format!("{entity} already exists")));
        }
        if let Some(conflict) = unique_conflict(&records, entity, &record.attributes) {
            return Err(conflict);
        }

        records.insert(entity, record.clone());
        Ok(())
    }

    async fn find_record(&self, entity: EntityRef) -> AppResult<Option<ProtectedRecord>> {
        Ok(self.records.read().await.get(&entity).cloned())
    }

    async fn list_records(&self, query: RecordQuery) -> AppResult<Vec<ProtectedRecord>> {
        let records = self.records.read().await;
        let mut matching: Vec<ProtectedRecord> = records
            .values()
            .filter(|record| record.kind == query.kind)
            .filter(|record| {
                query
                    .area
                    .as_deref()
                    .is_none_or(|area| record.area == area)
            })
            .filter(|record| {
                query.filter.as_ref().is_none_or(|filter| {
                    record.attributes.get(filter.field.as_str()) == Some(&filter.value)
                })
            })
            .cloned()
            .collect();
        matching.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then(left.id.cmp(&right.id))
        });

        Ok(matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect())
    }

    async fn update_record_attributes(
        &self,
        entity: EntityRef,
        attributes: &RecordAttributes,
        updated_at: DateTime<Utc>,
    ) -> AppResult<ProtectedRecord> {
        let mut records = self.records.write().await;
        if let Some(conflict) = unique_conflict(&records, entity, attributes) {
            return Err(conflict);
        }

        let Some(record) = records.get_mut(&entity) else {
            return Err(AppError::NotFound(format!("{entity} not found")));
        };
        record.attributes = attributes.clone();
        record.updated_at = updated_at;
        Ok(record.clone())
    }

    async fn delete_record(&self, entity: EntityRef) -> AppResult<()> {
        if self.records.write().await.remove(&entity).is_none() {
            return Err(AppError::NotFound(format!("{entity} not found")));
        }

        self.links
            .write()
            .await
            .retain(|link| link.other_end(entity).is_none());
        Ok(())
    }

    async fn count_records(&self, query: RecordCountQuery) -> AppResult<Vec<RecordCount>> {
        let records = self.records.read().await;
        let mut groups: BTreeMap<(EntityKind, String, Option<String>), u64> = BTreeMap::new();
        for record in records.values().filter(|record| {
            query.kinds.contains(&record.kind)
                && query.period.contains(record.created_at)
                && query.area.as_deref().is_none_or(|area| record.area == area)
                && query.user_id.is_none_or(|user_id| record.user_id == user_id)
        }) {
            let modalidad = if query.by_modalidad {
                record
                    .attributes
                    .get(MODALIDAD_FIELD)
                    .and_then(|value| value.as_str())
                    .map(str::to_owned)
            } else {
                None
            };
            *groups
                .entry((record.kind, record.area.clone(), modalidad))
                .or_default() += 1;
        }

        Ok(groups
            .into_iter()
            .map(|((kind, area, modalidad), count)| RecordCount {
                kind,
                area,
                modalidad,
                count,
            })
            .collect())
    }

    async fn insert_link(&self, link: RecordLink) -> AppResult<()> {
        let mut links = self.links.write().await;
        if links.contains(&link) {
            return Err(AppError::Conflict("records are already linked".to_owned()));
        }

        links.push(link);
        Ok(())
    }

    async fn delete_link(&self, link: RecordLink) -> AppResult<()> {
        let mut links = self.links.write().await;
        let Some(position) = links.iter().position(|stored| *stored == link) else {
            return Err(AppError::NotFound(format!(
                "no link between {} and {}",
                link.left(),
                link.right()
            )));
        };

        links.remove(position);
        Ok(())
    }

    async fn list_links(&self, entity: EntityRef) -> AppResult<Vec<RecordLink>> {
        Ok(self
            .links
            .read()
            .await
            .iter()
            .filter(|link| link.other_end(entity).is_some())
            .copied()
            .collect())
    }
}

#[async_trait]
impl AuthorizationRepository for InMemoryStore {
    async fn find_entity_area(&self, entity: EntityRef) -> AppResult<Option<String>> {
        Ok(self
            .records
            .read()
            .await
            .get(&entity)
            .map(|record| record.area.clone()))
    }

    async fn find_active_temporary_grant(
        &self,
        user_id: UserId,
        entity: EntityRef,
        now: DateTime<Utc>,
    ) -> AppResult<Option<TemporaryGrant>> {
        Ok(self
            .grants
            .read()
            .await
            .iter()
            .filter(|grant| grant.admits(user_id, entity, now))
            .max_by_key(|grant| grant.expires_at)
            .cloned())
    }
}

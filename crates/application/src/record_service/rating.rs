use chrono::Utc;
use serde_json::{Map, Value};
use sgi_core::{AppError, AppResult, Principal};
use sgi_domain::{
    AuditAction, EntityKind, EntityRef, ProtectedRecord, RatingSlot, Role, validate_rating,
};
use tracing::info;
use uuid::Uuid;

use super::{RecordOperation, RecordService};

impl RecordService {
    /// Writes the actor's rating slot on a case.
    ///
    /// Admins rate as director, analysts as analyst and superusers as coordinator;
    /// the other slots are left untouched.
    pub async fn rate_case(
        &self,
        actor: &Principal,
        case_id: Uuid,
        rating: i64,
    ) -> AppResult<ProtectedRecord> {
        let entity = EntityRef::new(EntityKind::Caso, case_id);
        self.authorize_entity(actor, entity, RecordOperation::Rate)
            .await?;

        let slot = actor
            .role()
            .parse::<Role>()
            .ok()
            .and_then(RatingSlot::for_role)
            .ok_or_else(|| AppError::Forbidden("your role cannot rate cases".to_owned()))?;
        let rating = validate_rating(rating)?;

        let current = self.load_record(entity).await?;
        let mut patch = Map::new();
        patch.insert(slot.field().to_owned(), Value::from(rating));
        let attributes = entity
            .kind
            .merge_attributes(&current.attributes, &Value::Object(patch))?;

        let rated = self
            .repository
            .update_record_attributes(entity, &attributes, Utc::now())
            .await?;
        info!(entity = %entity, slot = slot.field(), rating, "case rated");

        self.append_audit(
            actor,
            AuditAction::RecordRated,
            entity,
            Some(format!("{} = {rating}", slot.field())),
        )
        .await?;

        Ok(rated)
    }
}

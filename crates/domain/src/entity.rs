use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sgi_core::{AppError, AppResult, UserId};
use uuid::Uuid;

/// Attribute map persisted for one protected record.
pub type RecordAttributes = Map<String, Value>;

/// Keys owned by the server and never accepted from clients.
pub const RESERVED_ATTRIBUTE_KEYS: [&str; 5] = ["id", "area", "user_id", "created_at", "updated_at"];

/// Closed set of area-scoped record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Investigation case.
    Caso,
    /// Generic document.
    Documento,
    /// Passport credential.
    Pasaporte,
    /// Person profile.
    Persona,
    /// Vehicle.
    Vehiculo,
    /// Company.
    Empresa,
    /// Street address.
    Direccion,
    /// Visa credential.
    Visa,
    /// Incident report.
    Iio,
}

impl EntityKind {
    /// Returns every protected entity kind.
    #[must_use]
    pub const fn all() -> [Self; 9] {
        [
            Self::Caso,
            Self::Documento,
            Self::Pasaporte,
            Self::Persona,
            Self::Vehiculo,
            Self::Empresa,
            Self::Direccion,
            Self::Visa,
            Self::Iio,
        ]
    }

    /// Returns the stable singular identifier, which is also the storage table name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Caso => "caso",
            Self::Documento => "documento",
            Self::Pasaporte => "pasaporte",
            Self::Persona => "persona",
            Self::Vehiculo => "vehiculo",
            Self::Empresa => "empresa",
            Self::Direccion => "direccion",
            Self::Visa => "visa",
            Self::Iio => "iio",
        }
    }

    /// Returns the collection path segment used by the HTTP surface and by grants.
    #[must_use]
    pub const fn route_segment(self) -> &'static str {
        match self {
            Self::Caso => "casos",
            Self::Documento => "documentos",
            Self::Pasaporte => "pasaportes",
            Self::Persona => "personas",
            Self::Vehiculo => "vehiculos",
            Self::Empresa => "empresas",
            Self::Direccion => "direcciones",
            Self::Visa => "visas",
            Self::Iio => "iios",
        }
    }

    /// Returns the name disclosed in area denials.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Caso => "Caso",
            Self::Documento => "Documento",
            Self::Pasaporte => "Pasaporte",
            Self::Persona => "Persona",
            Self::Vehiculo => "Vehiculo",
            Self::Empresa => "Empresa",
            Self::Direccion => "Direccion",
            Self::Visa => "Visa",
            Self::Iio => "IIO",
        }
    }

    /// Returns the attribute schema for this kind.
    #[must_use]
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::Caso => CASO_FIELDS,
            Self::Documento => DOCUMENTO_FIELDS,
            Self::Pasaporte => PASAPORTE_FIELDS,
            Self::Persona => PERSONA_FIELDS,
            Self::Vehiculo => VEHICULO_FIELDS,
            Self::Empresa => EMPRESA_FIELDS,
            Self::Direccion => DIRECCION_FIELDS,
            Self::Visa => VISA_FIELDS,
            Self::Iio => IIO_FIELDS,
        }
    }

    /// Finds one declared field by name.
    #[must_use]
    pub fn field(self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|field| field.name == name)
    }

    /// Validates a client payload for record creation.
    ///
    /// Reserved keys are dropped, null values are treated as absent, and every
    /// remaining key must be a declared field with a matching value type.
    pub fn validate_new_attributes(self, payload: &Value) -> AppResult<RecordAttributes> {
        let mut attributes = RecordAttributes::new();
        for (key, value) in payload_object(payload)? {
            if is_reserved_key(key) || value.is_null() {
                continue;
            }

            let field = self.declared_field(key)?;
            attributes.insert(key.clone(), field.stored_value(value)?);
        }

        self.check_required(&attributes)?;
        Ok(attributes)
    }

    /// Merges a client patch into stored attributes.
    ///
    /// A null value removes an optional field. Omitted fields keep their stored value.
    pub fn merge_attributes(
        self,
        current: &RecordAttributes,
        patch: &Value,
    ) -> AppResult<RecordAttributes> {
        let mut merged = current.clone();
        for (key, value) in payload_object(patch)? {
            if is_reserved_key(key) {
                continue;
            }

            let field = self.declared_field(key)?;
            if value.is_null() {
                if field.required {
                    return Err(AppError::Validation(format!(
                        "field '{}' is required for {}",
                        field.name,
                        self.as_str()
                    )));
                }
                merged.remove(key);
                continue;
            }

            merged.insert(key.clone(), field.stored_value(value)?);
        }

        self.check_required(&merged)?;
        Ok(merged)
    }

    fn declared_field(self, key: &str) -> AppResult<&'static FieldSpec> {
        self.field(key).ok_or_else(|| {
            AppError::Validation(format!("unknown field '{key}' for {}", self.as_str()))
        })
    }

    fn check_required(self, attributes: &RecordAttributes) -> AppResult<()> {
        for field in self.fields().iter().filter(|field| field.required) {
            let present = match attributes.get(field.name) {
                Some(Value::String(value)) => !value.trim().is_empty(),
                Some(value) => !value.is_null(),
                None => false,
            };
            if !present {
                return Err(AppError::Validation(format!(
                    "field '{}' is required for {}",
                    field.name,
                    self.as_str()
                )));
            }
        }

        Ok(())
    }
}

impl Display for EntityKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Self::all()
            .into_iter()
            .find(|kind| {
                kind.route_segment().eq_ignore_ascii_case(value)
                    || kind.as_str().eq_ignore_ascii_case(value)
            })
            .ok_or_else(|| AppError::Validation(format!("unsupported entity type '{value}'")))
    }
}

/// Typed reference to one protected record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef {
    /// Record kind.
    pub kind: EntityKind,
    /// Record identifier.
    pub id: Uuid,
}

impl EntityRef {
    /// Creates a typed entity reference.
    #[must_use]
    pub fn new(kind: EntityKind, id: Uuid) -> Self {
        Self { kind, id }
    }
}

impl Display for EntityRef {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}#{}", self.kind.as_str(), self.id)
    }
}

/// Value type accepted by a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// JSON string.
    Text,
    /// JSON integer.
    Integer,
    /// JSON boolean.
    Boolean,
    /// RFC3339 timestamp string.
    Timestamp,
    /// UUID string.
    Uuid,
}

impl FieldKind {
    /// Returns the stable type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Timestamp => "timestamp",
            Self::Uuid => "uuid",
        }
    }

    /// Returns whether a JSON value satisfies this type.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Text => value.is_string(),
            Self::Integer => value.is_i64(),
            Self::Boolean => value.is_boolean(),
            Self::Timestamp => value
                .as_str()
                .is_some_and(|raw| DateTime::parse_from_rfc3339(raw).is_ok()),
            Self::Uuid => value
                .as_str()
                .is_some_and(|raw| Uuid::parse_str(raw).is_ok()),
        }
    }
}

/// Declared attribute of a protected record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Attribute key in client payloads.
    pub name: &'static str,
    /// Accepted value type.
    pub kind: FieldKind,
    /// Whether the attribute must be present.
    pub required: bool,
    /// Whether the attribute value is unique per kind.
    pub unique: bool,
}

impl FieldSpec {
    const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            required: false,
            unique: false,
        }
    }

    const fn of(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            unique: false,
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Checks a client value and returns the form persisted for it.
    ///
    /// Timestamps are stored in canonical UTC form so equality filters match any
    /// RFC3339 spelling of the same instant.
    fn stored_value(&self, value: &Value) -> AppResult<Value> {
        if !self.kind.accepts(value) {
            return Err(AppError::Validation(format!(
                "field '{}' must be a {} value",
                self.name,
                self.kind.as_str()
            )));
        }

        Ok(match (self.kind, value.as_str().and_then(canonical_timestamp)) {
            (FieldKind::Timestamp, Some(canonical)) => Value::from(canonical),
            _ => value.clone(),
        })
    }
}

/// Stored protected record.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtectedRecord {
    /// Record identifier.
    pub id: Uuid,
    /// Record kind.
    pub kind: EntityKind,
    /// Owning area, stamped from the creator.
    pub area: String,
    /// Account that created the record.
    pub user_id: UserId,
    /// Kind-specific attributes.
    pub attributes: RecordAttributes,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ProtectedRecord {
    /// Returns the typed reference to this record.
    #[must_use]
    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.kind, self.id)
    }
}

/// Undirected cross-reference between two protected records.
///
/// Endpoints are stored in canonical order so each pair has one representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordLink {
    left: EntityRef,
    right: EntityRef,
}

impl RecordLink {
    /// Creates a canonical link between two distinct records.
    pub fn new(first: EntityRef, second: EntityRef) -> AppResult<Self> {
        if first == second {
            return Err(AppError::Validation(
                "a record cannot be linked to itself".to_owned(),
            ));
        }

        let (left, right) = if first < second {
            (first, second)
        } else {
            (second, first)
        };
        Ok(Self { left, right })
    }

    /// Returns the lower endpoint.
    #[must_use]
    pub fn left(&self) -> EntityRef {
        self.left
    }

    /// Returns the upper endpoint.
    #[must_use]
    pub fn right(&self) -> EntityRef {
        self.right
    }

    /// Returns the endpoint opposite to `entity`, if it participates in the link.
    #[must_use]
    pub fn other_end(&self, entity: EntityRef) -> Option<EntityRef> {
        if self.left == entity {
            Some(self.right)
        } else if self.right == entity {
            Some(self.left)
        } else {
            None
        }
    }
}

/// Renders an RFC3339 timestamp as UTC with a `Z` suffix, or `None` when it does not parse.
#[must_use]
pub fn canonical_timestamp(raw: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

fn payload_object(payload: &Value) -> AppResult<&Map<String, Value>> {
    payload
        .as_object()
        .ok_or_else(|| AppError::Validation("record payload must be a JSON object".to_owned()))
}

fn is_reserved_key(key: &str) -> bool {
    RESERVED_ATTRIBUTE_KEYS.contains(&key)
}

const CASO_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("nombre").required().unique(),
    FieldSpec::text("tipo"),
    FieldSpec::text("codigo").unique(),
    FieldSpec::text("modalidad"),
    FieldSpec::text("tie"),
    FieldSpec::of("vdirector", FieldKind::Integer),
    FieldSpec::of("vanalista", FieldKind::Integer),
    FieldSpec::of("vcoordinador", FieldKind::Integer),
];

const DOCUMENTO_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("numero"),
    FieldSpec::text("documento"),
    FieldSpec::text("nombre").required(),
    FieldSpec::text("tipo"),
    FieldSpec::text("codigo").unique(),
];

const PASAPORTE_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("numero").required(),
    FieldSpec::text("foto"),
    FieldSpec::text("pais"),
    FieldSpec::text("tipo"),
    FieldSpec::text("codigo").unique(),
    FieldSpec::of("representante_id", FieldKind::Uuid),
];

const PERSONA_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("nombre").required(),
    FieldSpec::text("apellido"),
    FieldSpec::text("estado_civil"),
    FieldSpec::text("cedula").unique(),
    FieldSpec::text("correo").unique(),
    FieldSpec::text("telefono"),
    FieldSpec::text("profesion"),
    FieldSpec::text("ideologia"),
    FieldSpec::text("cargo_actual"),
    FieldSpec::text("alias"),
    FieldSpec::text("filiacion_politica"),
    FieldSpec::text("religion"),
    FieldSpec::text("tipo_perfil"),
    FieldSpec::text("informacion_de_interes"),
    FieldSpec::text("valoraciones"),
];

const VEHICULO_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("modelo"),
    FieldSpec::text("tipo"),
    FieldSpec::text("linea"),
    FieldSpec::text("marca"),
    FieldSpec::text("color"),
    FieldSpec::text("año"),
    FieldSpec::text("numero"),
    FieldSpec::text("matricula").required().unique(),
];

const EMPRESA_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("nombre").required(),
    FieldSpec::text("direccion"),
    FieldSpec::text("actividad_economica"),
    FieldSpec::text("rif").unique(),
    FieldSpec::of("representante_id", FieldKind::Uuid),
];

const DIRECCION_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("nombre").required(),
    FieldSpec::text("lugar"),
    FieldSpec::text("urbanizacion"),
    FieldSpec::text("parroquia"),
    FieldSpec::text("estado"),
    FieldSpec::text("municipio"),
    FieldSpec::of("dueno_id", FieldKind::Uuid),
];

const VISA_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("valoracion"),
    FieldSpec::text("pais"),
    FieldSpec::text("tipo"),
    FieldSpec::text("codigo").required().unique(),
    FieldSpec::of("representante_id", FieldKind::Uuid),
    FieldSpec::of("aprobada", FieldKind::Boolean),
];

const IIO_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("redi"),
    FieldSpec::text("zodi"),
    FieldSpec::text("adi"),
    FieldSpec::of("fecha", FieldKind::Timestamp),
    FieldSpec::text("lugar"),
    FieldSpec::text("parroquia"),
    FieldSpec::text("descripcion"),
    FieldSpec::text("urbanizacion"),
    FieldSpec::text("nombre").required(),
    FieldSpec::text("modalidad"),
    FieldSpec::of("procesado", FieldKind::Boolean),
    FieldSpec::text("imagen_url"),
    FieldSpec::text("nivel"),
];

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;
    use uuid::Uuid;

    use super::{EntityKind, EntityRef, RecordLink, canonical_timestamp};

    #[test]
    fn parses_route_segments_and_singular_names() {
        assert!(matches!("personas".parse::<EntityKind>(), Ok(EntityKind::Persona)));
        assert!(matches!("IIO".parse::<EntityKind>(), Ok(EntityKind::Iio)));
        assert!(matches!(
            "direcciones".parse::<EntityKind>(),
            Ok(EntityKind::Direccion)
        ));
    }

    #[test]
    fn rejects_unsupported_entity_type() {
        let result = "mensajes".parse::<EntityKind>();
        assert!(result.is_err());
    }

    #[test]
    fn create_payload_drops_reserved_keys() {
        let attributes = EntityKind::Caso.validate_new_attributes(&json!({
            "nombre": "Operacion Norte",
            "area": "SEP",
            "id": "not-a-uuid",
            "vdirector": 3
        }));

        assert!(matches!(
            attributes,
            Ok(ref map) if !map.contains_key("area") && !map.contains_key("id") && map.len() == 2
        ));
    }

    #[test]
    fn create_payload_rejects_unknown_field() {
        let result = EntityKind::Vehiculo.validate_new_attributes(&json!({
            "matricula": "AB123CD",
            "alas": 2
        }));
        assert!(result.is_err());
    }

    #[test]
    fn create_payload_rejects_wrong_type() {
        let result = EntityKind::Visa.validate_new_attributes(&json!({
            "codigo": "V-1",
            "aprobada": "yes"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn create_payload_requires_identity_field() {
        let result = EntityKind::Persona.validate_new_attributes(&json!({ "nombre": "   " }));
        assert!(result.is_err());
    }

    #[test]
    fn merge_removes_optional_field_on_null() {
        let current = EntityKind::Persona
            .validate_new_attributes(&json!({ "nombre": "Ana", "alias": "La Flaca" }));
        let Ok(current) = current else {
            panic!("seed attributes should validate");
        };

        let merged = EntityKind::Persona.merge_attributes(&current, &json!({ "alias": null }));
        assert!(matches!(merged, Ok(ref map) if !map.contains_key("alias")));
    }

    #[test]
    fn merge_rejects_clearing_required_field() {
        let current = EntityKind::Persona.validate_new_attributes(&json!({ "nombre": "Ana" }));
        let Ok(current) = current else {
            panic!("seed attributes should validate");
        };

        let merged = EntityKind::Persona.merge_attributes(&current, &json!({ "nombre": null }));
        assert!(merged.is_err());
    }

    #[test]
    fn timestamp_fields_require_rfc3339() {
        let valid = EntityKind::Iio.validate_new_attributes(&json!({
            "nombre": "Reporte",
            "fecha": "2026-03-01T10:00:00Z"
        }));
        let invalid = EntityKind::Iio.validate_new_attributes(&json!({
            "nombre": "Reporte",
            "fecha": "yesterday"
        }));

        assert!(valid.is_ok());
        assert!(invalid.is_err());
    }

    #[test]
    fn timestamps_are_stored_in_utc_whatever_the_input_offset() {
        let attributes = EntityKind::Iio.validate_new_attributes(&json!({
            "nombre": "Reporte",
            "fecha": "2026-03-01T10:00:00-04:00"
        }));

        assert!(matches!(
            attributes,
            Ok(ref map) if map.get("fecha") == Some(&json!("2026-03-01T14:00:00Z"))
        ));
        assert_eq!(
            canonical_timestamp("2026-03-01T14:00:00+00:00").as_deref(),
            Some("2026-03-01T14:00:00Z")
        );
    }

    #[test]
    fn link_is_canonical_and_rejects_self_reference() {
        let persona = EntityRef::new(EntityKind::Persona, Uuid::new_v4());
        let caso = EntityRef::new(EntityKind::Caso, Uuid::new_v4());

        let forward = RecordLink::new(persona, caso);
        let backward = RecordLink::new(caso, persona);
        assert!(matches!((forward, backward), (Ok(a), Ok(b)) if a == b));
        assert!(RecordLink::new(caso, caso).is_err());
    }

    proptest! {
        #[test]
        fn route_segment_parsing_ignores_case(index in 0usize..9, mask in any::<u32>()) {
            let kind = EntityKind::all()[index];
            let mixed: String = kind
                .route_segment()
                .chars()
                .enumerate()
                .map(|(position, character)| {
                    if mask & (1 << (position % 32)) == 0 {
                        character.to_ascii_uppercase()
                    } else {
                        character
                    }
                })
                .collect();

            prop_assert_eq!(mixed.parse::<EntityKind>().ok(), Some(kind));
        }
    }
}

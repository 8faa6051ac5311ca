//! Entity models: mapping typed records onto HubSpot properties
//!
//! A [`Model`] is built once per entity type and then shared read-only by
//! every API accessor that handles that type. Each registered field becomes
//! a [`PropertyDescriptor`] carrying its wire name, whether it is sent on
//! create/update, and an optional special role.
//!
//! ## Field tags
//!
//! Fields are registered with a comma-separated tag:
//!
//! | Token | Meaning |
//! |-------|---------|
//! | `name=<wire>` | HubSpot property name (default: lower-cased field name) |
//! | `id` | receives the entity id from the response |
//! | `deleted` | receives the deleted flag from the response |
//! | `noexport` | never sent on create/update |
//! | `contacts` | ids of linked contacts (`Vec<i64>` only) |
//! | `companies` | ids of linked companies (`Vec<i64>` only) |
//!
//! Unknown tokens are ignored. Role fields are implicitly `noexport`.
//!
//! ```
//! use hubsync_core::Model;
//!
//! #[derive(Default)]
//! struct Company {
//!     id: i64,
//!     name: String,
//!     vat: String,
//! }
//!
//! let model = Model::<Company>::builder()
//!     .field("ID", "id", |c| &c.id, |c| &mut c.id)
//!     .field("Name", "", |c| &c.name, |c| &mut c.name)
//!     .field("VAT", "name=umsatzsteuerid", |c| &c.vat, |c| &mut c.vat)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(model.property("VAT").unwrap().wire_name, "umsatzsteuerid");
//! assert_eq!(model.property("Name").unwrap().wire_name, "name");
//! ```

use std::fmt;

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::coerce::{Coerced, WireKind, WireType};
use crate::error::{Error, Result};

// ============================================================================
// Roles and descriptors
// ============================================================================

/// Kind of linked objects held by an association list field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociationKind {
    /// Contacts linked to the entity (`associatedVids`)
    Contacts,
    /// Companies linked to the entity (`associatedCompanyIds`)
    Companies,
}

impl AssociationKind {
    /// All association kinds, in request order
    pub const ALL: [AssociationKind; 2] = [AssociationKind::Companies, AssociationKind::Contacts];

    /// Key of the id array inside an `associations` object
    pub fn wire_key(&self) -> &'static str {
        match self {
            AssociationKind::Contacts => "associatedVids",
            AssociationKind::Companies => "associatedCompanyIds",
        }
    }

    /// Tag token selecting this role
    pub fn tag(&self) -> &'static str {
        match self {
            AssociationKind::Contacts => "contacts",
            AssociationKind::Companies => "companies",
        }
    }
}

/// Special role of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyRole {
    /// Plain property
    #[default]
    None,
    /// Receives the entity id
    Identifier,
    /// Receives the deleted flag
    Deleted,
    /// Receives a list of linked object ids
    Associations(AssociationKind),
}

impl PropertyRole {
    fn describe(&self) -> &'static str {
        match self {
            PropertyRole::None => "none",
            PropertyRole::Identifier => "id",
            PropertyRole::Deleted => "deleted",
            PropertyRole::Associations(kind) => kind.tag(),
        }
    }
}

/// How one entity field maps to a HubSpot property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Field name as registered with the builder
    pub field: String,
    /// HubSpot property name
    pub wire_name: String,
    /// Whether the property is sent on create/update
    pub exportable: bool,
    /// Special role, if any
    pub role: PropertyRole,
    /// Declared type of the field
    pub kind: WireKind,
}

/// Parsed form of a field tag
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldTag {
    /// Explicit wire name from `name=`
    pub wire_name: Option<String>,
    /// Role token, if any
    pub role: PropertyRole,
    /// `noexport` was given
    pub no_export: bool,
}

impl FieldTag {
    /// Parse a comma-separated field tag.
    ///
    /// Fails when the tag names more than one role.
    pub fn parse(field: &str, tag: &str) -> Result<Self> {
        let mut parsed = FieldTag::default();

        for token in tag.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if let Some(name) = token.strip_prefix("name=") {
                parsed.wire_name = Some(name.to_string());
                continue;
            }

            let role = match token {
                "id" => PropertyRole::Identifier,
                "deleted" => PropertyRole::Deleted,
                "contacts" => PropertyRole::Associations(AssociationKind::Contacts),
                "companies" => PropertyRole::Associations(AssociationKind::Companies),
                "noexport" => {
                    parsed.no_export = true;
                    continue;
                }
                _ => continue,
            };

            if parsed.role != PropertyRole::None && parsed.role != role {
                return Err(Error::config(
                    field,
                    format!(
                        "conflicting roles '{}' and '{}'",
                        parsed.role.describe(),
                        role.describe()
                    ),
                ));
            }
            parsed.role = role;
        }

        Ok(parsed)
    }
}

// ============================================================================
// Field access
// ============================================================================

/// Type-erased read/write access to one entity field
pub(crate) trait FieldAccess<E>: Send + Sync {
    fn kind(&self) -> WireKind;
    fn is_zero(&self, entity: &E) -> bool;
    fn to_wire(&self, entity: &E) -> JsonValue;
    /// Coerce `value` into the field. Returns false when the value was
    /// unsupported and the field was left untouched.
    fn assign(&self, entity: &mut E, value: &JsonValue) -> bool;
}

struct Accessor<E, T> {
    get: fn(&E) -> &T,
    get_mut: fn(&mut E) -> &mut T,
}

impl<E: 'static, T: WireType> FieldAccess<E> for Accessor<E, T> {
    fn kind(&self) -> WireKind {
        T::kind()
    }

    fn is_zero(&self, entity: &E) -> bool {
        (self.get)(entity).is_zero()
    }

    fn to_wire(&self, entity: &E) -> JsonValue {
        (self.get)(entity).to_wire()
    }

    fn assign(&self, entity: &mut E, value: &JsonValue) -> bool {
        match T::coerce(value).value() {
            Some(v) => {
                *(self.get_mut)(entity) = v;
                true
            }
            None => false,
        }
    }
}

/// A descriptor together with its field accessor
pub(crate) struct Property<E> {
    pub(crate) descriptor: PropertyDescriptor,
    pub(crate) access: Box<dyn FieldAccess<E>>,
}

// ============================================================================
// Model
// ============================================================================

/// Property schema of an entity type
pub struct Model<E> {
    entity: &'static str,
    properties: Vec<Property<E>>,
    id: Option<usize>,
    deleted: Option<usize>,
    contacts: Option<usize>,
    companies: Option<usize>,
}

impl<E: 'static> Model<E> {
    /// Start registering the fields of `E`
    pub fn builder() -> ModelBuilder<E> {
        ModelBuilder::new()
    }

    /// Rust type name of the entity
    pub fn entity_name(&self) -> &'static str {
        self.entity
    }

    /// All property descriptors in registration order
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter().map(|p| &p.descriptor)
    }

    /// Number of registered properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check if no fields are registered
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Look up a property by field name
    pub fn property(&self, field: &str) -> Option<&PropertyDescriptor> {
        self.properties()
            .find(|descriptor| descriptor.field == field)
    }

    /// Wire names of all exportable properties
    pub fn exported_names(&self) -> Vec<&str> {
        self.properties()
            .filter(|d| d.exportable)
            .map(|d| d.wire_name.as_str())
            .collect()
    }

    /// Property receiving the entity id
    pub fn identifier(&self) -> Option<&PropertyDescriptor> {
        self.id.map(|i| &self.properties[i].descriptor)
    }

    /// Property receiving the deleted flag
    pub fn deleted(&self) -> Option<&PropertyDescriptor> {
        self.deleted.map(|i| &self.properties[i].descriptor)
    }

    /// Property holding linked object ids of `kind`
    pub fn association(&self, kind: AssociationKind) -> Option<&PropertyDescriptor> {
        self.association_index(kind)
            .map(|i| &self.properties[i].descriptor)
    }

    /// Whether any association list field is registered
    pub fn has_associations(&self) -> bool {
        self.contacts.is_some() || self.companies.is_some()
    }

    /// Id of an entity as a wire value, if the model has an id field
    pub fn id_of(&self, entity: &E) -> Option<JsonValue> {
        self.id
            .map(|i| self.properties[i].access.to_wire(entity))
    }

    /// Linked object ids of `kind` held by an entity
    pub fn associations_of(&self, entity: &E, kind: AssociationKind) -> Option<Vec<i64>> {
        let index = self.association_index(kind)?;
        let wire = self.properties[index].access.to_wire(entity);
        match Vec::<i64>::coerce(&wire) {
            Coerced::Exact(ids) | Coerced::Converted(ids) => Some(ids),
            Coerced::Unsupported => None,
        }
    }

    pub(crate) fn entries(&self) -> &[Property<E>] {
        &self.properties
    }

    pub(crate) fn role_entry(&self, role: PropertyRole) -> Option<&Property<E>> {
        let index = match role {
            PropertyRole::None => None,
            PropertyRole::Identifier => self.id,
            PropertyRole::Deleted => self.deleted,
            PropertyRole::Associations(kind) => self.association_index(kind),
        }?;
        Some(&self.properties[index])
    }

    fn association_index(&self, kind: AssociationKind) -> Option<usize> {
        match kind {
            AssociationKind::Contacts => self.contacts,
            AssociationKind::Companies => self.companies,
        }
    }
}

impl<E> fmt::Debug for Model<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("entity", &self.entity)
            .field(
                "properties",
                &self
                    .properties
                    .iter()
                    .map(|p| &p.descriptor)
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

// ============================================================================
// Builder
// ============================================================================

struct Registration<E> {
    field: String,
    tag: String,
    access: Box<dyn FieldAccess<E>>,
}

/// Builder registering entity fields for a [`Model`]
///
/// Accessors are plain functions (non-capturing closures), so a model is
/// `Send + Sync` no matter what `E` is.
pub struct ModelBuilder<E> {
    fields: Vec<Registration<E>>,
}

impl<E: 'static> ModelBuilder<E> {
    fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Register a field with its tag
    pub fn field<T: WireType>(
        mut self,
        name: &str,
        tag: &str,
        get: fn(&E) -> &T,
        get_mut: fn(&mut E) -> &mut T,
    ) -> Self {
        self.fields.push(Registration {
            field: name.to_string(),
            tag: tag.to_string(),
            access: Box::new(Accessor { get, get_mut }),
        });
        self
    }

    /// Register the list of linked contact ids
    pub fn contacts(
        self,
        name: &str,
        get: fn(&E) -> &Vec<i64>,
        get_mut: fn(&mut E) -> &mut Vec<i64>,
    ) -> Self {
        self.field(name, AssociationKind::Contacts.tag(), get, get_mut)
    }

    /// Register the list of linked company ids
    pub fn companies(
        self,
        name: &str,
        get: fn(&E) -> &Vec<i64>,
        get_mut: fn(&mut E) -> &mut Vec<i64>,
    ) -> Self {
        self.field(name, AssociationKind::Companies.tag(), get, get_mut)
    }

    /// Validate all registrations and build the model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a tag names two roles, a role is
    /// claimed by two fields, or an association field is not `Vec<i64>`.
    /// This is a programming error and should abort startup.
    pub fn build(self) -> Result<Model<E>> {
        let mut model = Model {
            entity: std::any::type_name::<E>(),
            properties: Vec::with_capacity(self.fields.len()),
            id: None,
            deleted: None,
            contacts: None,
            companies: None,
        };

        for (index, registration) in self.fields.into_iter().enumerate() {
            let tag = FieldTag::parse(&registration.field, &registration.tag)?;
            let kind = registration.access.kind();

            let slot = match tag.role {
                PropertyRole::None => None,
                PropertyRole::Identifier => Some(&mut model.id),
                PropertyRole::Deleted => Some(&mut model.deleted),
                PropertyRole::Associations(assoc) => {
                    if kind != WireKind::id_list() {
                        return Err(Error::config(
                            &registration.field,
                            format!(
                                "'{}' fields must be of type Vec<i64>, found {:?}",
                                assoc.tag(),
                                kind
                            ),
                        ));
                    }
                    Some(match assoc {
                        AssociationKind::Contacts => &mut model.contacts,
                        AssociationKind::Companies => &mut model.companies,
                    })
                }
            };

            if let Some(slot) = slot {
                if slot.is_some() {
                    return Err(Error::config(
                        &registration.field,
                        format!(
                            "role '{}' is already assigned to another field",
                            tag.role.describe()
                        ),
                    ));
                }
                *slot = Some(index);
            }

            let wire_name = tag
                .wire_name
                .unwrap_or_else(|| registration.field.to_lowercase());

            model.properties.push(Property {
                descriptor: PropertyDescriptor {
                    field: registration.field,
                    wire_name,
                    exportable: !tag.no_export && tag.role == PropertyRole::None,
                    role: tag.role,
                    kind,
                },
                access: registration.access,
            });
        }

        debug!(
            target: "hubsync::model",
            entity = model.entity,
            properties = model.properties.len(),
            exported = model.exported_names().len(),
            "Built entity model"
        );

        Ok(model)
    }
}

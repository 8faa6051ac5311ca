//! Schema Tests
//!
//! Model construction failures are reported before any call is made.

use crate::common::{deal_model, Deal};
use hubsync::{AssociationKind, Error, Model, PropertyRole, WireKind};

#[test]
fn deal_model_describes_every_field() {
    let model = deal_model();

    assert_eq!(model.len(), 14);
    assert_eq!(model.identifier().map(|p| p.field.as_str()), Some("ID"));
    assert_eq!(model.deleted().map(|p| p.field.as_str()), Some("Deleted"));
    assert!(model.has_associations());
    assert_eq!(
        model.association(AssociationKind::Companies).map(|p| p.role),
        Some(PropertyRole::Associations(AssociationKind::Companies))
    );

    let close = model.property("CloseDate").unwrap();
    assert_eq!(close.wire_name, "closedate");
    assert_eq!(close.kind, WireKind::Time);
    assert!(close.exportable);

    assert_eq!(model.property("Tags").unwrap().wire_name, "tags");
    assert!(!model.property("Internal").unwrap().exportable);
    assert!(!model.exported_names().contains(&"id"));
}

#[test]
fn association_fields_must_be_id_lists() {
    let result = Model::<Deal>::builder()
        .field("Tags", "contacts", |d| &d.tags, |d| &mut d.tags)
        .build();
    assert!(matches!(result, Err(Error::Config { field, .. }) if field == "Tags"));
}

#[test]
fn one_field_per_role() {
    let result = Model::<Deal>::builder()
        .field("ID", "id", |d| &d.id, |d| &mut d.id)
        .field("Owner", "id", |d| &d.owner, |d| &mut d.owner)
        .build();
    assert!(matches!(result, Err(Error::Config { .. })));
}

#[test]
fn one_role_per_field() {
    let result = Model::<Deal>::builder()
        .field("ID", "id,deleted", |d| &d.id, |d| &mut d.id)
        .build();
    assert!(matches!(result, Err(Error::Config { field, .. }) if field == "ID"));
}

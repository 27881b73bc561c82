//! Field catalog
//!
//! The catalog of a type is the flattened, ordered list of its instance
//! fields: fields declared on the type itself in declaration order, then
//! those of its parent, then the grandparent's, and so on. Static and
//! synthetic fields are left out. Inherited entries keep their declaring
//! owner but read through the child instance.
//!
//! Catalogs are computed once per descriptor and shared afterwards.

use std::sync::Arc;

use tracing::trace;

use crate::shape::{FieldDescriptor, TypeDescriptor};

/// Check if a field belongs in catalogs
pub fn is_catalogued(field: &FieldDescriptor) -> bool {
    !field.is_static() && !field.is_synthetic()
}

/// Flattened instance fields of `ty`
pub fn fields(ty: &TypeDescriptor) -> Arc<[FieldDescriptor]> {
    ty.catalog.get_or_init(|| collect(ty)).clone()
}

fn collect(ty: &TypeDescriptor) -> Arc<[FieldDescriptor]> {
    let mut all: Vec<FieldDescriptor> = ty
        .declared_fields()
        .iter()
        .filter(|f| is_catalogued(f))
        .cloned()
        .collect();

    if let (Some(parent), Some((project, project_mut))) = (ty.parent(), ty.parent_projections()) {
        all.extend(
            fields(parent)
                .iter()
                .map(|f| f.inherited(project, project_mut)),
        );
    }

    trace!(ty = ty.name(), count = all.len(), "built field catalog");
    all.into()
}

/// Positional slots of a tuple type, in catalog order
pub fn slots(ty: &TypeDescriptor) -> Vec<FieldDescriptor> {
    fields(ty).iter().filter(|f| f.is_slot()).cloned().collect()
}

/// First catalogued field named `name`; derived fields shadow inherited ones
pub fn find(ty: &TypeDescriptor, name: &str) -> Option<FieldDescriptor> {
    fields(ty).iter().find(|f| f.name() == name).cloned()
}

/// Catalogued field names, in order
pub fn field_names(ty: &TypeDescriptor) -> Vec<String> {
    fields(ty).iter().map(|f| f.name().to_string()).collect()
}

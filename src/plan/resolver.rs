use std::any::type_name;
use std::collections::HashMap;

use tracing::trace;

use crate::dest::{MapDescriptor, ScalarDescriptor, Scannable, Shape, StructDescriptor};
use crate::engine::ScanConfig;
use crate::error::{ScanError, ScanResult};

use super::name::normalize;
use super::{Binding, BindingPlan, Target};

/// Builds the binding plan of destination `T` for the given result columns.
///
/// This performs the full matching work; callers go through the engine's
/// plan cache to avoid repeating it.
pub fn resolve<T: Scannable>(
    shape: &Shape<T>,
    columns: &[String],
    config: &ScanConfig,
) -> ScanResult<BindingPlan<T>> {
    match shape {
        Shape::Struct(descriptor) => resolve_struct(descriptor, columns, config),
        Shape::Map(descriptor) => Ok(resolve_map(descriptor, columns)),
        Shape::Scalar(descriptor) => resolve_scalar(descriptor, columns),
    }
}

fn resolve_struct<T: Scannable>(
    descriptor: &StructDescriptor<T>,
    columns: &[String],
    config: &ScanConfig,
) -> ScanResult<BindingPlan<T>> {
    let destination = type_name::<T>();
    if let Some(defect) = descriptor.defects().first() {
        return Err(ScanError::InvalidDestination {
            destination,
            detail: defect.clone(),
        });
    }

    let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
    for (index, field) in descriptor.fields().iter().enumerate() {
        let name = field.column_name(config.name_mapping, &config.prefix_separator);
        by_name.entry(normalize(&name)).or_default().push(index);
    }

    let mut claimed: HashMap<usize, &str> = HashMap::new();
    let mut bindings = Vec::with_capacity(columns.len());

    for (column_index, column) in columns.iter().enumerate() {
        let field_index = match by_name.get(&normalize(column)).map(Vec::as_slice) {
            Some([index]) => *index,
            Some(candidates) if candidates.len() > 1 => {
                let paths: Vec<&str> = candidates
                    .iter()
                    .map(|&i| descriptor.fields()[i].path())
                    .collect();
                return Err(ScanError::ShapeConflict {
                    column: column.clone(),
                    detail: format!("matches fields {}", paths.join(", ")),
                });
            }
            _ if config.allow_unknown_columns => {
                trace!(column = %column, destination, "ignoring unknown column");
                continue;
            }
            _ => {
                return Err(ScanError::UnknownColumn {
                    column: column.clone(),
                    destination,
                });
            }
        };

        let field = &descriptor.fields()[field_index];
        if let Some(previous) = claimed.insert(field_index, column) {
            return Err(ScanError::ShapeConflict {
                column: column.clone(),
                detail: format!(
                    "field {} is already bound to column '{}'",
                    field.path(),
                    previous
                ),
            });
        }

        bindings.push(Binding::new(
            column_index,
            column.as_str(),
            Target::Field {
                path: field.path().to_string(),
                setter: field.setter().clone(),
            },
        ));
    }

    Ok(BindingPlan::new(destination, columns.len(), bindings))
}

fn resolve_map<T: Scannable>(descriptor: &MapDescriptor<T>, columns: &[String]) -> BindingPlan<T> {
    let bindings = columns
        .iter()
        .enumerate()
        .map(|(column_index, column)| {
            Binding::new(
                column_index,
                column.as_str(),
                Target::Key {
                    key: normalize(column),
                    insert: descriptor.inserter().clone(),
                },
            )
        })
        .collect();
    BindingPlan::new(type_name::<T>(), columns.len(), bindings)
}

fn resolve_scalar<T: Scannable>(
    descriptor: &ScalarDescriptor<T>,
    columns: &[String],
) -> ScanResult<BindingPlan<T>> {
    let destination = type_name::<T>();
    if columns.len() != 1 {
        return Err(ScanError::ColumnCountMismatch {
            destination,
            expected: 1,
            actual: columns.len(),
        });
    }

    let binding = Binding::new(
        0,
        columns[0].as_str(),
        Target::Whole {
            setter: descriptor.setter().clone(),
        },
    );
    Ok(BindingPlan::new(destination, 1, vec![binding]))
}

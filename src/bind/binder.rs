use crate::error::{ConvertError, ScanError, ScanResult};
use crate::plan::BindingPlan;
use crate::value::Value;

/// Applies `plan` to one row of raw values, converting and assigning each
/// bound column in plan order.
///
/// Binding stops at the first failure. The destination may then be partially
/// populated and must be discarded by the caller.
pub fn bind<T>(plan: &BindingPlan<T>, values: &[Value], dst: &mut T) -> ScanResult<()> {
    if values.len() != plan.column_count() {
        return Err(ScanError::ColumnCountMismatch {
            destination: plan.destination(),
            expected: plan.column_count(),
            actual: values.len(),
        });
    }

    for binding in plan.bindings() {
        let value = &values[binding.column_index()];
        binding
            .target()
            .apply(dst, value)
            .map_err(|err| match err {
                ConvertError::UnexpectedNull => ScanError::NullIntoNonNullable {
                    column: binding.column().to_string(),
                    path: binding.target().path().to_string(),
                },
                source => ScanError::Conversion {
                    column: binding.column().to_string(),
                    path: binding.target().path().to_string(),
                    source,
                },
            })?;
    }
    Ok(())
}

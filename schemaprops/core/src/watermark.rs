use serde::{Deserialize, Serialize};

use crate::data_type::TypeDescriptor;

/// Declares which column carries event time and how its watermark is derived.
/// A schema has at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatermarkSpec {
    /// Name of the event-time column the watermark watches.
    pub rowtime_attribute: String,
    pub watermark_expr: String,
    pub watermark_expr_output_type: TypeDescriptor,
}

impl WatermarkSpec {
    pub fn new(
        rowtime_attribute: impl Into<String>,
        watermark_expr: impl Into<String>,
        watermark_expr_output_type: impl Into<TypeDescriptor>,
    ) -> Self {
        Self {
            rowtime_attribute: rowtime_attribute.into(),
            watermark_expr: watermark_expr.into(),
            watermark_expr_output_type: watermark_expr_output_type.into(),
        }
    }
}

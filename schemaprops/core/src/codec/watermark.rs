use tracing::trace;

use super::required;
use crate::{
    Options,
    data_type::TypeDescriptor,
    error::Result,
    key::{WatermarkKeys, watermark_prefix},
    watermark::WatermarkSpec,
};

/// Encodes the watermark declaration under `schema.watermark.0.`.
pub fn encode_watermark(spec: &WatermarkSpec) -> Options {
    let keys = WatermarkKeys::new();
    let mut options = Options::new();
    options.insert(keys.rowtime, spec.rowtime_attribute.clone());
    options.insert(keys.strategy_expr, spec.watermark_expr.clone());
    options.insert(
        keys.strategy_data_type,
        spec.watermark_expr_output_type.to_string(),
    );
    options
}

/// Decodes the watermark declaration. All three keys must be present.
pub fn decode_watermark(options: &Options) -> Result<WatermarkSpec> {
    let keys = WatermarkKeys::new();
    let rowtime_attribute = required(options, &keys.rowtime)?;
    let watermark_expr = required(options, &keys.strategy_expr)?;
    let output_type: TypeDescriptor = required(options, &keys.strategy_data_type)?.parse()?;

    trace!(rowtime_attribute, "decoded watermark");
    Ok(WatermarkSpec::new(
        rowtime_attribute,
        watermark_expr,
        output_type,
    ))
}

/// Whether any watermark key is present.
pub fn has_watermark(options: &Options) -> bool {
    let prefix = watermark_prefix();
    options.keys().any(|key| key.starts_with(&prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DataType, error::Error};

    fn spec() -> WatermarkSpec {
        WatermarkSpec::new(
            "ts",
            "`ts` - INTERVAL '5' SECOND",
            TypeDescriptor::not_null(DataType::Timestamp(3)),
        )
    }

    #[test]
    fn encodes_three_keys() {
        let encoded = encode_watermark(&spec());
        assert_eq!(encoded.len(), 3);
        assert_eq!(encoded["schema.watermark.0.rowtime"], "ts");
        assert_eq!(
            encoded["schema.watermark.0.strategy.expr"],
            "`ts` - INTERVAL '5' SECOND"
        );
        assert_eq!(
            encoded["schema.watermark.0.strategy.data-type"],
            "TIMESTAMP(3) NOT NULL"
        );
    }

    #[test]
    fn round_trips() {
        let spec = spec();
        assert_eq!(decode_watermark(&encode_watermark(&spec)).unwrap(), spec);
    }

    #[test]
    fn every_key_is_required() {
        for missing in [
            "schema.watermark.0.rowtime",
            "schema.watermark.0.strategy.expr",
            "schema.watermark.0.strategy.data-type",
        ] {
            let mut encoded = encode_watermark(&spec());
            encoded.remove(missing);
            let err = decode_watermark(&encoded).unwrap_err();
            assert!(
                matches!(err, Error::MissingKey { ref key } if key == missing),
                "{err}"
            );
        }
    }

    #[test]
    fn detects_presence_by_prefix() {
        assert!(!has_watermark(&Options::new()));
        assert!(has_watermark(&encode_watermark(&spec())));

        let mut partial = Options::new();
        partial.insert("schema.watermark.0.rowtime".to_string(), "ts".to_string());
        assert!(has_watermark(&partial));
        assert!(decode_watermark(&partial).is_err());
    }
}

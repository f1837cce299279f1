//! A string codec for logical column types.
//!
//! Every type has exactly one serializable form, produced by [`Display`]. The
//! parser is more forgiving: it is case-insensitive, accepts a few aliases, and
//! understands the unbounded `VARCHAR`/`VARBINARY` spellings some writers emit.

use std::{fmt, str::FromStr};

use serde_with::{DeserializeFromStr, SerializeDisplay};
use snafu::prelude::*;

use crate::error::{Error, InvalidDataTypeSnafu, Result};

/// Length used by writers that spell `STRING` as a bounded `VARCHAR`.
const MAX_LENGTH: u32 = i32::MAX as u32;

const DEFAULT_DECIMAL_PRECISION: u8 = 10;
const DEFAULT_TIMESTAMP_PRECISION: u8 = 6;

const NOT_NULL: &str = "NOT NULL";
const WITH_LOCAL_TIME_ZONE: &str = "WITH LOCAL TIME ZONE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    /// Unbounded UTF-8 string.
    Utf8,
    Varchar(u32),
    Char(u32),
    /// Unbounded byte string.
    Binary,
    /// Precision and scale.
    Decimal(u8, u8),
    Date,
    /// Timestamp without time zone, with fractional second precision.
    Timestamp(u8),
    /// Timestamp with local time zone, with fractional second precision.
    TimestampLtz(u8),
}

impl DataType {
    /// Folds spellings that parse to the same type onto a single variant.
    pub fn canonical(self) -> Self {
        match self {
            DataType::Varchar(MAX_LENGTH) => DataType::Utf8,
            other => other,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Boolean => write!(f, "BOOLEAN"),
            DataType::Int8 => write!(f, "TINYINT"),
            DataType::Int16 => write!(f, "SMALLINT"),
            DataType::Int32 => write!(f, "INT"),
            DataType::Int64 => write!(f, "BIGINT"),
            DataType::Float32 => write!(f, "FLOAT"),
            DataType::Float64 => write!(f, "DOUBLE"),
            DataType::Utf8 | DataType::Varchar(MAX_LENGTH) => write!(f, "STRING"),
            DataType::Varchar(length) => write!(f, "VARCHAR({length})"),
            DataType::Char(length) => write!(f, "CHAR({length})"),
            DataType::Binary => write!(f, "BYTES"),
            DataType::Decimal(precision, scale) => write!(f, "DECIMAL({precision}, {scale})"),
            DataType::Date => write!(f, "DATE"),
            DataType::Timestamp(precision) => write!(f, "TIMESTAMP({precision})"),
            DataType::TimestampLtz(precision) => write!(f, "TIMESTAMP_LTZ({precision})"),
        }
    }
}

/// A logical type plus nullability, persisted as a single string such as
/// `DECIMAL(10, 2) NOT NULL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct TypeDescriptor {
    pub data_type: DataType,
    pub nullable: bool,
}

impl TypeDescriptor {
    pub fn new(data_type: DataType, nullable: bool) -> Self {
        Self {
            data_type: data_type.canonical(),
            nullable,
        }
    }

    pub fn nullable(data_type: DataType) -> Self {
        Self::new(data_type, true)
    }

    pub fn not_null(data_type: DataType) -> Self {
        Self::new(data_type, false)
    }
}

impl From<DataType> for TypeDescriptor {
    fn from(data_type: DataType) -> Self {
        Self::nullable(data_type)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{}", self.data_type)
        } else {
            write!(f, "{} {NOT_NULL}", self.data_type)
        }
    }
}

impl FromStr for TypeDescriptor {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let normalized = input.trim().to_ascii_uppercase();
        let (body, nullable) = match strip_keyword_suffix(&normalized, NOT_NULL) {
            Some(rest) => (rest, false),
            None => (normalized.as_str(), true),
        };
        let data_type = parse_data_type(body).context(InvalidDataTypeSnafu { input })?;
        Ok(Self::new(data_type, nullable))
    }
}

fn parse_data_type(body: &str) -> Option<DataType> {
    let (body, local_time_zone) = match strip_keyword_suffix(body, WITH_LOCAL_TIME_ZONE) {
        Some(rest) => (rest, true),
        None => (body, false),
    };

    let (name, args) = split_arguments(body)?;
    let data_type = match (name, args.as_slice()) {
        ("TIMESTAMP", []) if local_time_zone => {
            DataType::TimestampLtz(DEFAULT_TIMESTAMP_PRECISION)
        }
        ("TIMESTAMP", [precision]) if local_time_zone => {
            DataType::TimestampLtz(narrow(*precision)?)
        }
        _ if local_time_zone => return None,

        ("BOOLEAN", []) => DataType::Boolean,
        ("TINYINT", []) => DataType::Int8,
        ("SMALLINT", []) => DataType::Int16,
        ("INT" | "INTEGER", []) => DataType::Int32,
        ("BIGINT", []) => DataType::Int64,
        ("FLOAT", []) => DataType::Float32,
        ("DOUBLE", []) => DataType::Float64,
        ("STRING", []) => DataType::Utf8,
        ("VARCHAR", [MAX_LENGTH]) => DataType::Utf8,
        ("VARCHAR", [length]) => DataType::Varchar(*length),
        ("CHAR", [length]) => DataType::Char(*length),
        ("BYTES", []) => DataType::Binary,
        ("VARBINARY", [MAX_LENGTH]) => DataType::Binary,
        ("DECIMAL", []) => DataType::Decimal(DEFAULT_DECIMAL_PRECISION, 0),
        ("DECIMAL", [precision]) => DataType::Decimal(narrow(*precision)?, 0),
        ("DECIMAL", [precision, scale]) => {
            DataType::Decimal(narrow(*precision)?, narrow(*scale)?)
        }
        ("DATE", []) => DataType::Date,
        ("TIMESTAMP", []) => DataType::Timestamp(DEFAULT_TIMESTAMP_PRECISION),
        ("TIMESTAMP", [precision]) => DataType::Timestamp(narrow(*precision)?),
        ("TIMESTAMP_LTZ", []) => DataType::TimestampLtz(DEFAULT_TIMESTAMP_PRECISION),
        ("TIMESTAMP_LTZ", [precision]) => DataType::TimestampLtz(narrow(*precision)?),
        _ => return None,
    };
    Some(data_type)
}

/// Strips a trailing keyword, which must be separated from the type by whitespace.
fn strip_keyword_suffix<'a>(body: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = body.strip_suffix(keyword)?;
    rest.ends_with(char::is_whitespace).then(|| rest.trim_end())
}

/// Splits `NAME(a, b)` into `NAME` and its numeric arguments.
fn split_arguments(body: &str) -> Option<(&str, Vec<u32>)> {
    let Some(open) = body.find('(') else {
        return Some((body.trim(), Vec::new()));
    };
    let close = body.rfind(')')?;
    if close < open || !body[close + 1..].trim().is_empty() {
        return None;
    }
    let args = body[open + 1..close]
        .split(',')
        .map(|arg| arg.trim().parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;
    Some((body[..open].trim(), args))
}

fn narrow(value: u32) -> Option<u8> {
    u8::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("BOOLEAN", DataType::Boolean ; "boolean")]
    #[test_case("TINYINT", DataType::Int8 ; "tinyint")]
    #[test_case("SMALLINT", DataType::Int16 ; "smallint")]
    #[test_case("INT", DataType::Int32 ; "int")]
    #[test_case("BIGINT", DataType::Int64 ; "bigint")]
    #[test_case("FLOAT", DataType::Float32 ; "float")]
    #[test_case("DOUBLE", DataType::Float64 ; "double")]
    #[test_case("STRING", DataType::Utf8 ; "string")]
    #[test_case("VARCHAR(20)", DataType::Varchar(20) ; "varchar")]
    #[test_case("CHAR(3)", DataType::Char(3) ; "char")]
    #[test_case("BYTES", DataType::Binary ; "bytes")]
    #[test_case("DECIMAL(10, 2)", DataType::Decimal(10, 2) ; "decimal")]
    #[test_case("DATE", DataType::Date ; "date")]
    #[test_case("TIMESTAMP(3)", DataType::Timestamp(3) ; "timestamp")]
    #[test_case("TIMESTAMP_LTZ(3)", DataType::TimestampLtz(3) ; "timestamp ltz")]
    fn canonical_form(text: &str, data_type: DataType) {
        let parsed: TypeDescriptor = text.parse().unwrap();
        assert_eq!(parsed, TypeDescriptor::nullable(data_type));
        assert_eq!(parsed.to_string(), text);
    }

    #[test_case("integer", DataType::Int32 ; "integer alias")]
    #[test_case("  string ", DataType::Utf8 ; "padding and case")]
    #[test_case("VARCHAR(2147483647)", DataType::Utf8 ; "unbounded varchar")]
    #[test_case("VARBINARY(2147483647)", DataType::Binary ; "unbounded varbinary")]
    #[test_case("DECIMAL", DataType::Decimal(10, 0) ; "default decimal")]
    #[test_case("DECIMAL(5)", DataType::Decimal(5, 0) ; "decimal without scale")]
    #[test_case("DECIMAL(5,1)", DataType::Decimal(5, 1) ; "decimal without space")]
    #[test_case("TIMESTAMP", DataType::Timestamp(6) ; "default timestamp")]
    #[test_case("TIMESTAMP(3) WITH LOCAL TIME ZONE", DataType::TimestampLtz(3) ; "local time zone")]
    #[test_case("TIMESTAMP WITH LOCAL TIME ZONE", DataType::TimestampLtz(6) ; "local time zone default")]
    fn lenient_forms(text: &str, data_type: DataType) {
        let parsed: TypeDescriptor = text.parse().unwrap();
        assert_eq!(parsed.data_type, data_type);
        assert!(parsed.nullable);
    }

    #[test]
    fn not_null_suffix() {
        let parsed: TypeDescriptor = "TIMESTAMP(3) NOT NULL".parse().unwrap();
        assert_eq!(parsed, TypeDescriptor::not_null(DataType::Timestamp(3)));
        assert_eq!(parsed.to_string(), "TIMESTAMP(3) NOT NULL");
    }

    #[test_case("" ; "empty")]
    #[test_case("TEXT" ; "unknown name")]
    #[test_case("INT(3)" ; "unexpected arguments")]
    #[test_case("VARCHAR" ; "missing length")]
    #[test_case("VARCHAR(abc)" ; "non numeric length")]
    #[test_case("DECIMAL(10, 2" ; "unbalanced parenthesis")]
    #[test_case("DECIMAL(300, 2)" ; "precision overflow")]
    #[test_case("INT WITH LOCAL TIME ZONE" ; "time zone on non timestamp")]
    #[test_case("STRINGNOT NULL" ; "not null without separator")]
    #[test_case("TIMESTAMP(3)WITH LOCAL TIME ZONE" ; "time zone without separator")]
    #[test_case("NOT NULL" ; "only not null")]
    fn rejects(text: &str) {
        let err = text.parse::<TypeDescriptor>().unwrap_err();
        assert!(matches!(err, Error::InvalidDataType { .. }), "{err}");
    }

    #[test]
    fn max_length_varchar_is_string() {
        let descriptor = TypeDescriptor::nullable(DataType::Varchar(MAX_LENGTH));
        assert_eq!(descriptor.data_type, DataType::Utf8);
        assert_eq!(descriptor.to_string(), "STRING");
        assert_eq!(descriptor.to_string().parse::<TypeDescriptor>().unwrap(), descriptor);
        assert_eq!(DataType::Varchar(MAX_LENGTH).to_string(), "STRING");
        assert_eq!(
            DataType::Varchar(MAX_LENGTH - 1).canonical(),
            DataType::Varchar(MAX_LENGTH - 1)
        );
    }

    #[test]
    fn serializes_as_string() {
        let descriptor = TypeDescriptor::not_null(DataType::Decimal(12, 4));
        let json = serde_json::to_string(&descriptor).unwrap();
        assert_eq!(json, r#""DECIMAL(12, 4) NOT NULL""#);
        let back: TypeDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, descriptor);
    }
}

//! Native SQL type to Java field type mapping

use std::fmt;

/// Target field type for a native column type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedType {
    /// Java type name as written in generated sources
    pub field_type: &'static str,
    /// Import the field type needs, if any
    pub import: Option<&'static str>,
}

/// A native type name absent from the mapping table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmappedType(pub String);

impl fmt::Display for UnmappedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no field type is mapped for native type `{}`", self.0)
    }
}

impl std::error::Error for UnmappedType {}

const fn plain(field_type: &'static str) -> MappedType {
    MappedType {
        field_type,
        import: None,
    }
}

const fn imported(field_type: &'static str, import: &'static str) -> MappedType {
    MappedType {
        field_type,
        import: Some(import),
    }
}

const INTEGER: MappedType = plain("Integer");
const LONG: MappedType = plain("Long");
const BIG_INTEGER: MappedType = imported("BigInteger", "java.math.BigInteger");
const FLOAT: MappedType = plain("Float");
const DOUBLE: MappedType = plain("Double");
const BIG_DECIMAL: MappedType = imported("BigDecimal", "java.math.BigDecimal");
const STRING: MappedType = plain("String");
const BYTES: MappedType = plain("byte[]");
const BOOLEAN: MappedType = plain("Boolean");
const LOCAL_DATE: MappedType = imported("LocalDate", "java.time.LocalDate");
const LOCAL_TIME: MappedType = imported("LocalTime", "java.time.LocalTime");
const LOCAL_DATE_TIME: MappedType = imported("LocalDateTime", "java.time.LocalDateTime");
const TIMESTAMP: MappedType = imported("Timestamp", "java.sql.Timestamp");

/// Every native type name the generator understands, as reported by the
/// metadata sources (upper case, no length or precision).
pub const TYPE_TABLE: &[(&str, MappedType)] = &[
    // Integers
    ("TINYINT UNSIGNED", INTEGER),
    ("SMALLINT", INTEGER),
    ("SMALLINT UNSIGNED", INTEGER),
    ("MEDIUMINT", INTEGER),
    ("MEDIUMINT UNSIGNED", INTEGER),
    ("INT", INTEGER),
    ("INTEGER", INTEGER),
    ("INT2", INTEGER),
    ("INT4", INTEGER),
    ("SERIAL", INTEGER),
    ("YEAR", INTEGER),
    ("INT UNSIGNED", LONG),
    ("INTEGER UNSIGNED", LONG),
    ("BIGINT", LONG),
    ("INT8", LONG),
    ("BIGSERIAL", LONG),
    ("BIGINT UNSIGNED", BIG_INTEGER),
    // Floating point
    ("FLOAT", FLOAT),
    ("FLOAT UNSIGNED", FLOAT),
    ("FLOAT4", FLOAT),
    ("REAL", FLOAT),
    ("DOUBLE", DOUBLE),
    ("DOUBLE UNSIGNED", DOUBLE),
    ("DOUBLE PRECISION", DOUBLE),
    ("FLOAT8", DOUBLE),
    // Arbitrary precision
    ("DECIMAL", BIG_DECIMAL),
    ("DECIMAL UNSIGNED", BIG_DECIMAL),
    ("NUMERIC", BIG_DECIMAL),
    // Character and text
    ("CHAR", STRING),
    ("VARCHAR", STRING),
    ("BPCHAR", STRING),
    ("NCHAR", STRING),
    ("NVARCHAR", STRING),
    ("TEXT", STRING),
    ("TINYTEXT", STRING),
    ("MEDIUMTEXT", STRING),
    ("LONGTEXT", STRING),
    ("CLOB", STRING),
    ("JSON", STRING),
    ("JSONB", STRING),
    ("UUID", STRING),
    // Enumerations project to strings
    ("ENUM", STRING),
    ("SET", STRING),
    // Spatial
    ("GEOMETRY", STRING),
    ("POINT", STRING),
    ("LINESTRING", STRING),
    ("POLYGON", STRING),
    // Binary
    ("BINARY", BYTES),
    ("VARBINARY", BYTES),
    ("BLOB", BYTES),
    ("TINYBLOB", BYTES),
    ("MEDIUMBLOB", BYTES),
    ("LONGBLOB", BYTES),
    ("BYTEA", BYTES),
    // Date and time
    ("DATE", LOCAL_DATE),
    ("TIME", LOCAL_TIME),
    ("DATETIME", LOCAL_DATE_TIME),
    ("TIMESTAMP", TIMESTAMP),
    ("TIMESTAMPTZ", TIMESTAMP),
    // Boolean-like
    ("BIT", BOOLEAN),
    ("TINYINT", BOOLEAN),
    ("BOOL", BOOLEAN),
    ("BOOLEAN", BOOLEAN),
];

/// Look up the field type for a native type name.
///
/// The lookup is exact and case-sensitive.
pub fn map_type(native_type: &str) -> Result<MappedType, UnmappedType> {
    TYPE_TABLE
        .iter()
        .find(|(name, _)| *name == native_type)
        .map(|(_, mapped)| *mapped)
        .ok_or_else(|| UnmappedType(native_type.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_entry_has_a_field_type() {
        for (name, _) in TYPE_TABLE {
            let mapped = map_type(name).unwrap();
            assert!(!mapped.field_type.is_empty(), "{} has no field type", name);
            if let Some(import) = mapped.import {
                assert!(!import.is_empty());
            }
        }
    }

    #[test]
    fn test_table_has_no_duplicate_keys() {
        let names: HashSet<_> = TYPE_TABLE.iter().map(|(name, _)| *name).collect();
        assert_eq!(names.len(), TYPE_TABLE.len());
    }

    #[test]
    fn test_decimal_needs_import() {
        let mapped = map_type("DECIMAL").unwrap();
        assert_eq!(mapped.field_type, "BigDecimal");
        assert_eq!(mapped.import, Some("java.math.BigDecimal"));
    }

    #[test]
    fn test_varchar_is_plain_string() {
        assert_eq!(map_type("VARCHAR").unwrap(), plain("String"));
    }

    #[test]
    fn test_integer_widths_are_distinct() {
        assert_eq!(map_type("INT").unwrap().field_type, "Integer");
        assert_eq!(map_type("BIGINT").unwrap().field_type, "Long");
        assert_eq!(map_type("BIGINT UNSIGNED").unwrap().field_type, "BigInteger");
    }

    #[test]
    fn test_temporal_types_are_distinct() {
        let temporal = ["DATE", "TIME", "DATETIME", "TIMESTAMP"];
        let field_types: HashSet<_> = temporal
            .iter()
            .map(|t| map_type(t).unwrap().field_type)
            .collect();
        let imports: HashSet<_> = temporal
            .iter()
            .map(|t| map_type(t).unwrap().import.unwrap())
            .collect();
        assert_eq!(field_types.len(), 4);
        assert_eq!(imports.len(), 4);
    }

    #[test]
    fn test_unsigned_fractional_types_keep_signed_mapping() {
        for (unsigned, signed) in [
            ("DECIMAL UNSIGNED", "DECIMAL"),
            ("FLOAT UNSIGNED", "FLOAT"),
            ("DOUBLE UNSIGNED", "DOUBLE"),
        ] {
            assert_eq!(map_type(unsigned).unwrap(), map_type(signed).unwrap());
        }
        assert_eq!(
            map_type("DECIMAL UNSIGNED").unwrap().import,
            Some("java.math.BigDecimal")
        );
    }

    #[test]
    fn test_enum_projects_to_string() {
        assert_eq!(map_type("ENUM").unwrap().field_type, "String");
        assert_eq!(map_type("SET").unwrap().field_type, "String");
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(map_type("varchar"), Err(UnmappedType("varchar".into())));
    }

    #[test]
    fn test_unknown_type_is_named_in_error() {
        let err = map_type("HSTORE").unwrap_err();
        assert_eq!(err.0, "HSTORE");
        assert!(err.to_string().contains("HSTORE"));
    }
}

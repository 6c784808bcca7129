//! Standard metadata statements per dialect

pub(crate) const MYSQL_TABLE_REMARKS: &str = "SELECT CAST(TABLE_COMMENT AS CHAR) \
     FROM information_schema.TABLES \
     WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?";

pub(crate) const MYSQL_COLUMNS: &str = "SELECT CAST(COLUMN_NAME AS CHAR), \
     CAST(CONCAT(UPPER(DATA_TYPE), IF(COLUMN_TYPE LIKE '%unsigned%', ' UNSIGNED', '')) AS CHAR), \
     CAST(COLUMN_COMMENT AS CHAR) \
     FROM information_schema.COLUMNS \
     WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? \
     ORDER BY ORDINAL_POSITION";

pub(crate) const POSTGRES_TABLE_REMARKS: &str = "SELECT obj_description(c.oid, 'pg_class') \
     FROM pg_catalog.pg_class c \
     JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace \
     WHERE c.relname = $1 AND n.nspname = ANY(current_schemas(false))";

pub(crate) const POSTGRES_COLUMNS: &str = "SELECT a.attname::text, upper(t.typname::text), \
     col_description(a.attrelid, a.attnum) \
     FROM pg_catalog.pg_attribute a \
     JOIN pg_catalog.pg_class c ON c.oid = a.attrelid \
     JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace \
     JOIN pg_catalog.pg_type t ON t.oid = a.atttypid \
     WHERE c.relname = $1 AND n.nspname = ANY(current_schemas(false)) \
     AND a.attnum > 0 AND NOT a.attisdropped \
     ORDER BY a.attnum";

pub(crate) const SQLITE_COLUMNS: &str =
    "SELECT name, type FROM pragma_table_info(?) ORDER BY cid";

//! PostgreSQL catalog queries.
//!
//! Every query orders its result so that an unchanged catalog always yields
//! the same rows in the same order. Names are compared with the `C` collation
//! to match byte-wise ordering on the Rust side.

use jts_core::driver::Query;

pub const DATABASE_INFO: Query = Query::new(
    "database_info",
    "SELECT current_database()::text AS database_name, \
            split_part(version(), ' ', 2) AS server_version",
);

/// `clock_timestamp()` rather than `now()`: the latter is frozen for the
/// duration of the snapshot transaction.
pub const NOW: Query = Query::new("now", "SELECT clock_timestamp()::text AS now");

pub const LIST_SCHEMAS: Query = Query::new(
    "list_schemas",
    r#"
SELECT n.nspname::text AS schema_name
FROM pg_catalog.pg_namespace n
WHERE n.nspname NOT LIKE 'pg\_%'
  AND n.nspname <> 'information_schema'
ORDER BY n.nspname COLLATE "C"
"#,
);

pub const LIST_TABLES: Query = Query::new(
    "list_tables",
    r#"
SELECT c.relname::text AS table_name,
       c.relkind::text AS relkind,
       c.relispartition AS is_partition,
       EXISTS (
           SELECT 1 FROM pg_catalog.pg_inherits i WHERE i.inhrelid = c.oid
       ) AS has_parent
FROM pg_catalog.pg_class c
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
WHERE n.nspname = $1
  AND c.relkind IN ('r', 'p', 'v', 'm', 'f')
ORDER BY c.relname COLLATE "C"
"#,
);

pub const LIST_COLUMNS: Query = Query::new(
    "list_columns",
    r#"
SELECT a.attname::text AS column_name,
       a.attnum::int8 AS ordinal_position,
       pg_catalog.format_type(a.atttypid, a.atttypmod) AS type_name,
       t.oid::int8 AS type_oid,
       t.typtype::text AS type_kind,
       t.typcategory::text AS type_category,
       NULLIF(t.typbasetype, 0)::int8 AS base_type_oid,
       CASE WHEN t.typtype = 'd'
            THEN pg_catalog.format_type(t.typbasetype, t.typtypmod)
       END AS base_type_name,
       NULLIF(t.typelem, 0)::int8 AS element_type_oid,
       a.attnotnull AS not_null,
       CASE WHEN a.attgenerated = ''
            THEN pg_catalog.pg_get_expr(d.adbin, d.adrelid)
       END AS column_default,
       a.attidentity::text AS identity,
       a.attgenerated::text AS generated,
       CASE WHEN a.attcollation <> t.typcollation
            THEN co.collname::text
       END AS collation_name
FROM pg_catalog.pg_attribute a
JOIN pg_catalog.pg_class c ON c.oid = a.attrelid
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
JOIN pg_catalog.pg_type t ON t.oid = a.atttypid
LEFT JOIN pg_catalog.pg_attrdef d ON d.adrelid = a.attrelid AND d.adnum = a.attnum
LEFT JOIN pg_catalog.pg_collation co ON co.oid = a.attcollation
WHERE n.nspname = $1
  AND c.relname = $2
  AND a.attnum > 0
  AND NOT a.attisdropped
ORDER BY a.attnum
"#,
);

pub const LIST_INDEXES: Query = Query::new(
    "list_indexes",
    r#"
SELECT ic.relname::text AS index_name,
       ARRAY(
           SELECT a.attname::text
           FROM unnest(i.indkey::int2[]) WITH ORDINALITY AS k(attnum, pos)
           LEFT JOIN pg_catalog.pg_attribute a
                  ON a.attrelid = i.indrelid AND a.attnum = k.attnum AND k.attnum > 0
           WHERE k.pos <= i.indnkeyatts
           ORDER BY k.pos
       ) AS key_columns,
       ARRAY(
           SELECT pg_catalog.pg_get_indexdef(i.indexrelid, k.pos, true)
           FROM generate_series(1, i.indnkeyatts::int) AS k(pos)
           ORDER BY k.pos
       ) AS key_definitions,
       i.indisunique AS is_unique,
       i.indisprimary AS is_primary,
       am.amname::text AS access_method,
       pg_catalog.pg_get_indexdef(i.indexrelid) AS creation
FROM pg_catalog.pg_index i
JOIN pg_catalog.pg_class ic ON ic.oid = i.indexrelid
JOIN pg_catalog.pg_class c ON c.oid = i.indrelid
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
JOIN pg_catalog.pg_am am ON am.oid = ic.relam
WHERE n.nspname = $1
  AND c.relname = $2
ORDER BY ic.relname COLLATE "C"
"#,
);

pub const LIST_CONSTRAINTS: Query = Query::new(
    "list_constraints",
    r#"
SELECT con.conname::text AS constraint_name,
       con.contype::text AS constraint_type,
       con.convalidated AS validated,
       ARRAY(
           SELECT a.attname::text
           FROM unnest(con.conkey) WITH ORDINALITY AS k(attnum, pos)
           JOIN pg_catalog.pg_attribute a
             ON a.attrelid = con.conrelid AND a.attnum = k.attnum
           ORDER BY k.pos
       ) AS columns,
       rn.nspname::text AS referenced_schema,
       rc.relname::text AS referenced_table,
       ARRAY(
           SELECT a.attname::text
           FROM unnest(con.confkey) WITH ORDINALITY AS k(attnum, pos)
           JOIN pg_catalog.pg_attribute a
             ON a.attrelid = con.confrelid AND a.attnum = k.attnum
           ORDER BY k.pos
       ) AS referenced_columns
FROM pg_catalog.pg_constraint con
JOIN pg_catalog.pg_class c ON c.oid = con.conrelid
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
LEFT JOIN pg_catalog.pg_class rc ON rc.oid = con.confrelid
LEFT JOIN pg_catalog.pg_namespace rn ON rn.oid = rc.relnamespace
WHERE n.nspname = $1
  AND c.relname = $2
  AND con.contype IN ('p', 'u', 'f')
ORDER BY con.contype, con.conname COLLATE "C"
"#,
);

pub const DATABASE_COMMENT: Query = Query::new(
    "database_comment",
    r#"
SELECT NULL::text AS column_name,
       pg_catalog.shobj_description(d.oid, 'pg_database') AS comment
FROM pg_catalog.pg_database d
WHERE d.datname = current_database()
"#,
);

pub const SCHEMA_COMMENT: Query = Query::new(
    "schema_comment",
    r#"
SELECT NULL::text AS column_name,
       pg_catalog.obj_description(n.oid, 'pg_namespace') AS comment
FROM pg_catalog.pg_namespace n
WHERE n.nspname = $1
"#,
);

/// The table comment (`column_name` NULL) followed by its column comments.
pub const TABLE_COMMENTS: Query = Query::new(
    "table_comments",
    r#"
SELECT column_name, comment
FROM (
    SELECT NULL::text AS column_name,
           0 AS position,
           pg_catalog.obj_description(c.oid, 'pg_class') AS comment
    FROM pg_catalog.pg_class c
    JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
    WHERE n.nspname = $1 AND c.relname = $2
    UNION ALL
    SELECT a.attname::text,
           a.attnum::int,
           pg_catalog.col_description(c.oid, a.attnum)
    FROM pg_catalog.pg_class c
    JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
    JOIN pg_catalog.pg_attribute a ON a.attrelid = c.oid
    WHERE n.nspname = $1 AND c.relname = $2
      AND a.attnum > 0 AND NOT a.attisdropped
) comments
WHERE comment IS NOT NULL
ORDER BY position
"#,
);

pub const LOOKUP_TYPE: Query = Query::new(
    "lookup_type",
    r#"
SELECT pg_catalog.format_type(t.oid, NULL) AS type_name,
       t.oid::int8 AS type_oid,
       t.typtype::text AS type_kind,
       t.typcategory::text AS type_category,
       NULLIF(t.typbasetype, 0)::int8 AS base_type_oid,
       CASE WHEN t.typtype = 'd'
            THEN pg_catalog.format_type(t.typbasetype, t.typtypmod)
       END AS base_type_name,
       NULLIF(t.typelem, 0)::int8 AS element_type_oid
FROM pg_catalog.pg_type t
WHERE t.oid = $1::int8::oid
"#,
);

pub const ENUM_LABELS: Query = Query::new(
    "enum_labels",
    r#"
SELECT e.enumlabel::text AS label
FROM pg_catalog.pg_enum e
WHERE e.enumtypid = $1::int8::oid
ORDER BY e.enumsortorder
"#,
);

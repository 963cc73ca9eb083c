use jts_core::driver::{Row, Value as CoreValue};
use postgres::types::{accepts, private::BytesMut, to_sql_checked, IsNull, ToSql, Type};
use std::sync::Arc;

/// A query parameter bound to a PostgreSQL statement.
#[derive(Debug)]
pub(crate) struct Value<'a>(pub(crate) &'a CoreValue);

impl ToSql for Value<'_> {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> std::result::Result<IsNull, Box<dyn std::error::Error + Sync + Send>>
    where
        Self: Sized,
    {
        match self.0 {
            CoreValue::Null => Ok(IsNull::Yes),
            CoreValue::Bool(value) => value.to_sql(ty, out),
            CoreValue::I64(value) => match *ty {
                Type::INT2 => i16::try_from(*value)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*value)?.to_sql(ty, out),
                Type::OID => u32::try_from(*value)?.to_sql(ty, out),
                _ => value.to_sql(ty, out),
            },
            CoreValue::String(value) => value.to_sql(ty, out),
            CoreValue::List(_) => Err("list parameters are not supported".into()),
        }
    }

    accepts!(BOOL, INT2, INT4, INT8, OID, TEXT, VARCHAR, NAME, BPCHAR);
    to_sql_checked!();
}

/// Converts a PostgreSQL row to a catalog [`Row`].
///
/// `columns` is shared by every row of one result.
pub(crate) fn postgres_to_jts(
    row: &postgres::Row,
    columns: &Arc<[String]>,
) -> std::result::Result<Row, postgres::Error> {
    let values = row
        .columns()
        .iter()
        .enumerate()
        .map(|(index, column)| postgres_to_value(row, index, column.type_()))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Row::new(columns.clone(), values))
}

fn postgres_to_value(
    row: &postgres::Row,
    index: usize,
    ty: &Type,
) -> std::result::Result<CoreValue, postgres::Error> {
    // NOTE: the inner representation of the PostgreSQL type enum is not
    // accessible, so each type is matched by hand.
    let value: CoreValue = match *ty {
        Type::BOOL => row.try_get::<_, Option<bool>>(index)?.into(),
        Type::INT2 => row.try_get::<_, Option<i16>>(index)?.map(i64::from).into(),
        Type::INT4 => row.try_get::<_, Option<i32>>(index)?.into(),
        Type::INT8 => row.try_get::<_, Option<i64>>(index)?.into(),
        Type::OID => row.try_get::<_, Option<u32>>(index)?.into(),
        Type::CHAR => row
            .try_get::<_, Option<i8>>(index)?
            .map(|code| char::from(code as u8).to_string())
            .into(),
        Type::TEXT_ARRAY | Type::NAME_ARRAY | Type::VARCHAR_ARRAY => row
            .try_get::<_, Option<Vec<Option<String>>>>(index)?
            .map(CoreValue::from)
            .unwrap_or(CoreValue::Null),
        // Text-like types, including those without a dedicated constant such
        // as `pg_node_tree`, read through their text representation
        _ => row.try_get::<_, Option<String>>(index)?.into(),
    };

    Ok(value)
}

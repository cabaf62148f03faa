use sea_orm::{
    ColumnTrait, ColumnType, DatabaseBackend,
    sea_query::{Alias, Expr, Func, FunctionCall, SimpleExpr},
};

/// Build a case-sensitive "contains" condition on the text form of a column.
///
/// The value is bound as a parameter and matched with a position function rather
/// than `LIKE`, so `%` and `_` are literal and ASCII case is significant on every
/// backend. UUID columns are matched against their lowercase hyphenated form, which
/// SQLite and MySQL do not store.
#[must_use]
pub fn build_contains_condition<C: ColumnTrait>(
    column: C,
    value: &str,
    backend: DatabaseBackend,
) -> SimpleExpr {
    let is_uuid = matches!(column.def().get_column_type(), ColumnType::Uuid);
    let position = match backend {
        DatabaseBackend::Postgres => Func::cust(Alias::new("STRPOS"))
            .arg(Expr::col(column).cast_as(Alias::new("TEXT")))
            .arg(value.to_owned()),
        DatabaseBackend::MySql => {
            let text: SimpleExpr = if is_uuid {
                Func::cust(Alias::new("BIN_TO_UUID")).arg(Expr::col(column)).into()
            } else {
                Expr::col(column).into()
            };
            Func::cust(Alias::new("INSTR"))
                .arg(text.cast_as(Alias::new("BINARY")))
                .arg(Expr::val(value.to_owned()).cast_as(Alias::new("BINARY")))
        }
        DatabaseBackend::Sqlite => {
            let text: SimpleExpr = if is_uuid {
                sqlite_uuid_text(column).into()
            } else {
                Expr::col(column).cast_as(Alias::new("TEXT"))
            };
            Func::cust(Alias::new("INSTR"))
                .arg(text)
                .arg(value.to_owned())
        }
    };
    Expr::expr(position).gt(0)
}

// SQLite keeps UUIDs as 16-byte blobs.
fn sqlite_uuid_text<C: ColumnTrait>(column: C) -> FunctionCall {
    let group = |start: i32, len: i32| {
        Func::cust(Alias::new("SUBSTR"))
            .arg(Func::cust(Alias::new("HEX")).arg(Expr::col(column)))
            .arg(start)
            .arg(len)
    };
    Func::cust(Alias::new("LOWER")).arg(
        Func::cust(Alias::new("PRINTF"))
            .arg("%s-%s-%s-%s-%s")
            .arg(group(1, 8))
            .arg(group(9, 4))
            .arg(group(13, 4))
            .arg(group(17, 4))
            .arg(group(21, 12)),
    )
}

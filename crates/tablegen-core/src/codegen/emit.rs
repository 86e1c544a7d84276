use crate::codegen::module::{Property, TypeModule};
use crate::codegen::naming::ReservedWords;
use crate::codegen::typemap::TypeMapping;
use crate::schema::types::Column;

/// Build the primary module for one table.
///
/// One property per column, in the order the columns were listed. Nullable
/// columns become optional properties; reserved table and column names are
/// escaped, and the table name is sanitized into a type name.
pub fn emit_module(
    table: &str,
    columns: &[Column],
    reserved: &ReservedWords,
    types: &TypeMapping,
) -> TypeModule {
    let mut module = TypeModule::new(reserved.module_identifier(table));
    for column in columns {
        let ty = types.resolve(&column.sql_type);
        let added = module.add_property(Property::new(
            reserved.escape(&column.name),
            ty.to_string(),
            column.nullable,
        ));
        if !added {
            tracing::warn!(
                "Column {}.{} collides with an earlier property and was skipped",
                table,
                column.name
            );
        }
    }
    module
}

/// Text of the primary module for one table.
pub fn emit(
    table: &str,
    columns: &[Column],
    reserved: &ReservedWords,
    types: &TypeMapping,
) -> String {
    emit_module(table, columns, reserved, types).render()
}

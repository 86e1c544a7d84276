use indexmap::IndexSet;

use crate::codegen::naming::{property_key, ReservedWords};

/// Name of the aggregate mapping type.
pub const TABLES_TYPE: &str = "Tables";

/// Text of the root index module.
///
/// Imports every table's row type once and exports one mapping from the
/// original, unescaped table name to an array of that row type:
///
/// ```text
/// import type { users } from './users';
/// import type { _class } from './_class';
///
/// export type Tables = {
///     users: users[];
///     class: _class[];
/// }
/// ```
pub fn aggregate<S: AsRef<str>>(tables: &[S], reserved: &ReservedWords) -> String {
    let mut idents = IndexSet::new();
    let mut entries = String::new();

    for table in tables {
        let name = table.as_ref();
        let ident = reserved.module_identifier(name);
        entries.push_str(&format!("    {}: {}[];\n", property_key(name), ident));
        idents.insert(ident.into_owned());
    }

    let imports: String = idents
        .iter()
        .map(|ident| format!("import type {{ {} }} from './{}';\n", ident, ident))
        .collect();

    format!(
        "{}\nexport type {} = {{\n{}}}\n",
        imports, TABLES_TYPE, entries
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_blog() {
        let text = aggregate(&["users", "posts"], &ReservedWords::typescript());
        assert_eq!(
            text,
            "import type { users } from './users';\nimport type { posts } from './posts';\n\nexport type Tables = {\n    users: users[];\n    posts: posts[];\n}\n"
        );
    }

    #[test]
    fn test_aggregate_keeps_original_key_for_reserved_table() {
        let text = aggregate(&["class".to_string()], &ReservedWords::typescript());
        assert!(text.contains("import type { _class } from './_class';\n"));
        assert!(text.contains("    class: _class[];\n"));
    }

    #[test]
    fn test_aggregate_empty() {
        let tables: [&str; 0] = [];
        assert_eq!(
            aggregate(&tables, &ReservedWords::typescript()),
            "\nexport type Tables = {\n}\n"
        );
    }

    #[test]
    fn test_aggregate_sanitizes_module_but_keeps_exact_key() {
        let text = aggregate(&["order-items"], &ReservedWords::typescript());
        assert!(text.contains("import type { order_items } from './order_items';\n"));
        assert!(text.contains("    'order-items': order_items[];\n"));
    }

    #[test]
    fn test_aggregate_imports_shared_module_once() {
        let text = aggregate(&["class", "_class"], &ReservedWords::typescript());
        assert_eq!(text.matches("import type { _class }").count(), 1);
        assert!(text.contains("    class: _class[];\n    _class: _class[];\n"));
    }
}

use std::collections::BTreeMap;
use std::fmt;

/// Target type of a generated property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsType {
    Number,
    String,
    Boolean,
    /// Binary data (`bytea`, `blob`)
    Buffer,
    /// Unmapped or schemaless (`json`, `jsonb`, anything unknown)
    Any,
    Array(Box<TsType>),
    /// Verbatim type text supplied by a config override.
    Custom(String),
}

impl TsType {
    /// Resolve a raw SQL type through the built-in mapping.
    ///
    /// Lookup is case-insensitive and ignores a trailing length or precision
    /// suffix, so `VARCHAR(255)` and `character varying` both map to
    /// `string`. A `[]` suffix maps to an array of the element type. Misses
    /// fall back to [`TsType::Any`].
    pub fn from_sql(raw: &str) -> Self {
        let normalized = normalize(raw);

        if let Some(inner) = normalized.strip_suffix("[]") {
            return TsType::Array(Box::new(TsType::from_sql(inner)));
        }

        match normalized.as_str() {
            // Numeric types
            "smallint" | "integer" | "bigint" | "decimal" | "numeric" | "real"
            | "double precision" | "smallserial" | "serial" | "bigserial" | "money" => {
                TsType::Number
            }
            "int" | "int2" | "int4" | "int8" | "float" | "float4" | "float8" | "double"
            | "tinyint" | "mediumint" | "serial2" | "serial4" | "serial8" => TsType::Number,

            // Character types
            "character varying" | "varchar" | "character" | "char" | "text" | "clob"
            | "bpchar" | "name" | "citext" => TsType::String,

            // Date/time types
            "timestamp"
            | "timestamp without time zone"
            | "timestamp with time zone"
            | "timestamptz"
            | "date"
            | "datetime"
            | "time"
            | "time without time zone"
            | "time with time zone"
            | "timetz"
            | "interval" => TsType::String,

            "boolean" | "bool" => TsType::Boolean,

            "uuid" => TsType::String,

            "json" | "jsonb" => TsType::Any,

            "bytea" | "blob" => TsType::Buffer,

            // Geometric types
            "point" | "line" | "lseg" | "box" | "path" | "polygon" | "circle" => TsType::String,

            // Network types
            "inet" | "cidr" | "macaddr" | "macaddr8" => TsType::String,

            // Bit strings, text search, ranges
            "bit" | "bit varying" | "varbit" => TsType::String,
            "tsvector" | "tsquery" => TsType::String,
            "int4range" | "int8range" | "numrange" | "tsrange" | "tstzrange" | "daterange" => {
                TsType::String
            }

            _ => TsType::Any,
        }
    }
}

impl fmt::Display for TsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TsType::Number => write!(f, "number"),
            TsType::String => write!(f, "string"),
            TsType::Boolean => write!(f, "boolean"),
            TsType::Buffer => write!(f, "Buffer"),
            TsType::Any => write!(f, "any"),
            TsType::Array(inner) => write!(f, "{}[]", inner),
            TsType::Custom(text) => write!(f, "{}", text),
        }
    }
}

/// Lowercase, trim and drop a `(n)` / `(p,s)` suffix.
fn normalize(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    match lowered.find('(') {
        Some(open) => {
            let close = lowered[open..].find(')').map(|i| open + i + 1);
            let head = lowered[..open].trim_end();
            let rest = close.map(|c| lowered[c..].trim()).unwrap_or("");
            if rest.is_empty() {
                head.to_string()
            } else {
                format!("{} {}", head, rest)
            }
        }
        None => lowered,
    }
}

/// The column type mapping: built-in table plus user overrides.
#[derive(Debug, Clone, Default)]
pub struct TypeMapping {
    overrides: BTreeMap<String, String>,
}

impl TypeMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides keyed by SQL type name. Keys are normalized the same way
    /// lookups are, so `[types] "VARCHAR" = "Str"` matches `varchar(40)`.
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        Self {
            overrides: overrides
                .iter()
                .map(|(sql, ts)| (normalize(sql), ts.clone()))
                .collect(),
        }
    }

    pub fn resolve(&self, sql_type: &str) -> TsType {
        match self.overrides.get(&normalize(sql_type)) {
            Some(custom) => TsType::Custom(custom.clone()),
            None => TsType::from_sql(sql_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_catalog_names() {
        assert_eq!(TsType::from_sql("integer"), TsType::Number);
        assert_eq!(TsType::from_sql("double precision"), TsType::Number);
        assert_eq!(TsType::from_sql("character varying"), TsType::String);
        assert_eq!(
            TsType::from_sql("timestamp with time zone"),
            TsType::String
        );
        assert_eq!(TsType::from_sql("boolean"), TsType::Boolean);
        assert_eq!(TsType::from_sql("jsonb"), TsType::Any);
        assert_eq!(TsType::from_sql("bytea"), TsType::Buffer);
        assert_eq!(TsType::from_sql("money"), TsType::Number);
        assert_eq!(TsType::from_sql("tstzrange"), TsType::String);
    }

    #[test]
    fn test_case_and_length_suffix_ignored() {
        assert_eq!(TsType::from_sql("VARCHAR(255)"), TsType::String);
        assert_eq!(TsType::from_sql("NUMERIC(10, 2)"), TsType::Number);
        assert_eq!(TsType::from_sql("INTEGER"), TsType::Number);
        assert_eq!(
            TsType::from_sql("timestamp(3) with time zone"),
            TsType::String
        );
    }

    #[test]
    fn test_arrays() {
        assert_eq!(
            TsType::from_sql("integer[]"),
            TsType::Array(Box::new(TsType::Number))
        );
        assert_eq!(TsType::from_sql("int4[]").to_string(), "number[]");
        assert_eq!(TsType::from_sql("text[]").to_string(), "string[]");
    }

    #[test]
    fn test_unknown_falls_back_to_any() {
        assert_eq!(TsType::from_sql("USER-DEFINED"), TsType::Any);
        assert_eq!(TsType::from_sql("geography"), TsType::Any);
        assert_eq!(TsType::from_sql(""), TsType::Any);
    }

    #[test]
    fn test_override_wins() {
        let mut overrides = BTreeMap::new();
        overrides.insert("JSONB".to_string(), "Record<string, unknown>".to_string());
        overrides.insert("numeric".to_string(), "string".to_string());
        let mapping = TypeMapping::with_overrides(&overrides);

        assert_eq!(mapping.resolve("jsonb").to_string(), "Record<string, unknown>");
        assert_eq!(mapping.resolve("numeric(12,4)").to_string(), "string");
        assert_eq!(mapping.resolve("integer"), TsType::Number);
    }
}

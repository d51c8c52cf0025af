//! Prisma scalar type to TypeScript type mapping

/// Map a Prisma scalar type name to its TypeScript counterpart.
///
/// Unknown names are returned unchanged so references to other models
/// (`User`, `Profile`) come through as nested types.
///
/// # Examples
///
/// ```
/// # use nestgen::scaffold::type_map::map_type;
/// assert_eq!(map_type("Int"), "number");
/// assert_eq!(map_type("DateTime"), "Date");
/// assert_eq!(map_type("User"), "User");
/// ```
#[must_use]
pub fn map_type(schema_type: &str) -> &str {
    match schema_type {
        "Int" | "Float" | "Decimal" => "number",
        "Boolean" => "boolean",
        "String" => "string",
        "DateTime" => "Date",
        "Json" => "any",
        "Bytes" => "Buffer",
        "BigInt" => "bigint",
        other => other,
    }
}

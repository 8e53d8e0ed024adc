//! SQL text builders for fixture writes
//!
//! Identifiers are always quoted; values never appear in the text and are
//! bound as `?` parameters instead.

/// Quote a SQL identifier, doubling embedded double quotes.
///
/// # Examples
/// ```
/// use sg_db::sql::quote_ident;
/// assert_eq!(quote_ident("drinks"), r#""drinks""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a potentially schema-qualified name, component by component.
///
/// # Examples
/// ```
/// use sg_db::sql::quote_qualified;
/// assert_eq!(quote_qualified("drinks"), r#""drinks""#);
/// assert_eq!(quote_qualified("staging.drinks"), r#""staging"."drinks""#);
/// ```
pub fn quote_qualified(name: &str) -> String {
    name.split('.')
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(".")
}

/// `?, ?, ?` for `n` parameters
pub fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// `INSERT ... RETURNING *` for the given columns. No columns inserts a
/// row of defaults.
pub fn insert_returning(table: &str, columns: &[&str]) -> String {
    if columns.is_empty() {
        return format!(
            "INSERT INTO {} DEFAULT VALUES RETURNING *",
            quote_qualified(table)
        );
    }
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
        quote_qualified(table),
        columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", "),
        placeholders(columns.len())
    )
}

/// Plain `INSERT` for the given columns
pub fn insert(table: &str, columns: &[&str]) -> String {
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_qualified(table),
        columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", "),
        placeholders(columns.len())
    )
}

/// `UPDATE table SET column = ? WHERE key IN (?, ...)`; the first parameter
/// is the new value, the rest are the keys.
pub fn update_where_in(table: &str, column: &str, key: &str, keys: usize) -> String {
    format!(
        "UPDATE {} SET {} = ? WHERE {} IN ({})",
        quote_qualified(table),
        quote_ident(column),
        quote_ident(key),
        placeholders(keys)
    )
}

/// One `DELETE FROM` statement per table, in order
pub fn delete_all(tables: &[String]) -> String {
    tables
        .iter()
        .map(|t| format!("DELETE FROM {};", quote_qualified(t)))
        .collect::<Vec<_>>()
        .join("\n")
}

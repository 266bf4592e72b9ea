pub const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

/// Splits an SQL file into executable statements. Comment-only lines are
/// dropped; the schema contains no string literals with embedded `;`.
pub fn split_sql_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|stmt| {
            stmt.lines()
                .filter(|line| !line.trim_start().starts_with("--"))
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string()
        })
        .filter(|stmt| !stmt.is_empty())
        .collect()
}

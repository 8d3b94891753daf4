use anyhow::{bail, Result};
use rusqlite::{params, Connection};

pub const DEFAULT_TIMESTAMP: &str = "(cast(strftime('%s','now') as int))";

/// Offset added to the schema version when stored in `PRAGMA user_version`,
/// so that a plain sqlite file (user_version 0) is never mistaken for a
/// versioned database.
pub const BASE_DB_VERSION: usize = 99999;

#[macro_export]
macro_rules! sqlite_column {
    ($name:expr, $sql_type:expr $(, $field:ident = $value:expr)*) => {
        {
            // unused_mut fires when no optional field assignments are passed
            #[allow(unused_mut)]
            let mut column = Column {
                name: $name,
                sql_type: $sql_type,
                is_primary_key: false,
                non_null: false,
                is_unique: false,
                default_value: None,
                foreign_key: None,
            };
            $(
                column.$field = $value;
            )*
            column
        }
    };
}

#[derive(Debug, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
    Real,
    Blob,
}

impl SqlType {
    fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Text => "TEXT",
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
            SqlType::Blob => "BLOB",
        }
    }
}

#[allow(unused)]
pub enum ForeignKeyOnChange {
    NoAction,
    Restrict,
    SetNull,
    SetDefault,
    Cascade,
}

impl ForeignKeyOnChange {
    fn as_sql(&self) -> &'static str {
        match self {
            ForeignKeyOnChange::NoAction => "NO ACTION",
            ForeignKeyOnChange::Restrict => "RESTRICT",
            ForeignKeyOnChange::SetNull => "SET NULL",
            ForeignKeyOnChange::SetDefault => "SET DEFAULT",
            ForeignKeyOnChange::Cascade => "CASCADE",
        }
    }
}

pub struct ForeignKey {
    pub foreign_table: &'static str,
    pub foreign_column: &'static str,
    pub on_delete: ForeignKeyOnChange,
}

pub struct Column<'a, S: AsRef<str>> {
    pub name: S,
    pub sql_type: &'a SqlType,
    pub is_primary_key: bool,
    pub non_null: bool,
    pub is_unique: bool,
    pub default_value: Option<S>,
    pub foreign_key: Option<&'a ForeignKey>,
}

pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column<'static, &'static str>],
    pub indices: &'static [(&'static str, &'static str)],
    pub unique_constraints: &'static [&'static [&'static str]],
}

impl Table {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        let mut create_sql = format!("CREATE TABLE {} (", self.name);
        for (column_index, column) in self.columns.iter().enumerate() {
            if column_index > 0 {
                create_sql.push_str(", ");
            }
            create_sql.push_str(&format!("{} {}", column.name, column.sql_type.as_sql()));
            if column.is_primary_key {
                create_sql.push_str(" PRIMARY KEY");
            }
            if column.non_null {
                create_sql.push_str(" NOT NULL");
            }
            if column.is_unique {
                create_sql.push_str(" UNIQUE");
            }
            if let Some(default_value) = column.default_value {
                create_sql.push_str(&format!(" DEFAULT {}", default_value));
            }
            if let Some(foreign_key) = column.foreign_key {
                create_sql.push_str(&format!(
                    " REFERENCES {}({}) ON DELETE {}",
                    foreign_key.foreign_table,
                    foreign_key.foreign_column,
                    foreign_key.on_delete.as_sql()
                ));
            }
        }
        for unique_constraint in self.unique_constraints {
            create_sql.push_str(&format!(", UNIQUE ({})", unique_constraint.join(", ")));
        }
        create_sql.push_str(");");
        conn.execute(&create_sql, params![])?;

        for (index_name, column_name) in self.indices {
            conn.execute(
                &format!(
                    "CREATE INDEX {} ON {}({});",
                    index_name, self.name, column_name
                ),
                params![],
            )?;
        }
        Ok(())
    }
}

pub struct VersionedSchema {
    pub version: usize,
    pub tables: &'static [Table],
    pub migration: Option<fn(&Connection) -> Result<()>>,
}

impl VersionedSchema {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        conn.execute("PRAGMA foreign_keys = ON;", params![])?;
        for table in self.tables {
            table.create(conn)?;
        }
        conn.execute(
            &format!("PRAGMA user_version = {}", BASE_DB_VERSION + self.version),
            [],
        )?;
        Ok(())
    }

    /// Checks that the tables in `conn` structurally match this schema:
    /// column names/types/nullability, unique constraints, and foreign keys
    /// (including their ON DELETE action).
    pub fn validate(&self, conn: &Connection) -> Result<()> {
        for table in self.tables {
            validate_columns(conn, table)?;
            validate_unique_constraints(conn, table)?;
            validate_foreign_keys(conn, table)?;
        }
        Ok(())
    }
}

fn validate_columns(conn: &Connection, table: &Table) -> Result<()> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({});", table.name))?;
    let actual_columns: Vec<(String, String, bool, bool)> = stmt
        .query_map(params![], |row| {
            Ok((
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i32>(3)? == 1,
                row.get::<_, i32>(5)? == 1,
            ))
        })?
        .collect::<Result<_, rusqlite::Error>>()?;

    if actual_columns.len() != table.columns.len() {
        bail!(
            "Table {} has {} columns, expected {}. Found: [{}], expected: [{}]",
            table.name,
            actual_columns.len(),
            table.columns.len(),
            actual_columns
                .iter()
                .map(|c| c.0.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            table
                .columns
                .iter()
                .map(|c| c.name)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    for ((name, sql_type, non_null, is_primary_key), expected) in
        actual_columns.iter().zip(table.columns.iter())
    {
        if name != expected.name {
            bail!(
                "Table {} column name mismatch: expected {}, got {}",
                table.name,
                expected.name,
                name
            );
        }
        if sql_type != expected.sql_type.as_sql() {
            bail!(
                "Table {} column {} type mismatch: expected {}, got {}",
                table.name,
                expected.name,
                expected.sql_type.as_sql(),
                sql_type
            );
        }
        if *non_null != expected.non_null {
            bail!(
                "Table {} column {} non-null mismatch: expected {}, got {}",
                table.name,
                expected.name,
                expected.non_null,
                non_null
            );
        }
        if *is_primary_key != expected.is_primary_key {
            bail!(
                "Table {} column {} primary key mismatch: expected {}, got {}",
                table.name,
                expected.name,
                expected.is_primary_key,
                is_primary_key
            );
        }
    }
    Ok(())
}

fn validate_unique_constraints(conn: &Connection, table: &Table) -> Result<()> {
    if table.unique_constraints.is_empty() {
        return Ok(());
    }

    // SQLite exposes table-level UNIQUE constraints as unique indices.
    let mut stmt = conn.prepare(&format!("PRAGMA index_list({})", table.name))?;
    let unique_indices: Vec<String> = stmt
        .query_map([], |row| {
            let name: String = row.get(1)?;
            let is_unique: i32 = row.get(2)?;
            Ok((name, is_unique))
        })?
        .filter_map(|r| r.ok())
        .filter(|(_, is_unique)| *is_unique == 1)
        .map(|(name, _)| name)
        .collect();

    let mut unique_index_columns: Vec<Vec<String>> = Vec::new();
    for index_name in &unique_indices {
        let mut idx_stmt = conn.prepare(&format!("PRAGMA index_info({})", index_name))?;
        let mut cols: Vec<String> = idx_stmt
            .query_map([], |row| row.get::<_, String>(2))?
            .filter_map(|r| r.ok())
            .collect();
        cols.sort();
        unique_index_columns.push(cols);
    }

    for expected_columns in table.unique_constraints {
        let mut expected_sorted: Vec<&str> = expected_columns.to_vec();
        expected_sorted.sort_unstable();

        let found = unique_index_columns
            .iter()
            .any(|actual| actual.iter().map(String::as_str).collect::<Vec<_>>() == expected_sorted);
        if !found {
            bail!(
                "Table {} is missing unique constraint on columns ({})",
                table.name,
                expected_columns.join(", ")
            );
        }
    }
    Ok(())
}

fn validate_foreign_keys(conn: &Connection, table: &Table) -> Result<()> {
    // PRAGMA foreign_key_list: id, seq, table, from, to, on_update, on_delete, match
    let mut stmt = conn.prepare(&format!("PRAGMA foreign_key_list({})", table.name))?;
    let actual_fks: Vec<(String, String, String, String)> = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(3)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(6)?,
            ))
        })?
        .filter_map(|r| r.ok())
        .collect();

    for column in table.columns {
        let Some(expected_fk) = column.foreign_key else {
            continue;
        };
        let found = actual_fks.iter().any(|(from, to_table, to_column, on_delete)| {
            from == column.name
                && to_table == expected_fk.foreign_table
                && to_column == expected_fk.foreign_column
                && on_delete == expected_fk.on_delete.as_sql()
        });
        if !found {
            bail!(
                "Table {} column {} is missing foreign key REFERENCES {}({}) ON DELETE {}",
                table.name,
                column.name,
                expected_fk.foreign_table,
                expected_fk.foreign_column,
                expected_fk.on_delete.as_sql()
            );
        }
    }
    Ok(())
}

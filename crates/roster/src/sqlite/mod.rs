use std::path::Path;

use anyhow::{Context, Error, Result};
use rusqlite::{Connection, OpenFlags, params};

use crate::models::{CommandFailure, Record};

pub const CUSTOMERS_TABLE: &str = "Customers";
pub const VEHICLES_TABLE: &str = "Vehicles";
pub const CUSTOMER_VEHICLES_TABLE: &str = "CustomerVehicles";

const CREATE_CUSTOMERS_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS Customers (
    CustomerID INTEGER PRIMARY KEY AUTOINCREMENT,
    LastName TEXT NOT NULL,
    FirstName TEXT NOT NULL,
    Email TEXT NOT NULL
);
"#;

const CREATE_VEHICLES_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS Vehicles (
    VehicleID INTEGER PRIMARY KEY AUTOINCREMENT,
    Name TEXT NOT NULL,
    Type TEXT NOT NULL,
    LengthFt INTEGER NOT NULL
);
"#;

// No keys on the association table: rows are only ever appended.
const CREATE_CUSTOMER_VEHICLES_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS CustomerVehicles (
    CustomerID INTEGER NOT NULL,
    VehicleID INTEGER NOT NULL
);
"#;

const INSERT_CUSTOMER_SQL: &str =
    "INSERT INTO Customers (FirstName, LastName, Email) VALUES (?1, ?2, ?3)";
const INSERT_VEHICLE_SQL: &str = "INSERT INTO Vehicles (Name, Type, LengthFt) VALUES (?1, ?2, ?3)";
const INSERT_CUSTOMER_VEHICLE_SQL: &str =
    "INSERT INTO CustomerVehicles (CustomerID, VehicleID) VALUES (?1, ?2)";

#[must_use]
pub fn schema_statements() -> &'static [(&'static str, &'static str)] {
    &[
        (CUSTOMERS_TABLE, CREATE_CUSTOMERS_TABLE_SQL),
        (VEHICLES_TABLE, CREATE_VEHICLES_TABLE_SQL),
        (CUSTOMER_VEHICLES_TABLE, CREATE_CUSTOMER_VEHICLES_TABLE_SQL),
    ]
}

/// Generated ids for one persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertedIds {
    pub customer_id: i64,
    pub vehicle_id: i64,
}

/// Opens the database for writing, creating the file and its parent
/// directories when they do not exist yet.
pub fn open_sqlite_connection(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|error| {
            Error::new(CommandFailure::connection(format!(
                "failed to create sqlite parent directory {}: {error}",
                parent.display()
            )))
        })?;
    }

    let connection = Connection::open(path).map_err(|error| {
        Error::new(CommandFailure::connection(format!(
            "failed to open sqlite database {}: {error}",
            path.display()
        )))
    })?;
    ensure_readable_database(&connection, path)?;
    Ok(connection)
}

/// Opens an existing, already populated database read-only.
pub fn open_existing_sqlite_connection(path: &Path) -> Result<Connection> {
    if !path.is_file() {
        return Err(Error::new(CommandFailure::connection(format!(
            "no customer database at {}; run `roster ingest` first so you have customers saved",
            path.display()
        ))));
    }

    let connection = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|error| {
        Error::new(CommandFailure::connection(format!(
            "failed to open sqlite database {}: {error}",
            path.display()
        )))
    })?;
    ensure_readable_database(&connection, path)?;

    for (table, _) in schema_statements() {
        if !table_exists(&connection, table)? {
            return Err(Error::new(CommandFailure::connection(format!(
                "table `{table}` is missing from {}; run `roster ingest` first so you have customers saved",
                path.display()
            ))));
        }
    }

    Ok(connection)
}

// Opening is lazy; reading the header is what rejects a non-database file.
fn ensure_readable_database(connection: &Connection, path: &Path) -> Result<()> {
    connection
        .query_row("PRAGMA schema_version", [], |row| row.get::<usize, i64>(0))
        .map_err(|error| {
            Error::new(CommandFailure::connection(format!(
                "failed to read sqlite database {}: {error}",
                path.display()
            )))
        })?;
    Ok(())
}

pub fn ensure_sqlite_schema(connection: &Connection) -> Result<()> {
    for (table, statement) in schema_statements() {
        connection.execute_batch(statement).map_err(|error| {
            Error::new(CommandFailure::storage(format!(
                "couldn't create {table} table: {error}"
            )))
        })?;
    }
    Ok(())
}

pub fn table_exists(connection: &Connection, table_name: &str) -> Result<bool> {
    let exists = connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 LIMIT 1)",
            [table_name],
            |row| row.get::<usize, i64>(0),
        )
        .with_context(|| format!("failed to look up sqlite table `{table_name}`"))?;
    Ok(exists != 0)
}

/// Writes `record` to the customer, vehicle and association tables as one
/// transaction. Duplicates are inserted as new rows.
///
/// Any failure drops the transaction uncommitted, which rolls it back.
pub fn insert_record(connection: &mut Connection, record: &Record) -> Result<InsertedIds> {
    let Some(length_ft) = record.vehicle_length_ft else {
        return Err(Error::new(CommandFailure::storage(format!(
            "refusing to store vehicle `{}` with unknown length",
            record.vehicle_name
        ))));
    };

    let tx = connection
        .transaction()
        .context("failed to open sqlite transaction")?;

    tx.execute(
        INSERT_CUSTOMER_SQL,
        params![record.first_name, record.last_name, record.email],
    )
    .with_context(|| format!("failed to insert customer email={}", record.email))?;
    let customer_id = tx.last_insert_rowid();

    tx.execute(
        INSERT_VEHICLE_SQL,
        params![record.vehicle_name, record.vehicle_type, i64::from(length_ft)],
    )
    .with_context(|| format!("failed to insert vehicle name={}", record.vehicle_name))?;
    let vehicle_id = tx.last_insert_rowid();

    tx.execute(INSERT_CUSTOMER_VEHICLE_SQL, params![customer_id, vehicle_id])
        .with_context(|| {
            format!("failed to link customer_id={customer_id} to vehicle_id={vehicle_id}")
        })?;

    tx.commit()
        .context("failed to commit sqlite record transaction")?;

    Ok(InsertedIds {
        customer_id,
        vehicle_id,
    })
}

#[cfg(test)]
mod tests {
    use super::{
        CUSTOMER_VEHICLES_TABLE, CUSTOMERS_TABLE, VEHICLES_TABLE, ensure_sqlite_schema,
        insert_record, table_exists,
    };
    use crate::models::{FailureKind, Record, failure_kind};
    use rusqlite::Connection;

    fn sample_record() -> Record {
        Record::new(
            "Aladdin",
            "NoLastName",
            "aladdin@prince.org",
            "rug",
            "Fuzzy",
            Some(6),
        )
    }

    fn count_rows(connection: &Connection, table: &str) -> i64 {
        connection
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })
            .expect("count query should succeed")
    }

    #[test]
    fn ensure_schema_creates_all_tables() {
        let connection = Connection::open_in_memory().expect("in-memory sqlite should open");
        ensure_sqlite_schema(&connection).expect("schema creation should succeed");

        for table in [CUSTOMERS_TABLE, VEHICLES_TABLE, CUSTOMER_VEHICLES_TABLE] {
            assert!(
                table_exists(&connection, table).expect("lookup should succeed"),
                "missing table {table}"
            );
        }
    }

    #[test]
    fn ensure_schema_is_idempotent_and_keeps_rows() {
        let mut connection = Connection::open_in_memory().expect("in-memory sqlite should open");
        ensure_sqlite_schema(&connection).expect("first schema ensure should succeed");
        insert_record(&mut connection, &sample_record()).expect("insert should succeed");
        ensure_sqlite_schema(&connection).expect("second schema ensure should succeed");

        assert_eq!(count_rows(&connection, CUSTOMERS_TABLE), 1);
    }

    #[test]
    fn insert_links_generated_ids() {
        let mut connection = Connection::open_in_memory().expect("in-memory sqlite should open");
        ensure_sqlite_schema(&connection).expect("schema creation should succeed");

        let first = insert_record(&mut connection, &sample_record()).expect("insert should work");
        let second = insert_record(&mut connection, &sample_record()).expect("insert should work");

        assert_ne!(first, second, "re-inserting must create new rows");
        let linked: (i64, i64) = connection
            .query_row(
                "SELECT CustomerID, VehicleID FROM CustomerVehicles ORDER BY rowid LIMIT 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .expect("association row should exist");
        assert_eq!(linked, (first.customer_id, first.vehicle_id));
    }

    #[test]
    fn unknown_length_is_rejected_before_writing() {
        let mut connection = Connection::open_in_memory().expect("in-memory sqlite should open");
        ensure_sqlite_schema(&connection).expect("schema creation should succeed");

        let mut record = sample_record();
        record.vehicle_length_ft = None;
        let error = insert_record(&mut connection, &record).expect_err("unknown length must fail");

        assert_eq!(failure_kind(&error), Some(FailureKind::Storage));
        assert_eq!(count_rows(&connection, CUSTOMERS_TABLE), 0);
    }
}

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::models::Record;

const SELECT_RECORDS_SQL: &str = "SELECT DISTINCT c.FirstName, c.LastName, c.Email, v.Type, v.Name AS VehicleName, v.LengthFt
FROM Customers c
JOIN CustomerVehicles cv ON c.CustomerID = cv.CustomerID
JOIN Vehicles v ON v.VehicleID = cv.VehicleID";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    None,
    FirstName,
    LastName,
    VehicleType,
}

impl SortOrder {
    /// Resolves several requested sort flags to one. First name wins over last
    /// name, which wins over vehicle type.
    #[must_use]
    pub const fn from_flags(first_name: bool, last_name: bool, vehicle_type: bool) -> Self {
        if first_name {
            Self::FirstName
        } else if last_name {
            Self::LastName
        } else if vehicle_type {
            Self::VehicleType
        } else {
            Self::None
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::VehicleType => "vehicle_type",
        }
    }

    const fn order_by_column(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::FirstName => Some("FirstName"),
            Self::LastName => Some("LastName"),
            Self::VehicleType => Some("Type"),
        }
    }
}

#[must_use]
pub fn build_select_sql(order: SortOrder) -> String {
    match order.order_by_column() {
        Some(column) => format!("{SELECT_RECORDS_SQL}\nORDER BY {column} COLLATE NOCASE"),
        None => SELECT_RECORDS_SQL.to_string(),
    }
}

/// Reads every distinct customer/vehicle pairing in query row order. Sorted
/// columns compare case-insensitively.
pub fn fetch_records(connection: &Connection, order: SortOrder) -> Result<Vec<Record>> {
    let query = build_select_sql(order);
    let mut statement = connection
        .prepare(&query)
        .context("failed to prepare customer query")?;
    let rows = statement
        .query_map([], |row| {
            let length_ft = row.get::<usize, i64>(5)?;
            Ok(Record::new(
                row.get::<usize, String>(0)?,
                row.get::<usize, String>(1)?,
                row.get::<usize, String>(2)?,
                row.get::<usize, String>(3)?,
                row.get::<usize, String>(4)?,
                u32::try_from(length_ft).ok(),
            ))
        })
        .context("failed to execute customer query")?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row.context("failed to decode customer row")?);
    }
    Ok(records)
}

#[must_use]
pub fn render_record_lines(records: &[Record]) -> Vec<String> {
    records.iter().map(|record| format!("- {record}")).collect()
}

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use crate::config::RuntimePaths;
use crate::display::{SortOrder, fetch_records, render_record_lines};
use crate::sqlite::open_existing_sqlite_connection;

#[derive(Debug, Clone, Args)]
pub struct DisplayArgs {
    /// Sort by first name (wins over -l and -t)
    #[arg(short = 'f', long = "first-name", default_value_t = false)]
    pub first_name: bool,

    /// Sort by last name (wins over -t)
    #[arg(short = 'l', long = "last-name", default_value_t = false)]
    pub last_name: bool,

    /// Sort by vehicle type
    #[arg(short = 't', long = "vehicle-type", default_value_t = false)]
    pub vehicle_type: bool,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl DisplayArgs {
    #[must_use]
    pub fn sort_order(&self) -> SortOrder {
        SortOrder::from_flags(self.first_name, self.last_name, self.vehicle_type)
    }
}

pub fn run(args: &DisplayArgs, runtime_paths: &RuntimePaths) -> Result<()> {
    let order = args.sort_order();
    let connection = open_existing_sqlite_connection(&runtime_paths.db_path)?;
    let records = fetch_records(&connection, order)?;

    if args.json {
        let encoded = serde_json::to_string(&json!({
            "sort_by": order.as_str(),
            "count": records.len(),
            "customers": records,
        }))
        .context("failed to encode customer list")?;
        println!("{encoded}");
        return Ok(());
    }

    println!("display: {} customer(s):", records.len());
    for line in render_record_lines(&records) {
        println!("{line}");
    }
    Ok(())
}

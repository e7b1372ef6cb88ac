use std::fmt::{Display, Formatter};

use serde::Serialize;

/// One customer paired with one vehicle.
///
/// Built per parsed input line or per query row and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub vehicle_type: String,
    pub vehicle_name: String,

    /// `None` when the length is unknown. Parsed lengths are always `Some`.
    pub vehicle_length_ft: Option<u32>,
}

impl Record {
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        vehicle_type: impl Into<String>,
        vehicle_name: impl Into<String>,
        vehicle_length_ft: Option<u32>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            vehicle_type: vehicle_type.into(),
            vehicle_name: vehicle_name.into(),
            vehicle_length_ft,
        }
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}, {}, {}, {}, ",
            self.first_name, self.last_name, self.email, self.vehicle_type, self.vehicle_name
        )?;
        match self.vehicle_length_ft {
            Some(length) => write!(f, "{length}"),
            None => f.write_str("unknown"),
        }
    }
}

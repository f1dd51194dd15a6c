use serde::Serialize;

use crate::model::{Coordinates, WeatherRow};

/// The surface a [`RiskRequestHandler`](crate::RiskRequestHandler) reads its
/// inputs from and writes its results to.
pub trait RiskView: Send {
    /// Current text of the latitude field.
    fn latitude(&self) -> String;

    /// Current text of the longitude field.
    fn longitude(&self) -> String;

    /// Replace the text of the status line.
    fn set_status(&mut self, text: &str);

    /// Remove every row from the weather table.
    fn clear_table(&mut self);

    fn append_row(&mut self, name: &str, value: &str);

    fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude(), self.longitude())
    }
}

/// In-memory view: two input fields, a status line and a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemoryView {
    pub latitude: String,
    pub longitude: String,
    pub status: String,
    pub rows: Vec<WeatherRow>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill in both input fields, as a user typing into the form would.
    pub fn set_inputs(&mut self, latitude: impl Into<String>, longitude: impl Into<String>) {
        self.latitude = latitude.into();
        self.longitude = longitude.into();
    }
}

impl RiskView for MemoryView {
    fn latitude(&self) -> String {
        self.latitude.clone()
    }

    fn longitude(&self) -> String {
        self.longitude.clone()
    }

    fn set_status(&mut self, text: &str) {
        self.status = text.to_string();
    }

    fn clear_table(&mut self) {
        self.rows.clear();
    }

    fn append_row(&mut self, name: &str, value: &str) {
        self.rows.push(WeatherRow::new(name, value));
    }
}

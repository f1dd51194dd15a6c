//! The trigger -> fetch -> render flow.
//!
//! A [`RiskRequestHandler`] owns its view and talks to the service through a
//! [`RiskAssessor`]. Each call to [`RiskRequestHandler::on_request`] is one
//! independent request cycle: calls are never coalesced or cancelled, and when
//! several are in flight the one that completes last decides what the view
//! shows.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error};

use crate::{
    client::RiskAssessor,
    error::TransportError,
    model::{AssessmentResponse, Coordinates, WeatherData},
    view::RiskView,
};

/// What one request cycle did to the view.
#[derive(Debug)]
pub enum RequestOutcome {
    /// Status shows the risk level and the table was re-rendered.
    Assessed { risk_level: String },
    /// Status shows the server's error; the table was left alone.
    Rejected { error: String },
    /// Nothing was shown. The error has already been logged.
    Failed(TransportError),
}

pub struct RiskRequestHandler<V> {
    assessor: Arc<dyn RiskAssessor>,
    view: Mutex<V>,
}

impl<V: RiskView> RiskRequestHandler<V> {
    pub fn new(assessor: Arc<dyn RiskAssessor>, view: V) -> Self {
        Self { assessor, view: Mutex::new(view) }
    }

    /// Lock the view to read it or to edit its input fields.
    pub async fn view(&self) -> MutexGuard<'_, V> {
        self.view.lock().await
    }

    pub fn into_view(self) -> V {
        self.view.into_inner()
    }

    /// Run one cycle using whatever is currently in the input fields.
    pub async fn on_request(&self) -> RequestOutcome {
        let coords = self.view.lock().await.coordinates();
        self.submit(coords).await
    }

    /// Run one cycle for explicit coordinates.
    ///
    /// The view is not locked while the request is in flight.
    pub async fn submit(&self, coords: Coordinates) -> RequestOutcome {
        debug!(latitude = %coords.latitude, longitude = %coords.longitude, "requesting risk assessment");

        match self.assessor.assess(&coords).await {
            Ok(AssessmentResponse::Assessed { risk_level, weather_data }) => {
                let mut view = self.view.lock().await;
                view.set_status(&format!("Risk Level: {risk_level}"));
                render_weather_table(&mut *view, &weather_data);
                RequestOutcome::Assessed { risk_level }
            }
            Ok(AssessmentResponse::Rejected { error }) => {
                self.view.lock().await.set_status(&format!("Error: {error}"));
                RequestOutcome::Rejected { error }
            }
            Err(err) => {
                // Transport failures are not shown to the user.
                error!(error = %err, "risk assessment request failed");
                RequestOutcome::Failed(err)
            }
        }
    }
}

/// Replace the table contents with one row per weather parameter.
pub fn render_weather_table<V: RiskView + ?Sized>(view: &mut V, weather_data: &WeatherData) {
    view.clear_table();
    for row in weather_data.rows() {
        view.append_row(&row.name, &row.value);
    }
}

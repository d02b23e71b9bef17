//! Top-level application state machine.
//!
//! ```text
//! Idle --select_location--> Loading --ok--> Success
//!                                   --err-> Error
//! Success | Error --reset--> Idle
//! any --hard_reset--> Idle
//! ```

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
    error::Operation,
    model::{ForecastRecord, LocationChosen},
    provider::WeatherProvider,
    view::ForecastView,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum AppState {
    #[default]
    Idle,
    Loading {
        location_name: String,
    },
    Success {
        forecast: ForecastRecord,
        location_name: String,
    },
    Error {
        message: String,
    },
}

impl AppState {
    pub fn is_idle(&self) -> bool {
        matches!(self, AppState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AppState::Loading { .. })
    }

    /// Render-ready view when a forecast is on screen.
    pub fn view(&self) -> Option<ForecastView> {
        match self {
            AppState::Success { forecast, location_name } => {
                Some(ForecastView::new(forecast, location_name))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Shared {
    state: AppState,
    /// Bumped on every reset; a fetch started under an older epoch is stale.
    epoch: u64,
}

#[derive(Debug, Clone)]
pub struct App {
    provider: Arc<dyn WeatherProvider>,
    shared: Arc<Mutex<Shared>>,
}

impl App {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider, shared: Arc::default() }
    }

    pub fn state(&self) -> AppState {
        self.shared.lock().state.clone()
    }

    /// Start loading the forecast for a chosen location.
    ///
    /// Only valid from `Idle`; otherwise the event is ignored and `None` is returned.
    /// The returned handle resolves once the state has left `Loading` (or the
    /// result was discarded by a reset).
    pub fn select_location(&self, chosen: LocationChosen) -> Option<JoinHandle<()>> {
        let epoch = {
            let mut shared = self.shared.lock();
            if !shared.state.is_idle() {
                warn!(name = %chosen.display_name, "location selected while busy, ignoring");
                return None;
            }
            shared.state = AppState::Loading { location_name: chosen.display_name.clone() };
            shared.epoch
        };

        info!(
            name = %chosen.display_name,
            latitude = chosen.latitude,
            longitude = chosen.longitude,
            "loading forecast"
        );

        let provider = Arc::clone(&self.provider);
        let shared = Arc::clone(&self.shared);

        Some(tokio::spawn(async move {
            let result = provider.fetch_forecast(chosen.latitude, chosen.longitude).await;

            let mut shared = shared.lock();
            if shared.epoch != epoch || !shared.state.is_loading() {
                debug!(name = %chosen.display_name, "discarding stale forecast result");
                return;
            }

            shared.state = match result {
                Ok(forecast) => {
                    AppState::Success { forecast, location_name: chosen.display_name }
                }
                Err(e) => {
                    warn!(error = %e, "forecast fetch failed");
                    AppState::Error { message: e.user_message(Operation::Forecast) }
                }
            };
        }))
    }

    /// "Search again" / "Try again": leave a result screen for `Idle`.
    ///
    /// Returns `false` (and changes nothing) from `Idle` or `Loading`.
    pub fn reset(&self) -> bool {
        let mut shared = self.shared.lock();
        match shared.state {
            AppState::Success { .. } | AppState::Error { .. } => {
                shared.state = AppState::Idle;
                shared.epoch += 1;
                debug!("reset to idle");
                true
            }
            AppState::Idle | AppState::Loading { .. } => false,
        }
    }

    /// Return to `Idle` from any state. A fetch still in flight is not aborted, but
    /// its result will be ignored.
    pub fn hard_reset(&self) {
        let mut shared = self.shared.lock();
        if shared.state.is_loading() {
            info!("abandoning in-flight forecast fetch");
        }
        shared.state = AppState::Idle;
        shared.epoch += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::provider::fake::{FakeProvider, sample_forecast};
    use std::time::Duration;

    fn london() -> LocationChosen {
        LocationChosen {
            latitude: 51.5072,
            longitude: -0.1276,
            display_name: "London".to_string(),
        }
    }

    fn app(fake: &Arc<FakeProvider>) -> App {
        App::new(Arc::clone(fake) as Arc<dyn WeatherProvider>)
    }

    #[tokio::test]
    async fn idle_to_loading_to_success() {
        let fake = Arc::new(FakeProvider::default());
        let app = app(&fake);
        assert_eq!(app.state(), AppState::Idle);

        let handle = app.select_location(london()).unwrap();
        assert_eq!(app.state(), AppState::Loading { location_name: "London".into() });

        handle.await.unwrap();

        assert_eq!(fake.forecast_calls.lock().clone(), vec![(51.5072, -0.1276)]);
        match app.state() {
            AppState::Success { forecast, location_name } => {
                assert_eq!(location_name, "London");
                assert_eq!(forecast, sample_forecast());
            }
            other => panic!("expected success, got {other:?}"),
        }

        let view = app.state().view().unwrap();
        let today = &view.days[0];
        let first = sample_forecast().daily.get(0).unwrap();
        assert_eq!(today.label, "Today");
        assert_eq!(today.date, first.date);
        assert_eq!(today.high_c, 8);
        assert_eq!(today.low_c, 3);
    }

    #[tokio::test]
    async fn failed_fetch_moves_to_error() {
        let fake = Arc::new(FakeProvider::default());
        fake.fail_forecast(|| ClientError::RemoteUnavailable("status 502".into()));
        let app = app(&fake);

        app.select_location(london()).unwrap().await.unwrap();

        match app.state() {
            AppState::Error { message } => {
                assert_eq!(message, "Failed to fetch weather data. Please try again later.");
            }
            other => panic!("expected error, got {other:?}"),
        }
        assert!(app.state().view().is_none());
    }

    #[tokio::test]
    async fn reset_from_success_and_error_clears_everything() {
        let fake = Arc::new(FakeProvider::default());
        let app = app(&fake);

        app.select_location(london()).unwrap().await.unwrap();
        assert!(app.reset());
        assert_eq!(app.state(), AppState::Idle);

        fake.fail_forecast(|| ClientError::ParseError("bad".into()));
        app.select_location(london()).unwrap().await.unwrap();
        assert!(matches!(app.state(), AppState::Error { .. }));
        assert!(app.reset());
        assert_eq!(app.state(), AppState::Idle);
    }

    #[tokio::test]
    async fn reset_is_rejected_while_idle() {
        let fake = Arc::new(FakeProvider::default());
        let app = app(&fake);
        assert!(!app.reset());
        assert_eq!(app.state(), AppState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn selection_while_loading_is_ignored() {
        let fake = Arc::new(FakeProvider::default());
        fake.set_delay(Duration::from_secs(5));
        let app = app(&fake);

        let handle = app.select_location(london()).unwrap();
        assert!(!app.reset());

        let other = LocationChosen { display_name: "Paris".into(), ..london() };
        assert!(app.select_location(other).is_none());

        handle.await.unwrap();
        assert_eq!(fake.forecast_calls.lock().len(), 1);
        assert!(matches!(
            app.state(),
            AppState::Success { ref location_name, .. } if location_name == "London"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn result_after_hard_reset_is_ignored() {
        let fake = Arc::new(FakeProvider::default());
        fake.set_delay(Duration::from_secs(5));
        let app = app(&fake);

        let handle = app.select_location(london()).unwrap();
        app.hard_reset();
        assert_eq!(app.state(), AppState::Idle);

        handle.await.unwrap();
        assert_eq!(app.state(), AppState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_result_does_not_clobber_newer_load() {
        let fake = Arc::new(FakeProvider::default());
        fake.set_delay(Duration::from_secs(5));
        let app = app(&fake);

        let stale = app.select_location(london()).unwrap();
        while fake.forecast_calls.lock().is_empty() {
            tokio::task::yield_now().await;
        }
        tokio::time::advance(Duration::from_secs(1)).await;
        app.hard_reset();

        fake.fail_forecast(|| ClientError::RemoteUnavailable("down".into()));
        let paris = LocationChosen { display_name: "Paris".into(), ..london() };
        let fresh = app.select_location(paris).unwrap();

        stale.await.unwrap();
        assert_eq!(app.state(), AppState::Loading { location_name: "Paris".into() });

        fresh.await.unwrap();
        assert!(matches!(app.state(), AppState::Error { .. }));
    }

    #[tokio::test]
    async fn london_end_to_end_over_http() {
        use crate::provider::{fake::forecast_body, open_meteo::OpenMeteoProvider};
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "51.5072"))
            .and(query_param("longitude", "-0.1276"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenMeteoProvider::new(
            format!("{}/v1/search", server.uri()),
            format!("{}/v1/forecast", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap();
        let app = App::new(Arc::new(provider));

        let handle = app.select_location(london()).unwrap();
        assert_eq!(app.state(), AppState::Loading { location_name: "London".into() });
        handle.await.unwrap();

        let AppState::Success { forecast, location_name } = app.state() else {
            panic!("expected success, got {:?}", app.state());
        };
        assert_eq!(location_name, "London");

        let view = app.state().view().unwrap();
        let first = forecast.daily.get(0).unwrap();
        assert_eq!(view.days[0].label, "Today");
        assert_eq!(view.days[0].date, first.date);
        assert_eq!(view.days[0].high_c, 8);
        assert_eq!(view.days[0].precipitation_probability_pct, Some(20));

        assert!(app.reset());
        assert_eq!(app.state(), AppState::Idle);
    }
}

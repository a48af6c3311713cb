//! Fetch and render pipeline
//!
//! Runs one fetch for a resolved location and hands the result to a
//! [`Renderer`], toggling the loading indicator around the fetch. The loading
//! indicator is always hidden again, whatever the fetch outcome.

use crate::data::{WeatherClient, WeatherSnapshot};
use crate::location::LocationQuery;

/// A display target for weather snapshots
pub trait Renderer {
    /// Show the loading indicator; safe to call when already shown
    fn show_loading(&mut self);

    /// Hide the loading indicator; safe to call when already hidden
    fn hide_loading(&mut self);

    /// Write every field of `snapshot` to the display
    fn apply_snapshot(&mut self, snapshot: &WeatherSnapshot, display_name: &LocationQuery);
}

/// What a pipeline run did to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// A snapshot was fetched and rendered
    Applied,
    /// The fetch failed; the display kept its previous state
    NoData,
    /// The query was empty, nothing was fetched
    Skipped,
}

/// Fetch weather for `query` and render it
///
/// An empty query is skipped without touching the renderer.
pub async fn run<R: Renderer + ?Sized>(
    fetcher: &WeatherClient,
    renderer: &mut R,
    query: &LocationQuery,
) -> PipelineOutcome {
    if query.is_empty() {
        tracing::debug!("empty location query, skipping fetch");
        return PipelineOutcome::Skipped;
    }

    renderer.show_loading();
    let snapshot = fetcher.fetch_snapshot(query).await;
    finish(renderer, query, snapshot.as_ref())
}

/// Complete a run whose loading indicator was shown by the caller
pub fn finish<R: Renderer + ?Sized>(
    renderer: &mut R,
    query: &LocationQuery,
    snapshot: Option<&WeatherSnapshot>,
) -> PipelineOutcome {
    let outcome = match snapshot {
        Some(snapshot) => {
            renderer.apply_snapshot(snapshot, query);
            tracing::info!(location = %query, "weather updated");
            PipelineOutcome::Applied
        }
        None => {
            tracing::info!(location = %query, "no weather data, keeping previous view");
            PipelineOutcome::NoData
        }
    };

    renderer.hide_loading();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VALID_RESPONSE: &str = include_str!("../tests/fixtures/forecast_westminster.json");

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Show,
        Hide,
        Apply(String, i64),
    }

    /// Renderer that records every call it receives
    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Recorder {
        fn hide_count(&self) -> usize {
            self.calls.iter().filter(|c| **c == Call::Hide).count()
        }
    }

    impl Renderer for Recorder {
        fn show_loading(&mut self) {
            self.calls.push(Call::Show);
        }

        fn hide_loading(&mut self) {
            self.calls.push(Call::Hide);
        }

        fn apply_snapshot(&mut self, snapshot: &WeatherSnapshot, display_name: &LocationQuery) {
            self.calls
                .push(Call::Apply(display_name.to_string(), snapshot.temp_celsius));
        }
    }

    async fn server_responding(template: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .respond_with(template)
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[tokio::test]
    async fn test_run_success_applies_then_hides() {
        let server =
            server_responding(ResponseTemplate::new(200).set_body_string(VALID_RESPONSE)).await;
        let client = WeatherClient::with_base_url(server.uri(), "key");
        let mut recorder = Recorder::default();

        let outcome = run(&client, &mut recorder, &LocationQuery::new("Westminster")).await;

        assert_eq!(outcome, PipelineOutcome::Applied);
        assert_eq!(
            recorder.calls,
            vec![
                Call::Show,
                Call::Apply("Westminster".to_string(), 22),
                Call::Hide
            ]
        );
    }

    #[tokio::test]
    async fn test_run_http_error_hides_once_without_apply() {
        let server = server_responding(ResponseTemplate::new(500)).await;
        let client = WeatherClient::with_base_url(server.uri(), "key");
        let mut recorder = Recorder::default();

        let outcome = run(&client, &mut recorder, &LocationQuery::new("Paris")).await;

        assert_eq!(outcome, PipelineOutcome::NoData);
        assert_eq!(recorder.calls, vec![Call::Show, Call::Hide]);
        assert_eq!(recorder.hide_count(), 1);
    }

    #[tokio::test]
    async fn test_run_malformed_payload_hides_once_without_apply() {
        let server = server_responding(
            ResponseTemplate::new(200).set_body_string(r#"{"current":{}}"#),
        )
        .await;
        let client = WeatherClient::with_base_url(server.uri(), "key");
        let mut recorder = Recorder::default();

        let outcome = run(&client, &mut recorder, &LocationQuery::new("Paris")).await;

        assert_eq!(outcome, PipelineOutcome::NoData);
        assert_eq!(recorder.calls, vec![Call::Show, Call::Hide]);
    }

    #[tokio::test]
    async fn test_run_empty_query_is_skipped() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(VALID_RESPONSE))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = WeatherClient::with_base_url(mock_server.uri(), "key");
        let mut recorder = Recorder::default();

        let outcome = run(&client, &mut recorder, &LocationQuery::default()).await;

        assert_eq!(outcome, PipelineOutcome::Skipped);
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn test_finish_without_snapshot_only_hides() {
        let mut recorder = Recorder::default();
        let outcome = finish(&mut recorder, &LocationQuery::new("Oslo"), None);

        assert_eq!(outcome, PipelineOutcome::NoData);
        assert_eq!(recorder.calls, vec![Call::Hide]);
    }
}

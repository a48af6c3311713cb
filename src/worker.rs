//! Background resolution and fetch tasks
//!
//! Geolocation and weather fetches run as tokio tasks so the dashboard keeps
//! drawing (and shows its loading indicator) while a request is in flight.
//! Results come back to the UI loop over a channel; tasks never touch view
//! state themselves.

use tokio::sync::mpsc;

use crate::data::{WeatherClient, WeatherSnapshot};
use crate::location::{LocationError, LocationQuery, LocationResolver};

/// Capacity of the result channel
const CHANNEL_CAPACITY: usize = 32;

/// Messages sent from background tasks to the UI loop
#[derive(Debug)]
pub enum WorkerMessage {
    /// Startup geolocation finished
    LocationResolved(Result<LocationQuery, LocationError>),
    /// A weather fetch finished
    FetchCompleted {
        /// Id handed out when the fetch was started
        request_id: u64,
        query: LocationQuery,
        /// `None` when the fetch failed
        snapshot: Option<Box<WeatherSnapshot>>,
    },
}

/// Spawns background work and collects its results
pub struct Worker {
    fetcher: WeatherClient,
    resolver: LocationResolver,
    sender: mpsc::Sender<WorkerMessage>,
    receiver: mpsc::Receiver<WorkerMessage>,
}

impl Worker {
    pub fn new(fetcher: WeatherClient, resolver: LocationResolver) -> Self {
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        Self {
            fetcher,
            resolver,
            sender,
            receiver,
        }
    }

    /// Resolve the device location in the background
    pub fn spawn_geolocation(&self) {
        let resolver = self.resolver.clone();
        let tx = self.sender.clone();

        tokio::spawn(async move {
            let result = resolver.resolve_from_geolocation().await;
            let _ = tx.send(WorkerMessage::LocationResolved(result)).await;
        });
    }

    /// Fetch weather for `query` in the background
    pub fn spawn_fetch(&self, request_id: u64, query: LocationQuery) {
        let fetcher = self.fetcher.clone();
        let tx = self.sender.clone();

        tokio::spawn(async move {
            let snapshot = fetcher.fetch_snapshot(&query).await.map(Box::new);
            let _ = tx
                .send(WorkerMessage::FetchCompleted {
                    request_id,
                    query,
                    snapshot,
                })
                .await;
        });
    }

    /// Returns a finished result without blocking, if one is pending
    pub fn try_recv(&mut self) -> Option<WorkerMessage> {
        self.receiver.try_recv().ok()
    }

    /// Waits for the next finished result
    #[cfg(test)]
    async fn recv(&mut self) -> Option<WorkerMessage> {
        self.receiver.recv().await
    }
}

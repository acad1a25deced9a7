//! Action dispatcher
//!
//! Performs the async work `App` asks for on spawned tokio tasks and
//! reports back over an unbounded channel drained by the event loop.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::TmdbClient;
use crate::app::{Action, AppEvent};
use crate::catalog;
use crate::config::Session;
use crate::launcher;

pub struct Runtime {
    client: Arc<TmdbClient>,
    base_url: String,
    tx: UnboundedSender<AppEvent>,
    preview_task: Option<JoinHandle<()>>,
}

impl Runtime {
    /// New runtime plus the receiving end of its event channel
    pub fn new(client: TmdbClient) -> (Self, UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let base_url = client.session().base_url.clone();
        let runtime = Self {
            client: Arc::new(client),
            base_url,
            tx,
            preview_task: None,
        };
        (runtime, rx)
    }

    pub fn client(&self) -> &TmdbClient {
        &self.client
    }

    /// Perform an action
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::LoadCatalog(ticket) => {
                let client = self.client.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let outcome = catalog::load(&client, &ticket.query).await;
                    let _ = tx.send(AppEvent::CatalogLoaded { ticket, outcome });
                });
            }

            Action::OpenPreview(ticket) => {
                // Only one preview fetch at a time
                if let Some(task) = self.preview_task.take() {
                    if !task.is_finished() {
                        debug!("aborting superseded preview fetch");
                        task.abort();
                    }
                }

                let client = self.client.clone();
                let tx = self.tx.clone();
                self.preview_task = Some(tokio::spawn(async move {
                    let result = client.preview(ticket.movie_id).await;
                    let _ = tx.send(AppEvent::PreviewLoaded { ticket, result });
                }));
            }

            Action::Reconnect { credentials, reload } => {
                info!(mode = %credentials.default_mode(), "rebuilding API client");
                self.client = Arc::new(TmdbClient::new(Session::new(credentials, self.base_url.clone())));
                self.dispatch(Action::LoadCatalog(reload));
            }

            Action::Launch { target, url } => {
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    if let Err(e) = launcher::launch(target, &url).await {
                        warn!(error = %e, %target, "launch failed");
                        let _ = tx.send(AppEvent::LaunchFailed(e.to_string()));
                    }
                });
            }
        }
    }
}

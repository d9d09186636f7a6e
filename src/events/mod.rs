use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Events emitted after a committed ledger mutation. Consumers (audit log,
/// future notification hooks) observe state changes without being in the
/// write path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    AssetIssued {
        transaction_id: i64,
        entity_id: i64,
        asset_id: String,
    },
    AccessoryIssued {
        transaction_id: i64,
        entity_id: i64,
        asset_id: String,
    },
    AssetReturned {
        transaction_id: i64,
        entity_id: i64,
        asset_id: String,
    },
    AccessoryReturned {
        transaction_id: i64,
        entity_id: i64,
        asset_id: String,
    },
    DocumentPrinted {
        document_id: i64,
        file_name: String,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when the receiver is gone.
    /// Events are observability, not correctness; the ledger write that
    /// preceded them has already committed.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!("Event dropped: {}", e);
        }
    }
}

/// Drains the event channel, logging each event as it arrives.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::AssetIssued {
                transaction_id,
                entity_id,
                asset_id,
            } => {
                info!(transaction_id, entity_id, asset_id = %asset_id, "asset issued");
            }
            Event::AccessoryIssued {
                transaction_id,
                entity_id,
                asset_id,
            } => {
                info!(transaction_id, entity_id, asset_id = %asset_id, "accessory issued");
            }
            Event::AssetReturned {
                transaction_id,
                entity_id,
                asset_id,
            } => {
                info!(transaction_id, entity_id, asset_id = %asset_id, "asset returned");
            }
            Event::AccessoryReturned {
                transaction_id,
                entity_id,
                asset_id,
            } => {
                info!(transaction_id, entity_id, asset_id = %asset_id, "accessory returned");
            }
            Event::DocumentPrinted {
                document_id,
                file_name,
            } => {
                info!(document_id, file_name = %file_name, "document printed");
            }
        }
    }

    info!("Event processing loop stopped");
}

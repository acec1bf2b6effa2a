use super::DispatchScheduler;
use crate::error::Error;
use axum::async_trait;
use bson::oid::ObjectId;
use std::{collections::HashMap, sync::Arc};
use time::OffsetDateTime;
use tokio::{
    sync::{mpsc, Mutex},
    task::AbortHandle,
};

/// In process scheduler backed by the tokio timer. Immediate
/// dispatches go straight to the queue drained by
/// [DispatchWorker](super::DispatchWorker); deferred ones sleep on a
/// task that is kept around so it can be withdrawn.
pub struct TokioDispatchScheduler {
    tx: mpsc::UnboundedSender<ObjectId>,
    deferred: Arc<Mutex<HashMap<ObjectId, AbortHandle>>>,
}

impl TokioDispatchScheduler {
    ///
    /// ### Returns
    /// the scheduler and the queue end consumed by
    /// [DispatchWorker](super::DispatchWorker)
    ///
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ObjectId>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            tx,
            deferred: Arc::new(Mutex::new(HashMap::new())),
        };

        (scheduler, rx)
    }
}

#[async_trait]
impl DispatchScheduler for TokioDispatchScheduler {
    async fn schedule(&self, id: ObjectId, at: Option<OffsetDateTime>) -> Result<(), Error> {
        let delay = at
            .map(|at| at - OffsetDateTime::now_utc())
            .filter(|delay| delay.is_positive());

        let Some(delay) = delay else {
            tracing::debug!(id = id.to_hex(), "queueing immediate dispatch");
            return self
                .tx
                .send(id)
                .map_err(|_| Error::Scheduling("dispatch queue closed"));
        };

        tracing::debug!(id = id.to_hex(), %delay, "deferring dispatch");

        let tx = self.tx.clone();
        let deferred = Arc::clone(&self.deferred);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay.unsigned_abs()).await;
            deferred.lock().await.remove(&id);
            if tx.send(id).is_err() {
                tracing::error!(
                    id = id.to_hex(),
                    "dispatch queue closed, deferred notification dropped",
                );
            }
        });

        let replaced = self
            .deferred
            .lock()
            .await
            .insert(id, handle.abort_handle());
        if let Some(replaced) = replaced {
            replaced.abort();
        }

        Ok(())
    }

    async fn withdraw(&self, id: ObjectId) -> bool {
        match self.deferred.lock().await.remove(&id) {
            Some(handle) => {
                handle.abort();
                tracing::info!(id = id.to_hex(), "withdrew deferred dispatch");
                true
            }
            None => false,
        }
    }
}

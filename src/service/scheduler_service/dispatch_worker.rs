use crate::service::notifications_service::NotificationsService;
use bson::oid::ObjectId;
use std::sync::Arc;
use tokio::sync::{mpsc, Notify};

/// Drains the dispatch queue fed by
/// [TokioDispatchScheduler](super::TokioDispatchScheduler) and runs
/// each dispatch to completion.
pub struct DispatchWorker {
    rx: mpsc::UnboundedReceiver<ObjectId>,
    notifications_service: Arc<dyn NotificationsService>,
}

impl DispatchWorker {
    pub fn new(
        rx: mpsc::UnboundedReceiver<ObjectId>,
        notifications_service: Arc<dyn NotificationsService>,
    ) -> Self {
        Self {
            rx,
            notifications_service,
        }
    }

    #[tracing::instrument(name = "Dispatch Worker", skip_all)]
    pub async fn run(mut self, close_notify: Arc<Notify>) {
        loop {
            tokio::select! {
                biased;

                // Wait for signal to close
                _ = close_notify.notified() => break,

                id = self.rx.recv() => {
                    let Some(id) = id else { break };

                    if let Err(err) = self.notifications_service.dispatch_notification(id).await {
                        tracing::error!(id = id.to_hex(), err = %err, "dispatch failed");
                    }
                }
            }
        }

        tracing::info!("dispatch worker closed");
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::service::notifications_service::MockNotificationsService;
    use std::time::Duration;

    #[tokio::test]
    async fn queued_notification_is_dispatched() {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ObjectId::new();

        let (dispatched_tx, mut dispatched_rx) = mpsc::unbounded_channel();
        let mut notifications_service = MockNotificationsService::new();
        notifications_service
            .expect_dispatch_notification()
            .returning(move |id| {
                dispatched_tx.send(id).unwrap();
                Ok(())
            });

        let worker = DispatchWorker::new(rx, Arc::new(notifications_service));
        let close_notify = Arc::new(Notify::new());
        let worker_task = tokio::spawn(worker.run(close_notify.clone()));

        tx.send(id).unwrap();

        let dispatched = tokio::time::timeout(Duration::from_secs(1), dispatched_rx.recv())
            .await
            .unwrap();
        assert_eq!(dispatched, Some(id));

        close_notify.notify_one();
        worker_task.await.unwrap();
    }

    #[tokio::test]
    async fn dispatch_error_does_not_stop_the_worker() {
        let (tx, rx) = mpsc::unbounded_channel();

        let (dispatched_tx, mut dispatched_rx) = mpsc::unbounded_channel();
        let mut notifications_service = MockNotificationsService::new();
        notifications_service
            .expect_dispatch_notification()
            .returning(move |id| {
                dispatched_tx.send(id).unwrap();
                Err(crate::error::Error::NotificationNotExist)
            });

        let worker = DispatchWorker::new(rx, Arc::new(notifications_service));
        let close_notify = Arc::new(Notify::new());
        let worker_task = tokio::spawn(worker.run(close_notify.clone()));

        tx.send(ObjectId::new()).unwrap();
        tx.send(ObjectId::new()).unwrap();

        for _ in 0..2 {
            let dispatched = tokio::time::timeout(Duration::from_secs(1), dispatched_rx.recv())
                .await
                .unwrap();
            assert!(dispatched.is_some());
        }

        close_notify.notify_one();
        worker_task.await.unwrap();
    }

    #[tokio::test]
    async fn closed_queue_stops_the_worker() {
        let (tx, rx) = mpsc::unbounded_channel::<ObjectId>();
        let worker = DispatchWorker::new(rx, Arc::new(MockNotificationsService::new()));
        let close_notify = Arc::new(Notify::new());
        let worker_task = tokio::spawn(worker.run(close_notify));

        drop(tx);

        tokio::time::timeout(Duration::from_secs(1), worker_task)
            .await
            .unwrap()
            .unwrap();
    }
}

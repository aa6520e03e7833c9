use std::sync::Arc;

use alerta_api::{EventDispatchResponse, OutcomeReason, OwnerOutcome, SensorEventRequest};
use futures::future::join_all;
use time::OffsetDateTime;
use tracing::{debug, error, info, warn};

use super::{DeviceRegistry, EventRecorder, NotificationDispatcher, ScheduleEvaluator};
use crate::errors::ApiError;
use crate::models::Device;

/// Runs one sensor event through resolve, evaluate, record and dispatch.
///
/// Owners are processed on their own tasks: a failure for one owner never
/// reaches another, and work already started keeps running if the caller
/// goes away.
#[derive(Clone)]
pub struct EventPipeline {
    registry: Arc<DeviceRegistry>,
    evaluator: Arc<ScheduleEvaluator>,
    recorder: Arc<EventRecorder>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl EventPipeline {
    pub fn new(
        registry: Arc<DeviceRegistry>,
        evaluator: Arc<ScheduleEvaluator>,
        recorder: Arc<EventRecorder>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            registry,
            evaluator,
            recorder,
            dispatcher,
        }
    }

    pub async fn process(&self, event: &SensorEventRequest) -> Result<EventDispatchResponse, ApiError> {
        self.process_at(event, OffsetDateTime::now_utc()).await
    }

    pub async fn process_at(
        &self,
        event: &SensorEventRequest,
        instant: OffsetDateTime,
    ) -> Result<EventDispatchResponse, ApiError> {
        let device_id = Device::normalize_id(&event.mac);
        let owners = self.registry.resolve_owners(&device_id).await?;

        let tasks = owners.iter().map(|owner_id| {
            let pipeline = self.clone();
            let device_id = device_id.clone();
            let owner_id = owner_id.clone();
            let message = event.message.clone();

            tokio::spawn(async move {
                pipeline
                    .process_owner(&device_id, &owner_id, &message, instant)
                    .await
            })
        });

        let outcomes: Vec<OwnerOutcome> = join_all(tasks)
            .await
            .into_iter()
            .zip(owners.iter())
            .map(|(joined, owner_id)| {
                joined.unwrap_or_else(|e| {
                    error!(owner_id = %owner_id, "owner task aborted: {}", e);
                    OwnerOutcome {
                        owner_id: owner_id.clone(),
                        event_id: None,
                        recorded: false,
                        notified: false,
                        reason: None,
                        error: Some(e.to_string()),
                    }
                })
            })
            .collect();

        let response = EventDispatchResponse {
            device_id,
            considered: outcomes.len(),
            recorded: outcomes.iter().filter(|o| o.recorded).count(),
            notified: outcomes.iter().filter(|o| o.notified).count(),
            owners: outcomes,
        };

        info!(
            device_id = %response.device_id,
            considered = response.considered,
            recorded = response.recorded,
            notified = response.notified,
            "sensor event processed"
        );

        Ok(response)
    }

    async fn process_owner(
        &self,
        device_id: &str,
        owner_id: &str,
        message: &str,
        instant: OffsetDateTime,
    ) -> OwnerOutcome {
        let mut outcome = OwnerOutcome {
            owner_id: owner_id.to_string(),
            event_id: None,
            recorded: false,
            notified: false,
            reason: None,
            error: None,
        };

        let permitted = match self.evaluator.permits(device_id, owner_id, instant).await {
            Ok(permitted) => permitted,
            Err(e) => return store_failure(outcome, "schedule lookup", e),
        };

        // History is unconditional, only the push depends on the schedule
        let event_id = match self.recorder.record(device_id, owner_id, message, instant).await {
            Ok(id) => id,
            Err(e) => return store_failure(outcome, "event write", e),
        };
        outcome.event_id = Some(event_id);
        outcome.recorded = true;

        if !permitted {
            debug!(device_id = %device_id, owner_id = %owner_id, "outside schedule");
            outcome.reason = Some(OutcomeReason::OutsideSchedule);
            return outcome;
        }

        let delivery = match self.dispatcher.dispatch(owner_id, device_id, message).await {
            Ok(delivery) => delivery,
            Err(e) => return store_failure(outcome, "token lookup", e),
        };

        if delivery.sent {
            if let Err(e) = self.recorder.mark_delivered(event_id).await {
                warn!(event_id, "push delivered but event flag not updated: {}", e);
            }
        }

        debug!(device_id = %device_id, owner_id = %owner_id, sent = delivery.sent, "owner dispatched");

        outcome.notified = delivery.sent;
        outcome.reason = delivery.reason;
        outcome
    }
}

fn store_failure(mut outcome: OwnerOutcome, stage: &str, e: sqlx::Error) -> OwnerOutcome {
    error!(owner_id = %outcome.owner_id, "{} failed: {}", stage, e);
    outcome.notified = false;
    outcome.reason = Some(OutcomeReason::StoreError);
    outcome.error = Some(format!("{stage} failed: {e}"));
    outcome
}

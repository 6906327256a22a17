use aws_lambda_events::event::s3::S3Event;
use serde_json::json;

use crate::adapters::object_store::ObjectStore;
use crate::adapters::queue::QueuePublisher;
use crate::log::{log_pipeline_error, log_pipeline_info};
use crate::runtime::error::PipelineError;
use crate::runtime::event::{decode_event_array, encode_event, ObjectLocation, WeatherEvent};

pub const QUEUE_NAME_VAR: &str = "QUEUE_NAME";

/// Producer configuration, resolved once at construction. A missing queue
/// name fails construction before any event is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerConfig {
    pub queue_name: String,
}

impl ProducerConfig {
    pub fn new(queue_name: impl Into<String>) -> Self {
        Self {
            queue_name: queue_name.into(),
        }
    }

    pub fn from_env() -> Result<Self, PipelineError> {
        std::env::var(QUEUE_NAME_VAR)
            .map(Self::new)
            .map_err(|_| PipelineError::missing_config(QUEUE_NAME_VAR))
    }
}

/// Extracts the `(bucket, key)` pairs from a storage upload notification,
/// preserving record order. A record with no bucket name or object key fails
/// the whole invocation before any fetch is issued.
pub fn object_locations(event: &S3Event) -> Result<Vec<ObjectLocation>, PipelineError> {
    event
        .records
        .iter()
        .map(|record| {
            let bucket = record.s3.bucket.name.clone().ok_or_else(|| {
                PipelineError::decode("bucket name missing from upload notification record")
            })?;
            let key = record.s3.object.key.clone().ok_or_else(|| {
                PipelineError::decode("object key missing from upload notification record")
            })?;
            Ok(ObjectLocation { bucket, key })
        })
        .collect()
}

/// Handles one storage upload notification: fetches every named object,
/// decodes each as an array of weather events, flattens them in input order,
/// and publishes each event as one queue message. Returns the number of
/// events published. Any failure aborts the invocation; sends issued before
/// the failure are not rolled back.
pub fn handle_upload_notification(
    records: &[ObjectLocation],
    config: &ProducerConfig,
    store: &impl ObjectStore,
    publisher: &impl QueuePublisher,
) -> Result<usize, PipelineError> {
    log_pipeline_info(
        "producer",
        "notification_received",
        json!({
            "object_count": records.len(),
            "queue_name": config.queue_name.clone(),
        }),
    );

    match publish_events(records, config, store, publisher) {
        Ok(count) => {
            println!(
                "Published {} weather events to {}",
                count, config.queue_name
            );
            log_pipeline_info(
                "producer",
                "events_published",
                json!({
                    "queue_name": config.queue_name.clone(),
                    "event_count": count,
                }),
            );
            Ok(count)
        }
        Err(error) => {
            log_pipeline_error(
                "producer",
                "notification_failed",
                json!({
                    "queue_name": config.queue_name.clone(),
                    "error": error.to_string(),
                }),
            );
            Err(error)
        }
    }
}

fn publish_events(
    records: &[ObjectLocation],
    config: &ProducerConfig,
    store: &impl ObjectStore,
    publisher: &impl QueuePublisher,
) -> Result<usize, PipelineError> {
    let mut events: Vec<WeatherEvent> = Vec::new();
    for record in records {
        let bytes = store
            .fetch_object(&record.bucket, &record.key)
            .map_err(|message| PipelineError::fetch(&record.bucket, &record.key, message))?;
        events.extend(decode_event_array(&bytes)?);
    }

    for event in &events {
        let body = encode_event(event)?;
        log_pipeline_info(
            "producer",
            "event_send_started",
            json!({
                "queue_name": config.queue_name.clone(),
                "location_name": event.location_name.clone(),
            }),
        );
        publisher.send_message(&body).map_err(PipelineError::send)?;
    }

    Ok(events.len())
}

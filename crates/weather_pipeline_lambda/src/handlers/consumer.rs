use aws_lambda_events::event::sqs::SqsEvent;
use serde_json::json;

use crate::log::{log_pipeline_error, log_pipeline_info};
use crate::runtime::error::PipelineError;
use crate::runtime::event::{decode_event, encode_event, WeatherEvent};

pub const RECEIVED_HEADER: &str = "Received weather event from SQS:";

/// Destination for decoded weather events. The production sink writes to the
/// console; tests substitute a recording fake.
pub trait EventSink {
    fn record_event(&self, event: &WeatherEvent, canonical_body: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleEventSink;

impl EventSink for ConsoleEventSink {
    fn record_event(&self, _event: &WeatherEvent, canonical_body: &str) {
        println!("{RECEIVED_HEADER}");
        println!("{canonical_body}");
    }
}

/// Extracts the message bodies from a queue batch event, preserving delivery
/// order. A message with no body fails the whole invocation.
pub fn message_bodies(event: &SqsEvent) -> Result<Vec<String>, PipelineError> {
    event
        .records
        .iter()
        .map(|record| {
            record
                .body
                .clone()
                .ok_or_else(|| PipelineError::decode("body missing from queue message"))
        })
        .collect()
}

/// Handles one queue message batch: decodes each body as a single weather
/// event, in input order, and hands it to the sink. The first decode failure
/// aborts the invocation; events recorded before the failure stay recorded.
/// Returns the number of events consumed.
pub fn handle_message_batch(
    bodies: &[String],
    sink: &impl EventSink,
) -> Result<usize, PipelineError> {
    match consume_events(bodies, sink) {
        Ok(count) => {
            log_pipeline_info(
                "consumer",
                "events_consumed",
                json!({ "event_count": count }),
            );
            Ok(count)
        }
        Err(error) => {
            log_pipeline_error(
                "consumer",
                "batch_failed",
                json!({ "error": error.to_string() }),
            );
            Err(error)
        }
    }
}

fn consume_events(bodies: &[String], sink: &impl EventSink) -> Result<usize, PipelineError> {
    for body in bodies {
        let event = decode_event(body)?;
        let canonical_body = encode_event(&event)?;
        sink.record_event(&event, &canonical_body);
    }

    Ok(bodies.len())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct RecordingSink {
        records: Mutex<Vec<(WeatherEvent, String)>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                records: Mutex::new(Vec::new()),
            }
        }

        fn records(&self) -> Vec<(WeatherEvent, String)> {
            self.records.lock().expect("poisoned mutex").clone()
        }
    }

    impl EventSink for RecordingSink {
        fn record_event(&self, event: &WeatherEvent, canonical_body: &str) {
            self.records
                .lock()
                .expect("poisoned mutex")
                .push((event.clone(), canonical_body.to_string()));
        }
    }

    fn brooklyn_body() -> String {
        "{\"locationName\":\"Brooklyn, NY\",\"temperature\":91.0,\"timestamp\":1564428897,\"longitude\":-73.99,\"latitude\":40.7}".to_string()
    }

    fn oxford_body() -> String {
        "{\"locationName\":\"Oxford, UK\",\"temperature\":64.0,\"timestamp\":1564428898,\"longitude\":-1.25,\"latitude\":51.75}".to_string()
    }

    #[test]
    fn consumes_every_body_in_delivery_order() {
        let sink = RecordingSink::new();
        let bodies = vec![brooklyn_body(), oxford_body()];

        let count = handle_message_batch(&bodies, &sink).expect("batch should consume");

        assert_eq!(count, 2);
        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0.location_name, "Brooklyn, NY");
        assert_eq!(records[0].1, brooklyn_body());
        assert_eq!(records[1].0.location_name, "Oxford, UK");
        assert_eq!(records[1].1, oxford_body());
    }

    #[test]
    fn canonical_body_matches_decoded_record() {
        let sink = RecordingSink::new();
        let bodies = vec![brooklyn_body()];

        handle_message_batch(&bodies, &sink).expect("batch should consume");

        let (event, canonical_body) = sink.records().remove(0);
        assert_eq!(event.temperature, 91.0);
        assert_eq!(event.timestamp, 1_564_428_897);
        assert_eq!(canonical_body, brooklyn_body());
    }

    #[test]
    fn malformed_body_aborts_after_earlier_records() {
        let sink = RecordingSink::new();
        let bodies = vec![brooklyn_body(), "not json".to_string(), oxford_body()];

        let error = handle_message_batch(&bodies, &sink).expect_err("malformed body should fail");

        assert!(matches!(error, PipelineError::Decode { .. }));
        assert_eq!(sink.records().len(), 1);
    }

    #[test]
    fn rejects_body_with_unexpected_field() {
        let sink = RecordingSink::new();
        let bodies = vec![
            "{\"locationName\":\"Brooklyn, NY\",\"temperature\":91.0,\"timestamp\":1564428897,\"longitude\":-73.99,\"latitude\":40.7,\"windSpeed\":12.0}".to_string(),
        ];

        let error = handle_message_batch(&bodies, &sink).expect_err("unknown field should fail");

        assert!(matches!(error, PipelineError::Decode { .. }));
        assert!(sink.records().is_empty());
    }

    #[test]
    fn message_bodies_preserve_batch_order() {
        let event: SqsEvent = serde_json::from_str(SQS_EVENT_FIXTURE).expect("fixture should parse");

        let bodies = message_bodies(&event).expect("bodies should resolve");
        assert_eq!(bodies.len(), 2);
        assert!(bodies[0].contains("Brooklyn, NY"));
        assert!(bodies[1].contains("Oxford, UK"));
    }

    #[test]
    fn message_bodies_fail_when_body_is_absent() {
        let mut event: SqsEvent =
            serde_json::from_str(SQS_EVENT_FIXTURE).expect("fixture should parse");
        event.records[0].body = None;

        let error = message_bodies(&event).expect_err("missing body should fail");
        assert!(matches!(error, PipelineError::Decode { .. }));
    }

    const SQS_EVENT_FIXTURE: &str = r#"{
        "Records": [
            {
                "messageId": "19dd0b57-b21e-4ac1-bd88-01bbb068cb78",
                "receiptHandle": "MessageReceiptHandle",
                "body": "{\"locationName\":\"Brooklyn, NY\",\"temperature\":91.0,\"timestamp\":1564428897,\"longitude\":-73.99,\"latitude\":40.7}",
                "attributes": {},
                "messageAttributes": {},
                "md5OfBody": "7b270e59b47ff90a553787216d55d91d",
                "eventSource": "aws:sqs",
                "eventSourceARN": "arn:aws:sqs:us-east-1:123456789012:weather-event-queue",
                "awsRegion": "us-east-1"
            },
            {
                "messageId": "2e1424d4-f796-459a-8184-9c92662be6da",
                "receiptHandle": "MessageReceiptHandle",
                "body": "{\"locationName\":\"Oxford, UK\",\"temperature\":64.0,\"timestamp\":1564428898,\"longitude\":-1.25,\"latitude\":51.75}",
                "attributes": {},
                "messageAttributes": {},
                "md5OfBody": "7b270e59b47ff90a553787216d55d91e",
                "eventSource": "aws:sqs",
                "eventSourceARN": "arn:aws:sqs:us-east-1:123456789012:weather-event-queue",
                "awsRegion": "us-east-1"
            }
        ]
    }"#;
}

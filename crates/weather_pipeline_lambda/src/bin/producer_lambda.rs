use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde::Serialize;
use weather_pipeline_lambda::adapters::object_store::ObjectStore;
use weather_pipeline_lambda::adapters::queue::QueuePublisher;
use weather_pipeline_lambda::handlers::producer::{
    handle_upload_notification, object_locations, ProducerConfig,
};
use weather_pipeline_lambda::runtime::event::DELIVERY_DELAY_SECONDS;

struct S3WeatherStore {
    s3_client: aws_sdk_s3::Client,
}

impl ObjectStore for S3WeatherStore {
    fn fetch_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, String> {
        let bucket = bucket.to_string();
        let object_key = key.to_string();
        let client = self.s3_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let object = client
                    .get_object()
                    .bucket(bucket)
                    .key(object_key)
                    .send()
                    .await
                    .map_err(|error| format!("failed to read object from s3: {error}"))?;

                let bytes = object
                    .body
                    .collect()
                    .await
                    .map_err(|error| format!("failed to read object body from s3: {error}"))?;
                Ok(bytes.into_bytes().to_vec())
            })
        })
    }
}

struct SqsQueuePublisher {
    sqs_client: aws_sdk_sqs::Client,
    queue_name: String,
}

impl QueuePublisher for SqsQueuePublisher {
    fn send_message(&self, body: &str) -> Result<(), String> {
        let client = self.sqs_client.clone();
        let queue_name = self.queue_name.clone();
        let message_body = body.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let queue_url = client
                    .get_queue_url()
                    .queue_name(queue_name)
                    .send()
                    .await
                    .map_err(|error| format!("failed to resolve queue url: {error}"))?
                    .queue_url
                    .ok_or_else(|| "queue url missing from resolution response".to_string())?;

                client
                    .send_message()
                    .queue_url(queue_url)
                    .message_body(message_body)
                    .delay_seconds(DELIVERY_DELAY_SECONDS)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to send message to sqs: {error}"))
            })
        })
    }
}

#[derive(Debug, Serialize)]
struct PublishSummary {
    status: String,
    events_published: usize,
}

async fn handle_request(
    event: LambdaEvent<S3Event>,
    config: &ProducerConfig,
    store: &S3WeatherStore,
    publisher: &SqsQueuePublisher,
) -> Result<PublishSummary, Error> {
    let records = object_locations(&event.payload).map_err(Error::from)?;
    let events_published =
        handle_upload_notification(&records, config, store, publisher).map_err(Error::from)?;

    Ok(PublishSummary {
        status: "ok".to_string(),
        events_published,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = ProducerConfig::from_env().map_err(Error::from)?;

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = S3WeatherStore {
        s3_client: aws_sdk_s3::Client::new(&aws_config),
    };
    let publisher = SqsQueuePublisher {
        sqs_client: aws_sdk_sqs::Client::new(&aws_config),
        queue_name: config.queue_name.clone(),
    };

    let config_ref = &config;
    let store_ref = &store;
    let publisher_ref = &publisher;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<S3Event>| async move {
        handle_request(event, config_ref, store_ref, publisher_ref).await
    }))
    .await
}

use aws_lambda_events::event::sqs::SqsEvent;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde::Serialize;
use weather_pipeline_lambda::handlers::consumer::{
    handle_message_batch, message_bodies, ConsoleEventSink,
};

#[derive(Debug, Serialize)]
struct ConsumeSummary {
    status: String,
    events_consumed: usize,
}

async fn handle_request(event: LambdaEvent<SqsEvent>) -> Result<ConsumeSummary, Error> {
    let bodies = message_bodies(&event.payload).map_err(Error::from)?;
    let events_consumed =
        handle_message_batch(&bodies, &ConsoleEventSink).map_err(Error::from)?;

    Ok(ConsumeSummary {
        status: "ok".to_string(),
        events_consumed,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}

pub trait QueuePublisher {
    fn send_message(&self, body: &str) -> Result<(), String>;
}

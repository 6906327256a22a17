pub trait ObjectStore {
    /// Returns the full content of the object at `(bucket, key)`. The
    /// underlying byte stream is owned by the adapter and released before
    /// this call returns, on every exit path.
    fn fetch_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, String>;
}

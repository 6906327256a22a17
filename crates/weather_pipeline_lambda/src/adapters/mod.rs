pub mod object_store;
pub mod queue;

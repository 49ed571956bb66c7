pub mod network;
pub mod platform;
pub mod sampler;
pub mod snapshot;
pub mod source;
pub mod users;

pub mod async_channel;
pub mod blocking_channel;

//! Ports implemented by the infrastructure layer

mod client;

pub use client::{
    ApiResult, CategoryClient, ChannelClient, PostClient, PreferenceClient, StatusClient,
};

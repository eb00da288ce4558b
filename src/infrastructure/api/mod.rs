//! CuraMetric backend adapter.

mod client;
mod dto;

pub use client::CurametricClient;

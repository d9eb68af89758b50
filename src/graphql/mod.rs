pub mod client;
pub mod documents;
pub mod locations;

pub use client::{GraphqlClient, GraphqlRequest, GraphqlTransport, HttpTransport};

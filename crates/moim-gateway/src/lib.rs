//! # moim-gateway
//!
//! WebSocket gateway for real-time gathering chat.

pub mod broadcast;
pub mod server;

pub use server::{create_app, create_gateway_state, run, run_server, GatewayState};

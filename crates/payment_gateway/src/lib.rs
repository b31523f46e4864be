//! HTTP client for a Razorpay-compatible orders API.
//!
//! Implements [`engine::PaymentGateway`] so the engine can create orders and
//! verify their status server side.

pub use error::GatewayError;
pub use razorpay::{RazorpayClient, RazorpayConfig};

mod error;
mod razorpay;

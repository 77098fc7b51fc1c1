//! Credit approval engine: customer registration, credit scoring, loan eligibility, and
//! loan issuance, plus the configuration, telemetry, and error plumbing the API service uses.

pub mod config;
pub mod error;
pub mod lending;
pub mod telemetry;

//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers:
//! eligibility checking, key generation, idempotent issuance, verification.

pub mod license_service;

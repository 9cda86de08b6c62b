//! Horizon REST API client.
//!
//! Horizon is the HTTP front end of a Stellar network. This module provides
//! account lookup, fee stats and transaction submission, and implements the
//! [`AccountService`](crate::service::AccountService) and
//! [`SubmissionService`](crate::service::SubmissionService) seams on top of them.
//!
//! # Error Handling
//!
//! All methods return `HorizonResult<T>`. Failed submissions come back as
//! [`HorizonError::TransactionFailed`] carrying Horizon's result codes:
//!
//! ```rust,ignore
//! match client.submit_transaction(&envelope).await {
//!     Ok(tx) => println!("Applied in ledger {:?}", tx.ledger),
//!     Err(HorizonError::TransactionFailed(problem)) => println!("Rejected: {}", problem),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```

pub mod client;
pub mod error;
pub mod types;

// Re-export main types for convenience
pub use client::{HorizonClient, HorizonClientBuilder};
pub use error::{HorizonError, HorizonResult, Problem, ProblemExtras, ResultCodes};
pub use types::*;

//! Request service: settings, input, and execution.

mod input;
mod service;
mod settings;

pub use input::{RequestFailure, RequestInput, RequestOutput};
pub use service::{normalize, prepare_arguments, prepare_transient, TransactionService, NO_DATA, TRANSACTION_FAILED};
pub use settings::{JsonType, Parameter, RequestSettings};

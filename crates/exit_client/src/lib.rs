//! Client for the exit-request approval service: session state, the HTTP
//! gateway, the request lifecycle rules and the view models built on them.

pub mod api;
pub mod controller;
pub mod error;
pub mod lifecycle;
pub mod session;
pub mod validation;
pub mod view;

pub use api::{ActionReceipt, ApprovalApi, HttpApprovalApi, DEFAULT_API_BASE};
pub use controller::{
    ActionOutcome, AdminOverview, ApprovalController, ClientEvent, LoginOutcome,
};
pub use error::{ClientError, Notice, NoticeLevel, ValidationError};
pub use lifecycle::{ActionPlan, StudentStatus};
pub use session::{Identity, SessionStore};

#[cfg(test)]
#[path = "tests/lifecycle_tests.rs"]
mod lifecycle_tests;

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod validation_tests;

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod api_tests;

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod controller_tests;

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod view_tests;

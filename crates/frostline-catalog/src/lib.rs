//! Remote catalog adapter.
//!
//! [`Catalog`] turns typed requests into statements via `frostline_core::ddl`, sends them
//! through a [`SqlHandle`] and parses what comes back. A missing object is a value here
//! (`None` or [`Applied::ObjectMissing`]), never an error.

pub mod account;
pub mod catalog;
pub mod context;
pub mod handle;
pub mod masking_policy;
pub mod references;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use account::AccountRow;
pub use catalog::{Applied, Catalog};
pub use context::Context;
pub use handle::{RemoteError, Row, SqlHandle, OBJECT_DOES_NOT_EXIST};
pub use masking_policy::{parse_signature, MaskingPolicyDescription, MaskingPolicyRow};
pub use references::PolicyReference;

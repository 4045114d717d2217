//! Core of the frostline warehouse provider.
//!
//! This crate holds everything that does not talk to the remote:
//!
//! - identifier model with pipe / SQL / dotted encodings ([`ident`])
//! - data-type parsing and equivalence ([`datatype`])
//! - DDL synthesis for masking policies, tag attachments, column applications and
//!   accounts ([`ddl`])
//! - diff-suppression predicates and input validation ([`suppress`], [`validate`])
//! - the persisted state envelope and its upgrade pipeline ([`state`], [`upgrade`])
//!
//! # Quick Start
//!
//! ```
//! use frostline_core::SchemaObjectIdentifier;
//! use frostline_core::ddl::masking_policy;
//!
//! let id = SchemaObjectIdentifier::parse_pipe("database_name|schema_name|policy_name").unwrap();
//! assert_eq!(
//!     masking_policy::drop(&id, false),
//!     r#"DROP MASKING POLICY "database_name"."schema_name"."policy_name""#
//! );
//! ```

pub mod config;
pub mod datatype;
pub mod ddl;
pub mod diagnostic;
pub mod error;
pub mod ident;
pub mod redact;
pub mod state;
pub mod suppress;
pub mod upgrade;
pub mod validate;

pub use config::ProviderConfig;
pub use datatype::{DataType, DataTypeFamily};
pub use diagnostic::{Diagnostic, Severity};
pub use error::{ErrorKind, ProviderError, ProviderResult};
pub use ident::{
    Ident, SchemaIdentifier, SchemaObjectIdentifier, TableColumnIdentifier,
    TagMaskingPolicyIdentifier,
};
pub use redact::redact_statement;
pub use state::{AttributeMap, StateEnvelope};
pub use suppress::{SuppressContext, SuppressFn};
pub use upgrade::{StateUpgrader, UpgradeStep};

//! Resource controllers for frostline.
//!
//! - [`schema`]: per-attribute planning rules
//! - [`plan`]: create / no-op / update / replace classification
//! - [`resources`]: Create, Read, Update and Delete per resource kind
//! - [`provider`]: host-facing entry points returning state plus diagnostics

pub mod attrs;
pub mod data;
pub mod plan;
pub mod provider;
pub mod resources;
pub mod schema;

pub use data::ResourceData;
pub use plan::{AttributeChange, Plan, PlanAction};
pub use provider::{Outcome, Provider};
pub use resources::{Resource, ResourceKind};
pub use schema::{AttributeSchema, ResourceSchema};

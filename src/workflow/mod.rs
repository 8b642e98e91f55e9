//! Generic request workflows driven by per-entity descriptors.
//!
//! - [`create::CreateWorkflow`]: authorize, validate shape, check parents,
//!   check natural key, insert.
//! - [`list::ListWorkflow`]: optional single filter, fixed sort.
//! - [`patch::PatchWorkflow`]: whitelisted sparse update.

pub mod create;
pub mod descriptor;
pub mod error;
pub mod list;
pub mod patch;
pub mod shape;

pub use create::CreateWorkflow;
pub use descriptor::{
    CreateSpec, EntityDescriptor, Field, FieldKind, ListFilter, ListSpec, ParentRef, PatchSpec, UniqueKey,
};
pub use error::WorkflowError;
pub use list::ListWorkflow;
pub use patch::{PatchPlan, PatchWorkflow};

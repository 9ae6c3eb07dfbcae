//! In-process engine surface the validation callbacks plug into: handles,
//! callback chains, per-write scopes and the resource trait.

pub mod callbacks;
pub mod handle;
pub mod resource;
pub mod scope;

pub use callbacks::{CallbackFn, Callbacks, Chain, Operation};
pub use handle::{Handle, JournalEntry, WriteError, WriteOptions};
pub use resource::Resource;
pub use scope::{Errors, Scope};

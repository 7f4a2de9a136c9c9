//! Resource payloads
//!
//! One payload per resource kind, each wrapped by the uniform
//! [`Resource`](reclaim_storage::Resource) and reached through a
//! [`Handle`](reclaim_storage::Handle):
//! - **DatabaseData**: name + collections index
//! - **CollectionData**: name + documents index + parent database pointer
//! - **DocumentData**: one immutable document revision + parent collection pointer
//!
//! ## Parent pointers
//!
//! Parents are held as `Weak` and used for lookup only. A child never keeps
//! its parent alive and a parent handle never keeps a dropped child alive.
//!
//! ## Writes after drop
//!
//! Every write and every child lookup checks the owner's state while holding
//! the owner's index lock, after which the drop coordinator can no longer
//! miss a freshly inserted child.

pub mod collection;
pub mod database;
pub mod document;

pub use collection::{CollectionData, CollectionHandle, DocumentMeta};
pub use database::{DatabaseData, DatabaseHandle};
pub use document::{DocumentData, DocumentHandle};

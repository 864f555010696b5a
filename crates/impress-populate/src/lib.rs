//! impress-populate: read-path joins over a normalized state tree.
//!
//! Synchronized state is stored normalized: every record lives once under
//! `data/<collection>/<id>`, and cross references are foreign keys. This crate
//! turns such a tree into denormalized views by replacing foreign keys with the
//! records they point at, driven by [`JoinDescriptor`]s.
//!
//! ```
//! use impress_populate::{populate, JoinDescriptor, PopulateConfig};
//! use serde_json::json;
//!
//! let store = json!({
//!     "data": {
//!         "todos": { "1": { "owner": "u1", "text": "x" } },
//!         "users": { "u1": { "name": "Amy" } }
//!     }
//! });
//! let joins = PopulateConfig::from(vec![JoinDescriptor::new("owner", "users")]);
//! let todos = populate(&store, "todos", &joins, json!(null));
//! assert_eq!(todos, json!({ "1": { "owner": { "name": "Amy" }, "text": "x" } }));
//! ```

pub mod child;
pub mod descriptor;
pub mod error;
pub mod layout;
pub mod merge;
pub mod path;
pub mod populate;
pub mod predicates;

pub use child::*;
pub use descriptor::*;
pub use error::*;
pub use layout::*;
pub use merge::*;
pub use path::*;
pub use populate::*;
pub use predicates::*;

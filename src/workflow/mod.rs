//! The two end-to-end workflows.
//!
//! - [`deploy`] - tear down whatever exists, apply, update SSH config
//! - [`destroy`] - ordered teardown with retries and escalation

mod deploy;
mod destroy;

pub use deploy::{deploy, resolve_private_key, DeployReport};
pub use destroy::{destroy, DestroyReport};

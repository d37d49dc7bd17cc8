//! `mailer` crate — the outbound email seam.
//!
//! The engine dispatches through the [`EmailSender`] trait object; the
//! production implementation posts to the remote send function, and
//! [`mock::MockMailer`] records calls for tests.

pub mod error;
pub mod traits;
pub mod function;
pub mod mock;

pub use error::SendError;
pub use traits::{EmailSender, OutboundEmail};
pub use function::FunctionMailer;

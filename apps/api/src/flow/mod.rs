//! The cancellation wizard: steps, screens and the backend client it drives.

pub mod client;
pub mod step;
pub mod view;
pub mod wizard;

pub use client::{CancelApi, HttpCancelClient};
pub use step::{Action, FlowExit, FlowStep, Reason};
pub use wizard::CancelFlow;

//! The FileProcessor stack.
//!
//! A bucket whose object-created events invoke a function that writes to a
//! streaming DynamoDB table. [`FileProcessor`] declares the resources and
//! wires them together; [`run`] is the program entry that reads the stack
//! configuration and builds the component.

mod component;
mod policies;
mod program;

pub use component::{FileProcessor, FileProcessorArgs};
pub use program::{COMPONENT_NAME, declare, run};

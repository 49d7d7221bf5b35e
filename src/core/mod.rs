// Core modules implementing the value model, timestamps, and error modeling.
pub mod error;
pub mod timestamp;
pub mod value;

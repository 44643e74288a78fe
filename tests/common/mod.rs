#![allow(dead_code)]

pub mod builders;
pub mod failing_provider;

pub use builders::*;
pub use failing_provider::*;

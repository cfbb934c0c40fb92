//! Application module

pub mod cli;
pub mod feedback;
pub mod startup;

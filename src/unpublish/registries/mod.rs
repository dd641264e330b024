//! Registry implementations for reading and writing packuments

pub mod npm;

pub use npm::NpmRegistry;

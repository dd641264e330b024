pub mod registry;

#[allow(unused_imports)]
pub use registry::{Call, FakeRegistry, FixedOtp, packument};

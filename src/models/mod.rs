pub mod generator_params;
pub mod platform;
pub mod severity;
pub mod test_case;

pub use generator_params::GeneratorParams;
pub use platform::Platform;
pub use severity::Severity;
pub use test_case::TestCase;

pub mod audit;
pub mod export;
pub mod form;
pub mod preview;

pub use audit::*;
pub use export::*;
pub use form::*;
pub use preview::*;

pub mod direction;
pub mod engine;
pub mod error;
pub mod factory;
pub mod interface;
pub mod remote;

pub use direction::Direction;
pub use engine::TranslationEngine;
pub use error::TranslateError;
pub use interface::{TranslateRequest, TranslateResponse, TranslationModel};

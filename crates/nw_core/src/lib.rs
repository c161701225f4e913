pub mod config;
pub mod dates;
pub mod error;
pub mod types;

pub use config::{Config, Language};
pub use error::{Error, Result};
pub use types::{Article, PLACEHOLDER_IMAGE, SOURCE_URL_SENTINEL};

pub mod prelude {
    pub use crate::{Article, Config, Error, Result};
}

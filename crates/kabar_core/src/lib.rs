pub mod error;
pub mod source;
pub mod time;
pub mod types;

pub use error::{Error, ErrorClass, Result};
pub use source::NewsSource;
pub use time::{now_wib, wib};
pub use types::{Article, ArticleDetail};

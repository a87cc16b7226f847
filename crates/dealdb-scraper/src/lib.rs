pub mod error;
pub mod extract;
pub mod fetch;
pub mod normalize;

pub use error::ScraperError;
pub use extract::extract_items;
pub use fetch::{FetchSettings, PageFetcher};
pub use normalize::{clean_and_parse, discount_percent, normalize_item, MIN_DISCOUNT_PERCENT};

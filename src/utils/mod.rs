pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{absolutize_href, is_valid_url, origin_of, strip_query};

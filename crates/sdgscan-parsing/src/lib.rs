pub mod heading;
pub mod sanitize;
pub mod section;

pub use heading::{STOP_HEADINGS, StopHeading, StopHeadingMatch, find_abstract_marker};
pub use heading::{find_stop_heading, find_stop_heading_match};
pub use sanitize::{is_denylisted, sanitize};
pub use section::{
    ABSTRACT_WORD_LIMIT, ExtractedAbstract, ExtractionTier, extract_abstract,
    extract_abstract_detailed,
};

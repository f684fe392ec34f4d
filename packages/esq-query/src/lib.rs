//! Search request building: a criteria algebra for filters and queries, sort and paging options,
//! and the formatter that renders them into a `/_search` POST body.

pub mod combinators;
pub mod criteria;
pub mod document;
pub mod formatter;
pub mod request;
pub mod sort;

mod error;

pub use combinators::{and, merge_ranges, not, or};
pub use criteria::{
	CompoundCriteria, Criteria, FieldCriteria, QueryStringCriteria, RangeComparison,
	RangeCriteria, RangeSpecification, RangeValue, TermCriteria,
};
pub use document::{parse_criteria_value, parse_request};
pub use error::{Error, Result};
pub use formatter::{
	PostRequest, SearchRequestFormatter, filter_value, format, query_value, sort_value,
};
pub use request::RequestSpecification;
pub use sort::{SortOption, SortOrder};

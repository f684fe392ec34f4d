use crate::{Error, Result, criteria::Criteria, sort::SortOption};

/// Everything needed to render one search request.
///
/// Built once with the `with_*` methods and then only read.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestSpecification {
	document_type: String,
	filter: Option<Criteria>,
	query: Option<Criteria>,
	sort: Vec<SortOption>,
	fields: Vec<String>,
	from: Option<u64>,
	size: Option<u64>,
}
impl RequestSpecification {
	pub fn new(document_type: impl Into<String>) -> Result<Self> {
		let document_type = document_type.into();

		if document_type.trim().is_empty() {
			return Err(Error::invalid_argument("document type must be non-empty."));
		}
		if document_type.contains('/') {
			return Err(Error::invalid_argument(format!(
				"document type '{document_type}' must not contain '/'."
			)));
		}
		if matches!(document_type.as_str(), "." | "..") {
			return Err(Error::invalid_argument(format!(
				"document type '{document_type}' must not be a dot segment."
			)));
		}

		Ok(Self {
			document_type,
			filter: None,
			query: None,
			sort: Vec::new(),
			fields: Vec::new(),
			from: None,
			size: None,
		})
	}

	pub fn with_filter(mut self, filter: Criteria) -> Self {
		self.filter = Some(filter);

		self
	}

	pub fn with_query(mut self, query: Criteria) -> Self {
		self.query = Some(query);

		self
	}

	pub fn with_sort<I>(mut self, sort: I) -> Self
	where
		I: IntoIterator<Item = SortOption>,
	{
		self.sort.extend(sort);

		self
	}

	pub fn with_fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.fields.extend(fields.into_iter().map(Into::into));

		self
	}

	pub fn with_from(mut self, from: u64) -> Self {
		self.from = Some(from);

		self
	}

	pub fn with_size(mut self, size: u64) -> Self {
		self.size = Some(size);

		self
	}

	pub fn document_type(&self) -> &str {
		&self.document_type
	}

	pub fn filter(&self) -> Option<&Criteria> {
		self.filter.as_ref()
	}

	pub fn query(&self) -> Option<&Criteria> {
		self.query.as_ref()
	}

	pub fn sort(&self) -> &[SortOption] {
		&self.sort
	}

	pub fn fields(&self) -> &[String] {
		&self.fields
	}

	pub fn from(&self) -> Option<u64> {
		self.from
	}

	pub fn size(&self) -> Option<u64> {
		self.size
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
	Ascending,
	Descending,
}
impl SortOrder {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Ascending => "asc",
			Self::Descending => "desc",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"asc" => Some(Self::Ascending),
			"desc" => Some(Self::Descending),
			_ => None,
		}
	}
}

/// One entry of the sort list.
///
/// `ignore_unmapped` lets the backend skip documents whose schema lacks the field instead of
/// failing the sort.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortOption {
	name: String,
	ascending: bool,
	ignore_unmapped: bool,
}
impl SortOption {
	pub fn new(name: impl Into<String>, ascending: bool) -> Self {
		Self { name: name.into(), ascending, ignore_unmapped: false }
	}

	pub fn ascending(name: impl Into<String>) -> Self {
		Self::new(name, true)
	}

	pub fn descending(name: impl Into<String>) -> Self {
		Self::new(name, false)
	}

	pub fn ignoring_unmapped(mut self) -> Self {
		self.ignore_unmapped = true;

		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn is_ascending(&self) -> bool {
		self.ascending
	}

	pub fn ignore_unmapped(&self) -> bool {
		self.ignore_unmapped
	}

	pub fn order(&self) -> SortOrder {
		if self.ascending { SortOrder::Ascending } else { SortOrder::Descending }
	}
}

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde_json::{Number, Value};

use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RangeComparison {
	LessThan,
	LessThanOrEqual,
	GreaterThan,
	GreaterThanOrEqual,
}
impl RangeComparison {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::LessThan => "lt",
			Self::LessThanOrEqual => "lte",
			Self::GreaterThan => "gt",
			Self::GreaterThanOrEqual => "gte",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"lt" => Some(Self::LessThan),
			"lte" => Some(Self::LessThanOrEqual),
			"gt" => Some(Self::GreaterThan),
			"gte" => Some(Self::GreaterThanOrEqual),
			_ => None,
		}
	}
}
impl Display for RangeComparison {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Scalar bound of a range comparison. Dates travel as `Text` in the backend's date format.
#[derive(Clone, Debug, PartialEq)]
pub enum RangeValue {
	Integer(i64),
	/// Integers above `i64::MAX`.
	Unsigned(u64),
	Float(f64),
	Text(String),
}
impl RangeValue {
	pub(crate) fn to_value(&self) -> Value {
		match self {
			Self::Integer(value) => Value::from(*value),
			Self::Unsigned(value) => Value::from(*value),
			// Non-finite floats never reach a constructed criteria.
			Self::Float(value) =>
				Number::from_f64(*value).map(Value::Number).unwrap_or(Value::Null),
			Self::Text(value) => Value::String(value.clone()),
		}
	}

	fn is_finite(&self) -> bool {
		match self {
			Self::Float(value) => value.is_finite(),
			_ => true,
		}
	}
}
impl Display for RangeValue {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		match self {
			Self::Integer(value) => write!(f, "{value}"),
			Self::Unsigned(value) => write!(f, "{value}"),
			Self::Float(value) => write!(f, "{value}"),
			Self::Text(value) => write!(f, "{value}"),
		}
	}
}
impl From<i64> for RangeValue {
	fn from(value: i64) -> Self {
		Self::Integer(value)
	}
}
impl From<i32> for RangeValue {
	fn from(value: i32) -> Self {
		Self::Integer(value.into())
	}
}
impl From<u32> for RangeValue {
	fn from(value: u32) -> Self {
		Self::Integer(value.into())
	}
}
impl From<u64> for RangeValue {
	fn from(value: u64) -> Self {
		i64::try_from(value).map_or(Self::Unsigned(value), Self::Integer)
	}
}
impl From<f64> for RangeValue {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}
impl From<f32> for RangeValue {
	fn from(value: f32) -> Self {
		Self::Float(value.into())
	}
}
impl From<&str> for RangeValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}
impl From<String> for RangeValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct RangeSpecification {
	comparison: RangeComparison,
	value: RangeValue,
}
impl RangeSpecification {
	pub fn new(comparison: RangeComparison, value: impl Into<RangeValue>) -> Self {
		Self { comparison, value: value.into() }
	}

	pub fn comparison(&self) -> RangeComparison {
		self.comparison
	}

	pub fn value(&self) -> &RangeValue {
		&self.value
	}
}
impl Display for RangeSpecification {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		write!(f, "{} {}", self.comparison, self.value)
	}
}

/// One node of the filter/query algebra.
///
/// Leaf variants are built through the checked constructors on this type, composites through
/// [`and`](crate::and), [`or`](crate::or) and [`not`](crate::not). Equality is structural.
#[derive(Clone, Debug, PartialEq)]
pub enum Criteria {
	Term(TermCriteria),
	Exists(FieldCriteria),
	Missing(FieldCriteria),
	Not(Box<Criteria>),
	And(CompoundCriteria),
	Or(CompoundCriteria),
	Range(RangeCriteria),
	QueryString(QueryStringCriteria),
}
impl Criteria {
	pub fn term(field: impl Into<String>, value: impl Into<String>) -> Result<Self> {
		let value: String = value.into();

		Self::terms(field, [value])
	}

	pub fn terms<I, S>(field: impl Into<String>, values: I) -> Result<Self>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let field = require_field("term", field.into())?;
		let values: Vec<String> = values.into_iter().map(Into::into).collect();

		if values.is_empty() {
			return Err(Error::invalid_argument(format!(
				"term criteria for field '{field}' requires at least one value."
			)));
		}

		Ok(Self::Term(TermCriteria { field, values }))
	}

	pub fn exists(field: impl Into<String>) -> Result<Self> {
		Ok(Self::Exists(FieldCriteria { field: require_field("exists", field.into())? }))
	}

	pub fn missing(field: impl Into<String>) -> Result<Self> {
		Ok(Self::Missing(FieldCriteria { field: require_field("missing", field.into())? }))
	}

	pub fn range<I>(field: impl Into<String>, specifications: I) -> Result<Self>
	where
		I: IntoIterator<Item = RangeSpecification>,
	{
		Ok(Self::Range(RangeCriteria::new(field, specifications)?))
	}

	pub fn query_string(query: impl Into<String>) -> Result<Self> {
		let query = query.into();

		if query.trim().is_empty() {
			return Err(Error::invalid_argument("query_string criteria requires a non-empty query."));
		}

		Ok(Self::QueryString(QueryStringCriteria { query }))
	}

	/// Wire key of this node, with single-value terms reported as `term`.
	pub fn name(&self) -> &'static str {
		match self {
			Self::Term(term) if term.is_single() => "term",
			Self::Term(_) => "terms",
			Self::Exists(_) => "exists",
			Self::Missing(_) => "missing",
			Self::Not(_) => "not",
			Self::And(_) => "and",
			Self::Or(_) => "or",
			Self::Range(_) => "range",
			Self::QueryString(_) => "query_string",
		}
	}
}
impl Display for Criteria {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		match self {
			Self::Term(term) if term.is_single() => {
				write!(f, "term {}: {}", term.field, term.values[0])
			},
			Self::Term(term) => write!(f, "terms {}: [{}]", term.field, term.values.join(", ")),
			Self::Exists(inner) => write!(f, "exists {}", inner.field),
			Self::Missing(inner) => write!(f, "missing {}", inner.field),
			Self::Not(inner) => write!(f, "not ({inner})"),
			Self::And(compound) => write_compound(f, "and", compound),
			Self::Or(compound) => write_compound(f, "or", compound),
			Self::Range(range) => {
				write!(f, "range {}: ", range.field)?;

				for (index, specification) in range.specifications.iter().enumerate() {
					if index > 0 {
						f.write_str(", ")?;
					}

					write!(f, "{specification}")?;
				}

				Ok(())
			},
			Self::QueryString(query) => write!(f, "query_string {:?}", query.query),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TermCriteria {
	field: String,
	values: Vec<String>,
}
impl TermCriteria {
	pub fn field(&self) -> &str {
		&self.field
	}

	pub fn values(&self) -> &[String] {
		&self.values
	}

	pub fn is_single(&self) -> bool {
		self.values.len() == 1
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldCriteria {
	field: String,
}
impl FieldCriteria {
	pub fn field(&self) -> &str {
		&self.field
	}
}

/// Children of an `and`/`or` node. Always holds two or more entries.
#[derive(Clone, Debug, PartialEq)]
pub struct CompoundCriteria {
	children: Vec<Criteria>,
}
impl CompoundCriteria {
	pub(crate) fn new(children: Vec<Criteria>) -> Self {
		debug_assert!(children.len() >= 2);

		Self { children }
	}

	pub fn children(&self) -> &[Criteria] {
		&self.children
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct RangeCriteria {
	field: String,
	specifications: Vec<RangeSpecification>,
}
impl RangeCriteria {
	pub fn new<I>(field: impl Into<String>, specifications: I) -> Result<Self>
	where
		I: IntoIterator<Item = RangeSpecification>,
	{
		let field = require_field("range", field.into())?;
		let mut range = Self { field, specifications: Vec::new() };

		range.extend(specifications)?;

		if range.specifications.is_empty() {
			return Err(Error::invalid_argument(format!(
				"range criteria for field '{}' requires at least one specification.",
				range.field
			)));
		}

		Ok(range)
	}

	pub fn field(&self) -> &str {
		&self.field
	}

	pub fn specifications(&self) -> &[RangeSpecification] {
		&self.specifications
	}

	pub(crate) fn extend<I>(&mut self, specifications: I) -> Result<()>
	where
		I: IntoIterator<Item = RangeSpecification>,
	{
		for specification in specifications {
			if !specification.value.is_finite() {
				return Err(Error::invalid_argument(format!(
					"range criteria for field '{}' has a non-finite {} bound.",
					self.field, specification.comparison
				)));
			}
			if self
				.specifications
				.iter()
				.any(|existing| existing.comparison == specification.comparison)
			{
				return Err(Error::invalid_argument(format!(
					"range criteria for field '{}' has more than one '{}' specification.",
					self.field, specification.comparison
				)));
			}

			self.specifications.push(specification);
		}

		Ok(())
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryStringCriteria {
	query: String,
}
impl QueryStringCriteria {
	pub fn query(&self) -> &str {
		&self.query
	}
}

fn require_field(kind: &str, field: String) -> Result<String> {
	if field.trim().is_empty() {
		return Err(Error::invalid_argument(format!("{kind} criteria requires a non-empty field.")));
	}

	Ok(field)
}

fn write_compound(f: &mut Formatter<'_>, op: &str, compound: &CompoundCriteria) -> FmtResult {
	write!(f, "{op} (")?;

	for (index, child) in compound.children.iter().enumerate() {
		if index > 0 {
			f.write_str(", ")?;
		}

		write!(f, "{child}")?;
	}

	f.write_str(")")
}

use crate::{
	Error, Result,
	criteria::{CompoundCriteria, Criteria, RangeCriteria},
};

/// Combines criteria so that all of them must match.
///
/// A single operand is returned unchanged instead of being wrapped.
pub fn and<I>(criteria: I) -> Result<Criteria>
where
	I: IntoIterator<Item = Criteria>,
{
	compound("and", criteria, |children| Criteria::And(CompoundCriteria::new(children)))
}

/// Combines criteria so that any of them may match. Collapses like [`and`].
pub fn or<I>(criteria: I) -> Result<Criteria>
where
	I: IntoIterator<Item = Criteria>,
{
	compound("or", criteria, |children| Criteria::Or(CompoundCriteria::new(children)))
}

/// Negates a criteria. Nested negations are kept as written.
pub fn not(criteria: Criteria) -> Criteria {
	Criteria::Not(Box::new(criteria))
}

/// Folds range criteria into one range per field, keeping fields in first-seen order.
///
/// Only `Range` operands are accepted, and a comparison may appear once per field across all of
/// them. `and`/`or` never do this on their own, so callers merge before combining.
pub fn merge_ranges<I>(ranges: I) -> Result<Vec<Criteria>>
where
	I: IntoIterator<Item = Criteria>,
{
	let mut merged: Vec<RangeCriteria> = Vec::new();

	for criteria in ranges {
		let range = match criteria {
			Criteria::Range(range) => range,
			other => {
				return Err(Error::invalid_argument(format!(
					"merge_ranges accepts only range criteria, got '{}'.",
					other.name()
				)));
			},
		};

		match merged.iter_mut().find(|existing| existing.field() == range.field()) {
			Some(existing) => existing.extend(range.specifications().iter().cloned())?,
			None => merged.push(range),
		}
	}

	Ok(merged.into_iter().map(Criteria::Range).collect())
}

fn compound<I, F>(op: &str, criteria: I, wrap: F) -> Result<Criteria>
where
	I: IntoIterator<Item = Criteria>,
	F: FnOnce(Vec<Criteria>) -> Criteria,
{
	let mut children: Vec<Criteria> = criteria.into_iter().collect();

	match children.len() {
		0 => Err(Error::invalid_argument(format!("{op} requires at least one operand"))),
		1 => Ok(children.remove(0)),
		_ => Ok(wrap(children)),
	}
}

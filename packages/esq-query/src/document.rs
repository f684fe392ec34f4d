//! Reads a JSON request document into a [`RequestSpecification`].
//!
//! Criteria use the same shapes the formatter writes, so a rendered body can be read back:
//!
//! ```json
//! {
//!   "document_type": "tweet",
//!   "filter": { "and": [{ "term": { "user": "kimchy" } }, { "exists": { "field": "tag" } }] },
//!   "query": { "query_string": { "query": "rust" } },
//!   "sort": ["date", { "likes": "desc" }],
//!   "fields": ["user", "message"],
//!   "from": 0,
//!   "size": 20
//! }
//! ```

use serde_json::{Map, Value};

use crate::{
	Error, Result, combinators,
	criteria::{Criteria, RangeComparison, RangeSpecification, RangeValue},
	request::RequestSpecification,
	sort::{SortOption, SortOrder},
};

const MAX_CRITERIA_DEPTH: usize = 16;
const MAX_CRITERIA_NODES: usize = 256;
const MAX_TERMS_VALUES: usize = 1_024;

#[derive(Default)]
struct ParseState {
	nodes: usize,
	max_depth: usize,
}

pub fn parse_request(raw: &Value) -> Result<RequestSpecification> {
	let path = "$";
	let obj = raw.as_object().ok_or_else(|| document_error(path, "request must be an object."))?;

	for key in obj.keys() {
		if !matches!(
			key.as_str(),
			"document_type" | "filter" | "query" | "sort" | "fields" | "from" | "size"
		) {
			return Err(document_error(&format!("$.{key}"), "unknown request section."));
		}
	}

	let document_type = obj
		.get("document_type")
		.and_then(Value::as_str)
		.ok_or_else(|| document_error("$.document_type", "document_type must be a string."))?;
	let mut request = RequestSpecification::new(document_type)
		.map_err(|err| relocate(err, "$.document_type"))?;

	if let Some(filter) = obj.get("filter") {
		let mut state = ParseState::default();

		request = request.with_filter(parse_criteria(filter, "$.filter", 1, &mut state)?);
	}
	if let Some(query) = obj.get("query") {
		let mut state = ParseState::default();

		request = request.with_query(parse_criteria(query, "$.query", 1, &mut state)?);
	}
	if let Some(sort) = obj.get("sort") {
		request = request.with_sort(parse_sort(sort, "$.sort")?);
	}
	if let Some(fields) = obj.get("fields") {
		request = request.with_fields(parse_strings(fields, "$.fields")?);
	}
	if let Some(from) = obj.get("from") {
		request = request.with_from(parse_count(from, "$.from")?);
	}
	if let Some(size) = obj.get("size") {
		request = request.with_size(parse_count(size, "$.size")?);
	}

	Ok(request)
}

/// Parses one criteria node written in the wire shape.
pub fn parse_criteria_value(raw: &Value) -> Result<Criteria> {
	parse_criteria(raw, "$", 1, &mut ParseState::default())
}

fn parse_criteria(
	raw: &Value,
	path: &str,
	depth: usize,
	state: &mut ParseState,
) -> Result<Criteria> {
	validate_metrics(path, depth, state)?;

	let (op, body) = single_entry(raw, path, "criteria")?;
	let op_path = format!("{path}.{op}");

	match op {
		"and" | "or" => {
			let children = parse_children(body, &op_path, depth, state)?;
			let combined =
				if op == "and" { combinators::and(children) } else { combinators::or(children) };

			combined.map_err(|err| relocate(err, &op_path))
		},
		"not" => Ok(combinators::not(parse_criteria(
			body,
			&op_path,
			depth.saturating_add(1),
			state,
		)?)),
		"term" => {
			let (field, value) = single_entry(body, &op_path, "term")?;
			let value = value.as_str().ok_or_else(|| {
				document_error(&format!("{op_path}.{field}"), "term value must be a string.")
			})?;

			Criteria::term(field, value).map_err(|err| relocate(err, &op_path))
		},
		"terms" => {
			let (field, values) = single_entry(body, &op_path, "terms")?;
			let values_path = format!("{op_path}.{field}");
			let values = parse_strings(values, &values_path)?;

			if values.len() > MAX_TERMS_VALUES {
				let message =
					format!("terms list exceeds maximum size ({}/{MAX_TERMS_VALUES}).", values.len());

				return Err(document_error(&values_path, &message));
			}

			Criteria::terms(field, values).map_err(|err| relocate(err, &op_path))
		},
		"exists" | "missing" => {
			let field = body
				.as_object()
				.and_then(|obj| obj.get("field"))
				.and_then(Value::as_str)
				.ok_or_else(|| {
					document_error(&format!("{op_path}.field"), "field must be a string.")
				})?;
			let criteria =
				if op == "exists" { Criteria::exists(field) } else { Criteria::missing(field) };

			criteria.map_err(|err| relocate(err, &op_path))
		},
		"range" => {
			let (field, bounds) = single_entry(body, &op_path, "range")?;
			let bounds_path = format!("{op_path}.{field}");
			let specifications = parse_range_bounds(bounds, &bounds_path)?;

			Criteria::range(field, specifications).map_err(|err| relocate(err, &bounds_path))
		},
		"query_string" => {
			let query = body
				.as_object()
				.and_then(|obj| obj.get("query"))
				.and_then(Value::as_str)
				.ok_or_else(|| {
					document_error(&format!("{op_path}.query"), "query must be a string.")
				})?;

			Criteria::query_string(query).map_err(|err| relocate(err, &op_path))
		},
		_ => Err(document_error(path, &format!("unsupported criteria '{op}'."))),
	}
}

fn parse_children(
	raw: &Value,
	path: &str,
	depth: usize,
	state: &mut ParseState,
) -> Result<Vec<Criteria>> {
	let nodes = raw.as_array().ok_or_else(|| document_error(path, "operands must be an array."))?;

	nodes
		.iter()
		.enumerate()
		.map(|(index, node)| {
			let child_path = format!("{path}[{index}]");

			parse_criteria(node, &child_path, depth.saturating_add(1), state)
		})
		.collect()
}

fn parse_range_bounds(raw: &Value, path: &str) -> Result<Vec<RangeSpecification>> {
	let bounds =
		raw.as_object().ok_or_else(|| document_error(path, "range bounds must be an object."))?;

	bounds
		.iter()
		.map(|(key, value)| {
			let bound_path = format!("{path}.{key}");
			let comparison = RangeComparison::parse(key).ok_or_else(|| {
				document_error(&bound_path, "range bound must be one of lt, lte, gt, gte.")
			})?;

			Ok(RangeSpecification::new(comparison, parse_range_value(value, &bound_path)?))
		})
		.collect()
}

fn parse_range_value(raw: &Value, path: &str) -> Result<RangeValue> {
	match raw {
		Value::Number(number) => {
			if let Some(value) = number.as_i64() {
				Ok(RangeValue::Integer(value))
			} else if let Some(value) = number.as_u64() {
				Ok(RangeValue::Unsigned(value))
			} else if let Some(value) = number.as_f64() {
				Ok(RangeValue::Float(value))
			} else {
				Err(document_error(path, "range bound is out of range."))
			}
		},
		Value::String(value) => Ok(RangeValue::Text(value.clone())),
		_ => Err(document_error(path, "range bound must be a number or a string.")),
	}
}

fn parse_sort(raw: &Value, path: &str) -> Result<Vec<SortOption>> {
	let entries = raw.as_array().ok_or_else(|| document_error(path, "sort must be an array."))?;

	entries
		.iter()
		.enumerate()
		.map(|(index, entry)| parse_sort_entry(entry, &format!("{path}[{index}]")))
		.collect()
}

fn parse_sort_entry(raw: &Value, path: &str) -> Result<SortOption> {
	if let Some(name) = raw.as_str() {
		return Ok(SortOption::ascending(require_name(name, path)?));
	}

	let (name, spec) = single_entry(raw, path, "sort entry")?;
	let name = require_name(name, path)?;
	let spec_path = format!("{path}.{name}");

	match spec {
		Value::String(order) => Ok(SortOption::new(name, parse_order(order, &spec_path)?)),
		Value::Object(options) => {
			let ascending = match options.get("order") {
				Some(Value::String(order)) => parse_order(order, &format!("{spec_path}.order"))?,
				Some(_) => {
					return Err(document_error(
						&format!("{spec_path}.order"),
						"order must be a string.",
					));
				},
				None => true,
			};
			let ignore_unmapped = match options.get("ignore_unmapped") {
				Some(Value::Bool(flag)) => *flag,
				Some(_) => {
					return Err(document_error(
						&format!("{spec_path}.ignore_unmapped"),
						"ignore_unmapped must be a boolean.",
					));
				},
				None => false,
			};
			let option = SortOption::new(name, ascending);

			Ok(if ignore_unmapped { option.ignoring_unmapped() } else { option })
		},
		_ => Err(document_error(&spec_path, "sort order must be a string or an object.")),
	}
}

fn parse_order(raw: &str, path: &str) -> Result<bool> {
	match SortOrder::parse(raw) {
		Some(order) => Ok(order == SortOrder::Ascending),
		None => Err(document_error(path, "sort order must be 'asc' or 'desc'.")),
	}
}

fn require_name<'a>(name: &'a str, path: &str) -> Result<&'a str> {
	if name.trim().is_empty() {
		return Err(document_error(path, "sort field name must be non-empty."));
	}

	Ok(name)
}

fn parse_strings(raw: &Value, path: &str) -> Result<Vec<String>> {
	let items = raw.as_array().ok_or_else(|| document_error(path, "value must be an array."))?;

	items
		.iter()
		.enumerate()
		.map(|(index, item)| {
			item.as_str().map(str::to_string).ok_or_else(|| {
				document_error(&format!("{path}[{index}]"), "array items must be strings.")
			})
		})
		.collect()
}

fn parse_count(raw: &Value, path: &str) -> Result<u64> {
	raw.as_u64().ok_or_else(|| document_error(path, "value must be a non-negative integer."))
}

fn single_entry<'a>(raw: &'a Value, path: &str, what: &str) -> Result<(&'a str, &'a Value)> {
	let obj: &Map<String, Value> = raw
		.as_object()
		.ok_or_else(|| document_error(path, &format!("{what} must be an object.")))?;
	let mut entries = obj.iter();

	match (entries.next(), entries.next()) {
		(Some((key, value)), None) => Ok((key.as_str(), value)),
		_ => Err(document_error(path, &format!("{what} must have exactly one key."))),
	}
}

fn validate_metrics(path: &str, depth: usize, state: &mut ParseState) -> Result<()> {
	state.nodes = state.nodes.saturating_add(1);
	state.max_depth = state.max_depth.max(depth);

	if state.nodes > MAX_CRITERIA_NODES {
		return Err(document_error(
			path,
			&format!("criteria exceeds node limit ({}/{MAX_CRITERIA_NODES}).", state.nodes),
		));
	}
	if state.max_depth > MAX_CRITERIA_DEPTH {
		return Err(document_error(
			path,
			&format!("criteria exceeds depth limit ({}/{MAX_CRITERIA_DEPTH}).", state.max_depth),
		));
	}

	Ok(())
}

fn document_error(path: &str, message: &str) -> Error {
	Error::Document { path: path.to_string(), message: message.to_string() }
}

fn relocate(err: Error, path: &str) -> Error {
	match err {
		Error::InvalidArgument { message } => Error::Document { path: path.to_string(), message },
		other => other,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_unknown_section() {
		let err = parse_request(&serde_json::json!({ "document_type": "t", "limit": 3 }))
			.unwrap_err();

		assert_eq!(err.to_string(), "Invalid request document at $.limit: unknown request section.");
	}

	#[test]
	fn enforces_depth_limit() {
		let mut node = serde_json::json!({ "exists": { "field": "x" } });

		for _ in 0..MAX_CRITERIA_DEPTH {
			node = serde_json::json!({ "not": node });
		}

		let err = parse_criteria_value(&node).unwrap_err();

		assert!(err.to_string().contains("depth limit"), "Unexpected error: {err}");
	}

	#[test]
	fn sort_object_defaults_to_ascending() {
		let sort = parse_sort(&serde_json::json!([{ "a": { "ignore_unmapped": true } }]), "$.sort")
			.unwrap();

		assert_eq!(sort, vec![SortOption::ascending("a").ignoring_unmapped()]);
	}
}

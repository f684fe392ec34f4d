use serde_json::{Map, Value};

use esq_config::{Connection, Url};

use crate::{
	Error, Result,
	criteria::{Criteria, RangeCriteria},
	request::RequestSpecification,
	sort::SortOption,
};

/// A rendered request, ready to be sent as a POST by a transport.
#[derive(Clone, Debug, PartialEq)]
pub struct PostRequest {
	pub uri: Url,
	pub path: String,
	pub body: String,
}

/// Renders a [`RequestSpecification`] into a path and a POST body for one connection.
///
/// Output is recomputed on every call and never cached.
#[derive(Clone, Debug)]
pub struct SearchRequestFormatter<'a> {
	connection: &'a Connection,
	endpoint: Url,
	request: &'a RequestSpecification,
}
impl<'a> SearchRequestFormatter<'a> {
	pub fn new(connection: &'a Connection, request: &'a RequestSpecification) -> Result<Self> {
		esq_config::validate_connection(connection)?;

		let endpoint = esq_config::endpoint_url(connection)?;

		Ok(Self { connection, endpoint, request })
	}

	/// `/{index}/{document_type}/_search`, percent-encoded exactly as it appears in [`Self::uri`]
	/// after the endpoint's own path.
	pub fn path(&self) -> String {
		let uri = self.uri();
		let prefix_len = self.endpoint.path().trim_end_matches('/').len();

		uri.path().get(prefix_len..).unwrap_or_default().to_string()
	}

	/// The endpoint with the search path appended to its own path. Any query already on the
	/// endpoint is kept.
	pub fn uri(&self) -> Url {
		let mut uri = self.endpoint.clone();

		// http(s) endpoints always have a hierarchical path.
		if let Ok(mut segments) = uri.path_segments_mut() {
			segments.pop_if_empty();

			if let Some(index) = self.connection.index.as_deref() {
				segments.push(index);
			}

			segments.push(self.request.document_type()).push("_search");
		}
		if self.connection.pretty {
			uri.query_pairs_mut().append_pair("pretty", "true");
		}

		uri
	}

	pub fn body(&self) -> Result<Value> {
		let request = self.request;
		let mut body = Map::new();

		if let Some(filter) = request.filter() {
			body.insert("filter".to_string(), filter_value(filter)?);
		}
		if let Some(query) = request.query() {
			body.insert("query".to_string(), query_value(query)?);
		}
		if !request.sort().is_empty() {
			body.insert(
				"sort".to_string(),
				Value::Array(request.sort().iter().map(sort_value).collect()),
			);
		}
		if !request.fields().is_empty() {
			body.insert(
				"fields".to_string(),
				Value::Array(request.fields().iter().cloned().map(Value::String).collect()),
			);
		}
		if let Some(from) = request.from() {
			body.insert("from".to_string(), Value::from(from));
		}
		if let Some(size) = request.size() {
			body.insert("size".to_string(), Value::from(size));
		}

		tracing::debug!(
			document_type = request.document_type(),
			sections = ?body.keys().collect::<Vec<_>>(),
			"Formatted search request body."
		);

		Ok(Value::Object(body))
	}

	/// Serializes the body, indented when the connection asks for pretty output.
	pub fn body_string(&self) -> Result<String> {
		let body = self.body()?;
		let rendered = if self.connection.pretty {
			serde_json::to_string_pretty(&body)?
		} else {
			serde_json::to_string(&body)?
		};

		Ok(rendered)
	}

	pub fn post_request(&self) -> Result<PostRequest> {
		let body = self.body_string()?;
		let path = self.path();

		tracing::debug!(%path, bytes = body.len(), "Rendered search POST request.");

		Ok(PostRequest { uri: self.uri(), path, body })
	}
}

/// Renders `request` for `connection` in one step.
pub fn format(connection: &Connection, request: &RequestSpecification) -> Result<PostRequest> {
	SearchRequestFormatter::new(connection, request)?.post_request()
}

/// Filter context shape of a criteria tree.
pub fn filter_value(criteria: &Criteria) -> Result<Value> {
	let value = match criteria {
		Criteria::Term(term) if term.is_single() => {
			serde_json::json!({ "term": { term.field(): term.values()[0] } })
		},
		Criteria::Term(term) => serde_json::json!({ "terms": { term.field(): term.values() } }),
		Criteria::Exists(exists) => serde_json::json!({ "exists": { "field": exists.field() } }),
		Criteria::Missing(missing) => {
			serde_json::json!({ "missing": { "field": missing.field() } })
		},
		Criteria::Not(inner) => {
			let inner = filter_value(inner)?;

			serde_json::json!({ "not": inner })
		},
		Criteria::And(compound) => {
			let children = children_value(compound.children())?;

			serde_json::json!({ "and": children })
		},
		Criteria::Or(compound) => {
			let children = children_value(compound.children())?;

			serde_json::json!({ "or": children })
		},
		Criteria::Range(range) => range_value(range),
		Criteria::QueryString(_) => {
			return Err(Error::invalid_argument(
				"query_string criteria is only valid in query context, not in a filter.",
			));
		},
	};

	Ok(value)
}

/// Query context shape of a criteria. Boolean combinators are rejected here.
pub fn query_value(criteria: &Criteria) -> Result<Value> {
	match criteria {
		Criteria::QueryString(query) => {
			Ok(serde_json::json!({ "query_string": { "query": query.query() } }))
		},
		Criteria::Not(_) | Criteria::And(_) | Criteria::Or(_) => {
			Err(Error::invalid_argument(format!(
				"'{}' criteria cannot be used in query context: {criteria}.",
				criteria.name()
			)))
		},
		Criteria::Term(_) | Criteria::Exists(_) | Criteria::Missing(_) | Criteria::Range(_) => {
			filter_value(criteria)
		},
	}
}

pub fn sort_value(option: &SortOption) -> Value {
	if option.ignore_unmapped() {
		serde_json::json!({
			option.name(): { "ignore_unmapped": true, "order": option.order().as_str() }
		})
	} else if option.is_ascending() {
		Value::String(option.name().to_string())
	} else {
		serde_json::json!({ option.name(): option.order().as_str() })
	}
}

fn children_value(children: &[Criteria]) -> Result<Value> {
	Ok(Value::Array(children.iter().map(filter_value).collect::<Result<Vec<_>>>()?))
}

fn range_value(range: &RangeCriteria) -> Value {
	let bounds: Map<String, Value> = range
		.specifications()
		.iter()
		.map(|specification| {
			(specification.comparison().as_str().to_string(), specification.value().to_value())
		})
		.collect();

	serde_json::json!({ "range": { range.field(): bounds } })
}

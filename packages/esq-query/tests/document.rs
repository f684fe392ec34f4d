use serde_json::{Value, json};

use esq_config::Connection;
use esq_query::{
	Criteria, Error, RangeComparison, RangeSpecification, RequestSpecification, SortOption,
};

fn parse(raw: Value) -> esq_query::Result<RequestSpecification> {
	esq_query::parse_request(&raw)
}

fn document_path(err: Error) -> String {
	match err {
		Error::Document { path, .. } => path,
		other => panic!("Expected a document error, got {other:?}."),
	}
}

#[test]
fn parses_full_document() {
	let request = parse(json!({
		"document_type": "tweet",
		"filter": { "and": [
			{ "term": { "user": "kimchy" } },
			{ "range": { "likes": { "gte": 10, "lt": 100 } } },
		] },
		"query": { "query_string": { "query": "rust" } },
		"sort": ["date", { "likes": "desc" }, { "rank": { "order": "asc", "ignore_unmapped": true } }],
		"fields": ["user", "message"],
		"from": 5,
		"size": 25,
	}))
	.expect("Document must parse.");
	let expected = RequestSpecification::new("tweet")
		.unwrap()
		.with_filter(
			esq_query::and([
				Criteria::term("user", "kimchy").unwrap(),
				Criteria::range(
					"likes",
					[
						RangeSpecification::new(RangeComparison::GreaterThanOrEqual, 10),
						RangeSpecification::new(RangeComparison::LessThan, 100),
					],
				)
				.unwrap(),
			])
			.unwrap(),
		)
		.with_query(Criteria::query_string("rust").unwrap())
		.with_sort([
			SortOption::ascending("date"),
			SortOption::descending("likes"),
			SortOption::ascending("rank").ignoring_unmapped(),
		])
		.with_fields(["user", "message"])
		.with_from(5)
		.with_size(25);

	assert_eq!(request, expected);
}

#[test]
fn single_operand_composites_collapse_on_read() {
	let request = parse(json!({
		"document_type": "doc",
		"filter": { "or": [{ "exists": { "field": "tag" } }] },
	}))
	.unwrap();

	assert_eq!(request.filter(), Some(&Criteria::exists("tag").unwrap()));
}

#[test]
fn formatted_body_reads_back_to_the_same_request() {
	let original = RequestSpecification::new("doc")
		.unwrap()
		.with_filter(
			esq_query::or([
				esq_query::not(Criteria::missing("a").unwrap()),
				Criteria::terms("b", ["x", "y"]).unwrap(),
			])
			.unwrap(),
		)
		.with_query(Criteria::range(
			"score",
			[RangeSpecification::new(RangeComparison::GreaterThan, 0.5)],
		)
		.unwrap())
		.with_sort([
			SortOption::ascending("first"),
			SortOption::descending("second"),
			SortOption::descending("third").ignoring_unmapped(),
		])
		.with_fields(["a", "b"])
		.with_from(1024)
		.with_size(4096);
	let post = esq_query::format(&Connection::new("http://localhost:9200"), &original).unwrap();
	let mut body: Value = serde_json::from_str(&post.body).unwrap();

	body.as_object_mut().unwrap().insert("document_type".to_string(), json!("doc"));

	assert_eq!(parse(body).unwrap(), original);
}

#[test]
fn empty_operands_report_their_path() {
	let err = parse(json!({ "document_type": "doc", "filter": { "not": { "and": [] } } }))
		.unwrap_err();

	assert_eq!(document_path(err), "$.filter.not.and");
}

#[test]
fn bad_range_bound_reports_its_path() {
	let err = parse(json!({
		"document_type": "doc",
		"filter": { "or": [
			{ "exists": { "field": "a" } },
			{ "range": { "x": { "between": 3 } } },
		] },
	}))
	.unwrap_err();

	assert_eq!(document_path(err), "$.filter.or[1].range.x.between");
}

#[test]
fn empty_range_reports_its_path() {
	let err = parse(json!({ "document_type": "doc", "filter": { "range": { "x": {} } } }))
		.unwrap_err();

	assert_eq!(document_path(err), "$.filter.range.x");
}

#[test]
fn unsupported_criteria_is_rejected() {
	let err = parse(json!({ "document_type": "doc", "filter": { "match": { "a": "b" } } }))
		.unwrap_err();

	assert!(err.to_string().contains("unsupported criteria 'match'"), "Unexpected error: {err}");
}

#[test]
fn criteria_must_have_one_key() {
	let err = parse(json!({
		"document_type": "doc",
		"filter": { "exists": { "field": "a" }, "missing": { "field": "b" } },
	}))
	.unwrap_err();

	assert_eq!(document_path(err), "$.filter");
}

#[test]
fn document_type_is_required() {
	let err = parse(json!({ "size": 3 })).unwrap_err();

	assert_eq!(document_path(err), "$.document_type");

	let err = parse(json!({ "document_type": "" })).unwrap_err();

	assert_eq!(document_path(err), "$.document_type");
}

#[test]
fn paging_must_be_non_negative_integers() {
	let err = parse(json!({ "document_type": "doc", "from": -1 })).unwrap_err();

	assert_eq!(document_path(err), "$.from");

	let err = parse(json!({ "document_type": "doc", "size": 1.5 })).unwrap_err();

	assert_eq!(document_path(err), "$.size");
}

#[test]
fn sort_order_must_be_known() {
	let err = parse(json!({ "document_type": "doc", "sort": [{ "a": "down" }] })).unwrap_err();

	assert_eq!(document_path(err), "$.sort[0].a");
}

#[test]
fn node_limit_is_enforced() {
	let leaves: Vec<Value> =
		(0..300).map(|index| json!({ "term": { "f": index.to_string() } })).collect();
	let err = parse(json!({ "document_type": "doc", "filter": { "or": leaves } })).unwrap_err();

	assert!(err.to_string().contains("node limit"), "Unexpected error: {err}");
}

#[test]
fn unsigned_range_bound_keeps_its_value() {
	let request = parse(json!({
		"document_type": "doc",
		"filter": { "range": { "id": { "lt": u64::MAX, "gte": 7 } } },
	}))
	.unwrap();
	let expected = Criteria::range(
		"id",
		[
			RangeSpecification::new(RangeComparison::LessThan, u64::MAX),
			RangeSpecification::new(RangeComparison::GreaterThanOrEqual, 7),
		],
	)
	.unwrap();

	assert_eq!(request.filter(), Some(&expected));

	let post = esq_query::format(&Connection::new("http://localhost:9200"), &request).unwrap();

	assert!(post.body.contains("18446744073709551615"), "Unexpected body: {}", post.body);

	let mut body: Value = serde_json::from_str(&post.body).unwrap();

	body.as_object_mut().unwrap().insert("document_type".to_string(), json!("doc"));

	assert_eq!(parse(body).unwrap(), request);
}

use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{Duration, SystemTime, UNIX_EPOCH},
};

use toml::Value;

use esq_config::{Config, Connection, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml_with_connection(endpoint: &str, timeout_ms: i64, index: Option<&str>) -> String {
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let root = value.as_table_mut().expect("Template config must be a table.");
	let connection = root
		.get_mut("connection")
		.and_then(Value::as_table_mut)
		.expect("Template config must include [connection].");

	connection.insert("endpoint".to_string(), Value::String(endpoint.to_string()));
	connection.insert("timeout_ms".to_string(), Value::Integer(timeout_ms));

	match index {
		Some(index) => {
			connection.insert("index".to_string(), Value::String(index.to_string()));
		},
		None => {
			connection.remove("index");
		},
	}

	toml::to_string(&value).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("esq_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> esq_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = esq_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

#[test]
fn loads_template_config() {
	let cfg = load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string())
		.expect("Template config must load.");

	assert_eq!(cfg.connection.endpoint, "http://localhost:9200");
	assert_eq!(cfg.connection.index.as_deref(), Some("main"));
	assert_eq!(cfg.connection.timeout(), Duration::from_secs(10));
	assert!(!cfg.connection.pretty);
	assert_eq!(cfg.service.log_level, "info");
}

#[test]
fn blank_index_normalizes_to_none() {
	let cfg = load_payload(sample_toml_with_connection("http://localhost:9200", 500, Some("  ")))
		.expect("Blank index must normalize.");

	assert_eq!(cfg.connection.index, None);
}

#[test]
fn missing_index_is_allowed() {
	let cfg = load_payload(sample_toml_with_connection("https://search.example.com", 500, None))
		.expect("Index is optional.");

	assert_eq!(cfg.connection.index, None);
}

#[test]
fn missing_service_section_uses_defaults() {
	let payload = r#"
[connection]
endpoint   = "http://localhost:9200"
timeout_ms = 250
"#;
	let cfg = load_payload(payload.to_string()).expect("Service section is optional.");

	assert_eq!(cfg.service.log_level, "info");
	assert_eq!(cfg.connection.timeout_ms, 250);
}

#[test]
fn timeout_must_be_positive() {
	let err = load_payload(sample_toml_with_connection("http://localhost:9200", 0, None))
		.expect_err("Expected timeout validation error.");
	let message = err.to_string();

	assert!(
		message.contains("connection.timeout_ms must be greater than zero."),
		"Unexpected error message: {message}"
	);
}

#[test]
fn negative_timeout_fails_to_parse() {
	let err = load_payload(sample_toml_with_connection("http://localhost:9200", -5, None))
		.expect_err("Expected parse error for a negative timeout.");

	assert!(matches!(err, Error::ParseConfig { .. }), "Unexpected error: {err:?}");
}

#[test]
fn endpoint_must_be_a_url() {
	let err = load_payload(sample_toml_with_connection("not a url", 500, None))
		.expect_err("Expected endpoint validation error.");

	assert!(matches!(err, Error::Configuration { .. }), "Unexpected error: {err:?}");
	assert!(err.to_string().contains("is not a valid URL"));
}

#[test]
fn endpoint_must_use_http() {
	let err = load_payload(sample_toml_with_connection("ftp://localhost:9200", 500, None))
		.expect_err("Expected scheme validation error.");

	assert!(err.to_string().contains("must use http or https"));
}

#[test]
fn missing_file_is_a_read_error() {
	let mut path = env::temp_dir();

	path.push("esq_config_test_does_not_exist.toml");

	let err = esq_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err:?}");
}

#[test]
fn malformed_toml_is_a_parse_error() {
	let err = load_payload("[connection\nendpoint = ".to_string())
		.expect_err("Expected parse error.");

	assert!(matches!(err, Error::ParseConfig { .. }), "Unexpected error: {err:?}");
}

#[test]
fn validate_connection_rejects_index_with_slash() {
	let connection = Connection::new("http://localhost:9200").with_index("a/b");
	let err = esq_config::validate_connection(&connection).expect_err("Expected index error.");

	assert!(err.to_string().contains("must not contain '/'"));
}

#[test]
fn connection_builder_defaults() {
	let connection = Connection::new("http://localhost:9200");

	assert_eq!(connection.timeout_ms, esq_config::DEFAULT_TIMEOUT_MS);
	assert_eq!(connection.index, None);
	assert!(esq_config::validate_connection(&connection).is_ok());
}

#[test]
fn dot_segment_index_is_rejected() {
	for index in [".", ".."] {
		let err = load_payload(sample_toml_with_connection("http://localhost:9200", 500, Some(index)))
			.expect_err("Expected index validation error.");

		assert!(
			err.to_string().contains("connection.index must not be a dot segment."),
			"Unexpected error message: {err}"
		);
	}
}

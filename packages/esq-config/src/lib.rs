mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Connection, DEFAULT_TIMEOUT_MS, Service};
pub use url::Url;

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	validate_connection(&cfg.connection)?;

	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Configuration {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}

	Ok(())
}

pub fn validate_connection(connection: &Connection) -> Result<()> {
	endpoint_url(connection)?;

	if connection.timeout_ms == 0 {
		return Err(Error::Configuration {
			message: "connection.timeout_ms must be greater than zero.".to_string(),
		});
	}

	if let Some(index) = connection.index.as_deref() {
		if index.trim().is_empty() {
			return Err(Error::Configuration {
				message: "connection.index must be non-empty when set.".to_string(),
			});
		}
		if index.contains('/') {
			return Err(Error::Configuration {
				message: "connection.index must not contain '/'.".to_string(),
			});
		}
		if matches!(index, "." | "..") {
			return Err(Error::Configuration {
				message: "connection.index must not be a dot segment.".to_string(),
			});
		}
	}

	Ok(())
}

/// Parses the endpoint, accepting only absolute http(s) URLs with a host.
pub fn endpoint_url(connection: &Connection) -> Result<Url> {
	let url = Url::parse(connection.endpoint.trim()).map_err(|err| Error::Configuration {
		message: format!("connection.endpoint '{}' is not a valid URL: {err}.", connection.endpoint),
	})?;

	if !matches!(url.scheme(), "http" | "https") {
		return Err(Error::Configuration {
			message: format!(
				"connection.endpoint must use http or https, got '{}'.",
				url.scheme()
			),
		});
	}
	if url.host_str().map(str::is_empty).unwrap_or(true) {
		return Err(Error::Configuration {
			message: "connection.endpoint must include a host.".to_string(),
		});
	}

	Ok(url)
}

fn normalize(cfg: &mut Config) {
	if cfg.connection.index.as_deref().map(|index| index.trim().is_empty()).unwrap_or(false) {
		cfg.connection.index = None;
	}

	cfg.connection.endpoint = cfg.connection.endpoint.trim().to_string();
}

use std::{fs, path::PathBuf};

use clap::Parser;
use color_eyre::eyre::WrapErr;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use esq_query::SearchRequestFormatter;

#[derive(Debug, Parser)]
#[command(
	version = esq_cli::VERSION,
	rename_all = "kebab",
	styles = esq_cli::styles(),
	about = "Render a search request document into the POST request sent to the backend."
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// JSON request document with document_type, filter, query, sort, fields, from and size.
	#[arg(long, short = 'r', value_name = "FILE")]
	pub request: PathBuf,
	/// Indent the body and ask the backend for pretty responses.
	#[arg(long)]
	pub pretty: bool,
}

pub fn run(args: Args) -> color_eyre::Result<()> {
	let config = esq_config::load(&args.config)?;
	init_tracing(&config)?;
	let rendered = render(&args, &config.connection)?;

	println!("{rendered}");
	Ok(())
}

/// Reads the request document named by `args` and renders it as `POST <uri>` plus the body.
pub fn render(args: &Args, connection: &esq_config::Connection) -> color_eyre::Result<String> {
	let connection = connection.clone().with_pretty(connection.pretty || args.pretty);
	let raw = fs::read_to_string(&args.request)
		.wrap_err_with(|| format!("Failed to read request document at {:?}.", args.request))?;
	let document: Value = serde_json::from_str(&raw)
		.wrap_err_with(|| format!("Failed to parse request document at {:?}.", args.request))?;
	let request = esq_query::parse_request(&document)?;
	let formatter = SearchRequestFormatter::new(&connection, &request)?;
	let post = formatter.post_request()?;

	tracing::info!(
		uri = %post.uri,
		document_type = request.document_type(),
		"Rendered search request."
	);
	Ok(format!("POST {}\n{}", post.uri, post.body))
}

fn init_tracing(config: &esq_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
	Ok(())
}

//! Print the OpenAPI document as JSON.

use std::io::Write;

use backend::doc::ApiDoc;
use color_eyre::eyre::{Context, Result};
use utoipa::OpenApi;

fn main() -> Result<()> {
    color_eyre::install()?;
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .wrap_err("failed to serialise OpenAPI document")?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}").wrap_err("failed to write OpenAPI document")?;
    Ok(())
}

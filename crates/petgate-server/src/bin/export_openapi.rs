// Export the OpenAPI document as JSON
//
// Usage: cargo run --bin export-openapi > docs/openapi.json

use petgate_server::openapi::ApiDoc;

fn main() -> anyhow::Result<()> {
    println!("{}", ApiDoc::to_json()?);
    Ok(())
}

// Prints the OpenAPI document for the REST endpoints.
// Usage: cargo run --bin openapi_export > openapi.json

use gql_server::api::openapi::ApiDoc;
use utoipa::OpenApi;

fn main() -> anyhow::Result<()> {
    println!("{}", ApiDoc::openapi().to_pretty_json()?);
    Ok(())
}

//! Write the REST API's OpenAPI document to stdout, or to the path given.

use server::openapi::ApiDoc;
use utoipa::OpenApi;

fn main() {
    let spec = ApiDoc::openapi()
        .to_pretty_json()
        .expect("Failed to serialize OpenAPI spec to JSON");

    match std::env::args().nth(1) {
        Some(path) => std::fs::write(&path, spec).expect("Failed to write OpenAPI spec"),
        None => println!("{spec}"),
    }
}

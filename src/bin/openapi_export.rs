use std::path::Path;

use ims_server::openapi::write_openapi_json;

fn main() -> anyhow::Result<()> {
    let output_path = write_openapi_json(Path::new("openapi"))?;
    println!("OpenAPI document written to {}", output_path.display());
    Ok(())
}

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// File name used by the `openapi-export` binary.
pub const OPENAPI_EXPORT_FILE: &str = "ims-api.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "IMS API",
        version = "1.0.0",
        description = r#"
# Inventory Management API

Items, the stock movements recorded against them (item actions) and a daily summary.

## Hypermedia

Single resources carry a `_links` object with `self` and related links. Collections
wrap their members in `_embedded.itemList` or `_embedded.itemActionList`.

## Replace semantics

`PUT` always answers `201 Created` with a `Location` header: it overwrites the
resource when it exists and creates it under the given id otherwise.

## Error Handling

Failures share one body shape:

```json
{
  "error": "Not Found",
  "message": "Not found: Item 42 not found",
  "request_id": "2f1c...",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "items", description = "Item catalogue and daily summary"),
        (name = "item-actions", description = "Stock movements of one item")
    ),
    paths(
        // Items
        crate::handlers::items::list_items,
        crate::handlers::items::get_item,
        crate::handlers::items::create_item,
        crate::handlers::items::replace_item,
        crate::handlers::items::delete_item,
        crate::handlers::item_summary::get_item_summary,

        // Item actions
        crate::handlers::item_actions::list_item_actions,
        crate::handlers::item_actions::get_item_action,
        crate::handlers::item_actions::create_item_action,
        crate::handlers::item_actions::replace_item_action,
        crate::handlers::item_actions::delete_item_action,
    ),
    components(
        schemas(
            crate::entities::item::Model,
            crate::services::ItemPayload,
            crate::services::ItemActionPayload,
            crate::services::ItemActionView,
            crate::services::ItemSummary,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url(OPENAPI_JSON_PATH, ApiDoc::openapi())
}

/// Writes the pretty-printed document into `output_dir`, creating it if needed.
pub fn write_openapi_json(output_dir: &Path) -> io::Result<PathBuf> {
    let json = serde_json::to_string_pretty(&ApiDoc::openapi())?;

    fs::create_dir_all(output_dir)?;
    let output_path = output_dir.join(OPENAPI_EXPORT_FILE);
    fs::write(&output_path, json)?;

    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn openapi_lists_every_item_route() {
        let openapi = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("IMS API"));
        for path in [
            "/api/items",
            "/api/items/summary",
            "/api/items/{item_id}",
            "/api/items/{item_id}/itemActions",
            "/api/items/{item_id}/itemActions/{action_id}",
        ] {
            assert!(openapi.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn export_writes_the_served_document() {
        let dir = TempDir::new().unwrap();
        let output_dir = dir.path().join("openapi");

        let path = write_openapi_json(&output_dir).unwrap();
        assert_eq!(path, output_dir.join("ims-api.json"));

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let served = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert_eq!(written, served);
    }
}

use url::form_urlencoded::byte_serialize;

const USAGE_VIEWER_URL: &str = "https://ericc-ch.github.io/copilot-api";
const USAGE_PATH: &str = "/usage";

/// Link to the hosted usage dashboard, pointed at `endpoint`'s usage route.
pub fn usage_viewer_url(endpoint: &str) -> String {
    let target = format!("{endpoint}{USAGE_PATH}");
    let encoded: String = byte_serialize(target.as_bytes()).collect();
    format!("{USAGE_VIEWER_URL}?endpoint={encoded}")
}

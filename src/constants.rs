/// Shared names and messages used across the HTTP surface and the use cases

// Content negotiation
pub const MIME_APPLICATION_YAML: &str = "application/yaml";
pub const MIME_APPLICATION_JSON: &str = "application/json";

// Compose extension key carrying store metadata
pub const COMPOSE_EXTENSION_KEY: &str = "x-casaos";

// Author name that marks apps packaged by the CasaOS team
pub const CASAOS_TEAM_AUTHOR: &str = "CasaOS Team";

// Synthetic category prepended to every category listing
pub const ALL_CATEGORY_NAME: &str = "All";
pub const ALL_CATEGORY_FONT: &str = "apps";
pub const ALL_CATEGORY_DESCRIPTION: &str = "All apps";

// Registry messages
pub const MSG_APPSTORE_URL_REQUIRED: &str = "appstore url is required";
pub const MSG_APPSTORE_ALREADY_REGISTERED: &str = "appstore is already registered";
pub const MSG_APPSTORE_UNREGISTERED: &str = "app store is unregistered.";

// Catalog messages
pub const MSG_APP_NOT_FOUND: &str = "app not found";

/// Acknowledgement returned when a registration has been started in the background.
pub fn registration_initiated_message(log_file: &str) -> String {
    format!("trying to register app store asynchronously - see {log_file} for any errors.")
}

/// Warning attached to the JSON rendering of a compose app.
pub fn json_debug_warning() -> String {
    format!(
        "!! JSON format is for debugging purpose only - use `Accept: {MIME_APPLICATION_YAML}` HTTP header to get YAML instead !!"
    )
}

pub fn app_store_not_found_message(id: impl std::fmt::Display) -> String {
    format!("app store id {id} is not found")
}

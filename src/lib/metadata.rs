//! Static presentation data a host shows for this connector.

use std::path::Path;

use crate::config::REQUIRED_PARAMETERS;

pub const CONNECTION_TYPE: &str = "Mercurial";

/// The icon shipped with the crate, `assets/icon.svg`.
pub const BUNDLED_ICON: &str = include_str!("../../assets/icon.svg");

/// Returned when neither an icon file nor the bundled icon is usable.
pub const DEFAULT_ICON: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><rect width="24" height="24" rx="4" fill="#1b1b1b"/><path fill="#bfbfbf" d="M5 7h14v2H5zm0 4h12v2H5zm0 4h8v2H5z"/></svg>"##;

/// The fields a host needs to render a configuration form for this connector.
#[derive(Debug, serde::Deserialize, serde::Serialize, PartialEq, Eq, Clone)]
pub struct ConnectionData {
    pub connection_type: String,
    pub fields: Vec<String>,
}

impl ConnectionData {
    pub fn mercurial() -> Self {
        Self {
            connection_type: CONNECTION_TYPE.to_string(),
            fields: REQUIRED_PARAMETERS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Read the SVG at `path`. If there is no path, the file can't be read, or it is empty, use the
/// bundled icon, and [`DEFAULT_ICON`] if that is empty too.
pub fn load_icon(path: Option<&Path>) -> String {
    let Some(path) = path else {
        return bundled_or_default(BUNDLED_ICON);
    };
    match std::fs::read_to_string(path) {
        Ok(svg) if !svg.trim().is_empty() => svg,
        Ok(_) => bundled_or_default(BUNDLED_ICON),
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "falling back to bundled icon");
            bundled_or_default(BUNDLED_ICON)
        }
    }
}

fn bundled_or_default(bundled: &str) -> String {
    match bundled.trim() {
        "" => DEFAULT_ICON.to_string(),
        svg => svg.to_string(),
    }
}

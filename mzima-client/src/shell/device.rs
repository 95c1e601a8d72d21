//! Device identification and the minimum iOS version check.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::warn;

/// Title of the OS update dialog.
pub const UPDATE_DIALOG_TITLE: &str = "Update required";

/// Body of the OS update dialog.
pub const UPDATE_DIALOG_MESSAGE: &str =
    "To keep the app working correctly, please update iOS.";

/// Platform the shell runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    /// Android native shell.
    Android,
    /// iOS native shell.
    Ios,
    /// Plain browser.
    Web,
}

/// Device details reported by the host once it is ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    /// Platform the device runs.
    pub platform: PlatformKind,
    /// OS version as reported, e.g. `16.4.1`.
    pub os_version: String,
}

/// Parses `major[.minor[...]]`; a missing minor reads as 0.
#[must_use]
pub fn parse_os_version(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.trim().split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = match parts.next() {
        Some(minor) => minor.parse().ok()?,
        None => 0,
    };
    Some((major, minor))
}

/// `true` on iOS devices older than `minimum`.
///
/// Versions that cannot be parsed never trigger the update prompt.
#[must_use]
pub fn requires_os_update(info: &DeviceInfo, minimum: &str) -> bool {
    if info.platform != PlatformKind::Ios {
        return false;
    }
    match (parse_os_version(&info.os_version), parse_os_version(minimum)) {
        (Some(current), Some(minimum)) => current < minimum,
        _ => {
            warn!(
                os_version = %info.os_version,
                minimum,
                "unparseable OS version, skipping update check"
            );
            false
        }
    }
}

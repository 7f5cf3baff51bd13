use netvol_shared::constants::options;
use netvol_shared::errors::{NetvolError, NetvolResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Volume policy, fixed when the volume is created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSpec {
    /// Delete the volume directory when the record is removed.
    #[serde(default)]
    pub purge_after_delete: bool,

    /// Allow more than one mounter to hold the volume at a time.
    #[serde(default)]
    pub allow_multiple_mount: bool,
}

impl VolumeSpec {
    /// Build a spec from create options, starting from backend `defaults`.
    ///
    /// Only `purgeAfterDelete` and `allowMultipleMount` are accepted; any other
    /// key, or a value that is not a boolean, is an `InvalidArgument`.
    pub fn from_options(
        defaults: VolumeSpec,
        opts: &HashMap<String, String>,
    ) -> NetvolResult<Self> {
        let mut spec = defaults;

        for (key, value) in opts {
            match key.as_str() {
                options::PURGE_AFTER_DELETE => {
                    spec.purge_after_delete = parse_bool(value).ok_or_else(|| {
                        NetvolError::InvalidArgument(format!(
                            "invalid value for {}: {:?}",
                            key, value
                        ))
                    })?;
                }
                options::ALLOW_MULTIPLE_MOUNT => {
                    spec.allow_multiple_mount = parse_bool(value).ok_or_else(|| {
                        NetvolError::InvalidArgument(format!(
                            "invalid value for {}: {:?}",
                            key, value
                        ))
                    })?;
                }
                _ => {
                    return Err(NetvolError::InvalidArgument(format!(
                        "unknown option {} with value {}",
                        key, value
                    )));
                }
            }
        }

        Ok(spec)
    }
}

/// Parse a boolean option value.
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

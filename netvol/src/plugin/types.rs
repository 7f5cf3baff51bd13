//! Request and response bodies of the volume plugin protocol.
//!
//! Field names follow the protocol (`Name`, `Opts`, `Mountpoint`, `Err`, ...).
//! An empty `Err` means success and is left out of the serialized body.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateRequest {
    pub name: String,
    #[serde(default)]
    pub opts: Option<HashMap<String, String>>,
}

/// Request naming a volume (get, remove, path).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NameRequest {
    pub name: String,
}

/// Request naming a volume and a mounter (mount, unmount).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MountRequest {
    pub name: String,
    #[serde(rename = "ID")]
    pub id: String,
}

/// Volume as reported to the orchestrator.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Volume {
    pub name: String,
    /// Absolute path on this host.
    pub mountpoint: String,
    /// RFC 3339, local time.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub status: serde_json::Map<String, serde_json::Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub err: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MountResponse {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mountpoint: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub err: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<Volume>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub err: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListResponse {
    pub volumes: Vec<Volume>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub err: String,
}

/// Whether volumes are visible to this host only or cluster-wide.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Local,
    Global,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Capability {
    pub scope: Scope,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CapabilitiesResponse {
    pub capabilities: Capability,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_field_names() {
        let req: MountRequest =
            serde_json::from_str(r#"{"Name":"data","ID":"4103b9f9"}"#).unwrap();
        assert_eq!(req.name, "data");
        assert_eq!(req.id, "4103b9f9");

        let req: CreateRequest = serde_json::from_str(r#"{"Name":"data"}"#).unwrap();
        assert!(req.opts.is_none());
    }

    #[test]
    fn test_empty_err_omitted() {
        let body = serde_json::to_value(ErrorResponse::default()).unwrap();
        assert_eq!(body, serde_json::json!({}));

        let body = serde_json::to_value(MountResponse {
            mountpoint: String::new(),
            err: "volume data not found".into(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"Err": "volume data not found"}));
    }

    #[test]
    fn test_capabilities_shape() {
        let body = serde_json::to_value(CapabilitiesResponse::default()).unwrap();
        assert_eq!(body, serde_json::json!({"Capabilities": {"Scope": "local"}}));
    }
}

//! Plugin adapter request/response bodies over a mock-mode nfs root.

use netvol::VolumePlugin;
use netvol::plugin::types::{CreateRequest, MountRequest, NameRequest};
use netvol_test_utils::TestRoot;
use serde_json::json;

fn plugin(root: &TestRoot) -> VolumePlugin {
    VolumePlugin::new(root.driver("nfs"))
}

#[test]
fn test_protocol_round() {
    let root = TestRoot::new();
    let plugin = plugin(&root);

    let req: CreateRequest =
        serde_json::from_value(json!({"Name": "web", "Opts": {"purgeAfterDelete": "true"}}))
            .unwrap();
    let resp = serde_json::to_value(plugin.create(&req)).unwrap();
    assert_eq!(resp, json!({}));

    let req: MountRequest = serde_json::from_value(json!({"Name": "web", "ID": "abc"})).unwrap();
    let resp = serde_json::to_value(plugin.mount(&req)).unwrap();
    let mountpoint = root.data_dir("web");
    assert_eq!(resp, json!({"Mountpoint": mountpoint.to_string_lossy()}));

    let resp = serde_json::to_value(plugin.list()).unwrap();
    let volumes = resp["Volumes"].as_array().unwrap();
    assert_eq!(volumes.len(), 1);
    assert_eq!(volumes[0]["Name"], "web");
    assert_eq!(volumes[0]["Status"], json!({"mountBy": ["abc"]}));
    assert!(volumes[0]["CreatedAt"].is_string());
    assert!(resp.get("Err").is_none());

    let req = NameRequest { name: "web".into() };
    let resp = serde_json::to_value(plugin.remove(&req)).unwrap();
    assert!(resp["Err"].as_str().unwrap().contains("in use"));

    let resp = serde_json::to_value(plugin.unmount(&req_mount("web", "abc"))).unwrap();
    assert_eq!(resp, json!({}));
    let resp = serde_json::to_value(plugin.remove(&req)).unwrap();
    assert_eq!(resp, json!({}));
    assert!(!mountpoint.exists());

    let resp = serde_json::to_value(plugin.get(&req)).unwrap();
    assert!(resp.get("Volume").is_none());
    assert!(resp["Err"].as_str().unwrap().contains("not found"));

    plugin.destroy().unwrap();
}

#[test]
fn test_capabilities_body() {
    let root = TestRoot::new();
    let resp = serde_json::to_value(plugin(&root).capabilities()).unwrap();
    assert_eq!(resp, json!({"Capabilities": {"Scope": "local"}}));
}

fn req_mount(name: &str, id: &str) -> MountRequest {
    MountRequest {
        name: name.into(),
        id: id.into(),
    }
}

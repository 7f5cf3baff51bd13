//! Property tests for create/get.

use netvol::layout::is_reserved;
use netvol_test_utils::{TestRoot, volume_options};
use proptest::prelude::*;

fn bool_option() -> impl Strategy<Value = Option<bool>> {
    prop_oneof![Just(None), Just(Some(true)), Just(Some(false))]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_create_then_get_round_trips(
        name in "[a-zA-Z0-9][a-zA-Z0-9_.-]{0,40}",
        purge in bool_option(),
        multi in bool_option(),
    ) {
        prop_assume!(!is_reserved(&name));

        let root = TestRoot::new();
        let driver = root.driver("nfs");

        let purge_value = purge.map(|v| v.to_string());
        let multi_value = multi.map(|v| v.to_string());
        let mut pairs = Vec::new();
        if let Some(v) = &purge_value {
            pairs.push(("purgeAfterDelete", v.as_str()));
        }
        if let Some(v) = &multi_value {
            pairs.push(("allowMultipleMount", v.as_str()));
        }

        driver.create(&name, &volume_options(&pairs)).unwrap();
        let metadata = driver.get(&name).unwrap();

        prop_assert_eq!(metadata.spec.purge_after_delete, purge.unwrap_or(false));
        prop_assert_eq!(metadata.spec.allow_multiple_mount, multi.unwrap_or(false));
        prop_assert!(!metadata.status.is_mounted());
        prop_assert_eq!(driver.path(&name).unwrap(), metadata.mountpoint.clone());
        prop_assert!(root.data_dir(&name).is_dir());

        let listed = driver.list().unwrap();
        prop_assert_eq!(listed.len(), 1);
        prop_assert_eq!(listed.get(&name), Some(&metadata));

        driver.destroy().unwrap();
    }
}

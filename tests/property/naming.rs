// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Paths and Entity Names

use hdfs_provisioner::domain::{join_path, sanitize};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_joined_paths_are_normalized(
        root in "[/\\\\]?[a-c/\\\\]{0,8}",
        folder in "[a-c/\\\\]{1,8}",
    ) {
        if let Ok(path) = join_path(&root, &folder) {
            prop_assert!(!path.contains('\\'));
            prop_assert!(!path.contains("//"));
            prop_assert!(path == "/" || !path.ends_with('/'));
        }
    }

    #[test]
    fn prop_join_keeps_absolute_roots(root in "/[a-c]{1,4}", folder in "[a-c]{1,4}") {
        let path = join_path(&root, &folder).unwrap();
        prop_assert_eq!(path, format!("{}/{}", root, folder));
    }

    #[test]
    fn prop_sanitized_names_are_safe(name in "\\PC{0,20}") {
        let sanitized = sanitize(&name);
        prop_assert_eq!(sanitized.chars().count(), name.chars().count());
        prop_assert!(sanitized.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }
}

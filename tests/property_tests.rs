//! Property-Based Tests for hardenkit
//!
//! Uses proptest for testing invariants and edge cases:
//! - Mount option lookup uses the table row or the default, nothing else
//! - Selection parsing never yields indices outside the registry
//! - fstab lines always have six columns

use proptest::prelude::*;

use hardenkit::config_file::{DEFAULT_MOUNT_OPTIONS, HardeningConfig};
use hardenkit::fetch::parse_selection;
use hardenkit::mount_options::SWAP_KEY;
use hardenkit::FstabEntry;

// =============================================================================
// Mount options
// =============================================================================

fn known_mount_point() -> impl Strategy<Value = (&'static str, &'static str)> {
    prop::sample::select(
        DEFAULT_MOUNT_OPTIONS
            .iter()
            .copied()
            .filter(|(k, _)| *k != SWAP_KEY)
            .collect::<Vec<_>>(),
    )
}

proptest! {
    /// Table rows are returned exactly, however the slashes are typed
    #[test]
    fn known_mount_points_use_table_row(
        (mount_point, options) in known_mount_point(),
        leading in 0usize..3,
        trailing in 0usize..3,
    ) {
        let table = HardeningConfig::default().mount_options_table();
        let trimmed = mount_point.trim_start_matches('/');
        let typed = format!("{}{}{}", "/".repeat(leading), trimmed, "/".repeat(trailing));
        prop_assert_eq!(table.options_for(&typed), options);
    }

    /// Anything outside the table gets the default option string
    #[test]
    fn unknown_mount_points_use_default(name in "[a-z]{1,12}") {
        let table = HardeningConfig::default().mount_options_table();
        let mount_point = format!("/zz-{}", name);
        prop_assert_eq!(table.options_for(&mount_point), "defaults");
    }
}

// =============================================================================
// Selection parsing
// =============================================================================

proptest! {
    /// Every parsed number lands in exactly one bucket and valid ones are in range
    #[test]
    fn selection_partitions_input(
        numbers in prop::collection::vec(-20i64..40, 1..12),
        len in 1usize..20,
    ) {
        let input = numbers
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let selection = parse_selection(&input, len).expect("numeric input parses");

        let valid = selection.valid();
        let invalid = selection.invalid();
        for index in &valid {
            prop_assert!((1..=len).contains(index));
        }
        let mut deduped = valid.clone();
        deduped.sort_unstable();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), valid.len());

        for n in &numbers {
            let in_range = *n >= 1 && (*n as usize) <= len;
            if in_range {
                prop_assert!(valid.contains(&(*n as usize)));
            } else {
                prop_assert!(invalid.contains(&n.to_string().as_str()));
            }
        }
    }

    /// A single non-numeric token rejects the whole input
    #[test]
    fn non_numeric_token_rejects(
        prefix in prop::collection::vec(1i64..10, 0..4),
        word in "[a-z]{1,6}",
    ) {
        let mut tokens: Vec<String> = prefix.iter().map(|n| n.to_string()).collect();
        tokens.push(word);
        prop_assert!(parse_selection(&tokens.join(","), 11).is_err());
    }
}

// =============================================================================
// fstab entries
// =============================================================================

proptest! {
    #[test]
    fn fstab_line_has_six_columns(
        uuid in "[0-9a-f]{8}-[0-9a-f]{4}",
        mount_point in "/[a-z]{1,8}(/[a-z]{1,8})?",
        fs_type in prop::sample::select(vec!["xfs", "ext4", "btrfs"]),
    ) {
        let entry =
            FstabEntry::partition(uuid.clone(), mount_point.clone(), fs_type, "nodev,nosuid");
        let line = entry.to_line();
        prop_assert!(line.ends_with('\n'));
        let columns: Vec<&str> = line.split_whitespace().collect();
        prop_assert_eq!(columns.len(), 6);
        let uuid_column = format!("UUID={}", uuid);
        prop_assert_eq!(columns[0], uuid_column.as_str());
        prop_assert_eq!(columns[1], mount_point.as_str());
    }
}

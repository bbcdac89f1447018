use std::collections::HashSet;

use super::*;

#[test]
fn ids_have_prefix_timestamp_and_suffix() {
    let id = fresh_id("text");
    let parts: Vec<&str> = id.split('_').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "text");
    assert!(parts[1].parse::<i64>().is_ok());
    assert_eq!(parts[2].len(), SUFFIX_LEN);
    assert!(
        parts[2]
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
    );
}

#[test]
fn ids_are_unique_in_a_tight_loop() {
    let ids: HashSet<String> = (0..2000).map(|_| fresh_id("shape")).collect();
    assert_eq!(ids.len(), 2000);
}

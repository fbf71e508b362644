//! 식별자 정렬 키 속성 테스트

use ovrgen_core::identifier::{SENTINEL_KEY, canonical_key, sort_identifiers};
use proptest::prelude::*;

fn identifier(year: u32, number: u64) -> String {
    format!("CVE-{year:04}-{number:04}-x")
}

proptest! {
    #[test]
    fn key_is_strictly_increasing_in_year_then_number(
        y1 in 1999u32..=2099,
        n1 in 0u64..10_000_000_000,
        y2 in 1999u32..=2099,
        n2 in 0u64..10_000_000_000,
    ) {
        let k1 = canonical_key(&identifier(y1, n1));
        let k2 = canonical_key(&identifier(y2, n2));
        prop_assert_eq!(k1.cmp(&k2), (y1, n1).cmp(&(y2, n2)));
    }

    #[test]
    fn sorting_is_idempotent(ids in proptest::collection::vec("[A-Z]{3}-[0-9]{4}-[0-9]{1,6}(-[a-z]{1,3})?", 0..40)) {
        let mut once = ids.clone();
        sort_identifiers(&mut once);
        let mut twice = once.clone();
        sort_identifiers(&mut twice);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn arbitrary_input_never_panics(s in ".*") {
        let _ = canonical_key(&s);
    }
}

#[test]
fn sentinel_entries_precede_every_well_formed_key() {
    assert!(SENTINEL_KEY < canonical_key("CVE-1999-0001-x"));

    let mut ids = vec!["CVE-1999-0001-x", "garbage", "CVE-2024-3094"];
    sort_identifiers(&mut ids);
    assert_eq!(ids, vec!["garbage", "CVE-2024-3094", "CVE-1999-0001-x"]);
}

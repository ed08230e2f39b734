use super::*;

#[test]
fn checksum_is_lower_hex_sha256() {
    assert_eq!(
        compute_checksum(""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn checksum_changes_with_input() {
    assert_ne!(compute_checksum("CREATE TABLE a (x);"), compute_checksum("CREATE TABLE a (y);"));
    assert_eq!(compute_checksum("abc").len(), 64);
}

#![no_main]

use libfuzzer_sys::fuzz_target;
use skill_packager::{validate_skill_name, MAX_SKILL_NAME_LENGTH};

fuzz_target!(|data: &[u8]| {
    let Ok(name) = std::str::from_utf8(data) else {
        return;
    };

    let accepted = validate_skill_name(name).is_ok();
    let expected = !name.is_empty()
        && name.len() <= MAX_SKILL_NAME_LENGTH
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
    assert_eq!(accepted, expected);
});

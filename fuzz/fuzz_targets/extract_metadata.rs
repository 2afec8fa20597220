#![no_main]

use libfuzzer_sys::fuzz_target;
use skill_packager::{extract_metadata, AllowedTools};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = extract_metadata(input);
        let wrapped = format!("---\n{input}\n---\n");
        if let Ok(metadata) = extract_metadata(&wrapped) {
            let _ = metadata.allowed_tools.annotation();
        }
        let _ = AllowedTools::parse(Some(input)).annotation();
    }
});

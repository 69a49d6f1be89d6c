#![no_main]

//! `parse_speed` never panics and accepts its own canonical rendering.

use libfuzzer_sys::fuzz_target;
use modalkit_core::options::parse_speed;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(speed) = parse_speed(raw) {
        let ms = speed.as_millis();
        assert_eq!(parse_speed(&format!("{ms}ms")).ok(), Some(speed));
        assert_eq!(parse_speed(&ms.to_string()).ok(), Some(speed));
    }
});

#![no_main]

//! Fuzz target for POM parsing and version resolution.

use libfuzzer_sys::fuzz_target;
use optbind_pom::{parse_pom, resolve_coordinates};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(pom) = parse_pom(s, "fuzz.xml") else {
        return;
    };
    // Self-resolution exercises property interpolation, including cycles.
    let _ = resolve_coordinates(&pom, &pom);
});

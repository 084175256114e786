#![no_main]

use libfuzzer_sys::fuzz_target;
use stringer_core::manifest::{parse_manifest, ResolveOptions};
use stringer_core::{generate_file, FileHeader, GenerateOptions};

fuzz_target!(|data: &[u8]| {
    let data = if data.len() > 64 * 1024 {
        &data[..64 * 1024]
    } else {
        data
    };

    let Ok(manifest) = parse_manifest(data) else {
        return;
    };
    let resolved = manifest.resolve(&[], &ResolveOptions::default());
    let options = GenerateOptions {
        lookup_template: "{}FromString".to_string(),
        ..GenerateOptions::default()
    };
    // Arbitrary references may not parse; that is reported, never a panic.
    let _ = generate_file(&resolved.types, &options, &FileHeader::default());
});

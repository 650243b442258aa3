#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate ruhuff;
use std::io::Read;

fuzz_target!(|data: &[u8]| {
    // arbitrary input must produce an error or output, never a panic
    if let Ok(decoder) = ruhuff::StreamingDecoder::new(data) {
        let mut output = Vec::new();
        _ = decoder.take(1 << 24).read_to_end(&mut output);
    }
    _ = ruhuff::decode(data, std::io::sink());
});

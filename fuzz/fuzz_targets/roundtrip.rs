#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate ruhuff;

fuzz_target!(|data: &[u8]| {
    let container = ruhuff::compress_to_vec(data, 0o644).unwrap();
    let header = ruhuff::read_container_header(&container[..]).unwrap();
    assert_eq!(header.original_file_size, data.len() as u64);

    let decoded = ruhuff::decompress_to_vec(&container).unwrap();
    assert_eq!(data, &decoded[..]);
});

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Just no panic
    let Some((&[flags, w, h], blocks)) = data.split_first_chunk::<3>() else {
        return;
    };
    let flags = dxtc::Flags::from_bits_truncate(flags as u32);
    let (width, height) = (w as u32 % 64, h as u32 % 64);

    if let Ok(len) = dxtc::storage_requirements(width, height, flags) {
        let mut rgba = vec![0; width as usize * height as usize * 4];
        let result = dxtc::decompress_image(&mut rgba, width, height, blocks, flags);
        assert_eq!(result.is_ok(), blocks.len() >= len);
    }

    let mut block = [0; 64];
    _ = dxtc::decompress(&mut block, blocks, flags);
});

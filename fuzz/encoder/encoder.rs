#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&[f0, f1, m0, m1], rest)) = data.split_first_chunk::<4>() else {
        return;
    };
    let Some(rgba) = rest.first_chunk::<64>() else {
        return;
    };
    let flags = dxtc::Flags::from_bits_truncate(u16::from_le_bytes([f0, f1]) as u32);
    let mask = u16::from_le_bytes([m0, m1]);

    let mut block = [0; 16];
    if dxtc::compress_masked(rgba, mask, &mut block, flags).is_ok() {
        let mut decoded = [0; 64];
        dxtc::decompress(&mut decoded, &block, flags).expect("valid block");

        let mut again = [0; 16];
        dxtc::compress_masked(rgba, mask, &mut again, flags).expect("same flags");
        assert_eq!(block, again, "compression must be deterministic");
    }
});

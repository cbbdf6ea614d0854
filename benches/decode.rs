use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dxtc::*;
use rand::{Rng, SeedableRng};

fn random_bytes(len: usize) -> Vec<u8> {
    let mut out = vec![0; len];
    let mut rng = rand_chacha::ChaChaRng::seed_from_u64(123456789);
    rng.fill(out.as_mut_slice());
    out
}

type DataModifier = Box<dyn FnMut(&mut [u8])>;
struct BenchConfig {
    data_modifier: DataModifier,
    size: Size,
    parallel: bool,
    name: String,
}
impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            data_modifier: Box::new(|_| {}),
            size: Size::new(4096, 4096),
            parallel: false,
            name: String::new(),
        }
    }
}
fn bench_decoder(c: &mut Criterion, format: Format) {
    bench_decoder_with(c, format, |_| {});
}
fn bench_decoder_with(c: &mut Criterion, format: Format, create_config: impl FnOnce(&mut BenchConfig)) {
    let mut config = BenchConfig::default();
    create_config(&mut config);

    let size = config.size;
    let mut name = format!("{:?} - {}x{}", format, size.width, size.height);
    if !config.name.is_empty() {
        name += " - ";
        name += &config.name;
    }

    c.bench_function(&name, |b| {
        let params = Params::new(format).with_parallel(config.parallel);
        let mut bytes = random_bytes(params.storage_requirements(size).unwrap());
        (config.data_modifier)(&mut bytes);
        let mut output = vec![0; size.width as usize * size.height as usize * 4];

        b.iter(|| {
            let result = params.decompress_image(&mut output, size, black_box(&bytes));
            black_box(result).unwrap();
        });
    });
}

/// Makes all color blocks use the 3-color palette.
fn bc1_3_color_mode(data: &mut [u8]) {
    for block in data.chunks_exact_mut(8) {
        let c0 = u16::from_le_bytes([block[0], block[1]]);
        let c1 = u16::from_le_bytes([block[2], block[3]]);
        if c0 > c1 {
            block[..2].copy_from_slice(&c1.to_le_bytes());
            block[2..4].copy_from_slice(&c0.to_le_bytes());
        }
    }
}

pub fn block_compressed(c: &mut Criterion) {
    bench_decoder(c, Format::Bc1);
    bench_decoder_with(c, Format::Bc1, |c| {
        c.size = Size::new(4095, 4095);
    });
    bench_decoder_with(c, Format::Bc1, |c| {
        c.data_modifier = Box::new(bc1_3_color_mode);
        c.name = "3-color".into();
    });
    bench_decoder(c, Format::Bc2);
    bench_decoder(c, Format::Bc3);
    bench_decoder_with(c, Format::Bc3, |c| {
        c.parallel = true;
        c.name = "parallel".into();
    });
}

criterion_group!(benches, block_compressed);
criterion_main!(benches);

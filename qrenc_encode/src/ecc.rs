use qrenc_core::qrstandard;
use qrenc_core::{Ecl, Version};

/// Split the data `codewords` into blocks, append Reed-Solomon error correction to each of them and interleave the
/// result in the order the codewords are placed on the canvas.
///
/// # Panics
/// Panics if the number of `codewords` does not match the data capacity of `version` and `ecl`.
pub fn add_error_correction(codewords: &[u8], version: Version, ecl: Ecl) -> Vec<u8> {
    assert_eq!(
        codewords.len(),
        qrstandard::num_data_codewords(version, ecl),
        "codewords do not match the capacity of version {} with ECL {}",
        version,
        ecl
    );
    let num_blocks = qrstandard::num_ecc_blocks(version, ecl);
    let ecc_len = qrstandard::ecc_codewords_per_block(version, ecl);
    let raw_codewords = qrstandard::num_raw_data_modules(version) / 8;
    // Short blocks come first, long blocks carry one more data codeword.
    let num_short_blocks = num_blocks - raw_codewords % num_blocks;
    let short_block_data_len = raw_codewords / num_blocks - ecc_len;

    let encoder = reed_solomon::Encoder::new(ecc_len);
    let mut data_blocks = Vec::with_capacity(num_blocks);
    let mut ecc_blocks = Vec::with_capacity(num_blocks);
    let mut offset = 0;
    for block in 0..num_blocks {
        let len = short_block_data_len + usize::from(block >= num_short_blocks);
        let data = &codewords[offset..offset + len];
        let encoded = encoder.encode(data);
        ecc_blocks.push(encoded.ecc().to_vec());
        data_blocks.push(data);
        offset += len;
    }

    let mut result = Vec::with_capacity(raw_codewords);
    for i in 0..=short_block_data_len {
        for block in &data_blocks {
            if let Some(&codeword) = block.get(i) {
                result.push(codeword);
            }
        }
    }
    for i in 0..ecc_len {
        for block in &ecc_blocks {
            result.push(block[i]);
        }
    }
    result
}

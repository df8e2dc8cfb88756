//! Sample text generation for the demo command.
//!
//! Generated text mixes sections with different symbol statistics so the
//! compression summary has something to show:
//! - prose built from a small vocabulary (skewed letter frequencies)
//! - runs of a single character (one dominant symbol)
//! - number tables (digits, separators, newlines)
//! - printable ASCII noise (near-uniform frequencies)

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::io::Write;

const WORDS: &[&str] = &[
    "the", "of", "and", "a", "to", "in", "is", "you", "that", "it", "he", "was", "for", "on",
    "are", "as", "with", "his", "they", "at", "be", "this", "have", "from", "or", "one", "had",
    "by", "word", "but", "not", "what", "all", "were", "we", "when", "your", "can", "said",
    "there", "use", "an", "each", "which", "she", "do", "how", "their", "if", "will", "up",
    "other", "about", "out", "many", "then", "them", "these", "so", "some", "her", "would",
    "make", "like", "him", "into", "time", "has", "look", "two", "more", "write", "go", "see",
];

/// Generate sample text with mixed compressibility.
///
/// # Arguments
/// - `seed`: random seed for determinism
/// - `size_bytes`: exact size of the generated text
pub fn generate_sample_text(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let section_size = (size_bytes - data.len()).min(2048);

        match rng.gen_range(0..10u8) {
            // 60% prose
            0..=5 => push_prose(&mut rng, &mut data, section_size),

            // 10% runs of one character
            6 => {
                let c = rng.gen_range(b'a'..=b'z');
                data.extend(std::iter::repeat(c).take(section_size.min(256)));
            }

            // 20% number tables
            7..=8 => push_numbers(&mut rng, &mut data, section_size),

            // 10% printable noise
            _ => {
                for _ in 0..section_size.min(512) {
                    data.push(rng.gen_range(b' '..=b'~'));
                }
            }
        }
    }

    data.truncate(size_bytes);
    data
}

fn push_prose(rng: &mut ChaCha8Rng, data: &mut Vec<u8>, budget: usize) {
    let end = data.len() + budget;
    let mut capitalize = true;
    while data.len() < end {
        // squaring biases toward the common words at the front of the list
        let r: f64 = rng.gen();
        let word = WORDS[((r * r) * WORDS.len() as f64) as usize];

        let start = data.len();
        data.extend_from_slice(word.as_bytes());
        if capitalize {
            data[start] = data[start].to_ascii_uppercase();
            capitalize = false;
        }

        match rng.gen_range(0..20u8) {
            0 => {
                data.extend_from_slice(b".\n");
                capitalize = true;
            }
            1..=2 => {
                data.extend_from_slice(b". ");
                capitalize = true;
            }
            3 => data.extend_from_slice(b", "),
            _ => data.push(b' '),
        }
    }
}

fn push_numbers(rng: &mut ChaCha8Rng, data: &mut Vec<u8>, budget: usize) {
    let end = data.len() + budget;
    while data.len() < end {
        let columns = rng.gen_range(2..=5);
        for column in 0..columns {
            if column > 0 {
                data.push(b'\t');
            }
            let n: u32 = rng.gen_range(0..100_000);
            data.extend_from_slice(n.to_string().as_bytes());
        }
        data.push(b'\n');
    }
}

/// Write generated text to a file.
pub fn write_sample_file(path: &std::path::Path, seed: u64, size_bytes: usize) -> std::io::Result<()> {
    let data = generate_sample_text(seed, size_bytes);
    let mut file = std::fs::File::create(path)?;
    file.write_all(&data)?;
    Ok(())
}

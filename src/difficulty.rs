//! Lexile score -> 1..=10 difficulty tier, and the page estimate.

/// Inclusive upper bound of each tier, tiers 1 through 9. Anything above is 10.
const LEXILE_TIERS: [i32; 9] = [295, 545, 760, 950, 1080, 1165, 1235, 1295, 1350];

const WORDS_PER_PAGE: f64 = 500.0;
const PAGE_FACTOR: f64 = 1.8;

pub fn difficulty_tier(lexile_score: i32) -> u8 {
    LEXILE_TIERS
        .iter()
        .position(|&upper| lexile_score <= upper)
        .map(|i| i as u8 + 1)
        .unwrap_or(10)
}

/// round(total_words / 500 * 1.8)
pub fn estimated_pages(total_words: usize) -> u32 {
    ((total_words as f64 / WORDS_PER_PAGE) * PAGE_FACTOR).round() as u32
}

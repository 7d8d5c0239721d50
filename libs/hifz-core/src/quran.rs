//! Static Quran reference tables.
//!
//! Read-only metadata for the canonical 6,236-verse corpus: per-chapter
//! verse counts, the page each chapter begins on (standard 604-page
//! layout), and the starting verse of each thirty-part division.
//!
//! The tables partition the verse set: every verse belongs to exactly one
//! chapter, one page, and one division. Page membership assigns every verse
//! of a chapter to the page the chapter starts on, so pages where no
//! chapter begins have zero member verses. A per-verse page table can
//! replace that assignment without touching any consumer of this module.

use crate::types::VerseKey;

pub const CHAPTER_COUNT: u16 = 114;
pub const PAGE_COUNT: u16 = 604;
pub const DIVISION_COUNT: u16 = 30;
pub const TOTAL_VERSES: u32 = 6236;

/// Verses per chapter, indexed by chapter number - 1.
const VERSE_COUNTS: [u16; 114] = [
    7, 286, 200, 176, 120, 165, 206, 75, 129, 109, 123, 111, 43, 52, 99,
    128, 111, 110, 98, 135, 112, 78, 118, 64, 77, 227, 93, 88, 69, 60, 34,
    30, 73, 54, 45, 83, 182, 88, 75, 85, 54, 53, 89, 59, 37, 35, 38, 29,
    18, 45, 60, 49, 62, 55, 78, 96, 29, 22, 24, 13, 14, 11, 11, 18, 12,
    12, 30, 52, 52, 44, 28, 28, 20, 56, 40, 31, 50, 40, 46, 42, 29, 19,
    36, 25, 22, 17, 19, 26, 30, 20, 15, 21, 11, 8, 8, 19, 5, 8, 8, 11,
    11, 8, 3, 9, 5, 4, 7, 3, 6, 3, 5, 4, 5, 6,
];

/// Page on which each chapter begins, indexed by chapter number - 1.
const CHAPTER_START_PAGES: [u16; 114] = [
    1, 2, 50, 77, 106, 128, 151, 177, 187, 208, 221, 235, 249, 255, 262,
    267, 282, 293, 305, 312, 322, 332, 342, 350, 359, 367, 377, 385, 396,
    404, 411, 415, 418, 428, 434, 440, 446, 453, 458, 467, 477, 483, 489,
    496, 499, 502, 507, 511, 515, 518, 520, 523, 526, 528, 531, 534, 537,
    542, 545, 549, 551, 553, 554, 556, 558, 560, 562, 564, 566, 568, 570,
    572, 574, 575, 577, 578, 580, 582, 583, 585, 586, 587, 587, 589, 590,
    591, 591, 592, 593, 594, 595, 595, 596, 596, 597, 597, 598, 598, 599,
    599, 600, 600, 601, 601, 601, 602, 602, 602, 603, 603, 603, 604, 604,
    604,
];

/// First verse of each thirty-part division.
const DIVISION_STARTS: [(u16, u16); 30] = [
    (1, 1),
    (2, 142),
    (2, 253),
    (3, 93),
    (4, 24),
    (4, 148),
    (5, 82),
    (6, 111),
    (7, 88),
    (8, 41),
    (9, 93),
    (11, 6),
    (12, 53),
    (15, 1),
    (17, 1),
    (18, 75),
    (21, 1),
    (23, 1),
    (25, 21),
    (27, 56),
    (29, 46),
    (33, 31),
    (36, 28),
    (39, 32),
    (41, 47),
    (46, 1),
    (51, 31),
    (58, 1),
    (67, 1),
    (78, 1),
];

/// Verse count of a chapter, or None for an out-of-range chapter number.
pub fn verse_count(chapter: u16) -> Option<u16> {
    VERSE_COUNTS.get(chapter.checked_sub(1)? as usize).copied()
}

/// Whether the key names a verse of the canonical corpus.
pub fn is_valid_key(key: VerseKey) -> bool {
    verse_count(key.chapter).is_some_and(|count| key.verse >= 1 && key.verse <= count)
}

/// Every verse of a chapter, in order. Empty for an out-of-range chapter.
pub fn verses_in_chapter(chapter: u16) -> impl Iterator<Item = VerseKey> {
    let count = verse_count(chapter).unwrap_or(0);
    (1..=count).map(move |verse| VerseKey::new(chapter, verse))
}

/// Chapters that begin on the given page.
pub fn chapters_on_page(page: u16) -> impl Iterator<Item = u16> {
    (1..=CHAPTER_COUNT).filter(move |&chapter| CHAPTER_START_PAGES[(chapter - 1) as usize] == page)
}

/// Member verses of a page: all verses of the chapters starting on it.
pub fn verses_on_page(page: u16) -> impl Iterator<Item = VerseKey> {
    chapters_on_page(page).flat_map(verses_in_chapter)
}

/// Page a verse belongs to: the starting page of its chapter.
pub fn page_of(key: VerseKey) -> Option<u16> {
    if !is_valid_key(key) {
        return None;
    }
    Some(CHAPTER_START_PAGES[(key.chapter - 1) as usize])
}

/// 1-based position of a verse in reading order.
fn absolute_of(chapter: u16, verse: u16) -> u32 {
    let before: u32 = VERSE_COUNTS[..(chapter - 1) as usize]
        .iter()
        .map(|&count| count as u32)
        .sum();
    before + verse as u32
}

fn absolute_index(key: VerseKey) -> Option<u32> {
    if !is_valid_key(key) {
        return None;
    }
    Some(absolute_of(key.chapter, key.verse))
}

/// Verse at a 1-based reading-order position.
fn key_at(mut index: u32) -> Option<VerseKey> {
    if index == 0 {
        return None;
    }
    for (i, &count) in VERSE_COUNTS.iter().enumerate() {
        if index <= count as u32 {
            return Some(VerseKey::new((i + 1) as u16, index as u16));
        }
        index -= count as u32;
    }
    None
}

/// Next verse in reading order, crossing chapter boundaries.
fn next_key(key: VerseKey) -> Option<VerseKey> {
    let count = verse_count(key.chapter)?;
    if key.verse < count {
        Some(VerseKey::new(key.chapter, key.verse + 1))
    } else if key.chapter < CHAPTER_COUNT {
        Some(VerseKey::new(key.chapter + 1, 1))
    } else {
        None
    }
}

/// Absolute [start, end) span of a division.
fn division_span(division: u16) -> Option<(u32, u32)> {
    let i = division.checked_sub(1)? as usize;
    let &(chapter, verse) = DIVISION_STARTS.get(i)?;
    let start = absolute_of(chapter, verse);
    let end = DIVISION_STARTS
        .get(i + 1)
        .map(|&(c, v)| absolute_of(c, v))
        .unwrap_or(TOTAL_VERSES + 1);
    Some((start, end))
}

/// Number of verses in a division, 0 for an out-of-range division number.
pub fn division_total(division: u16) -> u32 {
    division_span(division).map(|(start, end)| end - start).unwrap_or(0)
}

/// Member verses of a division, in reading order.
pub fn verses_in_division(division: u16) -> impl Iterator<Item = VerseKey> {
    let (start, end) = division_span(division).unwrap_or((1, 1));
    std::iter::successors(key_at(start), |&key| next_key(key)).take((end - start) as usize)
}

/// Division a verse belongs to.
pub fn division_of(key: VerseKey) -> Option<u16> {
    let index = absolute_index(key)?;
    let mut division = 1u16;
    for (i, &(chapter, verse)) in DIVISION_STARTS.iter().enumerate() {
        if absolute_of(chapter, verse) <= index {
            division = (i + 1) as u16;
        } else {
            break;
        }
    }
    Some(division)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn verse_counts_sum_to_corpus_total() {
        let sum: u32 = (1..=CHAPTER_COUNT)
            .map(|c| verse_count(c).unwrap() as u32)
            .sum();
        assert_eq!(sum, TOTAL_VERSES);
    }

    #[test]
    fn out_of_range_lookups_are_none_or_empty() {
        assert_eq!(verse_count(0), None);
        assert_eq!(verse_count(115), None);
        assert_eq!(verses_in_chapter(0).count(), 0);
        assert_eq!(verses_on_page(0).count(), 0);
        assert_eq!(verses_on_page(605).count(), 0);
        assert_eq!(division_total(0), 0);
        assert_eq!(division_total(31), 0);
        assert_eq!(verses_in_division(31).count(), 0);
        assert_eq!(page_of(VerseKey::new(1, 8)), None);
        assert_eq!(division_of(VerseKey::new(115, 1)), None);
    }

    #[test]
    fn every_verse_belongs_to_one_page_and_one_division() {
        let mut total = 0u32;
        for chapter in 1..=CHAPTER_COUNT {
            for key in verses_in_chapter(chapter) {
                assert!(page_of(key).is_some(), "no page for {key}");
                assert!(division_of(key).is_some(), "no division for {key}");
                total += 1;
            }
        }
        assert_eq!(total, TOTAL_VERSES);
    }

    #[test]
    fn page_membership_partitions_the_corpus() {
        let total: u32 = (1..=PAGE_COUNT)
            .map(|page| verses_on_page(page).count() as u32)
            .sum();
        assert_eq!(total, TOTAL_VERSES);
    }

    #[test]
    fn division_totals_partition_the_corpus() {
        let total: u32 = (1..=DIVISION_COUNT).map(division_total).sum();
        assert_eq!(total, TOTAL_VERSES);

        let iterated: u32 = (1..=DIVISION_COUNT)
            .map(|d| verses_in_division(d).count() as u32)
            .sum();
        assert_eq!(iterated, TOTAL_VERSES);
    }

    #[test]
    fn division_boundaries() {
        assert_eq!(division_of(VerseKey::new(1, 1)), Some(1));
        assert_eq!(division_of(VerseKey::new(2, 141)), Some(1));
        assert_eq!(division_of(VerseKey::new(2, 142)), Some(2));
        assert_eq!(division_of(VerseKey::new(78, 1)), Some(30));
        assert_eq!(division_of(VerseKey::new(114, 6)), Some(30));

        let first: Vec<VerseKey> = verses_in_division(1).take(2).collect();
        assert_eq!(first, vec![VerseKey::new(1, 1), VerseKey::new(1, 2)]);
    }

    #[test]
    fn divisions_agree_with_membership() {
        for division in 1..=DIVISION_COUNT {
            for key in verses_in_division(division) {
                assert_eq!(division_of(key), Some(division), "misplaced {key}");
            }
        }
    }

    #[test]
    fn pages_agree_with_membership() {
        for page in 1..=PAGE_COUNT {
            for key in verses_on_page(page) {
                assert_eq!(page_of(key), Some(page), "misplaced {key}");
            }
        }
    }
}

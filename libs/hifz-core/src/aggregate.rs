//! Derived progress over pages, chapters, and thirty-part divisions.
//!
//! Pure read functions over the sparse verse map; nothing here is stored.
//! Out-of-range unit numbers yield zero-progress values instead of errors,
//! since these queries back passive display.

use crate::quran;
use crate::streak::Streak;
use crate::types::{GlobalStats, MemorizationStatus, UnitProgress, VerseKey, VerseMap};

fn derive_status(memorized: u32, in_progress: u32, total: u32) -> MemorizationStatus {
    if total > 0 && memorized == total {
        MemorizationStatus::Memorized
    } else if memorized > 0 || in_progress > 0 {
        MemorizationStatus::InProgress
    } else {
        MemorizationStatus::NotStarted
    }
}

fn unit_progress<I>(number: u16, verses: &VerseMap, members: I) -> UnitProgress
where
    I: Iterator<Item = VerseKey>,
{
    let mut memorized = 0u32;
    let mut in_progress = 0u32;
    let mut total = 0u32;
    for key in members {
        total += 1;
        match verses.get(&key).map(|progress| progress.status) {
            Some(MemorizationStatus::Memorized) => memorized += 1,
            Some(MemorizationStatus::InProgress) => in_progress += 1,
            _ => {}
        }
    }
    let percentage = if total == 0 {
        0.0
    } else {
        memorized as f64 / total as f64 * 100.0
    };
    UnitProgress {
        number,
        status: derive_status(memorized, in_progress, total),
        memorized_count: memorized,
        total_count: total,
        percentage,
    }
}

/// Progress over the verses of one page.
pub fn page_progress(verses: &VerseMap, page: u16) -> UnitProgress {
    unit_progress(page, verses, quran::verses_on_page(page))
}

/// Progress over the verses of one chapter.
pub fn chapter_progress(verses: &VerseMap, chapter: u16) -> UnitProgress {
    unit_progress(chapter, verses, quran::verses_in_chapter(chapter))
}

/// Progress over the verses of one thirty-part division.
pub fn division_progress(verses: &VerseMap, division: u16) -> UnitProgress {
    unit_progress(division, verses, quran::verses_in_division(division))
}

/// Corpus-wide memorized / in-progress totals.
pub fn totals(verses: &VerseMap) -> (u32, u32) {
    let mut memorized = 0u32;
    let mut in_progress = 0u32;
    for progress in verses.values() {
        match progress.status {
            MemorizationStatus::Memorized => memorized += 1,
            MemorizationStatus::InProgress => in_progress += 1,
            MemorizationStatus::NotStarted => {}
        }
    }
    (memorized, in_progress)
}

/// Corpus-wide summary: totals, fully memorized chapters and divisions,
/// due count, and the current streak.
pub fn global_stats(verses: &VerseMap, due_now: usize, streak: &Streak) -> GlobalStats {
    let (total_memorized, total_in_progress) = totals(verses);

    let mut memorized_by_chapter = [0u32; quran::CHAPTER_COUNT as usize];
    let mut memorized_by_division = [0u32; quran::DIVISION_COUNT as usize];
    for (key, progress) in verses {
        if progress.status != MemorizationStatus::Memorized {
            continue;
        }
        if quran::is_valid_key(*key) {
            memorized_by_chapter[(key.chapter - 1) as usize] += 1;
        }
        if let Some(division) = quran::division_of(*key) {
            memorized_by_division[(division - 1) as usize] += 1;
        }
    }

    let chapters_memorized = (1..=quran::CHAPTER_COUNT)
        .filter(|&chapter| {
            let count = quran::verse_count(chapter).unwrap_or(0) as u32;
            count > 0 && memorized_by_chapter[(chapter - 1) as usize] == count
        })
        .count() as u32;
    let divisions_memorized = (1..=quran::DIVISION_COUNT)
        .filter(|&division| {
            let total = quran::division_total(division);
            total > 0 && memorized_by_division[(division - 1) as usize] == total
        })
        .count() as u32;

    GlobalStats {
        total_verses: quran::TOTAL_VERSES,
        total_memorized,
        total_in_progress,
        percentage: total_memorized as f64 / quran::TOTAL_VERSES as f64 * 100.0,
        chapters_memorized,
        divisions_memorized,
        due_now,
        current_streak: streak.current,
        last_activity: streak.last_activity,
    }
}

//! Aggregate progress queries on the store.

use chrono::Utc;
use hifz_core::{aggregate, queue, GlobalStats, UnitProgress};

use crate::persist::KeyValueStore;
use crate::store::HifzStore;

impl<S: KeyValueStore> HifzStore<S> {
    /// Progress over the verses of one page.
    pub fn page_progress(&self, page: u16) -> UnitProgress {
        let state = self.state.read().expect("state lock");
        aggregate::page_progress(&state.progress.verses, page)
    }

    /// Progress over the verses of one chapter.
    pub fn chapter_progress(&self, chapter: u16) -> UnitProgress {
        let state = self.state.read().expect("state lock");
        aggregate::chapter_progress(&state.progress.verses, chapter)
    }

    /// Progress over the verses of one thirty-part division.
    pub fn division_progress(&self, division: u16) -> UnitProgress {
        let state = self.state.read().expect("state lock");
        aggregate::division_progress(&state.progress.verses, division)
    }

    /// Corpus-wide summary, including the due count and streak.
    pub fn global_stats(&self) -> GlobalStats {
        let state = self.state.read().expect("state lock");
        let due_now = queue::due_now(&state.schedule.entries, Utc::now()).len();
        aggregate::global_stats(&state.progress.verses, due_now, &state.streak)
    }
}

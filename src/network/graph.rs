use std::collections::HashSet;

use tracing::Level;

use crate::models::{Member, Rating, Work};

use super::SocialNetwork;

/// How many catalog works a recommendation falls back to.
pub const RECOMMENDATION_BATCH: usize = 10;

impl SocialNetwork {
    /// Friends of `member_id` who have also read `work_id`, in friends-list
    /// order. Empty if either lookup fails.
    pub async fn friends_who_also_read(&self, member_id: i64, work_id: i64) -> Vec<Member> {
        if self.stopped("friends_who_also_read") {
            return Vec::new();
        }
        let friends = self.members.list_friends_of(member_id).await;
        if !friends.success || friends.is_empty() {
            return Vec::new();
        }
        if self.stopped("friends_who_also_read") {
            return Vec::new();
        }
        let readers = self.members.list_readers_of(work_id).await;
        if !readers.success {
            return Vec::new();
        }

        let reader_ids: HashSet<i64> = readers.items.iter().map(|m| m.id).collect();
        friends
            .items
            .into_iter()
            .filter(|f| reader_ids.contains(&f.id))
            .collect()
    }

    /// Works by the authors of everything `member_id` liked, minus the liked
    /// works themselves. Falls back to the first [`RECOMMENDATION_BATCH`]
    /// catalog works when that yields nothing.
    pub async fn recommend(&self, member_id: i64) -> Vec<Work> {
        if self.stopped("recommend") {
            return Vec::new();
        }

        let candidates = self.candidates_from_liked_authors(member_id).await;
        if !candidates.is_empty() {
            self.note(
                Level::DEBUG,
                &format!(
                    "recommend({member_id}) => {} candidate(s)",
                    candidates.len()
                ),
            );
            return candidates;
        }

        if self.stopped("recommend") {
            return Vec::new();
        }
        let catalog = self.books.list_all().await;
        if !catalog.success {
            return Vec::new();
        }
        self.note(
            Level::DEBUG,
            &format!("recommend({member_id}) => catalog fallback"),
        );
        catalog
            .items
            .into_iter()
            .take(RECOMMENDATION_BATCH)
            .collect()
    }

    async fn candidates_from_liked_authors(&self, member_id: i64) -> Vec<Work> {
        let liked = self
            .books
            .list_by_reader(member_id, Some(&Rating::LIKED[..]))
            .await;
        if !liked.success {
            return Vec::new();
        }

        let mut seen: HashSet<i64> = liked.items.iter().map(|w| w.id).collect();
        let mut visited_authors: HashSet<&str> = HashSet::new();
        let mut candidates = Vec::new();

        for author in liked.items.iter().flat_map(|w| w.authors.iter()) {
            if !visited_authors.insert(author.as_str()) {
                continue;
            }
            if self.stopped("recommend") {
                break;
            }
            let by_author = self.books.list_by_author_name(author).await;
            if !by_author.success {
                continue;
            }
            // The lookup is a substring search; "Ann" also finds "Anne Rice".
            for work in by_author
                .items
                .into_iter()
                .filter(|w| w.authors.iter().any(|a| a == author))
            {
                if seen.insert(work.id) {
                    candidates.push(work);
                }
            }
        }
        candidates
    }
}

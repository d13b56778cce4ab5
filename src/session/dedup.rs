use std::collections::HashSet;

use super::model::Publication;

/// Drops every publication that shares an id or an exact title with an earlier entry.
///
/// Earlier entries count even when they were themselves dropped, and the first occurrence
/// always wins regardless of how much metadata later duplicates carry.
pub fn dedup_publications(publications: Vec<Publication>) -> Vec<Publication> {
	let mut seen_ids = HashSet::new();
	let mut seen_titles = HashSet::new();
	let mut kept = Vec::with_capacity(publications.len());

	for publication in publications {
		let id_seen = publication
			.id
			.as_ref()
			.is_some_and(|id| seen_ids.contains(id));
		let title_seen = seen_titles.contains(&publication.title);

		if let Some(id) = &publication.id {
			seen_ids.insert(id.clone());
		}
		seen_titles.insert(publication.title.clone());

		if !id_seen && !title_seen {
			kept.push(publication);
		}
	}
	kept
}

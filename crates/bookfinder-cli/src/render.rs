// Plain-text output for the terminal
use bookfinder_core::{BookRecord, CoverSize, FavoritesStore, Links, SearchPage};
use chrono::{DateTime, Utc};

const FAVORITE_MARK: &str = "♥";

pub fn results(query: &str, page: &SearchPage, favorites: &FavoritesStore) -> String {
    let mut out = String::new();

    if page.records.is_empty() {
        out.push_str(&format!("No books found for \"{}\".\n", query));
        return out;
    }

    out.push_str(&format!(
        "Found {} results for \"{}\" (showing {})\n\n",
        page.total_available,
        query,
        page.records.len()
    ));

    for (i, book) in page.records.iter().enumerate() {
        let mark = if favorites.is_favorite(book) { FAVORITE_MARK } else { " " };
        out.push_str(&format!(
            "{:>3}. {} {} by {} ({})\n",
            i + 1,
            mark,
            book.display_title(),
            book.display_authors(2),
            book.display_year()
        ));

        let subjects = book.subjects();
        if !subjects.is_empty() {
            out.push_str(&format!("        {}\n", take_joined(subjects, 3)));
        }
    }

    out
}

pub fn details(book: &BookRecord, is_favorite: bool, links: &Links, cover: CoverSize) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", book.display_title()));
    if !book.authors().is_empty() {
        out.push_str(&format!("by {}\n", book.authors().join(", ")));
    }
    out.push('\n');

    out.push_str(&format!("First published: {}\n", book.display_year()));
    if !book.publishers().is_empty() {
        out.push_str(&format!("Publishers:      {}\n", take_joined(book.publishers(), 3)));
    }
    if !book.languages().is_empty() {
        out.push_str(&format!(
            "Languages:       {}\n",
            take_joined(book.languages(), 5).to_uppercase()
        ));
    }

    if !book.subjects().is_empty() {
        out.push_str(&format!("Subjects:        {}\n", take_joined(book.subjects(), 12)));
    }

    let isbns = book.isbns();
    if !isbns.is_empty() {
        let shown: Vec<&str> = isbns.iter().take(6).map(String::as_str).collect();
        out.push_str(&format!("ISBN:            {}\n", shown.join(", ")));
        if isbns.len() > 6 {
            out.push_str(&format!(
                "                 +{} more ISBN numbers available\n",
                isbns.len() - 6
            ));
        }
    }

    out.push('\n');
    if let Some(url) = links.cover_url(book, cover) {
        out.push_str(&format!("Cover:           {}\n", url));
    }
    out.push_str(&format!("Open Library:    {}\n", links.catalog_url(book)));
    if let Some(url) = links.worldcat_url(book) {
        out.push_str(&format!("WorldCat:        {}\n", url));
    }
    if let Some(url) = links.amazon_url(book) {
        out.push_str(&format!("Amazon:          {}\n", url));
    }

    if is_favorite {
        out.push_str(&format!("\n{} In your reading list\n", FAVORITE_MARK));
    }

    out
}

pub fn favorites_list(books: &[BookRecord], last_saved: Option<DateTime<Utc>>) -> String {
    if books.is_empty() {
        return "Your reading list is empty. Favorite a search result with --favorite N.\n"
            .to_string();
    }

    let mut out = format!(
        "My Reading List ({} book{})\n\n",
        books.len(),
        if books.len() == 1 { "" } else { "s" }
    );

    for (i, book) in books.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {} by {} ({})\n",
            i + 1,
            book.display_title(),
            book.display_authors(2),
            book.display_year()
        ));
        out.push_str(&format!("     {}\n", book.key));
        if !book.subjects().is_empty() {
            out.push_str(&format!("     {}\n", take_joined(book.subjects(), 3)));
        }
    }

    if let Some(ts) = last_saved {
        out.push_str(&format!("\nLast saved {}\n", ts.format("%Y-%m-%d %H:%M UTC")));
    }

    out
}

/// First `limit` values, with a "+N more" tail when truncated
fn take_joined(values: &[String], limit: usize) -> String {
    let shown: Vec<&str> = values.iter().take(limit).map(String::as_str).collect();
    let mut joined = shown.join(", ");
    if values.len() > limit {
        joined.push_str(&format!(" +{} more", values.len() - limit));
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookfinder_core::MemoryStorage;

    fn dune() -> BookRecord {
        BookRecord {
            author_names: Some(vec!["Frank Herbert".into()]),
            first_publish_year: Some(1965),
            cover_id: Some(8231856),
            isbns: Some((0..8).map(|i| format!("97804410135{:02}", i)).collect()),
            languages: Some(vec!["eng".into(), "fre".into()]),
            ..BookRecord::new("/works/OL893415W").with_title("Dune")
        }
    }

    #[test]
    fn test_results_mark_favorites() {
        let mut favorites = FavoritesStore::open(Box::new(MemoryStorage::new()));
        favorites.add(dune());

        let page = SearchPage {
            records: vec![dune(), BookRecord::new("/works/OL2W")],
            total_available: 120,
        };
        let out = results("dune", &page, &favorites);

        assert!(out.starts_with("Found 120 results for \"dune\" (showing 2)"));
        assert!(out.contains("  1. ♥ Dune by Frank Herbert (1965)"));
        assert!(out.contains("  2.   Untitled by Unknown Author (Year Unknown)"));
    }

    #[test]
    fn test_empty_results() {
        let favorites = FavoritesStore::open(Box::new(MemoryStorage::new()));
        let out = results("zzzz", &SearchPage::default(), &favorites);
        assert_eq!(out, "No books found for \"zzzz\".\n");
    }

    #[test]
    fn test_details() {
        let out = details(&dune(), true, &Links::default(), CoverSize::Large);
        assert!(out.contains("Languages:       ENG, FRE"));
        assert!(out.contains("+2 more ISBN numbers available"));
        assert!(out.contains("https://covers.openlibrary.org/b/id/8231856-L.jpg"));
        assert!(out.contains("https://www.worldcat.org/isbn/9780441013500"));
        assert!(out.contains("In your reading list"));
    }

    #[test]
    fn test_take_joined() {
        let values: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        assert_eq!(take_joined(&values, 3), "a, b, c +1 more");
        assert_eq!(take_joined(&values, 4), "a, b, c, d");
    }

    #[test]
    fn test_empty_favorites_list() {
        assert!(favorites_list(&[], None).starts_with("Your reading list is empty"));

        let out = favorites_list(&[dune()], None);
        assert!(out.contains("My Reading List (1 book)"));
        assert!(!out.contains("Last saved"));
    }

    #[test]
    fn test_favorites_list_shows_save_time() {
        let saved = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let out = favorites_list(&[dune()], Some(saved));
        assert!(out.ends_with("\nLast saved 2023-11-14 22:13 UTC\n"));
    }
}

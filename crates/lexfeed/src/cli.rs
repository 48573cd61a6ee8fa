//! Output formatting for the lexfeed console
//!
//! Human output goes through comfy-table; every command also has a `--json`
//! variant that prints the raw payload.

use comfy_table::{Cell, Color, ContentArrangement, Row, Table};
use lexfeed_core::{Article, NewsPage};

/// Format a list page as a table (human) or JSON.
pub fn format_news_page(result: &NewsPage, json: bool) -> String {
    if json {
        return serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string());
    }

    if result.articles.is_empty() {
        return "No articles found matching your criteria.".to_string();
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Title").fg(Color::Cyan),
        Cell::new("State").fg(Color::Cyan),
        Cell::new("Topic").fg(Color::Cyan),
        Cell::new("Published").fg(Color::Cyan),
        Cell::new("Description").fg(Color::Cyan),
    ]);

    for article in &result.articles {
        let id = article.id.to_string();
        let title = truncate(&article.title, 48);
        let published = article
            .published_date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let description = truncate(&article.description, 60);

        table.add_row(Row::from(vec![
            &id,
            &title,
            &article.jurisdiction,
            &article.topic,
            &published,
            &description,
        ]));
    }

    format!(
        "{}\nPage {} of {} ({} articles total)",
        table, result.page, result.total_pages, result.total
    )
}

/// Format a single article (human or JSON).
pub fn format_article(article: &Article, json: bool) -> String {
    if json {
        return serde_json::to_string_pretty(article).unwrap_or_else(|_| "{}".to_string());
    }

    let mut lines = vec![];
    lines.push(format!("ID:          {}", article.id));
    lines.push(format!("Title:       {}", article.title));
    lines.push(format!("State:       {}", article.jurisdiction));
    lines.push(format!("Topic:       {}", article.topic));
    lines.push(format!(
        "Published:   {}",
        article
            .published_date
            .map(|date| date.to_rfc3339())
            .unwrap_or_else(|| "-".to_string())
    ));
    lines.push(format!(
        "Source:      {}",
        article
            .source
            .as_ref()
            .map(|source| source.name.clone())
            .unwrap_or_else(|| "-".to_string())
    ));
    if !article.url.is_empty() {
        lines.push(format!("URL:         {}", article.url));
    }
    if !article.description.is_empty() {
        lines.push(format!("Description: {}", article.description));
    }
    if !article.content.is_empty() {
        lines.push(String::new());
        lines.push(article.content.clone());
    }

    lines.join("\n")
}

/// Format a metadata name collection (human or JSON).
pub fn format_names(names: &[String], json: bool) -> String {
    if json {
        return serde_json::to_string_pretty(names).unwrap_or_else(|_| "[]".to_string());
    }
    if names.is_empty() {
        return "No entries registered.".to_string();
    }
    names.join("\n")
}

fn truncate(s: &str, max: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max {
        s.to_string()
    } else {
        // Char-based truncation to avoid panicking on multi-byte characters
        s.chars().take(max - 1).collect::<String>() + "…"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("hello world", 20), "hello world");
        assert_eq!(truncate("hello world", 5), "hell…");
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_unicode() {
        assert_eq!(truncate("café", 10), "café");
        assert_eq!(truncate("café", 3), "ca…");
        assert_eq!(truncate("日本語テスト", 4), "日本語…");
    }

    #[test]
    fn test_format_news_page_empty() {
        let page = NewsPage::default();
        let output = format_news_page(&page, false);
        assert!(output.contains("No articles found"));
    }

    #[test]
    fn test_format_news_page_json() {
        let page = NewsPage {
            total: 1,
            page: 1,
            total_pages: 1,
            ..Default::default()
        };
        let output = format_news_page(&page, true);
        assert!(output.contains("\"totalPages\": 1"));
    }

    #[test]
    fn test_format_names() {
        let names = vec!["California".to_string(), "New York".to_string()];
        assert_eq!(format_names(&names, false), "California\nNew York");
        assert!(format_names(&names, true).starts_with('['));
        assert!(format_names(&[], false).contains("No entries"));
    }
}

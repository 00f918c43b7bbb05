use super::domain::WaitlistEntry;

pub const EMPTY_CACHE_ROW: &str = "No entries yet.";
pub const NO_MATCHES_ROW: &str = "No matches found.";
pub const LOAD_FAILED_ROW: &str = "Failed to load entries.";
const MISSING_TIMESTAMP: &str = "—";
const COLUMNS: usize = 4;

/// Escapes the characters that could open markup or break out of an
/// attribute value.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Trimmed, case-insensitive substring match on email. Blank shows all.
pub fn filter_entries<'a>(entries: &'a [WaitlistEntry], filter: &str) -> Vec<&'a WaitlistEntry> {
    let term = filter.trim().to_lowercase();
    if term.is_empty() {
        return entries.iter().collect();
    }
    entries
        .iter()
        .filter(|entry| entry.email.to_lowercase().contains(&term))
        .collect()
}

pub fn status_label(entry: &WaitlistEntry) -> &'static str {
    if entry.confirmed {
        "Confirmed"
    } else {
        "Unconfirmed"
    }
}

pub fn joined_label(entry: &WaitlistEntry) -> String {
    match entry.created_at {
        Some(at) => at.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => MISSING_TIMESTAMP.to_string(),
    }
}

/// Rows that survive `filter`, or the placeholder to show instead.
pub fn visible_rows<'a>(
    entries: &'a [WaitlistEntry],
    filter: &str,
) -> Result<Vec<&'a WaitlistEntry>, &'static str> {
    let visible = filter_entries(entries, filter);
    if !visible.is_empty() {
        return Ok(visible);
    }
    if entries.is_empty() {
        Err(EMPTY_CACHE_ROW)
    } else {
        Err(NO_MATCHES_ROW)
    }
}

/// Table body markup for the cached entries under `filter`.
pub fn render_table(entries: &[WaitlistEntry], filter: &str) -> String {
    table_markup(visible_rows(entries, filter))
}

pub(crate) fn table_markup(rows: Result<Vec<&WaitlistEntry>, &'static str>) -> String {
    let rows = match rows {
        Ok(rows) => rows,
        Err(placeholder) => return placeholder_row(placeholder),
    };

    rows.into_iter()
        .map(|entry| {
            let pill = if entry.confirmed {
                "status-pill status-confirmed"
            } else {
                "status-pill status-unconfirmed"
            };
            format!(
                "<tr><td>{}</td><td><span class=\"{pill}\">{}</span></td><td class=\"mono\">{}</td></tr>",
                escape_html(&entry.email),
                status_label(entry),
                escape_html(&joined_label(entry)),
            )
        })
        .collect()
}

pub fn placeholder_row(text: &str) -> String {
    format!(
        "<tr><td colspan=\"{COLUMNS}\" class=\"empty\">{}</td></tr>",
        escape_html(text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(email: &str, confirmed: bool) -> WaitlistEntry {
        WaitlistEntry {
            id: None,
            email: email.to_string(),
            confirmed,
            created_at: Some(Utc.with_ymd_and_hms(2025, 2, 3, 4, 5, 6).unwrap()),
        }
    }

    #[test]
    fn escapes_script_tags() {
        assert_eq!(
            escape_html("<script>alert(\"x\") & 'y'</script>"),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn hostile_email_renders_as_text() {
        let cache = vec![entry("<img src=x onerror=alert(1)>@evil.io", false)];
        let html = render_table(&cache, "");
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;@evil.io"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn filter_is_case_insensitive_and_trimmed() {
        let cache = vec![entry("Ada@Example.com", true), entry("bo@test.io", false)];
        let visible = filter_entries(&cache, "  EXAMPLE ");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].email, "Ada@Example.com");
        assert_eq!(filter_entries(&cache, "").len(), 2);
    }

    #[test]
    fn distinguishes_empty_cache_from_no_matches() {
        assert!(render_table(&[], "").contains(EMPTY_CACHE_ROW));
        assert!(render_table(&[], "ada").contains(EMPTY_CACHE_ROW));

        let cache = vec![entry("ada@example.com", true)];
        assert!(render_table(&cache, "zzz").contains(NO_MATCHES_ROW));
    }

    #[test]
    fn visible_rows_names_the_placeholder() {
        let cache = vec![entry("ada@example.com", true)];
        assert_eq!(visible_rows(&[], "ada").unwrap_err(), EMPTY_CACHE_ROW);
        assert_eq!(visible_rows(&cache, "zzz").unwrap_err(), NO_MATCHES_ROW);
        assert_eq!(visible_rows(&cache, "ADA").map(|rows| rows.len()), Ok(1));
    }

    #[test]
    fn rows_carry_status_and_timestamp() {
        let mut pending = entry("bo@test.io", false);
        pending.created_at = None;
        let cache = vec![entry("ada@example.com", true), pending];

        let html = render_table(&cache, "");
        assert!(html.contains("status-pill status-confirmed\">Confirmed"));
        assert!(html.contains("status-pill status-unconfirmed\">Unconfirmed"));
        assert!(html.contains("2025-02-03 04:05:06"));
        assert!(html.contains("<td class=\"mono\">—</td>"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let cache = vec![entry("ada@example.com", true), entry("bo@test.io", false)];
        assert_eq!(render_table(&cache, "test"), render_table(&cache, "test"));
    }
}

//! # Page Rendering
//!
//! HTML for every browser-facing route. Pages share one layout with embedded
//! CSS; all user-supplied text (queries, form echoes) and record fields pass
//! through [`escape_html`] before they reach the markup.

use url::form_urlencoded;

use crate::record::ResultRecord;

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Link to the detail page for `slug`, carrying the originating query.
pub fn article_href(slug: &str, query: &str) -> String {
    let slug: String = form_urlencoded::byte_serialize(slug.as_bytes()).collect();
    let query: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("/article/{}?query={}", slug, query)
}

fn search_href(query: &str) -> String {
    let query: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("/search?query={}", query)
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | MindWork</title>
    <style>
        @import url('https://fonts.googleapis.com/css2?family=Inter:wght@400;600;800&display=swap');

        body {{
            font-family: 'Inter', sans-serif;
            background-color: #f3f4f6;
            color: #1f2937;
            margin: 0;
        }}

        header {{
            background-color: #1f4e79;
            color: #ffffff;
            padding: 16px 32px;
            display: flex;
            justify-content: space-between;
            align-items: center;
        }}

        header a {{ color: #ffffff; text-decoration: none; font-weight: 600; }}
        .brand {{ font-size: 1.5rem; font-weight: 800; }}
        .brand span {{ color: #d9a400; }}

        main {{
            max-width: 960px;
            margin: 0 auto;
            padding: 32px 16px;
        }}

        .search-form {{ display: flex; gap: 8px; margin: 24px 0; }}
        .search-form input {{
            flex: 1;
            padding: 12px 18px;
            border: 1px solid #d1d5db;
            border-radius: 12px;
            font-size: 1.1rem;
        }}

        button, .button {{
            background-color: #1f4e79;
            color: #ffffff;
            border: none;
            border-radius: 12px;
            padding: 12px 20px;
            font-weight: 600;
            cursor: pointer;
            text-decoration: none;
            display: inline-block;
        }}

        .button.secondary {{ background-color: #ffffff; color: #1f4e79; border: 1px solid #1f4e79; }}

        .card {{
            background-color: #ffffff;
            border-radius: 12px;
            padding: 20px;
            margin-bottom: 16px;
            box-shadow: 0 1px 3px rgba(0, 0, 0, 0.08);
        }}

        .card.ai {{ border-left: 4px solid #d9a400; }}
        .card.error {{ border-left: 4px solid #b91c1c; }}
        .card h2 {{ margin: 0 0 6px 0; font-size: 1.2rem; }}
        .card h2 a {{ color: #1f4e79; text-decoration: none; }}
        .meta {{ color: #6b7280; font-size: 0.9rem; margin-bottom: 8px; }}
        .badge {{ background-color: #d9a400; color: #ffffff; border-radius: 6px; padding: 2px 8px; font-size: 0.75rem; }}

        form.auth label {{ display: block; margin-top: 12px; font-weight: 600; }}
        form.auth input {{
            width: 100%;
            box-sizing: border-box;
            padding: 10px 12px;
            border: 1px solid #d1d5db;
            border-radius: 8px;
            margin-top: 4px;
        }}

        footer {{ text-align: center; color: #6b7280; padding: 32px 16px; font-size: 0.85rem; }}
    </style>
</head>
<body>
    <header>
        <a class="brand" href="/">Mind<span>Work</span></a>
        <nav><a href="/login">Login / Sign Up</a></nav>
    </header>
    <main>
{body}
    </main>
    <footer>&copy; 2025 MindWork, Inc. Research tools for the modern academic.</footer>
</body>
</html>
"#,
        title = escape_html(title),
        body = body
    )
}

fn search_form(query: &str) -> String {
    format!(
        r#"        <form class="search-form" action="/search" method="get">
            <input type="text" name="query" value="{}" placeholder="Search articles, topics, or authors..." aria-label="Search query">
            <button type="submit">Search</button>
        </form>"#,
        escape_html(query)
    )
}

/// Landing page with the search form and sign-in calls to action.
pub fn home_page(ai_enabled: bool) -> String {
    let ai_line = if ai_enabled {
        "Search results are enriched with a Google Gemini research summary."
    } else {
        "AI summaries are currently unavailable; showing library results only."
    };

    let body = format!(
        r#"        <h1>The unified research platform for students and professors.</h1>
        <p>MindWork integrates library discovery with AI-assisted analysis. {ai_line}</p>
{form}
        <p>
            <a class="button" href="/login">Log In to MindWork</a>
            <a class="button secondary" href="/register">Create Account</a>
            <a class="button secondary" href="/oauth/google">Sign Up with Google</a>
        </p>
        <div class="card">
            <h2>Tools to Elevate Your Thesis and Papers.</h2>
            <p>Summarize dense articles, outline complex arguments, and move from discovery to final draft with integrated search and citation management.</p>
        </div>"#,
        ai_line = ai_line,
        form = search_form("")
    );

    layout("Home", &body)
}

/// Mock login form. Submits `email` and `password` to `POST /login`.
pub fn login_page() -> String {
    let body = r#"        <div class="card">
            <h1>Log In</h1>
            <form class="auth" action="/login" method="post">
                <label for="email">Email address</label>
                <input id="email" name="email" type="email" autocomplete="email" required>
                <label for="password">Password</label>
                <input id="password" name="password" type="password" autocomplete="current-password" required>
                <p><button type="submit">Log In</button></p>
            </form>
            <p><a class="button secondary" href="/oauth/google">Log In with Google</a></p>
            <p>New here? <a href="/register">Create an account</a>.</p>
        </div>"#;

    layout("Log In", body)
}

/// Mock registration form. Submits `name`, `email` and `password` to
/// `POST /register`.
pub fn register_page() -> String {
    let body = r#"        <div class="card">
            <h1>Create Account</h1>
            <form class="auth" action="/register" method="post">
                <label for="name">Full name</label>
                <input id="name" name="name" type="text" autocomplete="name" required>
                <label for="email">Email address</label>
                <input id="email" name="email" type="email" autocomplete="email" required>
                <label for="password">Password</label>
                <input id="password" name="password" type="password" autocomplete="new-password" required>
                <p><button type="submit">Register Account</button></p>
            </form>
            <p><a class="button secondary" href="/oauth/google">Sign Up with Google</a></p>
            <p>Already registered? <a href="/login">Log in</a>.</p>
        </div>"#;

    layout("Create Account", body)
}

fn result_card(record: &ResultRecord, query: &str) -> String {
    let (class, badge) = if record.is_ai_generated() {
        ("card ai", r#" <span class="badge">AI Summary</span>"#)
    } else {
        ("card", "")
    };

    format!(
        r#"        <div class="{class}">
            <h2><a href="{href}">{title}</a>{badge}</h2>
            <div class="meta">{author} &middot; {year} &middot; {source}</div>
            <p>{summary}</p>
        </div>"#,
        class = class,
        href = escape_html(&article_href(&record.slug, query)),
        title = escape_html(&record.title),
        badge = badge,
        author = escape_html(&record.author),
        year = record.year,
        source = escape_html(&record.source),
        summary = escape_html(&record.summary)
    )
}

/// Result list for `query`; `results` is rendered in order.
pub fn results_page(query: &str, results: &[ResultRecord], took_ms: u64) -> String {
    let cards = results
        .iter()
        .map(|record| result_card(record, query))
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        r#"{form}
        <p class="meta">About {count} results for &ldquo;{query}&rdquo; ({took_ms} ms)</p>
{cards}"#,
        form = search_form(query),
        count = results.len(),
        query = escape_html(query),
        took_ms = took_ms,
        cards = cards
    );

    layout(&format!("{} - Search", query), &body)
}

/// Detail view of a single record. `found == false` renders the fallback
/// record with error styling.
pub fn article_page(record: &ResultRecord, query: Option<&str>, found: bool) -> String {
    let back_link = match query {
        Some(q) if !q.trim().is_empty() => format!(
            r#"<a href="{}">&larr; Back to results for &ldquo;{}&rdquo;</a>"#,
            escape_html(&search_href(q.trim())),
            escape_html(q.trim())
        ),
        _ => r#"<a href="/">&larr; Back to search</a>"#.to_string(),
    };

    let class = if !found {
        "card error"
    } else if record.is_ai_generated() {
        "card ai"
    } else {
        "card"
    };

    let body = format!(
        r#"        <p>{back_link}</p>
        <article class="{class}">
            <h1>{title}</h1>
            <div class="meta">By {author} &middot; {year} &middot; {source}</div>
            <p>{summary}</p>
        </article>"#,
        back_link = back_link,
        class = class,
        title = escape_html(&record.title),
        author = escape_html(&record.author),
        year = record.year,
        source = escape_html(&record.source),
        summary = escape_html(&record.summary)
    );

    layout(&record.title, &body)
}

use std::borrow::Cow;

use chrono::{Datelike, Utc};

const PAGE_BASE_STYLES: &str = r#"
        :root { color-scheme: light; }
        body { font-family: "Helvetica Neue", Arial, sans-serif; margin: 0; background: #f8fafc; color: #0f172a; }
        header { background: #ffffff; padding: 2rem 1.5rem; border-bottom: 1px solid #e2e8f0; }
        .header-bar { display: flex; justify-content: space-between; align-items: center; flex-wrap: wrap; gap: 1rem; }
        .header-bar h1 { margin: 0; }
        .header-actions { display: flex; gap: 0.75rem; align-items: center; flex-wrap: wrap; }
        .header-actions span { color: #475569; font-size: 0.95rem; }
        .nav-link { display: inline-flex; align-items: center; gap: 0.4rem; color: #1d4ed8; text-decoration: none; font-weight: 600; background: #e0f2fe; padding: 0.5rem 0.95rem; border-radius: 999px; border: 1px solid #bfdbfe; transition: background 0.15s ease, border 0.15s ease; }
        .nav-link:hover { background: #bfdbfe; border-color: #93c5fd; }
        .logout-form { display: inline; }
        .logout-form button { padding: 0.5rem 1.1rem; border: none; border-radius: 999px; background: #2563eb; color: #ffffff; font-weight: 600; cursor: pointer; }
        .logout-form button:hover { background: #1d4ed8; }
        main { padding: 2rem 1.5rem; max-width: 1024px; margin: 0 auto; box-sizing: border-box; }
        section { margin-bottom: 2.5rem; }
        .panel { background: #ffffff; border-radius: 12px; border: 1px solid #e2e8f0; padding: 1.5rem; box-shadow: 0 18px 40px rgba(15, 23, 42, 0.08); }
        .panel h2 { margin-top: 0; }
        .note { color: #475569; font-size: 0.95rem; line-height: 1.6; }
        label { display: block; margin-bottom: 0.5rem; font-weight: 600; color: #0f172a; }
        input, textarea { width: 100%; padding: 0.65rem; border-radius: 8px; border: 1px solid #cbd5f5; background: #f8fafc; color: #0f172a; box-sizing: border-box; }
        input:focus, textarea:focus { outline: none; border-color: #2563eb; box-shadow: 0 0 0 3px rgba(37, 99, 235, 0.12); }
        button { padding: 0.7rem 1.2rem; border: none; border-radius: 8px; background: #2563eb; color: #ffffff; font-weight: 600; cursor: pointer; transition: background 0.15s ease; }
        button:hover { background: #1d4ed8; }
        button.danger { background: #dc2626; }
        button.danger:hover { background: #b91c1c; }
        button.quiet { background: #e2e8f0; color: #0f172a; }
        button.quiet:hover { background: #cbd5e1; }
        table { width: 100%; border-collapse: collapse; margin-top: 1rem; background: #ffffff; border: 1px solid #e2e8f0; border-radius: 12px; overflow: hidden; }
        th, td { padding: 0.7rem 0.9rem; border-bottom: 1px solid #e2e8f0; text-align: left; vertical-align: top; }
        th { background: #f1f5f9; color: #0f172a; font-weight: 600; }
        .flash { padding: 1rem 1.25rem; border-radius: 10px; margin-bottom: 1.5rem; font-weight: 600; border: 1px solid transparent; }
        .flash.success { background: #ecfdf3; border-color: #bbf7d0; color: #166534; }
        .flash.error { background: #fef2f2; border-color: #fecaca; color: #b91c1c; }
        .status-tag { display: inline-flex; align-items: center; padding: 0.25rem 0.75rem; border-radius: 999px; font-size: 0.85rem; font-weight: 600; }
        .status-tag.pending { background: #fef3c7; color: #92400e; }
        .status-tag.approved { background: #dcfce7; color: #166534; }
        .status-tag.rejected { background: #fee2e2; color: #b91c1c; }
        .stat-grid { display: grid; gap: 1rem; grid-template-columns: repeat(auto-fit, minmax(170px, 1fr)); margin-bottom: 1.5rem; }
        .stat-card { background: #ffffff; border-radius: 12px; border: 1px solid #e2e8f0; padding: 1.1rem 1.25rem; }
        .stat-card .amount { font-size: 1.5rem; font-weight: 700; margin-top: 0.35rem; }
        .stat-card .amount.negative { color: #b91c1c; }
        .stat-card .label { color: #64748b; font-size: 0.85rem; }
        .form-row { display: grid; gap: 1.5rem; grid-template-columns: repeat(auto-fit, minmax(260px, 1fr)); }
        .day-grid { display: grid; gap: 0.5rem; grid-template-columns: repeat(7, 1fr); margin-bottom: 0.75rem; }
        .day-grid label { font-size: 0.8rem; text-align: center; margin-bottom: 0.2rem; }
        .inline-form { display: inline; margin-right: 0.35rem; }
        .muted { color: #94a3b8; }
        .app-footer { margin-top: 3rem; text-align: center; font-size: 0.85rem; color: #94a3b8; }
        @media (max-width: 768px) {
            header { padding: 1.5rem 1rem; }
            main { padding: 1.5rem 1rem; }
            .header-bar { flex-direction: column; align-items: flex-start; }
            table { font-size: 0.9rem; }
            th, td { padding: 0.5rem; }
        }
"#;

pub struct PageLayout<'a> {
    pub meta_title: &'a str,
    pub heading: &'a str,
    pub note: &'a str,
    pub username: &'a str,
    /// Extra navigation links rendered next to the sign-out button.
    pub nav_html: Cow<'a, str>,
    pub flash_html: Cow<'a, str>,
    pub body_html: Cow<'a, str>,
}

pub fn render_page(layout: PageLayout<'_>) -> String {
    let PageLayout {
        meta_title,
        heading,
        note,
        username,
        nav_html,
        flash_html,
        body_html,
    } = layout;

    let footer = render_footer();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{meta_title}</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="robots" content="noindex,nofollow">
    <style>
{styles}
    </style>
</head>
<body>
    <header>
        <div class="header-bar">
            <h1>{heading}</h1>
            <div class="header-actions">
                <span>Signed in as <strong>{username}</strong></span>
                {nav_html}
                <form class="logout-form" method="post" action="/logout">
                    <button type="submit">Sign out</button>
                </form>
            </div>
        </div>
        <p class="note">{note}</p>
    </header>
    <main>
        {flash_html}
{body_html}
        {footer}
    </main>
</body>
</html>"#,
        meta_title = meta_title,
        heading = heading,
        note = note,
        username = username,
        nav_html = nav_html,
        flash_html = flash_html,
        body_html = body_html,
        styles = PAGE_BASE_STYLES,
        footer = footer,
    )
}

pub fn render_login_page(notice: Option<&str>, error: Option<&str>) -> String {
    let footer = render_footer();

    let flash = if let Some(message) = error {
        format!(r#"<div class="flash error">{}</div>"#, escape_html(message))
    } else if let Some(message) = notice {
        format!(r#"<div class="flash success">{}</div>"#, escape_html(message))
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Family Chore Chart</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="robots" content="noindex,nofollow">
    <style>
        :root {{ color-scheme: light; }}
        body {{ font-family: "Helvetica Neue", Arial, sans-serif; display: flex; flex-direction: column; align-items: center; justify-content: center; min-height: 100vh; margin: 0; background: #f1f5f9; color: #0f172a; padding: 1.5rem; box-sizing: border-box; gap: 1.5rem; }}
        main {{ width: 100%; max-width: 440px; display: flex; flex-direction: column; align-items: center; gap: 1.5rem; }}
        .panel {{ background: #ffffff; padding: 2.5rem 2.25rem; border-radius: 18px; box-shadow: 0 20px 60px rgba(15, 23, 42, 0.08); width: 100%; border: 1px solid #e2e8f0; box-sizing: border-box; }}
        h1 {{ margin: 0 0 1rem; font-size: 1.8rem; text-align: center; }}
        p.description {{ margin: 0 0 1.75rem; color: #475569; text-align: center; font-size: 0.95rem; }}
        .flash {{ padding: 0.85rem 1rem; border-radius: 10px; margin-bottom: 1rem; font-weight: 600; border: 1px solid transparent; }}
        .flash.success {{ background: #ecfdf3; border-color: #bbf7d0; color: #166534; }}
        .flash.error {{ background: #fef2f2; border-color: #fecaca; color: #b91c1c; }}
        label {{ display: block; margin-top: 1.2rem; font-weight: 600; letter-spacing: 0.01em; color: #0f172a; }}
        input {{ width: 100%; padding: 0.85rem; margin-top: 0.65rem; border-radius: 10px; border: 1px solid #cbd5f5; background: #f8fafc; color: #0f172a; font-size: 1rem; box-sizing: border-box; }}
        input:focus {{ outline: none; border-color: #2563eb; box-shadow: 0 0 0 3px rgba(37, 99, 235, 0.15); }}
        button {{ margin-top: 2rem; width: 100%; padding: 0.95rem; border: none; border-radius: 10px; background: #2563eb; color: #ffffff; font-weight: 600; font-size: 1.05rem; cursor: pointer; transition: background 0.15s ease; }}
        button:hover {{ background: #1d4ed8; }}
        .app-footer {{ margin-top: 2.5rem; text-align: center; font-size: 0.85rem; color: #64748b; }}
    </style>
</head>
<body>
    <main>
        <section class="panel">
            <h1>Family Chore Chart</h1>
            <p class="description">Sign in with your household account.</p>
            {flash}
            <form method="post" action="/login">
                <label for="username">Username</label>
                <input id="username" name="username" required>
                <label for="password">Password</label>
                <input id="password" type="password" name="password" required>
                <button type="submit">Sign in</button>
            </form>
        </section>
        {footer}
    </main>
</body>
</html>"#,
        flash = flash,
        footer = footer,
    )
}

pub fn render_footer() -> String {
    let current_year = Utc::now().year();
    format!(
        r#"<footer class="app-footer">© {year} Family Chore Chart · household use only</footer>"#,
        year = current_year
    )
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render a signed dollar amount the way the dashboards show money:
/// `$4.50`, `-$2.00`.
pub fn format_money(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${amount:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_covers_the_special_characters() {
        assert_eq!(
            escape_html(r#"<b>"Mow" & 'edge'</b>"#),
            "&lt;b&gt;&quot;Mow&quot; &amp; &#39;edge&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn money_formatting() {
        assert_eq!(format_money(5.0), "$5.00");
        assert_eq!(format_money(2.5), "$2.50");
        assert_eq!(format_money(-3.0), "-$3.00");
        assert_eq!(format_money(0.0), "$0.00");
    }
}

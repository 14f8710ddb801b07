use crate::page::escape_html;

const BASE_CSS: &str = r#"
body { margin: 0; font-family: "Source Sans Pro", Arial, sans-serif; color: #262730; background: #ffffff; }
.shell { display: flex; min-height: 100vh; }
.sidebar { width: 25%; min-width: 300px; box-sizing: border-box; padding: 1rem; background: #f0f2f6; overflow-y: auto; max-height: 100vh; }
.main { flex: 1; min-width: 0; }
h1, h3, h4 { margin: 0.6rem 0; }
.notice { padding: 0.6rem 0.8rem; border-radius: 6px; margin: 0.5rem 0; }
.notice.error { background: #ffe3e3; color: #7d1a1a; }
.notice.warning { background: #fff6d6; color: #6b5200; }
.notice.success { background: #e0f5e6; color: #1b5e20; }
.hour-buttons { display: flex; flex-wrap: wrap; gap: 5px; }
.hour-buttons form { width: calc(33.33% - 4px); margin: 0; }
.hour-button { width: 100%; padding: 8px 4px; border: 2px solid transparent; border-radius: 5px; color: white; cursor: pointer; font-weight: bold; }
.hour-button:hover { filter: brightness(120%); }
.hour-button.selected { border-color: #262730; box-shadow: 0 2px 4px rgba(0,0,0,0.3); }
.wide-button { width: 100%; padding: 8px; margin: 6px 0; border-radius: 5px; border: 1px solid #c4c6cc; background: white; cursor: pointer; font-weight: bold; }
.wide-button.primary { background: #ff4b4b; border-color: #ff4b4b; color: white; }
.data-section { margin-top: 20px; border-top: 1px solid #ddd; padding-top: 20px; }
table { border-collapse: collapse; width: 100%; font-size: 0.85rem; background: white; }
th, td { border: 1px solid #e1e3e8; padding: 4px 6px; text-align: left; }
th { background: #f7f8fa; }
.records { max-height: 300px; overflow-y: auto; }
.pager { display: flex; justify-content: space-between; align-items: center; margin: 6px 0; font-size: 0.85rem; }
.login-card { max-width: 420px; margin: 10vh auto; padding: 2rem; border-radius: 10px; background: #f0f2f6; }
.login-card label { display: block; margin-top: 0.8rem; }
.login-card input { width: 100%; box-sizing: border-box; padding: 8px; margin-top: 4px; }
#map { width: 100%; height: 100vh; }
"#;

/// Wraps a page body in the shared document shell.
pub fn render_document(title: &str, head_extra: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
    {head_extra}
</head>
<body>
{body}
</body>
</html>"#,
        title = escape_html(title),
        css = BASE_CSS,
        head_extra = head_extra,
        body = body,
    )
}

/// Inline message box; `level` is one of `error`, `warning`, `success`.
pub fn render_notice(level: &str, message: &str) -> String {
    format!(
        r#"<div class="notice {}">{}</div>"#,
        level,
        escape_html(message)
    )
}

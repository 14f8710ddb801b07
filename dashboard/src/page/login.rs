use crate::page::layout::{render_document, render_notice};
use crate::page::PageOptions;

/// The login form, with the previous attempt's error if any.
pub fn render_login(options: &PageOptions, error: Option<&str>) -> String {
    let notice = error
        .map(|message| render_notice("error", message))
        .unwrap_or_default();

    let body = format!(
        r#"<div class="login-card">
    <h1>{heading}</h1>
    {notice}
    <form method="post" action="/login">
        <label>Username<input type="text" name="username" autocomplete="username" required></label>
        <label>Password<input type="password" name="password" autocomplete="current-password" required></label>
        <button class="wide-button primary" type="submit">Login</button>
    </form>
</div>"#,
        heading = options.heading("🔐", "Login"),
        notice = notice,
    );

    render_document("Login", "", &body)
}

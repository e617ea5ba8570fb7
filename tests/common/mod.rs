// Common test utilities and fixtures

use std::path::PathBuf;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;
use webdriver_testing_library::{SessionBuilder, is_webdriver_running};

/// HTML pages for testing
pub mod fixtures {
    pub const FORM_PAGE: &str = r#"
    <!DOCTYPE html>
    <html>
    <head><title>Form</title></head>
    <body>
        <form id="login">
            <label for="email">Email address</label>
            <input id="email" type="email" placeholder="you@example.com">

            <label>Password <input type="password" name="password"></label>

            <label for="same-1">Same Label</label>
            <input id="same-1" type="text">
            <label for="same-2">Same Label</label>
            <input id="same-2" type="color">

            <button type="submit" title="Sign in now">Sign in</button>
        </form>
        <ul id="items">
            <li>Item</li>
            <li>Item</li>
            <li>Item</li>
        </ul>
        <img alt="Company logo" src="data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///ywAAAAAAQABAAACAUwAOw==">
        <div data-testid="status">Ready</div>
    </body>
    </html>
    "#;

    pub const INDEX_PAGE: &str = r##"
    <!DOCTYPE html>
    <html>
    <head><title>Index</title></head>
    <body>
        <img src="data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///ywAAAAAAQABAAACAUwAOw==">
        <nav>
            <a href="#one">One</a>
            <a href="#two">Two</a>
            <a href="#three">More links</a>
        </nav>
    </body>
    </html>
    "##;

    pub const DELAYED_PAGE: &str = r#"
    <!DOCTYPE html>
    <html>
    <head><title>Delayed</title></head>
    <body>
        <div id="app"></div>
        <script>
            setTimeout(() => {
                const p = document.createElement('p');
                p.textContent = 'Loaded';
                document.getElementById('app').appendChild(p);
            }, 300);
        </script>
    </body>
    </html>
    "#;
}

/// Helper to create a test HTML file and return its file:// URL
pub fn create_test_page(content: &str) -> String {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let file_path: PathBuf = temp_dir.path().join("test.html");
    std::fs::write(&file_path, content).expect("Failed to write test HTML");

    // Leak the temp_dir to keep it alive for the test
    std::mem::forget(temp_dir);
    format!("file://{}", file_path.display())
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "webdriver_testing_library=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Session builder from `WDTL_*` variables, or `None` when no WebDriver answers
pub async fn session_or_skip() -> Option<SessionBuilder> {
    init_tracing();

    let builder = SessionBuilder::from_env(|key| std::env::var(key).ok())
        .expect("Invalid WDTL_* session variables");
    if !is_webdriver_running(builder.url()).await {
        eprintln!("No WebDriver at {}; skipping", builder.url());
        return None;
    }
    Some(builder)
}

/// Whether a local or explicit DOM library bundle was configured
#[allow(dead_code)]
pub fn library_configured() -> bool {
    std::env::var_os("WDTL_LIBRARY_PATH").is_some() || std::env::var_os("WDTL_LIBRARY_URL").is_some()
}

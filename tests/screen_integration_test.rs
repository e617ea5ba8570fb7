// Integration tests against a real browser
// Skipped unless a WebDriver answers at WDTL_WEBDRIVER_URL (or the browser default)

mod common;
use common::{create_test_page, fixtures, library_configured, session_or_skip};
use serial_test::serial;
use std::time::Duration;
use webdriver_testing_library::{By, Config, Locator, QueryError, SemanticBackend};

fn xpath_config() -> Config {
    Config::default().with_backend(SemanticBackend::XPath)
}

#[tokio::test]
#[serial]
async fn test_basic_functions() -> anyhow::Result<()> {
    let Some(session) = session_or_skip().await else {
        return Ok(());
    };
    let screen = session.screen(xpath_config()).await?;
    screen
        .driver()
        .goto(&create_test_page(fixtures::INDEX_PAGE))
        .await?;

    let img = (By::Css, "img");
    let a = (By::Css, "a");
    let footer = (By::Css, "footer");

    // get
    assert_eq!(screen.get(img).await?.tag_name().await?, "img");
    assert!(screen.get(footer).await.unwrap_err().is_not_found());
    assert!(screen.get(a).await.unwrap_err().is_too_many());

    // query
    assert!(screen.query(img).await?.is_some());
    assert!(screen.query(footer).await?.is_none());
    assert!(screen.query(a).await.unwrap_err().is_too_many());

    // find
    assert!(screen.find(img).await.is_ok());
    assert!(screen.find(footer).await.unwrap_err().is_not_found());
    assert!(screen.find(a).await.unwrap_err().is_too_many());

    // get_all
    assert_eq!(screen.get_all(img).await?.len(), 1);
    assert!(screen.get_all(footer).await.unwrap_err().is_not_found());
    assert_eq!(screen.get_all(a).await?.len(), 3);

    // query_all
    assert_eq!(screen.query_all(img).await?.len(), 1);
    assert!(screen.query_all(footer).await?.is_empty());
    assert_eq!(screen.query_all(a).await?.len(), 3);

    // find_all
    assert_eq!(screen.find_all(img).await?.len(), 1);
    assert!(screen.find_all(footer).await.unwrap_err().is_not_found());
    assert_eq!(screen.find_all(a).await?.len(), 3);

    screen.driver().clone().close().await?;
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_too_many_error_shows_markup() -> anyhow::Result<()> {
    let Some(session) = session_or_skip().await else {
        return Ok(());
    };
    let screen = session.screen(xpath_config()).await?;
    screen
        .driver()
        .goto(&create_test_page(fixtures::INDEX_PAGE))
        .await?;

    match screen.get(Locator::css("a")).await {
        Err(QueryError::MultipleSuchElements { count, elements, .. }) => {
            assert_eq!(count, 3);
            assert_eq!(elements[0], r##"<a href="#one">One</a>"##);
        }
        other => panic!("Expected MultipleSuchElements, got {:?}", other.map(|_| ())),
    }

    let more = screen.get(Locator::partial_link_text("More")).await?;
    assert_eq!(more.text().await?, "More links");

    screen.driver().clone().close().await?;
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_semantic_queries_with_xpath() -> anyhow::Result<()> {
    let Some(session) = session_or_skip().await else {
        return Ok(());
    };
    let screen = session.screen(xpath_config()).await?;
    screen
        .driver()
        .goto(&create_test_page(fixtures::FORM_PAGE))
        .await?;

    assert_eq!(screen.get_by_text("Email address").await?.tag_name().await?, "label");
    assert!(screen.query_by_text("address").await?.is_none());
    assert_eq!(screen.query_all_by_text("address").await?.len(), 0);
    assert_eq!(
        screen.get(Locator::text("ADDRESS").exact(false)).await?.tag_name().await?,
        "label"
    );
    assert_eq!(screen.find_all_by_text("Item").await?.len(), 3);

    let email = screen.get_by_label_text("Email address").await?;
    assert_eq!(email.tag_name().await?, "input");
    assert_eq!(email.attr("type").await?.as_deref(), Some("email"));

    let password = screen.query_by_label_text("Password").await?.expect("password input");
    assert_eq!(password.attr("type").await?.as_deref(), Some("password"));

    let same = screen.get_all_by_label_text("Same Label").await?;
    assert_eq!(same.len(), 2);
    assert_eq!(same[0].attr("type").await?.as_deref(), Some("text"));
    assert_eq!(same[1].attr("type").await?.as_deref(), Some("color"));

    assert_eq!(
        screen.get_by_placeholder("you@example.com").await?.attr("id").await?.as_deref(),
        Some("email")
    );
    assert_eq!(screen.get_by_alt_text("Company logo").await?.tag_name().await?, "img");
    assert_eq!(screen.get_by_title("Sign in now").await?.text().await?, "Sign in");
    assert_eq!(screen.get_by_test_id("status").await?.text().await?, "Ready");

    let button = screen.get(Locator::role("button").with_name("Sign in")).await?;
    assert_eq!(button.tag_name().await?, "button");
    assert_eq!(screen.get_all_by_role("listitem").await?.len(), 3);

    screen.driver().clone().close().await?;
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_within_restricts_lookups() -> anyhow::Result<()> {
    let Some(session) = session_or_skip().await else {
        return Ok(());
    };
    let screen = session.screen(xpath_config()).await?;
    screen
        .driver()
        .goto(&create_test_page(fixtures::FORM_PAGE))
        .await?;

    let form = screen.get(Locator::id("login")).await?;
    let in_form = screen.within(&form);
    assert!(in_form.query_by_text("Item").await?.is_none());
    assert_eq!(in_form.get_all_by_label_text("Same Label").await?.len(), 2);

    let list = screen.get(Locator::id("items")).await?;
    let in_list = screen.within(&list);
    assert_eq!(in_list.get_all(Locator::tag_name("li")).await?.len(), 3);
    assert!(in_list.query(Locator::tag_name("button")).await?.is_none());

    screen.driver().clone().close().await?;
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_find_waits_for_delayed_element() -> anyhow::Result<()> {
    let Some(session) = session_or_skip().await else {
        return Ok(());
    };
    let screen = session
        .screen(xpath_config().with_timeout(Duration::from_secs(3)))
        .await?;
    screen
        .driver()
        .goto(&create_test_page(fixtures::DELAYED_PAGE))
        .await?;

    assert!(screen.query_by_text("Loaded").await?.is_none());
    let loaded = screen.find_by_text("Loaded").await?;
    assert_eq!(loaded.tag_name().await?, "p");

    screen.driver().clone().close().await?;
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_semantic_queries_with_injected_library() -> anyhow::Result<()> {
    if !library_configured() {
        eprintln!("Set WDTL_LIBRARY_PATH or WDTL_LIBRARY_URL to run library tests; skipping");
        return Ok(());
    }
    let Some(session) = session_or_skip().await else {
        return Ok(());
    };
    let screen = session.screen(Config::load()?).await?;
    screen
        .driver()
        .goto(&create_test_page(fixtures::FORM_PAGE))
        .await?;

    assert_eq!(screen.get_by_text("Email address").await?.tag_name().await?, "label");
    assert_eq!(screen.find_all_by_text("Item").await?.len(), 3);
    assert_eq!(
        screen.get_by_label_text("Password").await?.attr("type").await?.as_deref(),
        Some("password")
    );
    assert_eq!(
        screen.get_by_role("button").await?.text().await?,
        "Sign in"
    );
    assert_eq!(screen.get_by_test_id("status").await?.text().await?, "Ready");

    // Navigation drops the helper; the next query installs it again
    screen
        .driver()
        .goto(&create_test_page(fixtures::FORM_PAGE))
        .await?;
    let form = screen.get(Locator::id("login")).await?;
    assert!(screen.within(&form).query_by_text("Item").await?.is_none());

    screen.driver().clone().close().await?;
    Ok(())
}

use mcp_foodgram::config::{Config, DEFAULT_BASE_URL};
use mcp_foodgram::navigation::{NavItem, Navigation, Route};
use mcp_foodgram::pages::PageKind;
use pretty_assertions::assert_eq;

#[test]
fn test_default_navigation_order() {
    let navigation = Navigation::default();

    let hrefs: Vec<&str> = navigation.items().iter().map(|item| item.href.as_str()).collect();
    assert_eq!(
        hrefs,
        vec!["/recipes", "/subscriptions", "/recipes/create", "/favorites", "/cart"]
    );
    assert_eq!(navigation.items()[3], NavItem::new("Favorite", "/favorites", true));
}

#[test]
fn test_anonymous_sessions_only_see_public_routes() {
    let navigation = Navigation::default();

    let anonymous: Vec<&str> = navigation.visible(false).iter().map(|i| i.title.as_str()).collect();
    assert_eq!(anonymous, vec!["Recipes"]);
    assert_eq!(navigation.visible(true).len(), 5);
}

#[test]
fn test_resolve_routes() {
    let navigation = Navigation::default();

    assert_eq!(navigation.resolve("/recipes"), Some(Route::Listing(PageKind::Recipes)));
    assert_eq!(navigation.resolve("/favorites/"), Some(Route::Listing(PageKind::Favorites)));
    assert_eq!(navigation.resolve("/cart"), Some(Route::Listing(PageKind::ShoppingCart)));
    assert_eq!(navigation.resolve("/subscriptions"), Some(Route::Subscriptions));
    assert_eq!(navigation.resolve("/recipes/create"), Some(Route::Other));
    assert_eq!(navigation.resolve("/admin"), None);
}

#[test]
fn test_custom_navigation_hides_unlisted_pages() {
    let navigation = Navigation::new(vec![NavItem::new("Recipes", "/recipes", false)]);

    assert_eq!(navigation.resolve("/favorites"), None);
    assert_eq!(navigation.find("/recipes").map(|i| i.auth), Some(false));
}

fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    move |key: &str| {
        vars.iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.to_string())
    }
}

#[test]
fn test_config_defaults() {
    let config = Config::from_lookup(lookup(&[])).unwrap();

    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert!(config.credentials.is_none());
    assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3001");
}

#[test]
fn test_config_from_variables() {
    let config = Config::from_lookup(lookup(&[
        ("FOODGRAM_BASE_URL", "https://foodgram.example.com/"),
        ("FOODGRAM_EMAIL", "cook@example.com"),
        ("FOODGRAM_PASSWORD", "secret"),
        ("BIND_ADDR", "0.0.0.0:8080"),
    ]))
    .unwrap();

    assert_eq!(config.base_url, "https://foodgram.example.com");
    let credentials = config.credentials.expect("credentials should be set");
    assert_eq!(credentials.email, "cook@example.com");
    assert!(!format!("{:?}", credentials).contains("secret"));
    assert_eq!(config.bind_addr.port(), 8080);
}

#[test]
fn test_config_rejects_incomplete_settings() {
    assert!(Config::from_lookup(lookup(&[("FOODGRAM_EMAIL", "cook@example.com")])).is_err());
    assert!(Config::from_lookup(lookup(&[("FOODGRAM_PASSWORD", "secret")])).is_err());
    assert!(Config::from_lookup(lookup(&[
        ("FOODGRAM_EMAIL", "  "),
        ("FOODGRAM_PASSWORD", "secret"),
    ]))
    .is_err());
    assert!(Config::from_lookup(lookup(&[("BIND_ADDR", "not-an-address")])).is_err());
}

#[test]
fn test_config_blank_credentials_are_anonymous() {
    let config = Config::from_lookup(lookup(&[
        ("FOODGRAM_EMAIL", ""),
        ("FOODGRAM_PASSWORD", ""),
    ]))
    .unwrap();

    assert!(config.credentials.is_none());
}

#[test]
fn test_resolve_author_pages() {
    let navigation = Navigation::default();

    assert_eq!(navigation.resolve("/user/3"), Some(Route::Listing(PageKind::Author(3))));
    assert_eq!(navigation.resolve("/user/3/"), Some(Route::Listing(PageKind::Author(3))));
    assert_eq!(navigation.resolve("/user/chef"), None);
    assert_eq!(navigation.find("/user/3"), None);
}

//! Integration tests for the group/leaf views and shortcut resolution.

use option_registry::{
    IntValidator, NodeView, OptionError, Registry, Schema, StrValidator, Validator,
};

fn setup_registry() -> Registry {
    Registry::with_env_source(
        option_registry::schema::default_schema().expect("built-in schema is valid"),
        |_| None,
    )
}

/// Tree where two groups both define a `timeout` option.
fn ambiguous_registry() -> Registry {
    let schema = Schema::builder()
        .group("read", "", |g| {
            g.option("timeout", 5, IntValidator::new().minimum(0), "Read timeout")
        })
        .group("write", "", |g| {
            g.option("timeout", 10, IntValidator::new().minimum(0), "Write timeout")
                .option("mode", "sync", StrValidator::new().valid_values(["sync", "async"]), "")
        })
        .build()
        .expect("schema is valid");
    Registry::with_env_source(schema, |_| None)
}

#[test]
fn views_mirror_registry_values() {
    let mut reg = setup_registry();
    assert_eq!(reg.options().get("local_infile").unwrap(), false);

    reg.options_mut().set("local_infile", false).unwrap();
    assert_eq!(reg.options().get("local_infile").unwrap(), false);

    assert!(matches!(
        reg.options_mut().set("local_infile", "foo"),
        Err(OptionError::InvalidValue { .. })
    ));
    assert!(matches!(
        reg.options_mut().set("local_infile", 10),
        Err(OptionError::InvalidValue { .. })
    ));
    assert_eq!(reg.options().get("local_infile").unwrap(), false);

    assert!(matches!(
        reg.options().node("results").unwrap(),
        NodeView::Group(_)
    ));
}

#[test]
fn shortcut_writes_are_visible_everywhere() {
    let mut reg = setup_registry();

    reg.options_mut().set("format", "tuple").unwrap();
    assert_eq!(reg.get_option("results.format").unwrap(), "tuple");
    assert_eq!(
        reg.options().group("results").unwrap().get("format").unwrap(),
        "tuple"
    );
    assert_eq!(reg.options().get("format").unwrap(), "tuple");

    reg.options_mut().set("token", "Foo").unwrap();
    assert_eq!(reg.get_option("token").unwrap(), "Foo");
    assert_eq!(reg.get_option("cluster_manager.token").unwrap(), "Foo");
    assert_eq!(reg.options().get("token").unwrap(), "Foo");

    reg.reset_option(Some("token")).unwrap();
    assert_eq!(reg.options().get("token").unwrap(), "");
}

#[test]
fn views_reject_missing_names_and_groups() {
    let mut reg = setup_registry();

    assert_eq!(
        reg.options_mut()
            .group("results")
            .unwrap()
            .set("foo", 10)
            .unwrap_err(),
        OptionError::unknown("results.foo")
    );
    assert!(matches!(
        reg.options().group("results").unwrap().get("foo"),
        Err(OptionError::UnknownOption { .. })
    ));
    assert!(matches!(
        reg.options_mut().set("results", 10),
        Err(OptionError::WrongKind { .. })
    ));
}

#[test]
fn ambiguous_shortcut_is_unknown() {
    let mut reg = ambiguous_registry();

    assert!(reg.is_ambiguous("timeout"));
    assert_eq!(reg.shortcut("timeout"), None);
    assert!(matches!(
        reg.get_option("timeout"),
        Err(OptionError::UnknownOption { .. })
    ));
    assert!(matches!(
        reg.set_option("timeout", 1),
        Err(OptionError::UnknownOption { .. })
    ));
    assert!(matches!(
        reg.options().get("timeout"),
        Err(OptionError::UnknownOption { .. })
    ));

    // Full paths and local view lookups still work
    assert_eq!(reg.get_option("read.timeout").unwrap(), 5);
    assert_eq!(reg.options().group("write").unwrap().get("timeout").unwrap(), 10);

    // Unique names keep working as shortcuts
    reg.set_option("mode", "async").unwrap();
    assert_eq!(reg.get_option("write.mode").unwrap(), "async");
    assert_eq!(reg.shortcuts(), [("mode", "write.mode")]);
}

#[test]
fn nested_views_walk_deep_trees() {
    let schema = Schema::builder()
        .group("a", "", |a| {
            a.group("b", "", |b| b.option("c", "x", Validator::str(), "Deep option"))
        })
        .build()
        .unwrap();
    let mut reg = Registry::with_env_source(schema, |_| None);

    let b = reg.options().group("a").unwrap().group("b").unwrap();
    assert_eq!(b.path(), "a.b");
    assert_eq!(b.get("c").unwrap(), "x");

    reg.options_mut()
        .group("a")
        .unwrap()
        .group("b")
        .unwrap()
        .set("c", "y")
        .unwrap();
    assert_eq!(reg.get_option("a.b.c").unwrap(), "y");
    assert_eq!(reg.get_option("c").unwrap(), "y");
}

#[test]
fn listen_port_for_launcher() {
    let mut reg = setup_registry();
    reg.set_option("listen_port", 8123).unwrap();
    let app = option_registry::app::AppConfig::from_registry(&reg).unwrap();
    assert_eq!(app.listen_port, 8123);
}

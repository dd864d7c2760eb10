//! Precedence of the standard source set assembled from disk.

use std::path::Path;

use cascade_core::{
    Config, ConfigInfo, DefaultConfigSourceProvider, PropertyFileConfig, SourceOptions,
};
use cascade_test_utils::TempConfigDir;
use pretty_assertions::assert_eq;

fn options(root: &Path) -> SourceOptions {
    SourceOptions {
        search_roots: vec![root.to_path_buf()],
        include_environment: false,
        include_user_home: false,
        ..SourceOptions::default()
    }
}

fn build(options: SourceOptions) -> Config {
    Config::builder()
        .with_provider(DefaultConfigSourceProvider::new(options))
        .build()
        .unwrap()
}

fn layout() -> TempConfigDir {
    TempConfigDir::new()
        .with_properties(
            "cascade.properties",
            &[("color", "red"), ("size", "small"), ("shape", "round")],
        )
        .with_file("app.toml", "config_ordinal = 150\ncolor = \"green\"\n[db]\nurl = \"jdbc:h2\"\n")
        .with_file("conf.d/size", "large\n")
}

#[test]
fn test_each_layer_overrides_the_ones_below() {
    let dir = layout();
    let mut opts = options(dir.root());
    opts.property_files = vec![PropertyFileConfig::required("app.toml")];
    opts.config_dir = Some(dir.path("conf.d"));
    opts.overrides = vec!["shape=square".into()];

    let config = build(opts);

    let ordinals: Vec<i32> = ConfigInfo::new(&config)
        .sources()
        .iter()
        .map(|source| source.ordinal)
        .collect();
    assert_eq!(ordinals, vec![400, 200, 150, 100]);

    assert_eq!(config.property_value("shape").as_deref(), Some("square"));
    assert_eq!(config.property_value("size").as_deref(), Some("large"));
    assert_eq!(config.property_value("color").as_deref(), Some("green"));
    assert_eq!(config.property_value("db.url").as_deref(), Some("jdbc:h2"));
    assert_eq!(config.all_property_values("color"), vec!["red", "green"]);
}

#[test]
fn test_user_home_file_sits_between_directory_and_root_files() {
    let home = TempConfigDir::new().with_properties(
        ".cascade/cascade.properties",
        &[("config_ordinal", "120"), ("color", "purple")],
    );
    let dir = layout();
    let mut opts = options(dir.root());
    opts.include_user_home = true;
    opts.home_dir = Some(home.root().to_path_buf());

    let config = build(opts);
    assert_eq!(config.property_value("color").as_deref(), Some("purple"));
    assert_eq!(config.property_value("size").as_deref(), Some("small"));
}

#[test]
fn test_optional_files_may_be_missing() {
    let dir = layout();
    let mut opts = options(dir.root());
    opts.property_files = vec![PropertyFileConfig::optional("absent.yaml")];

    let config = build(opts);
    assert_eq!(config.config_sources().len(), 1);
    assert_eq!(config.property_value("color").as_deref(), Some("red"));
}

#[test]
fn test_equal_ordinals_prefer_lexically_smaller_name() {
    let dir = TempConfigDir::new()
        .with_properties("a.properties", &[("color", "amber")])
        .with_properties("b.properties", &[("color", "blue")]);
    let mut opts = options(dir.root());
    opts.property_files = vec![
        PropertyFileConfig::required("b.properties"),
        PropertyFileConfig::required("a.properties"),
    ];

    let config = build(opts);
    let names = ConfigInfo::new(&config).config_sources_as_strings();
    assert_eq!(names.len(), 2);
    assert!(names[0].ends_with("a.properties"), "{names:?}");
    assert_eq!(config.property_value("color").as_deref(), Some("amber"));
}

#[test]
fn test_application_name_comes_from_highest_source() {
    let dir = TempConfigDir::new().with_properties(
        "cascade.properties",
        &[("cascade.application.name", "from-file")],
    );
    let mut opts = options(dir.root());
    opts.overrides = vec!["cascade.application.name=from-args".into()];

    assert_eq!(build(opts).application(), "from-args");
    assert_eq!(build(options(dir.root())).application(), "from-file");
}

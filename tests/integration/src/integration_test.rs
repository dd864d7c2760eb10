//! End-to-end integration tests for the full resolution stack
//!
//! These tests exercise the complete flow: files on disk -> sources ->
//! config -> typed resolvers and snapshots.

use std::sync::Arc;
use std::time::Duration;

use cascade_core::{
    Config, ConfigInfo, ConfigResolver, ConfigSource, DirectoryConfigSource, Error,
    MapConfigSource, ProjectStage, PropertyLoader, SourceOptions, StructuredFileConfigSource,
};
use cascade_fs::{FlattenOptions, NormalizedPath};
use cascade_test_utils::{TempConfigDir, seeded_config};
use pretty_assertions::assert_eq;

fn isolated(root: &std::path::Path) -> SourceOptions {
    SourceOptions {
        search_roots: vec![root.to_path_buf()],
        include_environment: false,
        include_user_home: false,
        ..SourceOptions::default()
    }
}

#[test]
fn test_stage_specific_property_files_feed_a_source() {
    let dir = TempConfigDir::new()
        .with_properties("db.properties", &[("url", "jdbc:h2:mem"), ("user", "sa")])
        .with_properties(
            "db-UnitTest.properties",
            &[("config_ordinal", "150"), ("url", "jdbc:h2:unit")],
        );

    let merged = PropertyLoader::new([dir.root()])
        .load("db", &ProjectStage::UnitTest)
        .unwrap()
        .expect("db.properties exists");
    assert!(!merged.contains_key("config_ordinal"));

    let config = Config::builder()
        .with_source(MapConfigSource::with_values("db", 100, merged))
        .with_project_stage(ProjectStage::UnitTest)
        .build()
        .unwrap();

    assert_eq!(config.property_value("url").as_deref(), Some("jdbc:h2:unit"));
    assert_eq!(config.property_value("user").as_deref(), Some("sa"));
}

#[test]
fn test_indexed_yaml_and_directory_sources_combine() {
    let dir = TempConfigDir::new()
        .with_file("app.yml", "servers:\n  - host: a\n  - host: b\nports: [80, 443]\n")
        .with_file("secrets/db.password", "s3cret\n");

    let yaml = StructuredFileConfigSource::load_with(
        NormalizedPath::new(dir.path("app.yml")),
        FlattenOptions { indexed: true },
    )
    .unwrap();
    let secrets = DirectoryConfigSource::load(NormalizedPath::new(dir.path("secrets"))).unwrap();
    assert_eq!(secrets.ordinal(), 200);

    let config = Config::builder()
        .with_source(yaml)
        .with_source(secrets)
        .build()
        .unwrap();

    assert_eq!(config.property_value("servers[1].host").as_deref(), Some("b"));
    assert_eq!(config.property_value("ports[0]").as_deref(), Some("80"));
    assert_eq!(config.property_value("db.password").as_deref(), Some("s3cret"));

    let ports: Vec<u16> = config
        .resolve("ports[1]")
        .as_type::<u16>()
        .get_value()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(ports, vec![443]);
}

#[test]
fn test_registry_keeps_one_config_per_application() {
    let dir = TempConfigDir::new().with_properties("cascade.properties", &[("color", "red")]);
    let registry = ConfigResolver::with_default_sources(isolated(dir.root()));

    let shop = registry.config("shop").unwrap();
    let billing = registry.config("billing").unwrap();
    assert_eq!(shop.application(), "shop");
    assert_eq!(billing.application(), "billing");

    let overrides: Arc<dyn ConfigSource> =
        Arc::new(MapConfigSource::with_values("overrides", 500, [("color", "blue")]));
    registry.add_config_sources("shop", vec![overrides]).unwrap();

    let mut shop_color = registry.resolve("shop", "color").unwrap();
    let mut billing_color = registry.resolve("billing", "color").unwrap();
    assert_eq!(shop_color.get_value().unwrap().as_deref(), Some("blue"));
    assert_eq!(billing_color.get_value().unwrap().as_deref(), Some("red"));
    assert_eq!(registry.applications(), vec!["billing", "shop"]);

    assert!(registry.release("shop"));
    assert!(matches!(
        registry.existing("shop"),
        Err(Error::UnknownApplication { .. })
    ));
    assert!(!registry.release("shop"));
}

#[test]
fn test_snapshot_reads_consistent_values() {
    let config = seeded_config(ProjectStage::UnitTest);
    let mut key = config.resolve("testkey");
    let mut data_source = config.resolve("dataSource").parameterized_by("dbvendor");
    let mut port = config
        .resolve("cascade.test.integer-value")
        .as_type::<i32>()
        .cache_for(Duration::from_secs(60));

    let snapshot = config
        .snapshot_for(&mut [&mut key, &mut data_source, &mut port])
        .unwrap();

    assert_eq!(snapshot.len(), 3);
    assert_eq!(key.value_in(&snapshot).unwrap().as_deref(), Some("unittestvalue"));
    assert_eq!(
        data_source.value_in(&snapshot).unwrap().as_deref(),
        Some("TestDataSource")
    );
    assert_eq!(port.value_in(&snapshot).unwrap(), Some(5));

    let other = config.resolve("testkey2");
    assert!(matches!(
        other.value_in(&snapshot),
        Err(Error::NotInSnapshot { .. })
    ));
}

#[test]
fn test_report_serializes_sources_and_masked_entries() {
    let dir = TempConfigDir::new().with_properties(
        "cascade.properties",
        &[("cascade.application.name", "inventory"), ("api.token", "abc")],
    );
    let config = Config::builder()
        .with_provider(cascade_core::DefaultConfigSourceProvider::new(isolated(dir.root())))
        .with_filter(cascade_core::SecretMaskingFilter::new())
        .with_project_stage(ProjectStage::Staging)
        .build()
        .unwrap();

    let json = ConfigInfo::new(&config).to_json().unwrap();
    assert_eq!(json["application"], "inventory");
    assert_eq!(json["project_stage"], "Staging");
    assert_eq!(json["sources"][0]["ordinal"], 100);

    let token = json["entries"]
        .as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["key"] == "api.token")
        .unwrap();
    assert_eq!(token["value"], cascade_core::SECRET_MASK);
    assert_eq!(config.property_value("api.token").as_deref(), Some("abc"));
}

use std::sync::Arc;

use cascade_core::{
    Config, ConfigSource, ConfigSourceProvider, DefaultConfigSourceProvider, Error,
    PropertyFileConfig, PropertyLoader, ProjectStage, SourceOptions, StructuredFileConfigSource,
};
use cascade_fs::FlattenOptions;
use cascade_test_utils::TempConfigDir;
use pretty_assertions::assert_eq;

fn isolated(dir: &TempConfigDir) -> SourceOptions {
    SourceOptions {
        search_roots: vec![dir.root().to_path_buf()],
        include_environment: false,
        include_user_home: false,
        ..SourceOptions::default()
    }
}

#[test]
fn default_sources_follow_ordinal_slots() {
    let dir = TempConfigDir::new()
        .with_properties("cascade.properties", &[("color", "red"), ("size", "m")])
        .with_file("secrets/color", "green\n")
        .with_file("secrets/token", "abc\n");

    let options = SourceOptions {
        overrides: vec!["size=xl".to_string()],
        config_dir: Some(dir.path("secrets")),
        ..isolated(&dir)
    };
    let config = Config::builder()
        .with_provider(DefaultConfigSourceProvider::new(options))
        .build()
        .unwrap();

    let ordinals: Vec<i32> = config.config_sources().iter().map(|s| s.ordinal()).collect();
    assert_eq!(ordinals, vec![400, 200, 100]);
    assert_eq!(config.property_value("size").as_deref(), Some("xl"));
    assert_eq!(config.property_value("color").as_deref(), Some("green"));
    assert_eq!(config.property_value("token").as_deref(), Some("abc"));
}

#[test]
fn config_ordinal_reorders_files() {
    let dir = TempConfigDir::new()
        .with_properties("cascade.properties", &[("color", "red")])
        .with_properties("late.properties", &[("config_ordinal", "350"), ("color", "purple")]);

    let mut options = isolated(&dir);
    options.include_environment = true;
    options.property_files.push(PropertyFileConfig::required("late.properties"));
    let config = Config::builder()
        .with_provider(DefaultConfigSourceProvider::new(options))
        .build()
        .unwrap();

    assert_eq!(config.config_sources()[0].ordinal(), 350);
    assert_eq!(config.property_value("color").as_deref(), Some("purple"));
}

#[test]
fn structured_files_register_by_extension() {
    let dir = TempConfigDir::new()
        .with_file("app.toml", "[db]\nurl = \"jdbc:h2\"\npool = 5\n")
        .with_file("app.json", r#"{"feature": {"enabled": true}}"#);

    let mut options = isolated(&dir);
    options.property_files.push(PropertyFileConfig::required("app.toml"));
    options.property_files.push(PropertyFileConfig::optional("app.json"));
    options.property_files.push(PropertyFileConfig::optional("absent.yml"));
    let config = Config::builder()
        .with_provider(DefaultConfigSourceProvider::new(options))
        .build()
        .unwrap();

    assert_eq!(config.resolve("db.pool").as_type::<u32>().get_value().unwrap(), Some(5));
    assert_eq!(
        config.resolve("feature.enabled").as_type::<bool>().get_value().unwrap(),
        Some(true)
    );
}

#[test]
fn broken_required_file_fails_the_build() {
    let dir = TempConfigDir::new().with_file("app.toml", "not toml [");
    let mut options = isolated(&dir);
    options.property_files.push(PropertyFileConfig::required("app.toml"));

    let err = Config::builder()
        .with_provider(DefaultConfigSourceProvider::new(options))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::SourceLoad { .. }));
}

#[test]
fn invalid_override_fails_the_provider() {
    let dir = TempConfigDir::new();
    let options = SourceOptions {
        overrides: vec!["oops".to_string()],
        ..isolated(&dir)
    };
    let err = DefaultConfigSourceProvider::new(options).config_sources().err().expect("expected an error");
    assert!(matches!(err, Error::InvalidOverride { .. }));
}

#[test]
fn indexed_yaml_lists() {
    let dir = TempConfigDir::new().with_file("servers.yaml", "servers:\n  - alpha\n  - beta\n");
    let source =
        StructuredFileConfigSource::load_with(dir.path("servers.yaml").as_path(), FlattenOptions { indexed: true })
            .unwrap();
    let config = Config::builder().with_shared_source(Arc::new(source)).build().unwrap();

    assert_eq!(config.property_value("servers[1]").as_deref(), Some("beta"));
    assert_eq!(config.property_value("servers"), None);
}

#[test]
fn property_loader_merges_stage_files() {
    let dir = TempConfigDir::new()
        .with_properties("db.properties", &[("url", "jdbc:h2"), ("user", "sa")])
        .with_properties("db-UnitTest.properties", &[("config_ordinal", "150"), ("url", "jdbc:h2:mem")]);

    let loader = PropertyLoader::new([dir.root()]);
    let unit = loader.load("db", &ProjectStage::UnitTest).unwrap().unwrap();
    assert_eq!(unit["url"], "jdbc:h2:mem");
    assert_eq!(unit["user"], "sa");

    let production = loader.load("db", &ProjectStage::Production).unwrap().unwrap();
    assert_eq!(production["url"], "jdbc:h2");
}

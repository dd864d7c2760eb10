//! Seeded in-memory source covering the resolution scenarios.

use cascade_core::{Config, MapConfigSource, ProjectStage};

pub const SEEDED_SOURCE_NAME: &str = "testConfig";
pub const SEEDED_ORDINAL: i32 = 700;

const ENTRIES: &[(&str, &str)] = &[
    // stage overloaded value
    ("testkey", "testvalue"),
    ("testkey.UnitTest", "unittestvalue"),
    // plain value
    ("testkey2", "testvalue"),
    // stage overloaded to an empty value
    ("testkey3", "testvalue"),
    ("testkey3.UnitTest", ""),
    // parameterized lookups
    ("dbvendor.UnitTest", "mysql"),
    ("dbvendor", "postgresql"),
    ("dataSource.mysql.Production", "java:/comp/env/MyDs"),
    ("dataSource.mysql.UnitTest", "TestDataSource"),
    ("dataSource.postgresql", "PostgreDataSource"),
    ("dataSource.UnitTest", "UnitTestDataSource"),
    ("dataSource", "DefaultDataSource"),
    ("dbvendor2.Production", "mysql"),
    ("dbvendor2", "postgresql"),
    ("dbvendor3", "h2"),
    ("testkey4.encrypted", "value"),
    ("testkey4.password", "mysecretvalue"),
    // typed values
    ("cascade.test.string-value", "configured"),
    ("cascade.test.integer-value", "5"),
    ("cascade.test.long-value", "8589934592"),
    ("cascade.test.float-value", "-1.1"),
    ("cascade.test.double-value", "4e40"),
    ("cascade.test.boolean-value", "false"),
    ("cascade.test.invalid-value", "wrong"),
    // variables
    ("cascade.test.host.url", "http://localhost:12345"),
    ("cascade.test.someapp.soap.endpoint", "${cascade.test.host.url}/someservice/myendpoint"),
    ("cascade.test.nonexisting.variable", "${does.not.exist}/someservice/myendpoint"),
    (
        "cascade.test.recursive.variable1",
        "${cascade.test.recursive.variable2}/ohgosh/${cascade.test.recursive.variable3}",
    ),
    ("cascade.test.recursive.variable2", "pre-${cascade.test.recursive.variable3}-post"),
    ("cascade.test.recursive.variable3", "crazy"),
    ("cascade.test.projectstagefallback.UnitTest", ""),
    ("cascade.test.projectstagefallback", "Value without ProjectStage"),
    ("foo.url", "${bar.url}/services"),
    ("bar.url", "undefined"),
    ("bar.url.UnitTest", "http://bar-dev"),
    ("bar.url.Production", "http://bar-prod"),
    ("cascade.test.exampleEntry-1", "tomato"),
    ("cascade.test.exampleEntry-1.UnitTest", "tomato-UnitTest"),
    ("cascade.test.exampleEntry-2", "default-exampleEntry-1-is-${cascade.test.exampleEntry-1}"),
    (
        "cascade.test.exampleEntry-2.UnitTest",
        "projectStageAware-exampleEntry-1-is-${cascade.test.exampleEntry-1}",
    ),
    // lists
    ("test.list.value.emails", "test1@apache.org, test2@apache.org, \n  test3@apache.org"),
    ("test.list.value.escaped.list", "val\\,ue1,value2, val\\\\ue3"),
    ("test.list.intvalues", "3,7, 11 ,\t 17\n"),
];

/// A fresh seeded source at ordinal 700.
pub fn seeded_source() -> MapConfigSource {
    MapConfigSource::with_values(SEEDED_SOURCE_NAME, SEEDED_ORDINAL, ENTRIES.iter().copied())
}

/// A config holding only the seeded source, fixed to `stage`.
pub fn seeded_config(stage: ProjectStage) -> Config {
    Config::builder()
        .with_application("test")
        .with_source(seeded_source())
        .with_project_stage(stage)
        .build()
        .expect("seeded config builds")
}

//! Project stages

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Keys consulted, in order, when detecting the active project stage.
pub const STAGE_DETECTION_KEYS: [&str; 3] = [
    "org.apache.deltaspike.ProjectStage",
    "javax.faces.PROJECT_STAGE",
    "faces.PROJECT_STAGE",
];

/// Deployment phase of the running application.
///
/// The stage name is appended to keys during stage-aware lookups, so
/// `db.url.Production` overrides `db.url` while running in production.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ProjectStage {
    UnitTest,
    Development,
    SystemTest,
    IntegrationTest,
    Staging,
    #[default]
    Production,
    /// An application defined stage.
    Custom(String),
}

impl ProjectStage {
    /// All built-in stages.
    pub const BUILT_IN: [ProjectStage; 6] = [
        ProjectStage::UnitTest,
        ProjectStage::Development,
        ProjectStage::SystemTest,
        ProjectStage::IntegrationTest,
        ProjectStage::Staging,
        ProjectStage::Production,
    ];

    /// The name used as key suffix.
    pub fn name(&self) -> &str {
        match self {
            ProjectStage::UnitTest => "UnitTest",
            ProjectStage::Development => "Development",
            ProjectStage::SystemTest => "SystemTest",
            ProjectStage::IntegrationTest => "IntegrationTest",
            ProjectStage::Staging => "Staging",
            ProjectStage::Production => "Production",
            ProjectStage::Custom(name) => name,
        }
    }

    /// Look up a built-in stage by its exact name.
    pub fn built_in(name: &str) -> Option<ProjectStage> {
        Self::BUILT_IN.into_iter().find(|stage| stage.name() == name)
    }

    /// Parse a stage name, accepting built-ins and the given custom names.
    pub fn parse_with(name: &str, custom: &[String]) -> Option<ProjectStage> {
        Self::built_in(name).or_else(|| {
            custom
                .iter()
                .find(|c| c.as_str() == name)
                .map(|c| ProjectStage::Custom(c.clone()))
        })
    }

    /// True for the stages used while running automated tests.
    pub fn is_test_stage(&self) -> bool {
        matches!(
            self,
            ProjectStage::UnitTest | ProjectStage::SystemTest | ProjectStage::IntegrationTest
        )
    }
}

impl fmt::Display for ProjectStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProjectStage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::built_in(s).ok_or_else(|| Error::UnknownProjectStage { name: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_names_round_trip() {
        for stage in ProjectStage::BUILT_IN {
            assert_eq!(stage.name().parse::<ProjectStage>().unwrap(), stage);
        }
    }

    #[test]
    fn names_are_case_sensitive() {
        assert!("production".parse::<ProjectStage>().is_err());
    }

    #[test]
    fn custom_stages_need_registration() {
        let custom = vec!["Qa".to_string()];
        assert_eq!(
            ProjectStage::parse_with("Qa", &custom),
            Some(ProjectStage::Custom("Qa".into()))
        );
        assert_eq!(ProjectStage::parse_with("Qa", &[]), None);
        assert_eq!(ProjectStage::Custom("Qa".into()).to_string(), "Qa");
    }

    #[test]
    fn default_is_production() {
        assert_eq!(ProjectStage::default(), ProjectStage::Production);
        assert!(ProjectStage::UnitTest.is_test_stage());
        assert!(!ProjectStage::Staging.is_test_stage());
    }
}

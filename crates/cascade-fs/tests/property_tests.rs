use cascade_fs::{NormalizedPath, parse_properties};
use proptest::prelude::*;

proptest! {
    #[test]
    fn parsing_arbitrary_input_never_panics(content in "\\PC*") {
        let _ = parse_properties(&NormalizedPath::new("fuzz.properties"), &content);
    }

    #[test]
    fn plain_assignments_survive_parsing(
        key in "[a-z][a-z0-9._-]{0,20}",
        value in "[A-Za-z0-9/.:@-]{0,30}",
    ) {
        let content = format!("{key}={value}\n");
        let props = parse_properties(&NormalizedPath::new("gen.properties"), &content).unwrap();
        prop_assert_eq!(props.get(&key), Some(&value));
    }

    #[test]
    fn normalized_paths_never_contain_backslashes(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        prop_assert!(!path.as_str().contains('\\'));
    }
}

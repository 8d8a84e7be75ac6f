//! trybuild UI tests for component_macros

#[test]
fn ui_component_macros() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/service_inject_ok.rs");
    t.pass("tests/trybuild/provider_config_ok.rs");
    t.pass("tests/trybuild/crate_path_ok.rs");
}

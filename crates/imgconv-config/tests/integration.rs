use imgconv_config::{ProjectLayout, RunConfig, RunFlags, ToolPaths};
use imgconv_test_support::TempTree;

#[test]
fn discovers_project_from_tool_checkout_on_disk() -> Result<(), Box<dyn std::error::Error>> {
    let tree = TempTree::new()?;
    let project = tree.mkdir("handbook")?;
    tree.write("handbook/src_doc/img/overview.uxf", "<diagram/>")?;
    let tool_dir = tree.mkdir("handbook/utils/ic")?;

    let layout = ProjectLayout::discover(&tool_dir)?;
    assert_eq!(layout.project_dir, project);
    assert!(layout.source_dir.join("overview.uxf").is_file());

    let config = RunConfig::new(
        layout,
        RunFlags {
            poster: Some(4.0),
            file: Some("overview".to_string()),
            ..RunFlags::default()
        },
        ToolPaths::default(),
    )?;
    assert!((config.poster_scale() - 4.0).abs() < f64::EPSILON);
    assert_eq!(config.layout.project_name, "handbook");
    Ok(())
}

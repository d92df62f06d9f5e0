mod common;

use common::{flip_layout_horizontal, flip_layout_vertical, load_fixture, visualize_path};
use gridpath::{find_path, Layout};
use std::fs;

#[test]
fn layout_fixture_tests() {
    let test_dir = "./test_data/layouts";
    let mut passed = 0;

    let mut entries: Vec<_> = fs::read_dir(test_dir)
        .expect("fixture directory")
        .filter_map(Result::ok)
        .collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("txt") {
            continue;
        }

        let fixture = match load_fixture(&path) {
            Ok(fixture) => fixture,
            Err(e) => panic!("Test '{}' failed to parse: {}", path.display(), e),
        };

        // Mirrored layouts must cost the same
        let variants = vec![
            ("original", fixture.text.clone()),
            ("h_flip", flip_layout_horizontal(&fixture.text)),
            ("v_flip", flip_layout_vertical(&fixture.text)),
            ("hv_flip", flip_layout_vertical(&flip_layout_horizontal(&fixture.text))),
        ];

        for (variant_name, text) in variants {
            let layout = Layout::parse(&text, 1.0)
                .unwrap_or_else(|e| panic!("Test '{}' [{}]: {}", fixture.name, variant_name, e));
            let (Some((sx, sy)), Some((tx, ty))) = (layout.start, layout.target) else {
                panic!("Test '{}' [{}] needs S and T markers", fixture.name, variant_name);
            };
            let mut grid = layout
                .build_grid(&fixture.penalties)
                .unwrap_or_else(|e| panic!("Test '{}' [{}]: {}", fixture.name, variant_name, e));

            let result = find_path(&mut grid, layout.cell_center(sx, sy), layout.cell_center(tx, ty));
            let actual = result.success.then_some(result.cost);

            if actual != fixture.expected_cost {
                panic!(
                    "Test '{}' [{}] failed: expected {:?}, got {:?}\n{}",
                    fixture.name,
                    variant_name,
                    fixture.expected_cost,
                    actual,
                    visualize_path(&grid, &result)
                );
            }
        }

        passed += 1;
    }

    assert!(passed > 0, "no fixtures found in {}", test_dir);
    println!("All {} layout fixtures passed", passed);
}

#[test]
fn shipped_config_and_map_load() {
    use gridpath::classifier::TerrainPenalties;
    use gridpath::config::Config;
    use std::path::Path;

    let config = Config::load_from(Path::new("config.toml")).expect("config.toml parses");
    let penalties = TerrainPenalties::from_config(&config.terrain);
    assert_eq!(penalties.get(1), 20);

    let cell_size = config.grid.node_radius * 2.0;
    let layout = Layout::load(Path::new(&config.map.path), cell_size).expect("default map parses");
    let mut grid = layout.build_grid(&penalties).expect("default map builds");
    assert_eq!((grid.size_x(), grid.size_y()), (layout.cols, layout.rows));

    let result = find_path(
        &mut grid,
        layout.cell_center(0, 0),
        layout.cell_center(layout.cols - 1, layout.rows - 1),
    );
    assert!(result.success);
}
